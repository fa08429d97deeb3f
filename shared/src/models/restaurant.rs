//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Restaurant record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
    /// e.g., "9:00 AM - 10:00 PM"
    pub working_hours: Option<String>,
    /// Phone or email
    pub contact_info: Option<String>,
    pub description: Option<String>,
}
