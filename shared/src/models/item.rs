//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu item entity
///
/// Owned by the server-side catalog; the client holds read-only copies
/// reflecting the last successful fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Unit price, non-negative
    pub price: Decimal,
    /// Image reference (path or URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    /// Owning restaurant (present in list responses)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<i64>,
}

fn default_available() -> bool {
    true
}
