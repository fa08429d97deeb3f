//! Order model and status state machine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when the wire carries a status integer outside the enum
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid order status: {0}")]
pub struct InvalidStatus(pub u8);

/// Order lifecycle status
///
/// Serialized as the bare integer the API uses. `Completed` and
/// `Cancelled` are terminal: no transition leaves them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(into = "u8", try_from = "u8")]
pub enum OrderStatus {
    #[default]
    Pending = 0,
    InProgress = 1,
    Completed = 2,
    Cancelled = 3,
}

impl OrderStatus {
    /// All statuses in wire order (the staff select control offers these)
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Whether this status permits no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Staff-facing label
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Customer-facing progress label
    pub fn progress_label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Created",
            OrderStatus::InProgress => "Cooking",
            OrderStatus::Completed => "Done",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl From<OrderStatus> for u8 {
    fn from(status: OrderStatus) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = InvalidStatus;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderStatus::Pending),
            1 => Ok(OrderStatus::InProgress),
            2 => Ok(OrderStatus::Completed),
            3 => Ok(OrderStatus::Cancelled),
            other => Err(InvalidStatus(other)),
        }
    }
}

/// Resolved order line as the server returns it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    pub item_id: i64,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderLineItem {
    /// price * quantity
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order entity
///
/// Server-owned; the client mirrors it and has no write authority beyond
/// submission and explicit status updates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    /// Opaque table identity from the QR payload
    pub table_id: String,
    pub restaurant_id: i64,
    pub order_number: i64,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderLineItem>,
    /// Omitted by the single-order endpoint; defaults to zero
    #[serde(default)]
    pub total_cost: Decimal,
}
