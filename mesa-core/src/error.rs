//! Core error types

use shared::models::OrderStatus;
use thiserror::Error;

/// Error type for device-side flows
#[derive(Debug, Error)]
pub enum CoreError {
    /// API call failed (network failure or server rejection)
    #[error(transparent)]
    Client(#[from] mesa_client::ClientError),

    /// Durable storage failed
    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),

    /// Required session context was never resolved
    #[error("No session context: {0} is not set")]
    MissingContext(&'static str),

    /// Cart has no entries to submit
    #[error("Cart is empty")]
    EmptyCart,

    /// Status change attempted on a terminal order
    #[error("Order {order_id} is already {} and cannot change status", .status.label())]
    TerminalTransition { order_id: i64, status: OrderStatus },

    /// Pointer reset attempted before the order reached a terminal status
    #[error("Order {0} is still open")]
    OrderStillOpen(i64),

    /// A status commit is already running for this order
    #[error("Status update already in flight for order {0}")]
    CommitInFlight(i64),

    /// No pending selection, or it equals the committed status
    #[error("No status change selected for order {0}")]
    NoPendingChange(i64),

    /// Order id not present in the loaded list
    #[error("Unknown order: {0}")]
    UnknownOrder(i64),
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
