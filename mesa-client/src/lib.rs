//! Mesa Client - HTTP client for the storefront API
//!
//! Network calls to the ordering backend: the public catalog and order
//! endpoints plus the bearer-authenticated staff endpoints.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::client::{CreateOrderRequest, CreateOrderResponse, OrdersResponse};
