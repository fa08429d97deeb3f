//! Shared types for the mesa storefront
//!
//! Data models and wire DTOs used by both the API client and the
//! device-side core.

pub mod client;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::{CreateOrderRequest, CreateOrderResponse, OrdersResponse, UpdateOrderStatusRequest};
pub use models::{InvalidStatus, MenuItem, Order, OrderLineItem, OrderStatus, Restaurant};
