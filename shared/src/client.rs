//! Client-related types shared between the API client and the core
//!
//! Request/response DTOs for the storefront REST API.

use crate::models::{Order, OrderStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /api/order/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Opaque table identity from the QR payload
    pub table_id: String,
    /// Sent as `null` when the device never resolved one
    pub restaurant_id: Option<i64>,
    /// item id → quantity
    pub items: BTreeMap<i64, u32>,
}

/// Response of `POST /api/order/`
///
/// The server sends more fields; only the new order id matters here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub id: i64,
}

/// Response of `GET /api/orders`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

/// Body of `PUT /api/order/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
