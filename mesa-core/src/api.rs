//! API seams between the core flows and the HTTP client
//!
//! The flows depend on these traits rather than on the concrete client,
//! so they can be exercised against in-process fakes.

use async_trait::async_trait;
use mesa_client::{ClientResult, HttpClient};
use shared::client::{CreateOrderRequest, CreateOrderResponse};
use shared::models::{MenuItem, Order, OrderStatus, Restaurant};

/// Read access to the menu and restaurant catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_items(&self) -> ClientResult<Vec<MenuItem>>;
    async fn get_item(&self, id: i64) -> ClientResult<MenuItem>;
    async fn get_restaurant(&self, id: i64) -> ClientResult<Restaurant>;
}

/// Order creation, retrieval and status updates
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn submit_order(
        &self,
        request: &CreateOrderRequest,
    ) -> ClientResult<CreateOrderResponse>;
    async fn get_order(&self, id: i64) -> ClientResult<Order>;
    async fn list_orders(&self) -> ClientResult<Vec<Order>>;
    async fn update_order_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order>;
}

#[async_trait]
impl Catalog for HttpClient {
    async fn list_items(&self) -> ClientResult<Vec<MenuItem>> {
        HttpClient::list_items(self).await
    }

    async fn get_item(&self, id: i64) -> ClientResult<MenuItem> {
        HttpClient::get_item(self, id).await
    }

    async fn get_restaurant(&self, id: i64) -> ClientResult<Restaurant> {
        HttpClient::get_restaurant(self, id).await
    }
}

#[async_trait]
impl OrderApi for HttpClient {
    async fn submit_order(
        &self,
        request: &CreateOrderRequest,
    ) -> ClientResult<CreateOrderResponse> {
        HttpClient::submit_order(self, request).await
    }

    async fn get_order(&self, id: i64) -> ClientResult<Order> {
        HttpClient::get_order(self, id).await
    }

    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        HttpClient::list_orders(self).await
    }

    async fn update_order_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
        HttpClient::update_order_status(self, id, status).await
    }
}
