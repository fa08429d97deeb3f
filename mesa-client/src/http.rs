//! HTTP client for the storefront REST API

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::client::{
    CreateOrderRequest, CreateOrderResponse, OrdersResponse, UpdateOrderStatusRequest,
};
use shared::models::{MenuItem, Order, OrderStatus, Restaurant};

/// HTTP client for making network requests to the ordering backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.put(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Server(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Catalog API ==========

    /// List all menu items
    pub async fn list_items(&self) -> ClientResult<Vec<MenuItem>> {
        self.get("api/items").await
    }

    /// Get a single menu item
    pub async fn get_item(&self, id: i64) -> ClientResult<MenuItem> {
        self.get(&format!("api/items/{}", id)).await
    }

    /// Get a restaurant record
    pub async fn get_restaurant(&self, id: i64) -> ClientResult<Restaurant> {
        self.get(&format!("api/restaurants/{}", id)).await
    }

    // ========== Order API ==========

    /// Create a new order from a cart quantity map
    pub async fn submit_order(
        &self,
        request: &CreateOrderRequest,
    ) -> ClientResult<CreateOrderResponse> {
        self.post("api/order/", request).await
    }

    /// Get a single order
    pub async fn get_order(&self, id: i64) -> ClientResult<Order> {
        self.get(&format!("api/order/{}", id)).await
    }

    /// List all orders (staff, bearer-authenticated)
    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        let response: OrdersResponse = self.get("api/orders").await?;
        Ok(response.orders)
    }

    /// Update one order's status (staff, bearer-authenticated)
    ///
    /// The server rejects transitions on already-terminal orders.
    pub async fn update_order_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
        self.put(&format!("api/order/{}", id), &UpdateOrderStatusRequest { status })
            .await
    }
}
