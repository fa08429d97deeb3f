//! Order submission
//!
//! The one-shot transition from cart to server-created order. Success
//! records the new order id as the active pointer and clears the cart in
//! one durable transaction; any failure leaves every durable key exactly
//! as it was, so the caller can retry cleanly.
//!
//! There is no client-side idempotency key: a retry after an ambiguous
//! failure (e.g. a timeout after the server already persisted the order)
//! can create a duplicate order. Known gap, not a guarantee.

use crate::api::OrderApi;
use crate::error::{CoreError, CoreResult};
use crate::session::SessionContext;
use crate::storage::DeviceStore;
use shared::client::CreateOrderRequest;
use std::sync::Arc;

/// Submits the cart as a new order
pub struct OrderSubmitter<A: OrderApi> {
    api: Arc<A>,
    store: DeviceStore,
}

impl<A: OrderApi> OrderSubmitter<A> {
    pub fn new(api: Arc<A>, store: DeviceStore) -> Self {
        Self { api, store }
    }

    /// Submit the current cart for the given session context
    ///
    /// Requires a resolved table identity and a non-empty cart. Returns
    /// the id of the order the server created; the full order is fetched
    /// by the tracker when the customer lands on the order view.
    pub async fn submit(&self, session: &SessionContext) -> CoreResult<i64> {
        let table_id = session
            .table_id
            .clone()
            .ok_or(CoreError::MissingContext("table_id"))?;

        let cart = self.store.cart()?;
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let request = CreateOrderRequest {
            table_id,
            restaurant_id: session.restaurant_id,
            items: cart,
        };
        let response = self.api.submit_order(&request).await?;

        // Pointer and cart change together or not at all.
        self.store.commit_submission(response.id)?;
        tracing::info!(order_id = response.id, "Order placed");
        Ok(response.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mesa_client::{ClientError, ClientResult};
    use shared::client::CreateOrderResponse;
    use shared::models::{Order, OrderStatus};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubOrderApi {
        fail: bool,
        calls: AtomicUsize,
        last_request: Mutex<Option<CreateOrderRequest>>,
    }

    #[async_trait]
    impl OrderApi for StubOrderApi {
        async fn submit_order(
            &self,
            request: &CreateOrderRequest,
        ) -> ClientResult<CreateOrderResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            if self.fail {
                return Err(ClientError::Server("order rejected".to_string()));
            }
            Ok(CreateOrderResponse { id: 88 })
        }

        async fn get_order(&self, _id: i64) -> ClientResult<Order> {
            unimplemented!("not used by submission")
        }

        async fn list_orders(&self) -> ClientResult<Vec<Order>> {
            unimplemented!("not used by submission")
        }

        async fn update_order_status(
            &self,
            _id: i64,
            _status: OrderStatus,
        ) -> ClientResult<Order> {
            unimplemented!("not used by submission")
        }
    }

    fn loaded_store() -> DeviceStore {
        let store = DeviceStore::open_in_memory().unwrap();
        store.cart_increment(3, 1).unwrap();
        store.cart_increment(5, 2).unwrap();
        store
    }

    fn session() -> SessionContext {
        SessionContext {
            table_id: Some("T12".to_string()),
            restaurant_id: Some(4),
        }
    }

    #[tokio::test]
    async fn test_successful_submission() {
        let api = Arc::new(StubOrderApi::default());
        let store = loaded_store();
        let submitter = OrderSubmitter::new(Arc::clone(&api), store.clone());

        let order_id = submitter.submit(&session()).await.unwrap();

        assert_eq!(order_id, 88);
        assert!(store.cart().unwrap().is_empty());
        assert_eq!(store.active_order().unwrap(), Some(88));

        let request = api.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.table_id, "T12");
        assert_eq!(request.restaurant_id, Some(4));
        assert_eq!(
            request.items,
            std::collections::BTreeMap::from([(3, 1), (5, 2)])
        );
    }

    #[tokio::test]
    async fn test_failed_submission_leaves_state_untouched() {
        let api = Arc::new(StubOrderApi {
            fail: true,
            ..Default::default()
        });
        let store = loaded_store();
        store.set_active_order(7).unwrap();
        let cart_before = store.cart().unwrap();

        let submitter = OrderSubmitter::new(api, store.clone());
        let result = submitter.submit(&session()).await;

        assert!(matches!(result, Err(CoreError::Client(_))));
        assert_eq!(store.cart().unwrap(), cart_before);
        assert_eq!(store.active_order().unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected_without_a_request() {
        let api = Arc::new(StubOrderApi::default());
        let store = DeviceStore::open_in_memory().unwrap();
        let submitter = OrderSubmitter::new(Arc::clone(&api), store);

        let result = submitter.submit(&session()).await;

        assert!(matches!(result, Err(CoreError::EmptyCart)));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_table_context_is_rejected() {
        let api = Arc::new(StubOrderApi::default());
        let submitter = OrderSubmitter::new(Arc::clone(&api), loaded_store());

        let result = submitter
            .submit(&SessionContext {
                table_id: None,
                restaurant_id: Some(4),
            })
            .await;

        assert!(matches!(result, Err(CoreError::MissingContext("table_id"))));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }
}
