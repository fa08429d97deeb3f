//! Staff order board
//!
//! Lists every order and commits status transitions one order at a time.
//! Each row carries its own pending selection and in-flight flag, so a
//! commit on one order never blocks or disturbs another. Terminal orders
//! are immutable here; the server enforces the same rule and this side
//! only mirrors it defensively.

use crate::api::OrderApi;
use crate::error::{CoreError, CoreResult};
use dashmap::DashMap;
use shared::models::{Order, OrderStatus};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// How long the per-row confirmation shows before reverting
pub const CONFIRMATION_RESET: Duration = Duration::from_secs(2);

/// Transient per-order state on the board
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub order: Order,
    /// Status chosen but not yet committed
    pub pending: Option<OrderStatus>,
    /// A commit for this row is running
    pub in_flight: bool,
    /// The last commit's confirmation is still showing
    pub confirmed: bool,
}

impl OrderRow {
    fn new(order: Order) -> Self {
        Self {
            order,
            pending: None,
            in_flight: false,
            confirmed: false,
        }
    }
}

/// Staff view over all orders
pub struct OrderBoard<A: OrderApi + 'static> {
    api: Arc<A>,
    rows: Arc<DashMap<i64, OrderRow>>,
}

impl<A: OrderApi + 'static> OrderBoard<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            rows: Arc::new(DashMap::new()),
        }
    }

    /// Fetch the order list and rebuild the rows
    ///
    /// Transient row state (selections, confirmations) is reset; the
    /// server list is the authority.
    pub async fn load(&self) -> CoreResult<()> {
        let orders = self.api.list_orders().await?;
        self.rows.clear();
        for order in orders {
            self.rows.insert(order.id, OrderRow::new(order));
        }
        Ok(())
    }

    /// Snapshot of one row
    pub fn row(&self, order_id: i64) -> Option<OrderRow> {
        self.rows.get(&order_id).map(|row| row.value().clone())
    }

    /// Snapshot of all rows, sorted by order id
    pub fn rows(&self) -> Vec<OrderRow> {
        self.rows_for(None)
    }

    /// Rows for one restaurant, or all of them
    pub fn rows_for(&self, restaurant_id: Option<i64>) -> Vec<OrderRow> {
        let mut rows: Vec<OrderRow> = self
            .rows
            .iter()
            .filter(|entry| restaurant_id.is_none_or(|id| entry.order.restaurant_id == id))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.order.id);
        rows
    }

    /// Distinct restaurant ids among the loaded orders (filter options)
    pub fn restaurant_ids(&self) -> Vec<i64> {
        let ids: BTreeSet<i64> = self
            .rows
            .iter()
            .map(|entry| entry.order.restaurant_id)
            .collect();
        ids.into_iter().collect()
    }

    /// Choose the status to commit for one order
    ///
    /// Any enum value may be selected while the order is non-terminal;
    /// the selection control is disabled once the order is terminal.
    pub fn select_status(&self, order_id: i64, status: OrderStatus) -> CoreResult<()> {
        let mut row = self
            .rows
            .get_mut(&order_id)
            .ok_or(CoreError::UnknownOrder(order_id))?;
        if row.order.status.is_terminal() {
            return Err(CoreError::TerminalTransition {
                order_id,
                status: row.order.status,
            });
        }
        row.pending = Some(status);
        Ok(())
    }

    /// Whether the commit control is enabled for this row
    ///
    /// Disabled while a commit is in flight, when the selection equals
    /// the committed status, and always once the order is terminal.
    pub fn can_commit(&self, order_id: i64) -> bool {
        self.rows.get(&order_id).is_some_and(|row| {
            !row.in_flight
                && !row.order.status.is_terminal()
                && row.pending.is_some_and(|pending| pending != row.order.status)
        })
    }

    /// Commit the pending selection for one order
    ///
    /// On success the local mirror takes the server's record and the row
    /// shows a confirmation that reverts after [`CONFIRMATION_RESET`].
    /// On failure the committed status is unchanged and the selection
    /// stays, so the staff member can retry.
    pub async fn commit(&self, order_id: i64) -> CoreResult<OrderStatus> {
        let pending = {
            let mut row = self
                .rows
                .get_mut(&order_id)
                .ok_or(CoreError::UnknownOrder(order_id))?;
            if row.in_flight {
                return Err(CoreError::CommitInFlight(order_id));
            }
            if row.order.status.is_terminal() {
                return Err(CoreError::TerminalTransition {
                    order_id,
                    status: row.order.status,
                });
            }
            let Some(pending) = row.pending else {
                return Err(CoreError::NoPendingChange(order_id));
            };
            if pending == row.order.status {
                return Err(CoreError::NoPendingChange(order_id));
            }
            row.in_flight = true;
            pending
            // Guard dropped here; other rows commit freely meanwhile.
        };

        match self.api.update_order_status(order_id, pending).await {
            Ok(updated) => {
                let status = updated.status;
                if let Some(mut row) = self.rows.get_mut(&order_id) {
                    row.order = updated;
                    row.in_flight = false;
                    row.confirmed = true;
                }

                let rows = Arc::clone(&self.rows);
                tokio::spawn(async move {
                    tokio::time::sleep(CONFIRMATION_RESET).await;
                    if let Some(mut row) = rows.get_mut(&order_id) {
                        row.confirmed = false;
                    }
                });

                tracing::info!(order_id, status = status.label(), "Order status committed");
                Ok(status)
            }
            Err(error) => {
                if let Some(mut row) = self.rows.get_mut(&order_id) {
                    row.in_flight = false;
                }
                tracing::error!(order_id, %error, "Status update failed");
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mesa_client::{ClientError, ClientResult};
    use shared::client::{CreateOrderRequest, CreateOrderResponse};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn sample_order(id: i64, restaurant_id: i64, status: OrderStatus) -> Order {
        Order {
            id,
            table_id: format!("T{}", id),
            restaurant_id,
            order_number: 1700000000 + id,
            status,
            items: vec![],
            total_cost: Default::default(),
        }
    }

    struct StubApi {
        orders: Vec<Order>,
        fail_updates: AtomicBool,
        update_delay_ms: u64,
        updates: AtomicUsize,
    }

    impl StubApi {
        fn new(orders: Vec<Order>) -> Self {
            Self {
                orders,
                fail_updates: AtomicBool::new(false),
                update_delay_ms: 0,
                updates: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl OrderApi for StubApi {
        async fn submit_order(
            &self,
            _request: &CreateOrderRequest,
        ) -> ClientResult<CreateOrderResponse> {
            unimplemented!("not used by the board")
        }

        async fn get_order(&self, _id: i64) -> ClientResult<Order> {
            unimplemented!("not used by the board")
        }

        async fn list_orders(&self) -> ClientResult<Vec<Order>> {
            Ok(self.orders.clone())
        }

        async fn update_order_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
            if self.update_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.update_delay_ms)).await;
            }
            self.updates.fetch_add(1, Ordering::SeqCst);
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(ClientError::Server("update failed".to_string()));
            }
            let mut order = self
                .orders
                .iter()
                .find(|order| order.id == id)
                .expect("unknown order id")
                .clone();
            order.status = status;
            Ok(order)
        }
    }

    async fn board_with(orders: Vec<Order>) -> OrderBoard<StubApi> {
        let board = OrderBoard::new(Arc::new(StubApi::new(orders)));
        board.load().await.unwrap();
        board
    }

    #[tokio::test]
    async fn test_load_builds_rows() {
        let board = board_with(vec![
            sample_order(1, 4, OrderStatus::Pending),
            sample_order(2, 5, OrderStatus::InProgress),
        ])
        .await;

        let rows = board.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].order.id, 1);
        assert_eq!(rows[0].pending, None);
        assert!(!rows[0].in_flight);
        assert!(!rows[0].confirmed);
    }

    #[tokio::test]
    async fn test_restaurant_filter() {
        let board = board_with(vec![
            sample_order(1, 4, OrderStatus::Pending),
            sample_order(2, 5, OrderStatus::Pending),
            sample_order(3, 4, OrderStatus::Pending),
        ])
        .await;

        assert_eq!(board.restaurant_ids(), vec![4, 5]);
        assert_eq!(board.rows_for(Some(4)).len(), 2);
        assert_eq!(board.rows_for(Some(5)).len(), 1);
        assert_eq!(board.rows_for(None).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_flow_with_confirmation_revert() {
        let board = board_with(vec![sample_order(1, 4, OrderStatus::InProgress)]).await;

        board.select_status(1, OrderStatus::Completed).unwrap();
        assert!(board.can_commit(1));

        let committed = board.commit(1).await.unwrap();
        assert_eq!(committed, OrderStatus::Completed);

        let row = board.row(1).unwrap();
        assert_eq!(row.order.status, OrderStatus::Completed);
        assert!(row.confirmed);
        assert!(!row.in_flight);
        // Terminal now: the commit control stays disabled
        assert!(!board.can_commit(1));

        // Confirmation reverts after the fixed interval
        tokio::time::sleep(CONFIRMATION_RESET + Duration::from_millis(100)).await;
        assert!(!board.row(1).unwrap().confirmed);
        assert_eq!(board.row(1).unwrap().order.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_noop_selection_cannot_commit() {
        let board = board_with(vec![sample_order(1, 4, OrderStatus::InProgress)]).await;

        board.select_status(1, OrderStatus::InProgress).unwrap();
        assert!(!board.can_commit(1));

        let result = board.commit(1).await;
        assert!(matches!(result, Err(CoreError::NoPendingChange(1))));
    }

    #[tokio::test]
    async fn test_terminal_orders_are_immutable() {
        let board = board_with(vec![
            sample_order(1, 4, OrderStatus::Completed),
            sample_order(2, 4, OrderStatus::Cancelled),
        ])
        .await;

        for id in [1, 2] {
            let result = board.select_status(id, OrderStatus::Pending);
            assert!(matches!(
                result,
                Err(CoreError::TerminalTransition { .. })
            ));
            assert!(!board.can_commit(id));

            let result = board.commit(id).await;
            assert!(matches!(
                result,
                Err(CoreError::TerminalTransition { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_status_and_selection() {
        let board = board_with(vec![sample_order(1, 4, OrderStatus::Pending)]).await;
        board.api.fail_updates.store(true, Ordering::SeqCst);

        board.select_status(1, OrderStatus::InProgress).unwrap();
        let result = board.commit(1).await;

        assert!(matches!(result, Err(CoreError::Client(_))));
        let row = board.row(1).unwrap();
        assert_eq!(row.order.status, OrderStatus::Pending);
        assert_eq!(row.pending, Some(OrderStatus::InProgress));
        assert!(!row.in_flight);
        assert!(!row.confirmed);

        // Retry succeeds once the server recovers
        board.api.fail_updates.store(false, Ordering::SeqCst);
        assert!(board.can_commit(1));
        assert_eq!(board.commit(1).await.unwrap(), OrderStatus::InProgress);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_commit_refused_while_in_flight() {
        let api = Arc::new(StubApi {
            update_delay_ms: 50,
            ..StubApi::new(vec![sample_order(1, 4, OrderStatus::Pending)])
        });
        let board = Arc::new(OrderBoard::new(Arc::clone(&api)));
        board.load().await.unwrap();
        board.select_status(1, OrderStatus::InProgress).unwrap();

        let first = {
            let board = Arc::clone(&board);
            tokio::spawn(async move { board.commit(1).await })
        };
        // Let the first commit reach its in-flight await
        tokio::task::yield_now().await;
        assert!(board.row(1).unwrap().in_flight);
        assert!(!board.can_commit(1));

        let second = board.commit(1).await;
        assert!(matches!(second, Err(CoreError::CommitInFlight(1))));

        let first = first.await.unwrap().unwrap();
        assert_eq!(first, OrderStatus::InProgress);
        assert_eq!(api.updates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rows_commit_independently() {
        let api = Arc::new(StubApi {
            update_delay_ms: 20,
            ..StubApi::new(vec![
                sample_order(1, 4, OrderStatus::Pending),
                sample_order(2, 4, OrderStatus::Pending),
            ])
        });
        let board = Arc::new(OrderBoard::new(Arc::clone(&api)));
        board.load().await.unwrap();
        board.select_status(1, OrderStatus::InProgress).unwrap();
        board.select_status(2, OrderStatus::Cancelled).unwrap();

        // Both commits run concurrently; neither blocks the other
        let first = {
            let board = Arc::clone(&board);
            tokio::spawn(async move { board.commit(1).await })
        };
        let second = {
            let board = Arc::clone(&board);
            tokio::spawn(async move { board.commit(2).await })
        };

        assert_eq!(first.await.unwrap().unwrap(), OrderStatus::InProgress);
        assert_eq!(second.await.unwrap().unwrap(), OrderStatus::Cancelled);
        assert_eq!(board.row(1).unwrap().order.status, OrderStatus::InProgress);
        assert_eq!(board.row(2).unwrap().order.status, OrderStatus::Cancelled);
    }
}
