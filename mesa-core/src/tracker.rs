//! Customer-facing order tracking
//!
//! Read-only view over one order's lifecycle. Status changes happen on
//! the staff side and are observed here, never driven. The order to show
//! comes from the URL path first, then the stored active-order pointer;
//! with neither, the view reports "no order specified" instead of
//! fetching anything.

use crate::api::{Catalog, OrderApi};
use crate::error::{CoreError, CoreResult};
use crate::storage::DeviceStore;
use shared::models::{Order, Restaurant};
use std::sync::Arc;

/// What the order view shows
#[derive(Debug, Clone, PartialEq)]
pub enum OrderView {
    /// No path id and no stored pointer; terminal for this view
    NotSpecified,
    /// The tracked order, with best-effort restaurant detail
    Loaded {
        order: Order,
        restaurant: Option<Restaurant>,
    },
}

impl OrderView {
    /// Customer-facing status label, when an order is loaded
    pub fn status_label(&self) -> Option<&'static str> {
        match self {
            OrderView::NotSpecified => None,
            OrderView::Loaded { order, .. } => Some(order.status.progress_label()),
        }
    }

    /// Whether the "start new order" action is offered
    ///
    /// Only terminal orders offer it; an open order keeps the device
    /// pointed at itself.
    pub fn offers_new_order(&self) -> bool {
        match self {
            OrderView::NotSpecified => false,
            OrderView::Loaded { order, .. } => order.status.is_terminal(),
        }
    }
}

/// Tracks one order for the customer view
pub struct OrderTracker<A: OrderApi, C: Catalog> {
    orders: Arc<A>,
    catalog: Arc<C>,
    store: DeviceStore,
}

impl<A: OrderApi, C: Catalog> OrderTracker<A, C> {
    pub fn new(orders: Arc<A>, catalog: Arc<C>, store: DeviceStore) -> Self {
        Self {
            orders,
            catalog,
            store,
        }
    }

    /// Order id this view should display: URL path first, pointer second
    pub fn resolve_order_id(&self, path_id: Option<i64>) -> CoreResult<Option<i64>> {
        match path_id {
            Some(id) => Ok(Some(id)),
            None => Ok(self.store.active_order()?),
        }
    }

    /// Load the view for the given path parameter
    ///
    /// A resolvable id is persisted as the active-order pointer before
    /// fetching, so the device keeps tracking the order it last viewed.
    /// Restaurant detail is a secondary lookup: its failure degrades to
    /// `None` and is logged. An order fetch failure propagates.
    pub async fn load(&self, path_id: Option<i64>) -> CoreResult<OrderView> {
        let Some(order_id) = self.resolve_order_id(path_id)? else {
            return Ok(OrderView::NotSpecified);
        };
        self.store.set_active_order(order_id)?;

        let order = self.orders.get_order(order_id).await?;

        let restaurant = match self.catalog.get_restaurant(order.restaurant_id).await {
            Ok(restaurant) => Some(restaurant),
            Err(error) => {
                tracing::warn!(order_id, %error, "Restaurant lookup failed");
                None
            }
        };

        tracing::info!(order_id, status = order.status.label(), "Order loaded");
        Ok(OrderView::Loaded { order, restaurant })
    }

    /// Forget the tracked order so the device can start a new one
    ///
    /// Legal only once the order is terminal; anything still open keeps
    /// its pointer.
    pub fn start_new_order(&self, order: &Order) -> CoreResult<()> {
        if !order.status.is_terminal() {
            return Err(CoreError::OrderStillOpen(order.id));
        }
        self.store.clear_active_order()?;
        Ok(())
    }
}
