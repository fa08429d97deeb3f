//! Cart pricing reconciliation
//!
//! Joins the cart quantity map against per-item catalog fetches. Fetches
//! are independent and complete in any order; the derived line items and
//! total are recomputed from whatever has resolved so far, so the view
//! never blocks on the slowest fetch. A failed fetch parks that line in a
//! failed state for the rest of the view's lifetime without touching its
//! siblings or the total.

use crate::api::Catalog;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Fetch state of one referenced item
#[derive(Debug, Clone, PartialEq)]
pub enum LineDetail {
    /// Fetch still outstanding
    Loading,
    /// Fetch failed; excluded from the total
    Failed,
    /// Item details resolved
    Resolved { name: String, price: Decimal },
}

/// One derived line of the cart view
///
/// Never persisted; recomputed from the cart and the fetch states.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item_id: i64,
    pub quantity: u32,
    pub detail: LineDetail,
}

impl CartLine {
    /// price * quantity for resolved lines, `None` otherwise
    pub fn line_total(&self) -> Option<Decimal> {
        match &self.detail {
            LineDetail::Resolved { price, .. } => Some(*price * Decimal::from(self.quantity)),
            _ => None,
        }
    }
}

/// Reconciles cart quantities with asynchronously fetched item details
///
/// One instance per cart view; dropping it (or calling [`cancel`]) makes
/// outstanding fetches discard their results instead of updating state
/// for a view that no longer exists.
///
/// [`cancel`]: PricingReconciler::cancel
pub struct PricingReconciler<C: Catalog + 'static> {
    catalog: Arc<C>,
    lines: Arc<DashMap<i64, LineDetail>>,
    cancel: CancellationToken,
}

impl<C: Catalog + 'static> PricingReconciler<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            lines: Arc::new(DashMap::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Kick off fetches for cart items not yet requested
    ///
    /// Each distinct item id gets one independent task. Ids already
    /// loading, resolved or failed are not fetched again.
    pub fn refresh(&self, cart: &BTreeMap<i64, u32>) {
        for &item_id in cart.keys() {
            if self.lines.contains_key(&item_id) {
                continue;
            }
            self.lines.insert(item_id, LineDetail::Loading);

            let catalog = Arc::clone(&self.catalog);
            let lines = Arc::clone(&self.lines);
            let cancel = self.cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    result = catalog.get_item(item_id) => match result {
                        Ok(item) => {
                            lines.insert(
                                item_id,
                                LineDetail::Resolved {
                                    name: item.name,
                                    price: item.price,
                                },
                            );
                        }
                        Err(error) => {
                            tracing::warn!(item_id, %error, "Item fetch failed");
                            lines.insert(item_id, LineDetail::Failed);
                        }
                    },
                }
            });
        }
    }

    /// Derived line items for the given cart, in item-id order
    pub fn line_items(&self, cart: &BTreeMap<i64, u32>) -> Vec<CartLine> {
        cart.iter()
            .map(|(&item_id, &quantity)| CartLine {
                item_id,
                quantity,
                detail: self
                    .lines
                    .get(&item_id)
                    .map(|detail| detail.value().clone())
                    .unwrap_or(LineDetail::Loading),
            })
            .collect()
    }

    /// Sum of price * quantity over resolved lines only
    ///
    /// Unresolved and failed lines contribute zero; the value grows as
    /// fetches land, in whatever order they land.
    pub fn total(&self, cart: &BTreeMap<i64, u32>) -> Decimal {
        self.line_items(cart)
            .iter()
            .filter_map(CartLine::line_total)
            .sum()
    }

    /// Stop caring about outstanding fetches (view unmounted)
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl<C: Catalog + 'static> Drop for PricingReconciler<C> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
