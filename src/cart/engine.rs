//! Cart engine
//!
//! The stateful cart service. Lines and the applied coupon live in the
//! key-value store; totals are derived on demand. Every successful
//! mutation persists the new state and emits one [`Totals`] snapshot to
//! subscribers.

use std::sync::{
    Arc, Mutex,
    mpsc::{Receiver, Sender, channel},
};

use super::{
    CartError,
    coupons::CouponBook,
    models::{CartLine, Totals},
    totals::compute_totals,
};
use crate::{
    catalog::Catalog,
    config::{PricingConfig, keys},
    storage::{KeyValueStore, StoreChange, StoreError, get_json, set_json},
    util::zero,
};

/// A subscription to cart totals.
///
/// One snapshot arrives per successful mutation. Dropping the watcher
/// ends the subscription.
#[derive(Debug)]
pub struct CartWatcher {
    rx: Receiver<Totals>,
}

impl CartWatcher {
    /// The next pending snapshot, if any.
    pub fn try_next(&self) -> Option<Totals> {
        self.rx.try_recv().ok()
    }

    /// Drain every pending snapshot.
    pub fn drain(&self) -> Vec<Totals> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

/// The cart service.
pub struct Cart {
    store: Arc<dyn KeyValueStore>,
    catalog: Arc<Catalog>,
    pricing: PricingConfig,
    coupons: CouponBook,
    listeners: Mutex<Vec<Sender<Totals>>>,
}

impl Cart {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: Arc<Catalog>) -> Self {
        Self::with_rules(store, catalog, PricingConfig::default(), CouponBook::builtin())
    }

    /// A cart with custom pricing rules and coupon table.
    #[must_use]
    pub fn with_rules(
        store: Arc<dyn KeyValueStore>,
        catalog: Arc<Catalog>,
        pricing: PricingConfig,
        coupons: CouponBook,
    ) -> Self {
        Self {
            store,
            catalog,
            pricing,
            coupons,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// The stored cart lines.
    pub fn lines(&self) -> Vec<CartLine> {
        get_json(self.store.as_ref(), keys::CART).unwrap_or_default()
    }

    /// The coupon currently applied, if any.
    pub fn applied_coupon(&self) -> Option<super::Coupon> {
        get_json(self.store.as_ref(), keys::CART_COUPON)
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines()
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// The current pricing summary.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.lines(), self.applied_coupon().as_ref(), &self.pricing)
    }

    /// Add a product to the cart by id or slug.
    ///
    /// An unresolvable reference degrades to a zero-priced placeholder
    /// line rather than failing; a quantity of zero is treated as one.
    /// Adding a product already in the cart merges into its line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] for an out-of-stock product, or
    /// a store error if the new state cannot be persisted.
    pub async fn add(&self, reference: &str, quantity: u32) -> Result<Totals, CartError> {
        let added = match self.catalog.find(reference).await {
            Some(product) => {
                if product.is_out_of_stock() {
                    return Err(CartError::OutOfStock);
                }
                CartLine {
                    id: product.id.to_string(),
                    slug: product.slug.clone(),
                    title: product.title.clone(),
                    price: product.effective_price(),
                    image: if product.image.is_empty() {
                        product
                            .images
                            .first()
                            .map(|image| image.src.clone())
                            .unwrap_or_default()
                    } else {
                        product.image.clone()
                    },
                    stock_status: product.stock_status,
                    quantity: quantity.max(1),
                }
            }
            None => {
                tracing::warn!(reference, "product not found, adding placeholder line");
                CartLine {
                    id: reference.to_owned(),
                    slug: reference.to_owned(),
                    title: "Item".to_owned(),
                    price: zero(),
                    image: String::new(),
                    stock_status: crate::catalog::StockStatus::InStock,
                    quantity: quantity.max(1),
                }
            }
        };

        let mut lines = self.lines();
        if let Some(existing) = lines.iter_mut().find(|line| line.id == added.id) {
            existing.quantity = existing.quantity.saturating_add(added.quantity);
        } else {
            lines.push(added);
        }

        self.save_lines(&lines)?;
        Ok(self.emit())
    }

    /// Set the quantity of an existing line. Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] when no line matches `id`, or
    /// a store error if the new state cannot be persisted.
    pub fn update_quantity(&self, id: &str, quantity: u32) -> Result<Totals, CartError> {
        let mut lines = self.lines();

        if !lines.iter().any(|line| line.id == id) {
            return Err(CartError::LineNotFound(id.to_owned()));
        }

        if quantity == 0 {
            lines.retain(|line| line.id != id);
        } else if let Some(line) = lines.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }

        self.save_lines(&lines)?;
        Ok(self.emit())
    }

    /// Remove a line. Removing an absent line is not an error.
    ///
    /// # Errors
    ///
    /// Returns a store error if the new state cannot be persisted.
    pub fn remove(&self, id: &str) -> Result<Totals, CartError> {
        let mut lines = self.lines();
        lines.retain(|line| line.id != id);

        self.save_lines(&lines)?;
        Ok(self.emit())
    }

    /// Empty the cart and drop any applied coupon.
    ///
    /// # Errors
    ///
    /// Returns a store error if the stored state cannot be cleared.
    pub fn clear(&self) -> Result<Totals, CartError> {
        self.store.remove(keys::CART)?;
        self.store.remove(keys::CART_COUPON)?;
        Ok(self.emit())
    }

    /// Apply a coupon by code, replacing any coupon already applied.
    ///
    /// The minimum-subtotal check runs against the coupon-free subtotal.
    /// An applied coupon is not re-validated by later mutations.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidCoupon`] for an unknown code,
    /// [`CartError::ThresholdNotMet`] when the subtotal is too low, or a
    /// store error if the coupon cannot be persisted.
    pub fn apply_coupon(&self, code: &str) -> Result<Totals, CartError> {
        let coupon = self
            .coupons
            .lookup(code)
            .ok_or(CartError::InvalidCoupon)?
            .clone();

        let subtotal = compute_totals(&self.lines(), None, &self.pricing).subtotal;
        if subtotal < coupon.min_subtotal {
            return Err(CartError::ThresholdNotMet(coupon.min_subtotal));
        }

        set_json(self.store.as_ref(), keys::CART_COUPON, &coupon)?;
        Ok(self.emit())
    }

    /// Drop the applied coupon, if any.
    ///
    /// # Errors
    ///
    /// Returns a store error if the stored coupon cannot be cleared.
    pub fn remove_coupon(&self) -> Result<Totals, CartError> {
        self.store.remove(keys::CART_COUPON)?;
        Ok(self.emit())
    }

    /// Subscribe to totals snapshots.
    pub fn subscribe(&self) -> CartWatcher {
        let (tx, rx) = channel();
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(tx);
        }
        CartWatcher { rx }
    }

    /// React to a store change made by another context.
    ///
    /// Re-emits the current totals when the change touched the cart or
    /// coupon keys; other keys are ignored. Returns whether a snapshot
    /// was emitted.
    pub fn on_store_change(&self, change: &StoreChange) -> bool {
        if change.key == keys::CART || change.key == keys::CART_COUPON {
            self.emit();
            return true;
        }
        false
    }

    fn save_lines(&self, lines: &[CartLine]) -> Result<(), StoreError> {
        set_json(self.store.as_ref(), keys::CART, &lines)
    }

    fn emit(&self) -> Totals {
        let totals = self.totals();

        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|tx| tx.send(totals.clone()).is_ok());
        }

        totals
    }
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("pricing", &self.pricing)
            .finish_non_exhaustive()
    }
}
