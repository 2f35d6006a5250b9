//! Cart
//!
//! The cart and pricing engine: persisted line items, a single optional
//! coupon, derived totals and change notifications.

use rust_decimal::Decimal;
use thiserror::Error;

pub mod coupons;
pub mod engine;
pub mod models;
pub mod totals;

pub use coupons::{Coupon, CouponBook, CouponKind};
pub use engine::{Cart, CartWatcher};
pub use models::{CartLine, Totals};
pub use totals::compute_totals;

use crate::storage::StoreError;

/// Errors surfaced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product cannot be added because it is out of stock.
    #[error("this product is out of stock")]
    OutOfStock,

    /// A quantity update referenced an id with no line in the cart.
    #[error("no cart line for product {0:?}")]
    LineNotFound(String),

    /// The coupon code does not exist in the coupon book.
    #[error("invalid coupon code")]
    InvalidCoupon,

    /// The coupon requires a higher subtotal than the cart holds.
    #[error("coupon requires a minimum subtotal of {0}")]
    ThresholdNotMet(Decimal),

    /// The persistence layer rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),
}
