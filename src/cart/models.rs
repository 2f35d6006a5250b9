//! Cart models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::coupons::Coupon;
use crate::catalog::StockStatus;

/// One product entry in the cart.
///
/// A line is a denormalized snapshot of the product captured when it was
/// added; later catalog edits do not flow back into existing lines. The
/// quantity is always at least one while the line is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product id, stringified the way the stored blob keeps it.
    pub id: String,

    /// Product slug at add time.
    #[serde(default)]
    pub slug: String,

    /// Product title at add time.
    pub title: String,

    /// Unit price at add time.
    pub price: Decimal,

    /// Primary image URL at add time.
    #[serde(default)]
    pub image: String,

    /// Stock status at add time.
    #[serde(default)]
    pub stock_status: StockStatus,

    /// Units of this product in the cart; always `>= 1`.
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal: unit price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// The derived pricing summary for the current cart state.
///
/// Never persisted; recomputed from the lines and coupon on every read.
/// Amounts keep full precision; rounding happens only at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Total units across all lines.
    pub item_count: u64,

    /// Sum of line totals before any discount.
    pub subtotal: Decimal,

    /// Shipping charge after threshold and coupon rules.
    pub shipping: Decimal,

    /// Tax on the discounted subtotal.
    pub tax: Decimal,

    /// Amount taken off the subtotal by a percent coupon.
    pub discount: Decimal,

    /// Grand total, never negative.
    pub total: Decimal,

    /// The coupon the totals were computed with.
    pub applied_coupon: Option<Coupon>,
}
