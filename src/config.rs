//! Configuration
//!
//! Storage key names, pricing rules and image limits shared across the
//! engine. The key strings are load-bearing: existing browser profiles
//! already hold data under them.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Keys under which the engine persists its blobs in the key-value store.
pub mod keys {
    /// Cart line items.
    pub const CART: &str = "rapidwoo-cart";

    /// The currently applied coupon, absent when none is applied.
    pub const CART_COUPON: &str = "rapidwoo-cart-coupon";

    /// User-saved product catalog (highest priority).
    pub const USER_PRODUCTS: &str = "rapidwoo-user-products";

    /// Cached demo catalog.
    pub const DEMO_PRODUCTS: &str = "rapidwoo-demo-products";

    /// Staging slot for catalogs built from uploaded images; promoted to
    /// [`USER_PRODUCTS`] on first read.
    pub const UPLOADED_DEMO: &str = "rapidwoo-uploaded-demo";

    /// Backup slot kept for backwards compatibility with older releases.
    pub const LEGACY: &str = "wfsm-v22-backup";

    /// Editor column visibility preferences.
    pub const COLUMN_PREFS: &str = "fpe.columns";

    /// Shop display toggle preferences.
    pub const SHOP_PREFS: &str = "fpe.shop.prefs";
}

/// Path of the remote demo catalog JSON.
pub const PRODUCTS_JSON_PATH: &str = "/demo/products.json";

/// Tax and shipping rules used by the totals calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    /// Flat tax rate applied to the discounted subtotal.
    pub tax_rate: Decimal,

    /// Flat shipping charge below the free-shipping threshold.
    pub shipping_flat: Decimal,

    /// Subtotal at or above which shipping is waived.
    pub free_shipping_threshold: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: dec!(0.06),
            shipping_flat: dec!(7.99),
            free_shipping_threshold: dec!(75),
        }
    }
}

/// Limits applied to uploaded images.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageConfig {
    /// Maximum accepted upload size in bytes.
    pub max_bytes: u64,

    /// Maximum display width; wider images are scaled down client-side.
    pub max_width: u32,

    /// JPEG quality used when re-encoding full-size images.
    pub quality: f32,

    /// Square bounding size for generated thumbnails.
    pub thumbnail_size: u32,

    /// JPEG quality used when re-encoding thumbnails.
    pub thumbnail_quality: f32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_bytes: 8 * 1024 * 1024,
            max_width: 1200,
            quality: 0.85,
            thumbnail_size: 400,
            thumbnail_quality: 0.8,
        }
    }
}
