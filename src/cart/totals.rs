//! Totals
//!
//! The pricing summary as a pure function of the current lines, the
//! applied coupon and the pricing rules. No rounding happens here;
//! amounts keep full precision until display.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{
    coupons::{Coupon, CouponKind},
    models::{CartLine, Totals},
};
use crate::config::PricingConfig;

/// Compute the totals for a set of lines.
///
/// 1. subtotal = sum of price x quantity;
/// 2. shipping = 0 at or above the free-shipping threshold, else flat;
/// 3. a percent coupon discounts the subtotal, a shipping coupon forces
///    shipping to zero;
/// 4. tax applies to the discounted subtotal;
/// 5. total = discounted subtotal + shipping + tax, floored at zero.
pub fn compute_totals(
    lines: &[CartLine],
    coupon: Option<&Coupon>,
    pricing: &PricingConfig,
) -> Totals {
    let item_count = lines.iter().map(|line| u64::from(line.quantity)).sum();
    let subtotal: Decimal = lines.iter().map(CartLine::line_total).sum();

    let mut shipping = if subtotal >= pricing.free_shipping_threshold {
        Decimal::ZERO
    } else {
        pricing.shipping_flat
    };

    let mut discount = Decimal::ZERO;
    match coupon.map(|c| c.kind) {
        Some(CouponKind::Percent) => {
            if let Some(c) = coupon {
                discount = subtotal * (c.value / dec!(100));
            }
        }
        Some(CouponKind::Shipping) => shipping = Decimal::ZERO,
        None => {}
    }

    let tax = (subtotal - discount) * pricing.tax_rate;
    let total = ((subtotal - discount) + shipping + tax).max(Decimal::ZERO);

    Totals {
        item_count,
        subtotal,
        shipping,
        tax,
        discount,
        total,
        applied_coupon: coupon.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{cart::coupons::CouponBook, catalog::StockStatus};

    use super::*;

    fn line(price: Decimal, quantity: u32) -> CartLine {
        CartLine {
            id: format!("{price}-{quantity}"),
            slug: String::new(),
            title: "Print".to_owned(),
            price,
            image: String::new(),
            stock_status: StockStatus::InStock,
            quantity,
        }
    }

    fn coupon(code: &str) -> Coupon {
        CouponBook::builtin()
            .lookup(code)
            .cloned()
            .expect("built-in coupon")
    }

    #[test]
    fn worked_example_below_free_shipping() {
        // cart = [{price: 10, qty: 3}], no coupon.
        let totals = compute_totals(&[line(dec!(10), 3)], None, &PricingConfig::default());

        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.subtotal, dec!(30));
        assert_eq!(totals.shipping, dec!(7.99));
        assert_eq!(totals.tax, dec!(1.80));
        assert_eq!(totals.discount, dec!(0));
        assert_eq!(totals.total, dec!(39.79));
    }

    #[test]
    fn shipping_waived_at_threshold() {
        let totals = compute_totals(&[line(dec!(75), 1)], None, &PricingConfig::default());

        assert_eq!(totals.shipping, dec!(0));
    }

    #[test]
    fn percent_coupon_discounts_subtotal_but_not_shipping() {
        let totals = compute_totals(
            &[line(dec!(60), 2)],
            Some(&coupon("SAVE20")),
            &PricingConfig::default(),
        );

        assert_eq!(totals.subtotal, dec!(120));
        assert_eq!(totals.discount, dec!(24));
        // 120 >= 75, so shipping is already free via the threshold.
        assert_eq!(totals.shipping, dec!(0));
        assert_eq!(totals.tax, dec!(96) * dec!(0.06));
        assert_eq!(totals.total, dec!(96) + totals.tax);
    }

    #[test]
    fn percent_coupon_leaves_flat_shipping_in_place() {
        let totals = compute_totals(
            &[line(dec!(10), 1)],
            Some(&coupon("SAVE10")),
            &PricingConfig::default(),
        );

        assert_eq!(totals.discount, dec!(1));
        assert_eq!(totals.shipping, dec!(7.99), "percent coupons do not touch shipping");
    }

    #[test]
    fn shipping_coupon_zeroes_shipping_without_discount() {
        let totals = compute_totals(
            &[line(dec!(10), 1)],
            Some(&coupon("FREESHIP")),
            &PricingConfig::default(),
        );

        assert_eq!(totals.discount, dec!(0));
        assert_eq!(totals.shipping, dec!(0));
        assert_eq!(totals.tax, dec!(0.60));
        assert_eq!(totals.total, dec!(10.60));
    }

    #[test]
    fn empty_cart_still_charges_flat_shipping_into_total() {
        // Matches the original engine: totals of an empty cart are
        // subtotal 0, flat shipping, zero tax.
        let totals = compute_totals(&[], None, &PricingConfig::default());

        assert_eq!(totals.item_count, 0);
        assert_eq!(totals.subtotal, dec!(0));
        assert_eq!(totals.shipping, dec!(7.99));
        assert_eq!(totals.total, dec!(7.99));
    }

    #[test]
    fn total_never_goes_negative() {
        let hundred_percent = Coupon {
            code: "COMP".to_owned(),
            kind: CouponKind::Percent,
            value: dec!(200),
            min_subtotal: dec!(0),
            description: "comped".to_owned(),
        };

        let totals = compute_totals(
            &[line(dec!(100), 1)],
            Some(&hundred_percent),
            &PricingConfig::default(),
        );

        assert_eq!(totals.total, dec!(0));
    }

    #[test]
    fn totals_are_deterministic() {
        let lines = [line(dec!(19.99), 2), line(dec!(5), 1)];
        let c = coupon("SAVE10");

        let first = compute_totals(&lines, Some(&c), &PricingConfig::default());
        let second = compute_totals(&lines, Some(&c), &PricingConfig::default());

        assert_eq!(first, second);
    }
}
