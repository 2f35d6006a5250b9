//! Coupons
//!
//! A named discount rule applied to the whole cart, and the fixed table
//! the demo ships with. At most one coupon is applied at a time.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// What a coupon does to the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponKind {
    /// Take a percentage off the subtotal.
    Percent,

    /// Waive the shipping charge.
    Shipping,
}

/// A discount rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// The code the user types, stored uppercase.
    pub code: String,

    /// Discount behaviour.
    #[serde(rename = "type")]
    pub kind: CouponKind,

    /// Percentage for [`CouponKind::Percent`]; unused for shipping coupons.
    pub value: Decimal,

    /// Minimum pre-discount subtotal required at application time.
    #[serde(rename = "minSubtotal", default)]
    pub min_subtotal: Decimal,

    /// Human-readable description shown on success.
    pub description: String,
}

/// The fixed coupon table.
#[derive(Debug, Clone)]
pub struct CouponBook {
    coupons: Vec<Coupon>,
}

impl CouponBook {
    /// The coupons the demo ships with.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            coupons: vec![
                Coupon {
                    code: "SAVE10".to_owned(),
                    kind: CouponKind::Percent,
                    value: dec!(10),
                    min_subtotal: dec!(0),
                    description: "10% off any order".to_owned(),
                },
                Coupon {
                    code: "SAVE20".to_owned(),
                    kind: CouponKind::Percent,
                    value: dec!(20),
                    min_subtotal: dec!(100),
                    description: "20% off $100+".to_owned(),
                },
                Coupon {
                    code: "FREESHIP".to_owned(),
                    kind: CouponKind::Shipping,
                    value: dec!(0),
                    min_subtotal: dec!(0),
                    description: "Free standard shipping".to_owned(),
                },
            ],
        }
    }

    /// A custom coupon table.
    #[must_use]
    pub fn new(coupons: Vec<Coupon>) -> Self {
        Self { coupons }
    }

    /// Look up a coupon; the code is trimmed and matched case-insensitively.
    pub fn lookup(&self, code: &str) -> Option<&Coupon> {
        let wanted = code.trim().to_uppercase();
        self.coupons.iter().find(|coupon| coupon.code == wanted)
    }
}

impl Default for CouponBook {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn lookup_is_trimmed_and_case_insensitive() {
        let book = CouponBook::builtin();

        assert!(book.lookup("save20").is_some());
        assert!(book.lookup("  FreeShip  ").is_some());
        assert!(book.lookup("SAVE99").is_none());
        assert!(book.lookup("").is_none());
    }

    #[test]
    fn save20_requires_a_hundred_dollar_subtotal() {
        let book = CouponBook::builtin();
        let coupon = book.lookup("SAVE20").expect("SAVE20 is built in");

        assert_eq!(coupon.kind, CouponKind::Percent);
        assert_eq!(coupon.min_subtotal, dec!(100));
    }

    #[test]
    fn coupon_serde_uses_stored_field_names() -> TestResult {
        let book = CouponBook::builtin();
        let coupon = book.lookup("FREESHIP").expect("FREESHIP is built in");

        let json = serde_json::to_string(coupon)?;
        assert!(json.contains("\"type\":\"shipping\""), "kind stored as type");
        assert!(json.contains("minSubtotal"), "camelCase threshold key");

        let back: Coupon = serde_json::from_str(&json)?;
        assert_eq!(&back, coupon);

        Ok(())
    }
}
