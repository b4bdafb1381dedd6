//! Pricing calculator.
//!
//! Totals are derived from a cart snapshot on every read and never cached or
//! stored outside an order record. All arithmetic stays in [`Decimal`];
//! rounding, if any, is a presentation concern and must not happen before an
//! order is persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartLineItem;

/// Flat-rate shipping and tax policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Flat shipping fee charged on every order.
    pub shipping_fee: Decimal,
    /// Tax rate applied to subtotal + shipping.
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            shipping_fee: Decimal::new(550, 2), // 5.50
            tax_rate: Decimal::new(132, 3),     // 13.2%
        }
    }
}

impl PricingPolicy {
    /// Compute the full pricing breakdown for a cart snapshot.
    ///
    /// Pure and total: an empty cart yields a zero subtotal and a total of
    /// shipping plus tax-on-shipping.
    #[must_use]
    pub fn compute(&self, items: &[CartLineItem]) -> PricingBreakdown {
        let subtotal: Decimal = items.iter().map(CartLineItem::line_total).sum();
        let tax = (subtotal + self.shipping_fee) * self.tax_rate;
        PricingBreakdown {
            subtotal,
            shipping: self.shipping_fee,
            tax,
            total: subtotal + self.shipping_fee + tax,
        }
    }
}

/// Derived totals for a cart snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::id::LineItemId;

    fn item(price: Decimal, quantity: u32) -> CartLineItem {
        CartLineItem {
            id: LineItemId::generate(),
            product_id: "P1".to_owned(),
            product_name: "Wool Coat".to_owned(),
            product_price: price,
            product_image: "products/wool-coat.png".to_owned(),
            quantity,
            size: "M".to_owned(),
        }
    }

    #[test]
    fn test_worked_example_exact() {
        // price 1000, qty 2, shipping 5.50, rate 0.132
        let breakdown = PricingPolicy::default().compute(&[item(Decimal::from(1000), 2)]);

        assert_eq!(breakdown.subtotal, Decimal::from(2000));
        assert_eq!(breakdown.shipping, Decimal::new(550, 2));
        assert_eq!(breakdown.tax, Decimal::new(264_726, 3)); // 264.726
        assert_eq!(breakdown.total, Decimal::new(2_270_226, 3)); // 2270.226
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let breakdown = PricingPolicy::default().compute(&[
            item(Decimal::new(1999, 2), 3),
            item(Decimal::new(749, 2), 1),
        ]);
        assert_eq!(
            breakdown.total,
            breakdown.subtotal + breakdown.shipping + breakdown.tax
        );
        assert_eq!(
            breakdown.tax,
            (breakdown.subtotal + breakdown.shipping) * Decimal::new(132, 3)
        );
    }

    #[test]
    fn test_empty_cart_still_charges_shipping() {
        let breakdown = PricingPolicy::default().compute(&[]);
        assert_eq!(breakdown.subtotal, Decimal::ZERO);
        assert_eq!(breakdown.shipping, Decimal::new(550, 2));
        assert_eq!(breakdown.tax, Decimal::new(550, 2) * Decimal::new(132, 3));
        assert_eq!(
            breakdown.total,
            breakdown.shipping + breakdown.tax
        );
    }

    #[test]
    fn test_no_floating_point_drift() {
        // 0.1 + 0.2 style amounts stay exact in decimal arithmetic
        let breakdown = PricingPolicy {
            shipping_fee: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
        }
        .compute(&[item(Decimal::new(1, 1), 1), item(Decimal::new(2, 1), 1)]);
        assert_eq!(breakdown.subtotal, Decimal::new(3, 1));
        assert_eq!(breakdown.total, Decimal::new(3, 1));
    }
}
