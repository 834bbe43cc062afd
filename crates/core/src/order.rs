//! Order summary shown beside the cart and checkout forms.

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// Orders with a subtotal strictly above this ship free.
pub const FREE_DELIVERY_ABOVE: i64 = 999;

/// Flat delivery fee below the free-delivery threshold.
pub const DELIVERY_FEE: i64 = 49;

/// Subtotal, discounts, delivery and the payable total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub savings: Price,
    pub coupon_discount: Price,
    pub delivery_fee: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Build a summary from the cart's derived values.
    #[must_use]
    pub fn new(subtotal: Price, savings: Price, coupon_discount: Price) -> Self {
        let delivery_fee = delivery_fee_for(subtotal);
        Self {
            subtotal,
            savings,
            coupon_discount,
            delivery_fee,
            total: subtotal - coupon_discount + delivery_fee,
        }
    }

    /// Whether delivery is free for this subtotal.
    #[must_use]
    pub fn free_delivery(&self) -> bool {
        self.delivery_fee.is_zero()
    }

    /// How much more the shopper must add to qualify for free delivery.
    /// `None` once it already applies or when the cart is empty.
    #[must_use]
    pub fn amount_to_free_delivery(&self) -> Option<Price> {
        if self.subtotal.is_zero() || self.free_delivery() {
            return None;
        }
        let threshold = Price::from_rupees(FREE_DELIVERY_ABOVE + 1);
        Some(threshold.saturating_sub(self.subtotal))
    }
}

fn delivery_fee_for(subtotal: Price) -> Price {
    if subtotal > Price::from_rupees(FREE_DELIVERY_ABOVE) {
        Price::ZERO
    } else {
        Price::from_rupees(DELIVERY_FEE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_fee_threshold() {
        let at = OrderSummary::new(Price::from_rupees(999), Price::ZERO, Price::ZERO);
        assert_eq!(at.delivery_fee, Price::from_rupees(49));
        assert_eq!(at.total, Price::from_rupees(1048));
        assert_eq!(at.amount_to_free_delivery(), Some(Price::from_rupees(1)));

        let above = OrderSummary::new(Price::from_rupees(1000), Price::ZERO, Price::ZERO);
        assert!(above.free_delivery());
        assert_eq!(above.total, Price::from_rupees(1000));
        assert_eq!(above.amount_to_free_delivery(), None);
    }

    #[test]
    fn test_total_subtracts_coupon_before_delivery() {
        let summary = OrderSummary::new(
            Price::from_rupees(1248),
            Price::from_rupees(250),
            Price::from_rupees(125),
        );
        // Free delivery is decided on the subtotal, not the discounted total.
        assert!(summary.free_delivery());
        assert_eq!(summary.total, Price::from_rupees(1123));
    }
}
