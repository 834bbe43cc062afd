//! Cart lines, the active coupon, and everything derived from them.
//!
//! [`Cart`] is the pricing engine. It only stores lines and the coupon;
//! every total is computed on read, so nothing derived can go stale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coupon::{CouponCode, InvalidCouponError};
use crate::order::OrderSummary;
use crate::types::{LineId, Price};

/// A purchasable record without a quantity, as produced by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: LineId,
    pub name: String,
    pub name_hindi: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub image: String,
    pub item_count: u32,
    /// Kit item name to chosen option, for customized variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_options: Option<BTreeMap<String, String>>,
}

/// One line in the cart. Quantity is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: LineId,
    pub name: String,
    pub name_hindi: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub quantity: u32,
    pub image: String,
    pub item_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_options: Option<BTreeMap<String, String>>,
}

impl CartLine {
    fn new(item: CartItem, quantity: u32) -> Self {
        Self {
            id: item.id,
            name: item.name,
            name_hindi: item.name_hindi,
            price: item.price,
            original_price: item.original_price,
            quantity,
            image: item.image,
            item_count: item.item_count,
            selected_options: item.selected_options,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }

    /// Savings against the original price; zero when there is none or it
    /// is not above the selling price.
    #[must_use]
    pub fn line_savings(&self) -> Price {
        self.original_price
            .map_or(Price::ZERO, |original| original.saturating_sub(self.price))
            * self.quantity
    }
}

/// The cart: lines keyed by id, in insertion order, plus an optional coupon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    coupon: Option<CouponCode>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted parts.
    ///
    /// Lines with a zero quantity are dropped and repeated ids are merged,
    /// so a hand-edited or stale snapshot still satisfies the cart's
    /// invariants.
    #[must_use]
    pub fn from_parts(lines: Vec<CartLine>, coupon: Option<CouponCode>) -> Self {
        let mut cart = Self {
            lines: Vec::with_capacity(lines.len()),
            coupon,
        };
        for line in lines.into_iter().filter(|line| line.quantity > 0) {
            match cart.line_mut(line.id.as_str()) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Current lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line with the given id, if any.
    #[must_use]
    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id.as_str() == id)
    }

    fn line_mut(&mut self, id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id.as_str() == id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether a line with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.line(id).is_some()
    }

    /// The active coupon.
    #[must_use]
    pub const fn coupon(&self) -> Option<&CouponCode> {
        self.coupon.as_ref()
    }

    /// Add `quantity` of an item. An existing line with the same id is
    /// incremented; otherwise a new line is appended. A zero quantity counts
    /// as one.
    pub fn add_item(&mut self, item: CartItem, quantity: u32) {
        let quantity = quantity.max(1);
        match self.line_mut(item.id.as_str()) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine::new(item, quantity)),
        }
    }

    /// Remove the line with this id. Returns whether a line was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id.as_str() != id);
        self.lines.len() != before
    }

    /// Set a line's quantity exactly. Anything below 1 removes the line;
    /// unknown ids are ignored.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) {
        if quantity < 1 {
            self.remove_item(id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(id) {
            line.quantity = quantity;
        }
    }

    /// Remove every line and the coupon.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.coupon = None;
    }

    /// Activate a coupon, replacing any active one.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCouponError`] for blank or unknown codes; the cart is
    /// left unchanged.
    pub fn apply_coupon(&mut self, code: &str) -> Result<&CouponCode, InvalidCouponError> {
        let coupon = CouponCode::parse(code)?;
        Ok(&*self.coupon.insert(coupon))
    }

    /// Deactivate the coupon. Returns whether one was active.
    pub fn remove_coupon(&mut self) -> bool {
        self.coupon.take().is_some()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Sum of unit price times quantity.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of per-line savings against original prices.
    #[must_use]
    pub fn total_savings(&self) -> Price {
        self.lines.iter().map(CartLine::line_savings).sum()
    }

    /// Discount from the active coupon, rounded to whole rupees.
    #[must_use]
    pub fn coupon_discount(&self) -> Price {
        self.coupon
            .as_ref()
            .map_or(Price::ZERO, |coupon| self.total_price().percent(coupon.percent()))
    }

    /// Totals for the cart and checkout sidebars.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::new(
            self.total_price(),
            self.total_savings(),
            self.coupon_discount(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub fn item(id: &str, price: i64, original: Option<i64>) -> CartItem {
        CartItem {
            id: LineId::new(id),
            name: format!("{id} kit"),
            name_hindi: String::new(),
            price: Price::from_rupees(price),
            original_price: original.map(Price::from_rupees),
            image: format!("/images/{id}.jpg"),
            item_count: 12,
            selected_options: None,
        }
    }

    #[test]
    fn test_repeated_adds_accumulate_on_one_line() {
        let mut cart = Cart::new();
        for delta in [1, 2, 3] {
            cart.add_item(item("havan", 599, None), delta);
        }
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line("havan").unwrap().quantity, 6);
    }

    #[test]
    fn test_add_same_id_twice_gives_quantity_two() {
        let mut cart = Cart::new();
        cart.add_item(item("tulsi", 399, None), 1);
        cart.add_item(item("tulsi", 399, None), 1);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_zero_delta_counts_as_one() {
        let mut cart = Cart::new();
        cart.add_item(item("tulsi", 399, None), 0);
        assert_eq!(cart.line("tulsi").unwrap().quantity, 1);
    }

    #[test]
    fn test_set_quantity_below_one_removes() {
        for quantity in [0, -1, i64::MIN] {
            let mut cart = Cart::new();
            cart.add_item(item("tulsi", 399, None), 3);
            cart.set_quantity("tulsi", quantity);
            assert!(cart.is_empty());
        }
    }

    #[test]
    fn test_set_quantity_is_exact_not_incremental() {
        let mut cart = Cart::new();
        cart.add_item(item("tulsi", 399, None), 3);
        cart.set_quantity("tulsi", 5);
        assert_eq!(cart.line("tulsi").unwrap().quantity, 5);

        cart.set_quantity("missing", 5);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_remove_item_is_noop_when_absent() {
        let mut cart = Cart::new();
        cart.add_item(item("tulsi", 399, None), 1);
        assert!(!cart.remove_item("havan"));
        assert!(cart.remove_item("tulsi"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_scenario_with_first10() {
        let mut cart = Cart::new();
        cart.add_item(item("satyanarayan-katha", 849, Some(999)), 1);
        cart.add_item(item("tulsi-pujan", 399, Some(499)), 1);

        assert_eq!(cart.total_price(), Price::from_rupees(1248));
        assert_eq!(cart.total_savings(), Price::from_rupees(250));
        assert_eq!(cart.coupon_discount(), Price::ZERO);

        cart.apply_coupon("FIRST10").unwrap();
        assert_eq!(cart.coupon_discount(), Price::from_rupees(125));
    }

    #[test]
    fn test_derived_values_are_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 849, None), 2);
        cart.add_item(item("b", 399, None), 1);
        assert_eq!(cart.total_price(), cart.total_price());
        assert_eq!(cart.summary(), cart.summary());
    }

    #[test]
    fn test_discount_tracks_total_changes() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1000, None), 1);
        cart.apply_coupon("puja25").unwrap();
        assert_eq!(cart.coupon_discount(), Price::from_rupees(250));

        cart.set_quantity("a", 2);
        assert_eq!(cart.coupon_discount(), Price::from_rupees(500));
    }

    #[test]
    fn test_savings_ignore_missing_or_lower_original() {
        let mut cart = Cart::new();
        cart.add_item(item("no-original", 500, None), 2);
        cart.add_item(item("cheaper-original", 500, Some(400)), 2);
        assert_eq!(cart.total_savings(), Price::ZERO);
    }

    #[test]
    fn test_invalid_coupon_leaves_state_unchanged() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1248, None), 1);
        cart.apply_coupon("FIRST10").unwrap();

        assert!(cart.apply_coupon("BOGUS").is_err());
        assert_eq!(cart.coupon().unwrap().as_str(), "FIRST10");

        let mut fresh = Cart::new();
        fresh.add_item(item("a", 1248, None), 1);
        assert!(fresh.apply_coupon("BOGUS").is_err());
        assert_eq!(fresh.coupon_discount(), Price::ZERO);
    }

    #[test]
    fn test_clear_drops_lines_and_coupon() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 849, None), 1);
        cart.apply_coupon("DIWALI20").unwrap();

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.coupon().is_none());
        assert_eq!(cart.total_price(), Price::ZERO);
        assert_eq!(cart.coupon_discount(), Price::ZERO);
    }

    #[test]
    fn test_remove_coupon_reports_whether_active() {
        let mut cart = Cart::new();
        assert!(!cart.remove_coupon());
        cart.apply_coupon("welcome15").unwrap();
        assert!(cart.remove_coupon());
    }

    #[test]
    fn test_from_parts_merges_duplicates_and_drops_zero_quantities() {
        let first = CartLine::new(item("a", 100, None), 1);
        let second = CartLine::new(item("a", 100, None), 2);
        let zero = CartLine::new(item("b", 100, None), 0);

        let cart = Cart::from_parts(vec![first, second, zero], None);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_line_serializes_with_storage_field_names() {
        let line = CartLine::new(item("tulsi-pujan", 399, Some(499)), 1);
        let json = serde_json::to_value(&line).unwrap();
        assert!(json.get("nameHindi").is_some());
        assert!(json.get("originalPrice").is_some());
        assert!(json.get("itemCount").is_some());
        assert!(json.get("selectedOptions").is_none());
    }
}
