//! Cart lines and price summary as rendered on the cart and checkout pages.

use puja_samagri_core::{Cart, CartLine};

/// A chosen option on a customized line.
#[derive(Debug, Clone)]
pub struct SelectedOption {
    pub item: String,
    pub choice: String,
}

/// One cart line.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: String,
    pub package_href: String,
    pub name: String,
    pub name_hindi: String,
    pub price: String,
    pub original_price: Option<String>,
    pub quantity: u32,
    pub decrement_to: i64,
    pub increment_to: i64,
    pub line_total: String,
    pub image: String,
    pub item_count: u32,
    pub options: Vec<SelectedOption>,
}

impl CartLineView {
    #[must_use]
    pub fn new(line: &CartLine) -> Self {
        let quantity = i64::from(line.quantity);
        Self {
            id: line.id.to_string(),
            package_href: format!("/packages/{}", line.id.package_id()),
            name: line.name.clone(),
            name_hindi: line.name_hindi.clone(),
            price: line.price.to_string(),
            original_price: line
                .original_price
                .filter(|original| *original > line.price)
                .map(|original| original.to_string()),
            quantity: line.quantity,
            decrement_to: quantity - 1,
            increment_to: quantity + 1,
            line_total: line.line_total().to_string(),
            image: line.image.clone(),
            item_count: line.item_count,
            options: line
                .selected_options
                .iter()
                .flatten()
                .map(|(item, choice)| SelectedOption {
                    item: item.clone(),
                    choice: choice.clone(),
                })
                .collect(),
        }
    }

    /// Views for every line in the cart.
    #[must_use]
    pub fn all(cart: &Cart) -> Vec<Self> {
        cart.lines()
            .iter()
            .map(Self::new)
            .collect()
    }
}

/// Totals box.
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub item_count: u32,
    pub subtotal: String,
    pub savings: Option<String>,
    pub coupon_code: Option<String>,
    pub coupon_percent: u8,
    pub coupon_discount: String,
    pub delivery: String,
    pub free_delivery: bool,
    pub to_free_delivery: Option<String>,
    pub total: String,
}

impl SummaryView {
    #[must_use]
    pub fn new(cart: &Cart) -> Self {
        let summary = cart.summary();
        Self {
            item_count: cart.total_items(),
            subtotal: summary.subtotal.to_string(),
            savings: (!summary.savings.is_zero()).then(|| summary.savings.to_string()),
            coupon_code: cart.coupon().map(ToString::to_string),
            coupon_percent: cart.coupon().map_or(0, |coupon| coupon.percent()),
            coupon_discount: summary.coupon_discount.to_string(),
            delivery: if summary.free_delivery() {
                "FREE".to_string()
            } else {
                summary.delivery_fee.to_string()
            },
            free_delivery: summary.free_delivery(),
            to_free_delivery: summary.amount_to_free_delivery().map(|amount| amount.to_string()),
            total: summary.total.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use puja_samagri_core::{CartItem, LineId, Price};

    use super::*;

    fn item(id: &str, price: i64, original: i64) -> CartItem {
        CartItem {
            id: LineId::new(id),
            name: "Tulsi Pujan Kit".to_string(),
            name_hindi: "तुलसी पूजन सामग्री".to_string(),
            price: Price::from_rupees(price),
            original_price: Some(Price::from_rupees(original)),
            image: "/static/images/tulsi-pujan.svg".to_string(),
            item_count: 5,
            selected_options: None,
        }
    }

    #[test]
    fn test_summary_below_free_delivery() {
        let mut cart = Cart::new();
        cart.add_item(item("tulsi-pujan", 399, 499), 2);

        let view = SummaryView::new(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, "₹798");
        assert_eq!(view.savings.as_deref(), Some("₹200"));
        assert_eq!(view.delivery, "₹49");
        assert_eq!(view.to_free_delivery.as_deref(), Some("₹202"));
        assert_eq!(view.total, "₹847");
    }

    #[test]
    fn test_summary_with_coupon_and_free_delivery() {
        let mut cart = Cart::new();
        cart.add_item(item("griha-shanti", 1499, 1999), 1);
        cart.apply_coupon("first10").unwrap();

        let view = SummaryView::new(&cart);
        assert_eq!(view.coupon_code.as_deref(), Some("FIRST10"));
        assert_eq!(view.coupon_percent, 10);
        assert_eq!(view.coupon_discount, "₹150");
        assert!(view.free_delivery);
        assert_eq!(view.delivery, "FREE");
        assert_eq!(view.total, "₹1,349");
    }

    #[test]
    fn test_line_view_lists_selected_options() {
        let mut custom = item("havan-samagri?0=1kg", 599, 799);
        custom.selected_options = Some(BTreeMap::from([(
            "Havan samagri mix".to_string(),
            "1kg".to_string(),
        )]));
        let mut cart = Cart::new();
        cart.add_item(custom, 1);

        let view = CartLineView::new(cart.lines().first().unwrap());
        assert_eq!(view.package_href, "/packages/havan-samagri");
        assert_eq!(view.decrement_to, 0);
        assert_eq!(view.increment_to, 2);
        assert_eq!(view.options.len(), 1);
        assert_eq!(view.options.first().unwrap().choice, "1kg");
    }

    #[test]
    fn test_customized_line_links_to_its_package() {
        let mut cart = Cart::new();
        cart.add_item(item("havan-samagri?0=1kg&1=Peepal", 599, 799), 1);
        cart.add_item(item("tulsi-pujan", 299, 399), 1);

        let views = CartLineView::all(&cart);
        let hrefs: Vec<&str> = views.iter().map(|v| v.package_href.as_str()).collect();
        assert_eq!(hrefs, vec!["/packages/havan-samagri", "/packages/tulsi-pujan"]);
    }
}
