//! Account page data.
//!
//! There is no sign-in, so the account page shows a fixed demo profile
//! and order history.

use puja_samagri_core::{OrderId, OrderStatus, PackageId, Price};

#[derive(Debug, Clone)]
pub struct MockUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub member_since: String,
}

impl MockUser {
    /// Initials for the avatar circle.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect::<String>()
            .to_uppercase()
    }
}

#[derive(Debug, Clone)]
pub struct MockOrderItem {
    pub id: PackageId,
    pub name: String,
    pub quantity: u32,
    pub price: Price,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct MockOrder {
    pub id: OrderId,
    pub date: String,
    pub status: OrderStatus,
    pub total: Price,
    pub items: Vec<MockOrderItem>,
}

impl MockOrder {
    /// CSS modifier for the status badge.
    #[must_use]
    pub const fn status_class(&self) -> &'static str {
        match self.status {
            OrderStatus::Delivered => "badge--success",
            OrderStatus::Processing => "badge--info",
            OrderStatus::Shipped => "badge--warning",
            OrderStatus::Cancelled => "badge--danger",
        }
    }
}

/// The demo shopper.
#[must_use]
pub fn mock_user() -> MockUser {
    MockUser {
        name: "Amit Kumar".to_string(),
        email: "amit.kumar@email.com".to_string(),
        phone: "+91 98765 43210".to_string(),
        member_since: "January 2025".to_string(),
    }
}

fn item(id: &str, name: &str, price: i64) -> MockOrderItem {
    MockOrderItem {
        id: PackageId::new(id),
        name: name.to_string(),
        quantity: 1,
        price: Price::from_rupees(price),
        image: format!("/static/images/{id}.svg"),
    }
}

/// The demo shopper's past orders, newest first.
#[must_use]
pub fn mock_orders() -> Vec<MockOrder> {
    vec![
        MockOrder {
            id: OrderId::new("PS12345678"),
            date: "Jan 28, 2026".to_string(),
            status: OrderStatus::Delivered,
            total: Price::from_rupees(1298),
            items: vec![
                item("satyanarayan-katha", "Satyanarayan Katha Kit", 849),
                item("tulsi-pujan", "Tulsi Pujan Kit", 399),
            ],
        },
        MockOrder {
            id: OrderId::new("PS12345677"),
            date: "Jan 15, 2026".to_string(),
            status: OrderStatus::Shipped,
            total: Price::from_rupees(599),
            items: vec![item("havan-samagri", "Havan Samagri Kit", 599)],
        },
        MockOrder {
            id: OrderId::new("PS12345676"),
            date: "Dec 20, 2025".to_string(),
            status: OrderStatus::Delivered,
            total: Price::from_rupees(1499),
            items: vec![item("griha-shanti", "Griha Shanti Paath Kit", 1499)],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(mock_user().initials(), "AK");
    }

    #[test]
    fn test_orders_are_prefixed() {
        for order in mock_orders() {
            assert!(order.id.as_str().starts_with(OrderId::PREFIX));
        }
    }
}
