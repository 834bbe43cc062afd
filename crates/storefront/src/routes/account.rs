//! Account dashboard.
//!
//! There is no sign-in yet: profile, orders and addresses are demo data,
//! while the wishlist tab shows the visitor's real wishlist.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;
use puja_samagri_core::{SavedAddress, checkout::saved_addresses};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::Shopper;
use crate::models::{MockOrder, MockUser, PageContext, mock_orders, mock_user};

/// Dashboard tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountTab {
    #[default]
    Profile,
    Orders,
    Addresses,
    Wishlist,
    Settings,
}

impl AccountTab {
    pub const ALL: [Self; 5] = [
        Self::Profile,
        Self::Orders,
        Self::Addresses,
        Self::Wishlist,
        Self::Settings,
    ];

    /// Query string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Orders => "orders",
            Self::Addresses => "addresses",
            Self::Wishlist => "wishlist",
            Self::Settings => "settings",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Orders => "My Orders",
            Self::Addresses => "Addresses",
            Self::Wishlist => "Wishlist",
            Self::Settings => "Settings",
        }
    }

    /// Unknown or missing values show the profile.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        value
            .and_then(|value| Self::ALL.into_iter().find(|tab| tab.as_str() == value))
            .unwrap_or_default()
    }
}

/// A notification preference.
pub struct NotificationSetting {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub enabled: bool,
}

const NOTIFICATION_SETTINGS: [NotificationSetting; 4] = [
    NotificationSetting {
        key: "emailNotifications",
        label: "Email Notifications",
        description: "Receive order updates and offers via email",
        enabled: true,
    },
    NotificationSetting {
        key: "smsNotifications",
        label: "SMS Notifications",
        description: "Get delivery updates on your phone",
        enabled: true,
    },
    NotificationSetting {
        key: "orderUpdates",
        label: "Order Updates",
        description: "Status changes for orders you have placed",
        enabled: true,
    },
    NotificationSetting {
        key: "promotionalEmails",
        label: "Promotional Emails",
        description: "Festival offers and new puja kits",
        enabled: false,
    },
];

/// A tab link.
#[derive(Debug, Clone)]
pub struct TabLink {
    pub href: String,
    pub label: &'static str,
    pub active: bool,
}

/// A saved wishlist entry.
#[derive(Debug, Clone)]
pub struct WishlistItemView {
    pub id: String,
    pub name: String,
    pub name_hindi: String,
    pub price: String,
    pub image: String,
}

/// Account query string.
#[derive(Debug, Default, Deserialize)]
pub struct AccountParams {
    pub tab: Option<String>,
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub page: PageContext,
    pub tab: &'static str,
    pub tabs: Vec<TabLink>,
    pub user: MockUser,
    pub orders: Vec<MockOrder>,
    pub addresses: Vec<SavedAddress>,
    pub wishlist: Vec<WishlistItemView>,
    pub settings: &'static [NotificationSetting],
}

/// Display the account dashboard.
#[instrument(skip(shopper))]
pub async fn index(
    Query(params): Query<AccountParams>,
    mut shopper: Shopper,
) -> Result<AccountTemplate> {
    let tab = AccountTab::parse(params.tab.as_deref());

    let template = AccountTemplate {
        tab: tab.as_str(),
        tabs: AccountTab::ALL
            .iter()
            .map(|candidate| TabLink {
                href: format!("/account?tab={}", candidate.as_str()),
                label: candidate.label(),
                active: *candidate == tab,
            })
            .collect(),
        user: mock_user(),
        orders: mock_orders(),
        addresses: saved_addresses(),
        wishlist: shopper
            .wishlist()
            .entries()
            .iter()
            .map(|entry| WishlistItemView {
                id: entry.id.to_string(),
                name: entry.name.clone(),
                name_hindi: entry.name_hindi.clone(),
                price: entry.price.to_string(),
                image: entry.image.clone(),
            })
            .collect(),
        settings: &NOTIFICATION_SETTINGS,
        page: shopper.page(),
    };

    shopper.save().await?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_parse() {
        assert_eq!(AccountTab::parse(Some("orders")), AccountTab::Orders);
        assert_eq!(AccountTab::parse(Some("wishlist")), AccountTab::Wishlist);
        assert_eq!(AccountTab::parse(Some("bogus")), AccountTab::Profile);
        assert_eq!(AccountTab::parse(None), AccountTab::Profile);
    }

    #[test]
    fn test_tab_values_are_unique() {
        for (i, tab) in AccountTab::ALL.iter().enumerate() {
            assert!(
                AccountTab::ALL
                    .iter()
                    .skip(i + 1)
                    .all(|other| other.as_str() != tab.as_str())
            );
        }
    }
}
