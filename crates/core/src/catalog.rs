//! The kit catalog.
//!
//! The catalog is read-only after construction. [`Catalog::from_json`]
//! checks ids are unique and every kit names a known category, so lookups
//! never have to handle dangling references.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::types::{CategoryId, LineId, PackageId, Price};
use crate::wishlist::WishlistEntry;

/// Default upper bound of the price filter.
pub const DEFAULT_MAX_PRICE: i64 = 5000;

/// Malformed catalog data.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("catalog JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate package id: {0}")]
    DuplicatePackage(PackageId),
    #[error("duplicate category id: {0}")]
    DuplicateCategory(CategoryId),
    #[error("package {package} refers to unknown category {category}")]
    UnknownCategory {
        package: PackageId,
        category: CategoryId,
    },
}

/// A browsing category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub name_hindi: String,
    /// Icon name: flame, sun, book, peace, sparkles, repeat.
    pub icon: String,
}

/// One item inside a kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// Alternatives the shopper may pick instead of the default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl KitItem {
    /// Whether the shopper can pick a variant of this item.
    #[must_use]
    pub fn is_customizable(&self) -> bool {
        !self.options.is_empty()
    }

    /// The option in effect when the shopper picks nothing: the listed
    /// quantity if it is one of the options, otherwise the first option.
    #[must_use]
    pub fn default_option(&self) -> Option<&str> {
        self.quantity
            .as_deref()
            .filter(|quantity| self.options.iter().any(|option| option == quantity))
            .or_else(|| self.options.first().map(String::as_str))
    }
}

/// A purchasable kit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: PackageId,
    pub name: String,
    pub name_hindi: String,
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    pub price: Price,
    pub original_price: Price,
    pub image: String,
    pub category: CategoryId,
    pub rating: f32,
    pub reviews: u32,
    pub duration: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub best_for: Vec<String>,
    pub items: Vec<KitItem>,
}

impl Package {
    /// Number of items in the kit.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        u32::try_from(self.items.len()).unwrap_or(u32::MAX)
    }

    /// Rounded percentage off the original price.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        use rust_decimal::prelude::ToPrimitive;
        use rust_decimal::{Decimal, RoundingStrategy};

        let original = self.original_price.amount();
        if original <= Decimal::ZERO || self.price >= self.original_price {
            return 0;
        }
        ((original - self.price.amount()) * Decimal::ONE_HUNDRED / original)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    }

    /// Build the cart record for this kit.
    ///
    /// `selections` maps item index to the chosen option. Selections that
    /// equal the item's default, name an option the item does not offer,
    /// or point past the item list are ignored. When any remain, the line
    /// id is built by [`LineId::customized`] in item order so each
    /// customization is its own cart line.
    #[must_use]
    pub fn cart_item(&self, selections: &BTreeMap<usize, String>) -> CartItem {
        let chosen: Vec<(usize, &KitItem, &str)> = selections
            .iter()
            .filter_map(|(&index, value)| {
                let item = self.items.get(index)?;
                let valid = item.options.iter().any(|option| option == value);
                let changed = item.default_option() != Some(value.as_str());
                (valid && changed).then_some((index, item, value.as_str()))
            })
            .collect();

        let id = LineId::customized(
            &self.id,
            chosen.iter().map(|&(index, _, value)| (index, value)),
        );
        let selected_options = (!chosen.is_empty()).then(|| {
            chosen
                .iter()
                .map(|&(_, item, value)| (item.name.clone(), value.to_owned()))
                .collect()
        });

        CartItem {
            id,
            name: self.name.clone(),
            name_hindi: self.name_hindi.clone(),
            price: self.price,
            original_price: Some(self.original_price),
            image: self.image.clone(),
            item_count: self.item_count(),
            selected_options,
        }
    }

    /// Build the wishlist record for this kit.
    #[must_use]
    pub fn wishlist_entry(&self) -> WishlistEntry {
        WishlistEntry {
            id: self.id.clone(),
            name: self.name.clone(),
            name_hindi: self.name_hindi.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        [&self.name, &self.name_hindi, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Most reviewed first.
    #[default]
    #[serde(rename = "popular")]
    Popular,
    #[serde(rename = "price-low")]
    PriceLowToHigh,
    #[serde(rename = "price-high")]
    PriceHighToLow,
    /// Best rated first.
    #[serde(rename = "rating")]
    Rating,
}

impl SortOrder {
    pub const ALL: [Self; 4] = [
        Self::Popular,
        Self::PriceLowToHigh,
        Self::PriceHighToLow,
        Self::Rating,
    ];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::PriceLowToHigh => "price-low",
            Self::PriceHighToLow => "price-high",
            Self::Rating => "rating",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Popular => "Most Popular",
            Self::PriceLowToHigh => "Price: Low to High",
            Self::PriceHighToLow => "Price: High to Low",
            Self::Rating => "Highest Rated",
        }
    }

    /// Parse a query-string value, falling back to [`SortOrder::Popular`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == value)
            .unwrap_or_default()
    }
}

/// Listing filters. Empty fields do not filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageQuery {
    pub search: Option<String>,
    pub categories: Vec<CategoryId>,
    pub featured_only: bool,
    pub min_price: Price,
    pub max_price: Price,
    pub sort: SortOrder,
}

impl Default for PackageQuery {
    fn default() -> Self {
        Self {
            search: None,
            categories: Vec::new(),
            featured_only: false,
            min_price: Price::ZERO,
            max_price: Price::from_rupees(DEFAULT_MAX_PRICE),
            sort: SortOrder::default(),
        }
    }
}

impl PackageQuery {
    /// Whether anything differs from the default listing.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
            || !self.categories.is_empty()
            || self.featured_only
            || self.sort != SortOrder::default()
            || self.min_price != Price::ZERO
            || self.max_price != Price::from_rupees(DEFAULT_MAX_PRICE)
    }
}

#[derive(Deserialize)]
struct CatalogData {
    categories: Vec<Category>,
    packages: Vec<Package>,
}

/// Every kit and category, in catalog order.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    packages: Vec<Package>,
}

impl Catalog {
    /// Build a catalog, checking ids and category references.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] describing the first inconsistency.
    pub fn new(categories: Vec<Category>, packages: Vec<Package>) -> Result<Self, CatalogError> {
        let mut category_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.id.clone()));
            }
        }

        let mut package_ids = HashSet::new();
        for package in &packages {
            if !package_ids.insert(package.id.as_str()) {
                return Err(CatalogError::DuplicatePackage(package.id.clone()));
            }
            if !category_ids.contains(package.category.as_str()) {
                return Err(CatalogError::UnknownCategory {
                    package: package.id.clone(),
                    category: package.category.clone(),
                });
            }
        }

        Ok(Self {
            categories,
            packages,
        })
    }

    /// Parse `{"categories": [...], "packages": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] for malformed input, or any error
    /// from [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data.categories, data.packages)
    }

    #[must_use]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a kit by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Package> {
        self.packages.iter().find(|package| package.id.as_str() == id)
    }

    /// Look up a category by id.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.id.as_str() == id)
    }

    /// Case-insensitive substring search over English name, Hindi name
    /// and description. A blank query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Package> {
        let needle = query.trim().to_lowercase();
        self.packages
            .iter()
            .filter(|package| needle.is_empty() || package.matches_search(&needle))
            .collect()
    }

    /// Featured kits in catalog order.
    #[must_use]
    pub fn featured(&self) -> Vec<&Package> {
        self.packages.iter().filter(|package| package.featured).collect()
    }

    /// Up to `limit` other kits from the same category.
    #[must_use]
    pub fn related(&self, package: &Package, limit: usize) -> Vec<&Package> {
        self.packages
            .iter()
            .filter(|other| other.category == package.category && other.id != package.id)
            .take(limit)
            .collect()
    }

    /// How many kits belong to a category.
    #[must_use]
    pub fn count_in_category(&self, id: &str) -> usize {
        self.packages
            .iter()
            .filter(|package| package.category.as_str() == id)
            .count()
    }

    /// Apply filters, then sort. Sorting is stable, so ties keep catalog
    /// order.
    #[must_use]
    pub fn query(&self, query: &PackageQuery) -> Vec<&Package> {
        let mut packages: Vec<&Package> = query
            .search
            .as_deref()
            .map_or_else(|| self.packages.iter().collect(), |search| self.search(search));

        packages.retain(|package| {
            (!query.featured_only || package.featured)
                && (query.categories.is_empty() || query.categories.contains(&package.category))
                && package.price >= query.min_price
                && package.price <= query.max_price
        });

        match query.sort {
            SortOrder::Popular => packages.sort_by(|a, b| b.reviews.cmp(&a.reviews)),
            SortOrder::PriceLowToHigh => packages.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHighToLow => packages.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Rating => packages.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }
        packages
    }
}
