//! Package listing, detail and add-to-cart handlers.

use std::collections::{BTreeMap, HashMap};

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use puja_samagri_core::{
    CategoryId, Package, PackageQuery, Price, SortOrder, ToastKind, catalog::DEFAULT_MAX_PRICE,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Shopper;
use crate::models::{CategoryView, PackageCard, PageContext};
use crate::routes::{pages::NotFoundTemplate, safe_return_to};
use crate::state::AppState;

/// Largest quantity accepted from the detail page form.
pub const MAX_QUANTITY: u32 = 99;

const RELATED_PACKAGES: usize = 4;

// =============================================================================
// Listing
// =============================================================================

/// Raw listing query string. Everything is optional and parsed leniently.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub search: Option<String>,
    /// Comma-separated category ids.
    pub category: Option<String>,
    pub featured: Option<String>,
    pub sort: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// A fixed price bracket in the sidebar.
pub struct PricePreset {
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
}

pub const PRICE_PRESETS: [PricePreset; 4] = [
    PricePreset {
        label: "Under ₹500",
        min: 0,
        max: 500,
    },
    PricePreset {
        label: "₹500 - ₹1000",
        min: 500,
        max: 1000,
    },
    PricePreset {
        label: "₹1000 - ₹1500",
        min: 1000,
        max: 1500,
    },
    PricePreset {
        label: "Above ₹1500",
        min: 1500,
        max: DEFAULT_MAX_PRICE,
    },
];

/// The listing filters currently in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub search: String,
    pub categories: Vec<String>,
    pub featured: bool,
    pub sort: SortOrder,
    pub min_price: i64,
    pub max_price: i64,
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            search: String::new(),
            categories: Vec::new(),
            featured: false,
            sort: SortOrder::default(),
            min_price: 0,
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

fn parse_bound(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value >= 0)
        .unwrap_or(default)
}

impl Listing {
    /// Read the filters from the query string. Unknown sort keys and
    /// unparseable bounds fall back to their defaults.
    #[must_use]
    pub fn from_params(params: &ListingParams) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for id in params
            .category
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
        {
            if !categories.iter().any(|existing| existing == id) {
                categories.push(id.to_string());
            }
        }

        let mut min_price = parse_bound(params.min_price.as_deref(), 0);
        let mut max_price = parse_bound(params.max_price.as_deref(), DEFAULT_MAX_PRICE);
        if min_price > max_price {
            std::mem::swap(&mut min_price, &mut max_price);
        }

        Self {
            search: params.search.as_deref().unwrap_or_default().trim().to_string(),
            categories,
            featured: params.featured.as_deref() == Some("true"),
            sort: params
                .sort
                .as_deref()
                .map_or_else(SortOrder::default, SortOrder::parse),
            min_price,
            max_price,
        }
    }

    /// The catalog query for these filters.
    #[must_use]
    pub fn query(&self) -> PackageQuery {
        PackageQuery {
            search: (!self.search.is_empty()).then(|| self.search.clone()),
            categories: self.categories.iter().map(CategoryId::new).collect(),
            featured_only: self.featured,
            min_price: Price::from_rupees(self.min_price),
            max_price: Price::from_rupees(self.max_price),
            sort: self.sort,
        }
    }

    /// Link to the listing with these filters.
    #[must_use]
    pub fn href(&self) -> String {
        let mut params = Vec::new();
        if !self.search.is_empty() {
            params.push(format!("search={}", urlencoding::encode(&self.search)));
        }
        if !self.categories.is_empty() {
            params.push(format!(
                "category={}",
                urlencoding::encode(&self.categories.join(","))
            ));
        }
        if self.featured {
            params.push("featured=true".to_string());
        }
        if self.sort != SortOrder::default() {
            params.push(format!("sort={}", self.sort.as_str()));
        }
        if self.min_price != 0 {
            params.push(format!("min_price={}", self.min_price));
        }
        if self.max_price != DEFAULT_MAX_PRICE {
            params.push(format!("max_price={}", self.max_price));
        }

        if params.is_empty() {
            "/packages".to_string()
        } else {
            format!("/packages?{}", params.join("&"))
        }
    }

    fn with_category_toggled(&self, id: &str) -> Self {
        let mut next = self.clone();
        if let Some(pos) = next.categories.iter().position(|existing| existing == id) {
            next.categories.remove(pos);
        } else {
            next.categories.push(id.to_string());
        }
        next
    }

    fn with_price(&self, min_price: i64, max_price: i64) -> Self {
        Self {
            min_price,
            max_price,
            ..self.clone()
        }
    }

    fn with_sort(&self, sort: SortOrder) -> Self {
        Self {
            sort,
            ..self.clone()
        }
    }

    /// Whether anything differs from the default listing.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        self.query().has_filters()
    }
}

/// A sidebar or sort link.
#[derive(Debug, Clone)]
pub struct FilterLink {
    pub label: String,
    pub href: String,
    pub active: bool,
    pub count: Option<usize>,
}

/// Package listing template.
#[derive(Template, WebTemplate)]
#[template(path = "packages/index.html")]
pub struct PackagesIndexTemplate {
    pub page: PageContext,
    pub packages: Vec<PackageCard>,
    pub search: String,
    pub featured: bool,
    pub hidden_category: String,
    pub hidden_sort: String,
    pub hidden_min_price: String,
    pub hidden_max_price: String,
    pub category_links: Vec<FilterLink>,
    pub price_links: Vec<FilterLink>,
    pub sort_links: Vec<FilterLink>,
    pub has_filters: bool,
}

/// Display the package listing.
#[instrument(skip(state, shopper))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
    mut shopper: Shopper,
) -> Result<PackagesIndexTemplate> {
    let catalog = state.catalog();
    let listing = Listing::from_params(&params);
    let packages = PackageCard::many(catalog.query(&listing.query()), shopper.wishlist());

    let category_links = CategoryView::all(catalog, &listing.categories)
        .into_iter()
        .map(|category| FilterLink {
            href: listing.with_category_toggled(&category.id).href(),
            label: category.name,
            active: category.selected,
            count: Some(category.count),
        })
        .collect();

    let price_links = PRICE_PRESETS
        .iter()
        .map(|preset| {
            let active = listing.min_price == preset.min && listing.max_price == preset.max;
            let target = if active {
                listing.with_price(0, DEFAULT_MAX_PRICE)
            } else {
                listing.with_price(preset.min, preset.max)
            };
            FilterLink {
                label: preset.label.to_string(),
                href: target.href(),
                active,
                count: None,
            }
        })
        .collect();

    let sort_links = SortOrder::ALL
        .iter()
        .map(|sort| FilterLink {
            label: sort.label().to_string(),
            href: listing.with_sort(*sort).href(),
            active: listing.sort == *sort,
            count: None,
        })
        .collect();

    let template = PackagesIndexTemplate {
        packages,
        search: listing.search.clone(),
        featured: listing.featured,
        hidden_category: listing.categories.join(","),
        hidden_sort: listing.sort.as_str().to_string(),
        hidden_min_price: listing.min_price.to_string(),
        hidden_max_price: listing.max_price.to_string(),
        category_links,
        price_links,
        sort_links,
        has_filters: listing.has_filters(),
        page: shopper.page(),
    };

    shopper.save().await?;
    Ok(template)
}

// =============================================================================
// Detail
// =============================================================================

/// One choosable option for a kit item.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: String,
    pub selected: bool,
}

/// A kit item on the detail page.
#[derive(Debug, Clone)]
pub struct KitItemView {
    pub index: usize,
    pub name: String,
    pub quantity: String,
    pub options: Vec<OptionView>,
}

/// A customer review. Reviews are not stored yet, so every kit shows the
/// same four.
pub struct Review {
    pub name: &'static str,
    pub date: &'static str,
    pub rating: u8,
    pub comment: &'static str,
}

impl Review {
    #[must_use]
    pub fn stars(&self) -> String {
        "★".repeat(usize::from(self.rating))
    }
}

const REVIEWS: [Review; 4] = [
    Review {
        name: "Amit Kumar",
        date: "2 weeks ago",
        rating: 5,
        comment: "Excellent quality materials. Everything was fresh and properly packed. The havan samagri had amazing fragrance. Highly recommended!",
    },
    Review {
        name: "Priya Singh",
        date: "1 month ago",
        rating: 5,
        comment: "Complete kit with all items mentioned. Very convenient for performing puja at home. Delivery was quick and packaging was great.",
    },
    Review {
        name: "Rajesh Sharma",
        date: "1 month ago",
        rating: 4,
        comment: "Good quality products. Delivery was on time. Will order again. Just wish there were more detailed instructions included.",
    },
    Review {
        name: "Sunita Devi",
        date: "2 months ago",
        rating: 5,
        comment: "Perfect for our monthly Satyanarayan Katha. Everything was authentic and fresh. Customer service was also very helpful.",
    },
];

/// Social share targets for a kit page.
#[derive(Debug, Clone)]
pub struct ShareLinks {
    pub whatsapp: String,
    pub facebook: String,
    pub twitter: String,
}

impl ShareLinks {
    fn new(base_url: &str, package: &Package) -> Self {
        let url = format!("{}/packages/{}", base_url.trim_end_matches('/'), package.id);
        let text = format!("Check out {} on PujaSamagri!", package.name);
        Self {
            whatsapp: format!(
                "https://wa.me/?text={}",
                urlencoding::encode(&format!("{text} {url}"))
            ),
            facebook: format!(
                "https://www.facebook.com/sharer/sharer.php?u={}",
                urlencoding::encode(&url)
            ),
            twitter: format!(
                "https://twitter.com/intent/tweet?text={}&url={}",
                urlencoding::encode(&text),
                urlencoding::encode(&url)
            ),
        }
    }
}

/// Package detail template.
#[derive(Template, WebTemplate)]
#[template(path = "packages/show.html")]
pub struct PackageShowTemplate {
    pub page: PageContext,
    pub package: PackageCard,
    pub long_description: String,
    pub savings: String,
    pub best_for: Vec<String>,
    pub category_id: String,
    pub category_name: String,
    pub items: Vec<KitItemView>,
    pub max_quantity: u32,
    pub reviews: &'static [Review],
    pub share: ShareLinks,
    pub related: Vec<PackageCard>,
    pub more: Vec<PackageCard>,
}

/// Display a package, or the not-found page for an unknown id.
#[instrument(skip(state, shopper))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut shopper: Shopper,
) -> Result<Response> {
    let catalog = state.catalog();
    let Some(package) = catalog.get(&id) else {
        let template = NotFoundTemplate {
            page: shopper.page(),
        };
        shopper.save().await?;
        return Ok((StatusCode::NOT_FOUND, template).into_response());
    };

    let wishlist = shopper.wishlist();
    let items = package
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let default = item.default_option();
            KitItemView {
                index,
                name: item.name.clone(),
                quantity: item.quantity.clone().unwrap_or_default(),
                options: item
                    .options
                    .iter()
                    .map(|option| OptionView {
                        value: option.clone(),
                        selected: default == Some(option.as_str()),
                    })
                    .collect(),
            }
        })
        .collect();

    let template = PackageShowTemplate {
        package: PackageCard::new(package, wishlist),
        long_description: if package.long_description.is_empty() {
            package.description.clone()
        } else {
            package.long_description.clone()
        },
        savings: package.original_price.saturating_sub(package.price).to_string(),
        best_for: package.best_for.clone(),
        category_id: package.category.to_string(),
        category_name: catalog
            .category(package.category.as_str())
            .map(|category| category.name.clone())
            .unwrap_or_default(),
        items,
        max_quantity: MAX_QUANTITY,
        reviews: &REVIEWS,
        share: ShareLinks::new(&state.config().base_url, package),
        related: PackageCard::many(catalog.related(package, RELATED_PACKAGES), wishlist),
        more: PackageCard::many(
            catalog
                .packages()
                .iter()
                .filter(|other| other.id != package.id)
                .take(RELATED_PACKAGES),
            wishlist,
        ),
        page: shopper.page(),
    };

    shopper.save().await?;
    Ok(template.into_response())
}

// =============================================================================
// Add to cart
// =============================================================================

/// Quantity and `option_{index}` selections from an add-to-cart form.
#[derive(Debug, Default)]
pub struct AddToCartForm {
    pub quantity: u32,
    pub selections: BTreeMap<usize, String>,
    pub return_to: Option<String>,
    /// Set by the compact add buttons on cards.
    pub quick: bool,
}

impl AddToCartForm {
    /// Parse the raw form. Missing or invalid quantities mean 1 and large
    /// ones are capped at [`MAX_QUANTITY`].
    #[must_use]
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let quantity = fields
            .get("quantity")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_QUANTITY);

        let selections = fields
            .iter()
            .filter_map(|(key, value)| {
                let index = key.strip_prefix("option_")?.parse::<usize>().ok()?;
                Some((index, value.clone()))
            })
            .collect();

        Self {
            quantity,
            selections,
            return_to: fields.get("return_to").cloned(),
            quick: fields.get("quick").is_some_and(|value| value == "true"),
        }
    }
}

/// Add the package to the cart and queue the toast. Returns `false` for
/// an unknown package.
fn add_package(state: &AppState, shopper: &mut Shopper, id: &str, form: &AddToCartForm) -> bool {
    let Some(package) = state.catalog().get(id) else {
        return false;
    };
    let item = package.cart_item(&form.selections);
    let line_id = item.id.to_string();
    shopper.add_to_cart(item, form.quantity);

    let message = if form.quick {
        format!("{} added to cart!", package.name)
    } else {
        format!("{} x {} added to cart!", form.quantity, package.name)
    };
    shopper.toast(message, ToastKind::Success);

    let quantity = form.quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("line", line_id.as_str()), ("quantity", quantity.as_str())]),
    );
    true
}

/// Add a package to the cart, then return to the page it was added from.
#[instrument(skip(state, shopper, fields))]
pub async fn add(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut shopper: Shopper,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Redirect> {
    let form = AddToCartForm::from_fields(&fields);
    if !add_package(&state, &mut shopper, &id, &form) {
        shopper.toast("That package is no longer available", ToastKind::Error);
        shopper.save().await?;
        return Ok(Redirect::to("/packages"));
    }

    shopper.save().await?;
    let fallback = format!("/packages/{id}");
    Ok(Redirect::to(&safe_return_to(
        form.return_to.as_deref(),
        &fallback,
    )))
}

/// Add a package to the cart and go straight to checkout.
#[instrument(skip(state, shopper, fields))]
pub async fn buy_now(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut shopper: Shopper,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Redirect> {
    let form = AddToCartForm::from_fields(&fields);
    let target = if add_package(&state, &mut shopper, &id, &form) {
        "/checkout"
    } else {
        shopper.toast("That package is no longer available", ToastKind::Error);
        "/packages"
    };

    shopper.save().await?;
    Ok(Redirect::to(target))
}
