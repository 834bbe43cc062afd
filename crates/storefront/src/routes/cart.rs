//! Cart route handlers.
//!
//! The cart lives in the visitor's session; every form posts back here
//! and redirects to `/cart`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use puja_samagri_core::ToastKind;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Shopper;
use crate::models::{CartLineView, PackageCard, PageContext, SummaryView};
use crate::state::AppState;

/// Suggestions shown under the cart.
const RECOMMENDATIONS: usize = 4;

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: i64,
}

/// Remove line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Coupon form data.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    #[serde(default)]
    pub code: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub lines: Vec<CartLineView>,
    pub summary: SummaryView,
    pub recommendations: Vec<PackageCard>,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart page.
#[instrument(skip(state, shopper))]
pub async fn show(State(state): State<AppState>, mut shopper: Shopper) -> Result<CartShowTemplate> {
    let catalog = state.catalog();
    let cart = shopper.cart();

    // Empty carts get featured kits; otherwise kits not yet in the cart.
    let recommendations = if cart.is_empty() {
        PackageCard::many(
            catalog.featured().into_iter().take(RECOMMENDATIONS),
            shopper.wishlist(),
        )
    } else {
        PackageCard::many(
            catalog
                .packages()
                .iter()
                .filter(|package| !cart.contains(package.id.as_str()))
                .take(RECOMMENDATIONS),
            shopper.wishlist(),
        )
    };

    let template = CartShowTemplate {
        lines: CartLineView::all(cart),
        summary: SummaryView::new(cart),
        recommendations,
        page: shopper.page(),
    };

    shopper.save().await?;
    Ok(template)
}

/// Set a line's quantity. Zero or less removes the line.
#[instrument(skip(shopper))]
pub async fn update(mut shopper: Shopper, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let name = shopper.cart().line(&form.id).map(|line| line.name.clone());
    shopper.update_quantity(&form.id, form.quantity);

    if let Some(name) = name.filter(|_| form.quantity < 1) {
        shopper.toast(format!("{name} removed from cart"), ToastKind::Info);
    }

    shopper.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart.
#[instrument(skip(shopper))]
pub async fn remove(
    mut shopper: Shopper,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    let name = shopper.cart().line(&form.id).map(|line| line.name.clone());
    if shopper.remove_from_cart(&form.id) {
        let name = name.unwrap_or_else(|| "Item".to_string());
        shopper.toast(format!("{name} removed from cart"), ToastKind::Info);
    }

    shopper.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(shopper))]
pub async fn clear(mut shopper: Shopper) -> Result<Redirect> {
    shopper.clear_cart();
    shopper.toast("Cart cleared", ToastKind::Info);
    shopper.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Apply a coupon code.
#[instrument(skip(shopper))]
pub async fn apply_coupon(mut shopper: Shopper, Form(form): Form<CouponForm>) -> Result<Redirect> {
    match shopper.apply_coupon(&form.code) {
        Ok(coupon) => {
            add_breadcrumb("cart", "Applied coupon", Some(&[("code", coupon.as_str())]));
            shopper.toast("Coupon applied successfully!", ToastKind::Success);
        }
        Err(e) => {
            tracing::debug!(code = %form.code, error = %e, "Coupon rejected");
            shopper.toast(e.to_string(), ToastKind::Error);
        }
    }

    shopper.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Remove the active coupon.
#[instrument(skip(shopper))]
pub async fn remove_coupon(mut shopper: Shopper) -> Result<Redirect> {
    if shopper.remove_coupon() {
        shopper.toast("Coupon removed", ToastKind::Info);
    }
    shopper.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Cart count badge fragment.
#[instrument(skip(shopper))]
pub async fn count(shopper: Shopper) -> CartCountTemplate {
    CartCountTemplate {
        count: shopper.cart().total_items(),
    }
}
