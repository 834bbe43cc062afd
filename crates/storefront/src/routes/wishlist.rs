//! Wishlist form handlers.

use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use puja_samagri_core::ToastKind;
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::Shopper;
use crate::routes::safe_return_to;
use crate::state::AppState;

/// Wishlist form data.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub id: String,
    pub return_to: Option<String>,
}

/// Add a package to the wishlist, or remove it if already saved.
#[instrument(skip(state, shopper))]
pub async fn toggle(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect> {
    let Some(package) = state.catalog().get(&form.id) else {
        // Saved entries can outlive a catalog change; let them be removed.
        if shopper.remove_from_wishlist(&form.id) {
            shopper.toast("Removed from wishlist", ToastKind::Info);
        }
        shopper.save().await?;
        return Ok(Redirect::to(&safe_return_to(form.return_to.as_deref(), "/")));
    };

    if shopper.toggle_wishlist(package.wishlist_entry()) {
        shopper.toast("Added to wishlist!", ToastKind::Success);
    } else {
        shopper.toast("Removed from wishlist", ToastKind::Info);
    }

    shopper.save().await?;
    let fallback = format!("/packages/{}", package.id);
    Ok(Redirect::to(&safe_return_to(
        form.return_to.as_deref(),
        &fallback,
    )))
}

/// Remove a package from the wishlist.
#[instrument(skip(shopper))]
pub async fn remove(mut shopper: Shopper, Form(form): Form<WishlistForm>) -> Result<Redirect> {
    if shopper.remove_from_wishlist(&form.id) {
        shopper.toast("Removed from wishlist", ToastKind::Info);
    }
    shopper.save().await?;
    Ok(Redirect::to(&safe_return_to(
        form.return_to.as_deref(),
        "/account?tab=wishlist",
    )))
}
