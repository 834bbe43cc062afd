//! HTTP route handlers for the storefront.
//!
//! Every mutating route is a plain HTML form POST that updates the
//! shopper state, queues a toast and redirects (POST → redirect → GET).
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//!
//! # Packages
//! GET  /packages                  - Listing with search, filters and sort
//! GET  /packages/{id}             - Package detail
//! POST /packages/{id}/add         - Add to cart (quantity, option_N)
//! POST /packages/{id}/buy-now     - Add to cart and go to checkout
//!
//! # Wishlist
//! POST /wishlist/toggle           - Add or remove a package
//! POST /wishlist/remove           - Remove a package
//!
//! # Cart
//! GET  /cart                      - Cart page
//! POST /cart/update               - Set a line quantity
//! POST /cart/remove               - Remove a line
//! POST /cart/clear                - Empty the cart
//! POST /cart/coupon               - Apply a coupon
//! POST /cart/coupon/remove        - Remove the coupon
//! GET  /cart/count                - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                  - Current checkout step
//! POST /checkout/address          - Choose the delivery address
//! POST /checkout/back             - Back to the address step
//! POST /checkout/payment          - Pay and place the order
//!
//! # Pages
//! GET  /account?tab=...           - Account dashboard
//! GET  /contact                   - Contact form
//! POST /contact                   - Send a message (rate limited)
//! GET  /about                     - About page
//! POST /toasts/{id}/dismiss       - Dismiss a notification
//! ```

pub mod account;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod home;
pub mod packages;
pub mod pages;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::StorefrontConfig;
use crate::middleware::contact_rate_limiter;
use crate::state::AppState;

/// Accept a form's `return_to` only if it is a local path.
///
/// Anything else (absolute URLs, protocol-relative `//host` paths) falls
/// back to `fallback`.
#[must_use]
pub fn safe_return_to(return_to: Option<&str>, fallback: &str) -> String {
    return_to
        .map(str::trim)
        .filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
        .unwrap_or(fallback)
        .to_string()
}

/// Create the package routes router.
pub fn package_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(packages::index))
        .route("/{id}", get(packages::show))
        .route("/{id}/add", post(packages::add))
        .route("/{id}/buy-now", post(packages::buy_now))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/toggle", post(wishlist::toggle))
        .route("/remove", post(wishlist::remove))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/coupon", post(cart::apply_coupon))
        .route("/coupon/remove", post(cart::remove_coupon))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/address", post(checkout::submit_address))
        .route("/back", post(checkout::back))
        .route("/payment", post(checkout::submit_payment))
}

/// Create all routes for the storefront.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/packages", package_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .route("/account", get(account::index))
        .route(
            "/contact",
            get(contact::show).merge(
                post(contact::submit).layer(contact_rate_limiter(config.trust_proxy_headers)),
            ),
        )
        .route("/about", get(pages::about))
        .route("/toasts/{id}/dismiss", post(pages::dismiss_toast))
        .fallback(pages::not_found)
}
