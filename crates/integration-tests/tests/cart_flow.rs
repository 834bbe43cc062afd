//! Cart, coupon and wishlist flows through the session.

use axum::http::StatusCode;
use puja_samagri_integration_tests::TestClient;

#[tokio::test]
async fn test_add_to_cart_updates_badge_and_cart_page() {
    let mut client = TestClient::new();

    let response = client
        .post("/packages/tulsi-pujan/add", "quantity=2")
        .await;
    response.assert_redirect("/packages/tulsi-pujan");
    assert!(client.has_session());

    let count = client.get("/cart/count").await;
    assert_eq!(count.status, StatusCode::OK);
    assert!(count.body.contains(">2<"));

    let cart = client.get("/cart").await;
    assert!(cart.body.contains("2 x Tulsi Pujan Kit added to cart!"));
    assert!(cart.body.contains("₹798"));
    assert!(cart.body.contains("₹49"));
    assert!(cart.body.contains("₹847"));
    assert!(cart.body.contains("Add ₹202 more for free delivery"));
}

#[tokio::test]
async fn test_quick_add_returns_to_listing() {
    let mut client = TestClient::new();

    let response = client
        .post(
            "/packages/havan-samagri/add",
            "quick=true&return_to=%2Fpackages%3Fcategory%3Dhavan",
        )
        .await;
    response.assert_redirect("/packages?category=havan");

    let listing = client.get("/packages?category=havan").await;
    assert!(listing.body.contains("Complete Havan Samagri added to cart!"));
}

#[tokio::test]
async fn test_external_return_to_is_ignored() {
    let mut client = TestClient::new();

    let response = client
        .post(
            "/packages/tulsi-pujan/add",
            "return_to=https%3A%2F%2Fevil.example",
        )
        .await;
    response.assert_redirect("/packages/tulsi-pujan");
}

#[tokio::test]
async fn test_unknown_package_add_redirects_to_listing() {
    let mut client = TestClient::new();

    let response = client.post("/packages/retired-kit/add", "quantity=1").await;
    response.assert_redirect("/packages");

    let count = client.get("/cart/count").await;
    assert!(!count.body.contains("badge"));
}

#[tokio::test]
async fn test_customized_kits_become_separate_lines() {
    let mut client = TestClient::new();

    client.post("/packages/havan-samagri/add", "quantity=1").await;
    client
        .post("/packages/havan-samagri/add", "quantity=1&option_0=1kg")
        .await;

    let cart = client.get("/cart").await;
    assert!(cart.body.contains("value=\"havan-samagri\""));
    assert!(cart.body.contains("value=\"havan-samagri?0=1kg\""));
    assert!(cart.body.contains("Havan samagri mix: 1kg"));

    let count = client.get("/cart/count").await;
    assert!(count.body.contains(">2<"));
}

#[tokio::test]
async fn test_options_on_different_items_stay_separate_lines() {
    let mut client = TestClient::new();

    client
        .post("/packages/havan-samagri/add", "quantity=1&option_1=Peepal")
        .await;
    client
        .post("/packages/havan-samagri/add", "quantity=1&option_0=1kg")
        .await;
    client
        .post("/cart/update", "id=havan-samagri%3F0%3D1kg&quantity=3")
        .await
        .assert_redirect("/cart");

    let cart = client.get("/cart").await;
    assert!(cart.body.contains("value=\"havan-samagri?1=Peepal\""));
    assert!(cart.body.contains("value=\"havan-samagri?0=1kg\""));
    assert!(cart.body.contains("href=\"/packages/havan-samagri\""));
    assert!(client.get("/cart/count").await.body.contains(">4<"));
}

#[tokio::test]
async fn test_update_and_remove_lines() {
    let mut client = TestClient::new();
    client.post("/packages/tulsi-pujan/add", "quantity=1").await;

    let response = client
        .post("/cart/update", "id=tulsi-pujan&quantity=5")
        .await;
    response.assert_redirect("/cart");
    assert!(client.get("/cart/count").await.body.contains(">5<"));

    let response = client
        .post("/cart/update", "id=tulsi-pujan&quantity=0")
        .await;
    response.assert_redirect("/cart");

    let cart = client.get("/cart").await;
    assert!(cart.body.contains("Tulsi Pujan Kit removed from cart"));
    assert!(cart.body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_clear_cart() {
    let mut client = TestClient::new();
    client.post("/packages/tulsi-pujan/add", "quantity=1").await;
    client.post("/packages/rudrabhishek/add", "quantity=1").await;

    client.post("/cart/clear", "").await.assert_redirect("/cart");

    let cart = client.get("/cart").await;
    assert!(cart.body.contains("Cart cleared"));
    assert!(cart.body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_coupon_apply_and_remove() {
    let mut client = TestClient::new();
    client.post("/packages/griha-shanti/add", "quantity=1").await;

    client
        .post("/cart/coupon", "code=first10")
        .await
        .assert_redirect("/cart");

    let cart = client.get("/cart").await;
    assert!(cart.body.contains("Coupon applied successfully!"));
    assert!(cart.body.contains("FIRST10"));
    assert!(cart.body.contains("₹150"));
    assert!(cart.body.contains("₹1,349"));
    assert!(cart.body.contains("FREE"));

    client
        .post("/cart/coupon/remove", "")
        .await
        .assert_redirect("/cart");
    let cart = client.get("/cart").await;
    assert!(cart.body.contains("Coupon removed"));
    assert!(cart.body.contains("Enter coupon code"));
}

#[tokio::test]
async fn test_invalid_coupon_shows_error() {
    let mut client = TestClient::new();
    client.post("/packages/griha-shanti/add", "quantity=1").await;

    client.post("/cart/coupon", "code=BOGUS").await;

    let cart = client.get("/cart").await;
    assert!(cart.body.contains("Invalid coupon code"));
    assert!(cart.body.contains("toast--error"));
}

#[tokio::test]
async fn test_wishlist_toggle() {
    let mut client = TestClient::new();

    client
        .post("/wishlist/toggle", "id=tulsi-pujan&return_to=%2Fpackages")
        .await
        .assert_redirect("/packages");

    let wishlist = client.get("/account?tab=wishlist").await;
    assert!(wishlist.body.contains("Added to wishlist!"));
    assert!(wishlist.body.contains("Tulsi Pujan Kit"));
    assert!(!wishlist.body.contains("Your wishlist is empty"));

    client
        .post("/wishlist/toggle", "id=tulsi-pujan&return_to=%2Fpackages")
        .await;
    let wishlist = client.get("/account?tab=wishlist").await;
    assert!(wishlist.body.contains("Removed from wishlist"));
    assert!(wishlist.body.contains("Your wishlist is empty"));
}

#[tokio::test]
async fn test_wishlist_remove_falls_back_to_account() {
    let mut client = TestClient::new();
    client.post("/wishlist/toggle", "id=rudrabhishek").await;

    client
        .post("/wishlist/remove", "id=rudrabhishek")
        .await
        .assert_redirect("/account?tab=wishlist");
}

#[tokio::test]
async fn test_visitors_do_not_share_carts() {
    let app = puja_samagri_integration_tests::test_app();
    let mut first = TestClient::with_app(app.clone());
    let mut second = TestClient::with_app(app);

    first.post("/packages/tulsi-pujan/add", "quantity=3").await;

    assert!(first.get("/cart/count").await.body.contains(">3<"));
    assert!(!second.get("/cart/count").await.body.contains("badge"));
}

#[tokio::test]
async fn test_dismiss_toast() {
    let mut client = TestClient::new();
    client.post("/cart/clear", "").await;

    let cart = client.get("/cart").await;
    let id = cart
        .body
        .split("action=\"/toasts/")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .unwrap_or_default()
        .to_string();
    assert!(!id.is_empty(), "toast dismiss form should be rendered");

    client
        .post(&format!("/toasts/{id}/dismiss"), "return_to=%2Fcart")
        .await
        .assert_redirect("/cart");

    let cart = client.get("/cart").await;
    assert!(!cart.body.contains("Cart cleared"));
}
