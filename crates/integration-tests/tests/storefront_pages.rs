//! Page rendering, static assets and response headers.

use axum::http::{StatusCode, header};
use puja_samagri_integration_tests::TestClient;

#[tokio::test]
async fn test_health() {
    let mut client = TestClient::new();
    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_home_lists_categories_and_featured_kits() {
    let mut client = TestClient::new();
    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Complete Puja Kits for Sacred Rituals"));
    assert!(response.body.contains("Havan Kits"));
    assert!(response.body.contains("Satyanarayan Katha Kit"));
    assert!(response.body.contains("/packages?category=festival"));
}

#[tokio::test]
async fn test_browsing_does_not_start_a_session() {
    let mut client = TestClient::new();
    client.get("/").await;
    client.get("/packages").await;
    assert!(!client.has_session());
}

#[tokio::test]
async fn test_listing_filters_by_category() {
    let mut client = TestClient::new();
    let response = client.get("/packages?category=festival").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("2 packages found"));
    assert!(response.body.contains("Diwali Lakshmi Puja Kit"));
    assert!(response.body.contains("Navratri Kalash Sthapana Kit"));
    assert!(!response.body.contains("Rudrabhishek Kit"));
}

#[tokio::test]
async fn test_listing_search_and_price_range() {
    let mut client = TestClient::new();

    let response = client.get("/packages?search=tulsi").await;
    assert!(response.body.contains("1 packages found"));
    assert!(response.body.contains("Tulsi Pujan Kit"));

    let response = client.get("/packages?max_price=500").await;
    assert!(response.body.contains("Tulsi Pujan Kit"));
    assert!(!response.body.contains("Griha Shanti Puja Kit"));
}

#[tokio::test]
async fn test_listing_with_no_matches_shows_empty_state() {
    let mut client = TestClient::new();
    let response = client.get("/packages?search=nothing-like-this").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No packages found"));
}

#[tokio::test]
async fn test_package_detail() {
    let mut client = TestClient::new();
    let response = client.get("/packages/havan-samagri").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Complete Havan Samagri"));
    assert!(response.body.contains("₹599"));
    assert!(response.body.contains("25% OFF"));
    assert!(response.body.contains("name=\"option_0\""));
    assert!(response.body.contains("Samidha"));
}

#[tokio::test]
async fn test_unknown_package_is_not_found() {
    let mut client = TestClient::new();
    let response = client.get("/packages/unknown-kit").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Page Not Found"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let mut client = TestClient::new();
    let response = client.get("/no/such/page").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Browse Packages"));
}

#[tokio::test]
async fn test_about_and_account_pages_render() {
    let mut client = TestClient::new();

    let about = client.get("/about").await;
    assert_eq!(about.status, StatusCode::OK);
    assert!(about.body.contains("About PujaSamagri"));

    let orders = client.get("/account?tab=orders").await;
    assert_eq!(orders.status, StatusCode::OK);
    assert!(orders.body.contains("My Orders"));

    let settings = client.get("/account?tab=settings").await;
    assert!(settings.body.contains("Change Password"));
}

#[tokio::test]
async fn test_security_headers_on_pages() {
    let mut client = TestClient::new();
    let response = client.get("/").await;

    let csp = response
        .headers
        .get(header::CONTENT_SECURITY_POLICY)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(csp.contains("script-src 'none'"));
    assert_eq!(
        response
            .headers
            .get(header::X_CONTENT_TYPE_OPTIONS)
            .and_then(|value| value.to_str().ok()),
        Some("nosniff")
    );
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_static_assets_are_served_and_cacheable() {
    let mut client = TestClient::new();

    let css = client.get("/static/css/main.css").await;
    assert_eq!(css.status, StatusCode::OK);
    assert_eq!(
        css.headers
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok()),
        Some("public, max-age=3600")
    );

    let image = client.get("/static/images/tulsi-pujan.svg").await;
    assert_eq!(image.status, StatusCode::OK);
}
