//! Checkout from cart to confirmation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;
use puja_samagri_integration_tests::{TestClient, test_config};
use puja_samagri_storefront::{
    app, catalog,
    services::{
        OrderReceipt, OrderRequest, OrderSubmissionPort, SimulatedBackend, SubmissionError,
    },
    state::AppState,
};

/// Order backend that counts submissions, waits, and fails the first
/// `failures` calls.
struct CountingOrders {
    calls: AtomicUsize,
    delay: Duration,
    failures: usize,
}

impl CountingOrders {
    fn new(delay: Duration, failures: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay,
            failures,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderSubmissionPort for CountingOrders {
    async fn submit_order(&self, order: OrderRequest) -> Result<OrderReceipt, SubmissionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if call < self.failures {
            return Err(SubmissionError::Unavailable("gateway timeout".to_string()));
        }
        Ok(OrderReceipt {
            order_id: order.order_id,
            placed_at: Utc::now(),
        })
    }
}

/// A visitor at the payment step of an app backed by `orders`.
async fn client_at_payment(orders: Arc<CountingOrders>) -> TestClient {
    let catalog = catalog::load().expect("bundled catalog should load");
    let state = AppState::with_ports(
        test_config(),
        catalog,
        orders,
        Arc::new(SimulatedBackend::default()),
    );
    let mut client = TestClient::with_app(app(state));
    client
        .post("/packages/griha-shanti/add", "quantity=1")
        .await
        .assert_redirect("/packages/griha-shanti");
    client
        .post("/checkout/address", "mode=saved&address_id=1")
        .await
        .assert_redirect("/checkout");
    client
}

async fn client_with_cart() -> TestClient {
    let mut client = TestClient::new();
    client
        .post("/packages/griha-shanti/add", "quantity=1")
        .await
        .assert_redirect("/packages/griha-shanti");
    client
}

#[tokio::test]
async fn test_checkout_with_empty_cart_goes_to_cart() {
    let mut client = TestClient::new();
    client.get("/checkout").await.assert_redirect("/cart");
}

#[tokio::test]
async fn test_buy_now_goes_straight_to_checkout() {
    let mut client = TestClient::new();
    client
        .post("/packages/tulsi-pujan/buy-now", "quantity=1")
        .await
        .assert_redirect("/checkout");

    let page = client.get("/checkout").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Delivery Address"));
    assert!(page.body.contains("Tulsi Pujan Kit"));
}

#[tokio::test]
async fn test_full_checkout_with_saved_address_and_cod() {
    let mut client = client_with_cart().await;

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Delivery Address"));
    assert!(page.body.contains("Saved addresses"));

    client
        .post("/checkout/address", "mode=saved&address_id=1")
        .await
        .assert_redirect("/checkout");

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Payment Method"));
    assert!(page.body.contains("Delivering to:"));
    assert!(page.body.contains("Place Order (₹1,499)"));

    client
        .post("/checkout/payment", "method=cod")
        .await
        .assert_redirect("/checkout");

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Order Placed Successfully!"));
    assert!(page.body.contains("Cash on Delivery"));
    assert!(page.body.contains("Order ID"));
    assert!(page.body.contains("Placed on"));
    assert!(page.body.contains(" UTC"));
    assert!(page.body.contains("2-4 business days"));

    let count = client.get("/cart/count").await;
    assert!(!count.body.contains("badge"));
}

#[tokio::test]
async fn test_address_step_requires_a_choice() {
    let mut client = client_with_cart().await;

    client
        .post("/checkout/address", "mode=saved")
        .await
        .assert_redirect("/checkout");

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Please select or add a delivery address"));
    assert!(page.body.contains("Delivery Address"));
}

#[tokio::test]
async fn test_new_address_requires_fields() {
    let mut client = client_with_cart().await;

    client
        .post("/checkout/address", "mode=new&full_name=Asha&phone=9876543210")
        .await
        .assert_redirect("/checkout");

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Please fill all required fields"));
}

#[tokio::test]
async fn test_new_address_then_upi_payment() {
    let mut client = client_with_cart().await;

    client
        .post(
            "/checkout/address",
            "mode=new&full_name=Asha+Verma&phone=9876543210&address=12+MG+Road\
             &city=Pune&state=Maharashtra&pincode=411001",
        )
        .await
        .assert_redirect("/checkout");

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Asha Verma"));
    assert!(page.body.contains("Pune"));

    client
        .post("/checkout/payment", "method=upi&upi_id=")
        .await
        .assert_redirect("/checkout");
    let page = client.get("/checkout").await;
    assert!(page.body.contains("Please enter your UPI ID"));
    assert!(page.body.contains("Payment Method"));

    client
        .post("/checkout/payment", "method=upi&upi_id=asha%40okbank")
        .await
        .assert_redirect("/checkout");
    let page = client.get("/checkout").await;
    assert!(page.body.contains("Order Placed Successfully!"));
}

#[tokio::test]
async fn test_back_returns_to_address_step() {
    let mut client = client_with_cart().await;
    client
        .post("/checkout/address", "mode=saved&address_id=2")
        .await;

    client
        .post("/checkout/back", "")
        .await
        .assert_redirect("/checkout");

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Saved addresses"));
}

#[tokio::test]
async fn test_payment_before_address_is_ignored() {
    let mut client = client_with_cart().await;

    client
        .post("/checkout/payment", "method=cod")
        .await
        .assert_redirect("/checkout");

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Delivery Address"));
    assert!(!page.body.contains("Order Placed Successfully!"));
}

#[tokio::test]
async fn test_shopping_again_after_an_order_restarts_checkout() {
    let mut client = client_with_cart().await;
    client
        .post("/checkout/address", "mode=saved&address_id=1")
        .await;
    client.post("/checkout/payment", "method=cod").await;

    client.post("/packages/tulsi-pujan/add", "quantity=1").await;

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Delivery Address"));
    assert!(!page.body.contains("Order Placed Successfully!"));
}

#[tokio::test]
async fn test_double_submitted_payment_places_one_order() {
    let orders = CountingOrders::new(Duration::from_millis(100), 0);
    let mut client = client_at_payment(Arc::clone(&orders)).await;

    let mut first_tab = client.clone();
    let mut second_tab = client.clone();
    let (first, second) = tokio::join!(
        first_tab.post("/checkout/payment", "method=cod"),
        second_tab.post("/checkout/payment", "method=cod"),
    );
    first.assert_redirect("/checkout");
    second.assert_redirect("/checkout");
    assert_eq!(orders.calls(), 1);

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Order Placed Successfully!"));

    // A late resubmit after confirmation is ignored as well.
    client
        .post("/checkout/payment", "method=cod")
        .await
        .assert_redirect("/checkout");
    assert_eq!(orders.calls(), 1);
}

#[tokio::test]
async fn test_failed_submission_can_be_retried() {
    let orders = CountingOrders::new(Duration::ZERO, 1);
    let mut client = client_at_payment(Arc::clone(&orders)).await;

    let response = client.post("/checkout/payment", "method=cod").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);

    let page = client.get("/checkout").await;
    assert!(page.body.contains("Payment Method"));
    assert!(!page.body.contains("Your order is being placed"));

    client
        .post("/checkout/payment", "method=cod")
        .await
        .assert_redirect("/checkout");
    assert_eq!(orders.calls(), 2);
    let page = client.get("/checkout").await;
    assert!(page.body.contains("Order Placed Successfully!"));
}
