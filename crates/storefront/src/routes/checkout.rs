//! Checkout route handlers.
//!
//! The checkout machine lives in the session next to the cart. `GET
//! /checkout` renders whatever step it is on; each POST advances it (or
//! explains why it could not) and redirects back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use puja_samagri_core::{
    AddressChoice, AddressForm, AddressId, CheckoutError, CheckoutStep, DeliveryAddress, OrderId,
    PaymentForm, PaymentMethod, ToastKind, TransitionError, checkout::saved_addresses,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Shopper;
use crate::models::{CartLineView, PageContext, SummaryView};
use crate::services::OrderRequest;
use crate::state::AppState;

/// UPI id shown for direct transfers.
pub const MERCHANT_UPI_ID: &str = "pujasamagri@upi";

/// Delivery promise on the payment and confirmation steps.
pub const ESTIMATED_DELIVERY: &str = "2-4 business days";

const PLACED_AT_FORMAT: &str = "%d %b %Y, %H:%M UTC";

const NEXT_STEPS: [&str; 4] = [
    "You will receive an order confirmation email",
    "Our team will pack your puja items with care",
    "You will get tracking updates via SMS",
    "Delivery partner will contact you before arrival",
];

/// Progress indicator entry.
#[derive(Debug, Clone)]
pub struct StepView {
    pub number: u8,
    pub label: &'static str,
    pub done: bool,
    pub current: bool,
}

impl StepView {
    fn all(current: CheckoutStep) -> Vec<Self> {
        CheckoutStep::ALL
            .iter()
            .map(|step| Self {
                number: step.number(),
                label: step.label(),
                done: step.number() < current.number(),
                current: *step == current,
            })
            .collect()
    }
}

/// An address as printed on the page.
#[derive(Debug, Clone)]
pub struct AddressView {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub locality: String,
    pub landmark: Option<String>,
}

impl From<&DeliveryAddress> for AddressView {
    fn from(address: &DeliveryAddress) -> Self {
        Self {
            full_name: address.full_name.clone(),
            phone: address.phone.clone(),
            address: address.address.clone(),
            locality: address.locality(),
            landmark: address.landmark.clone(),
        }
    }
}

/// A saved address radio option.
#[derive(Debug, Clone)]
pub struct SavedAddressView {
    pub id: String,
    pub label: String,
    pub is_default: bool,
    pub address: AddressView,
}

/// A payment method radio option.
#[derive(Debug, Clone)]
pub struct PaymentMethodView {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub step: &'static str,
    pub steps: Vec<StepView>,
    pub lines: Vec<CartLineView>,
    pub summary: SummaryView,
    pub saved_addresses: Vec<SavedAddressView>,
    pub address: Option<AddressView>,
    pub payment_methods: Vec<PaymentMethodView>,
    pub payment: String,
    pub order_id: String,
    pub placed_at: Option<String>,
    pub processing: bool,
    pub merchant_upi_id: &'static str,
    pub estimated_delivery: &'static str,
    pub next_steps: &'static [&'static str],
}

const fn step_key(step: CheckoutStep) -> &'static str {
    match step {
        CheckoutStep::Address => "address",
        CheckoutStep::Payment => "payment",
        CheckoutStep::Confirmation => "confirmation",
    }
}

/// Turn a failed checkout action into a toast and a redirect.
fn recover(shopper: &mut Shopper, error: &CheckoutError) -> Redirect {
    match error {
        CheckoutError::Validation(e) => {
            shopper.toast(e.to_string(), ToastKind::Error);
            Redirect::to("/checkout")
        }
        CheckoutError::Transition(TransitionError::EmptyCart) => {
            shopper.toast(error.to_string(), ToastKind::Error);
            Redirect::to("/cart")
        }
        CheckoutError::Transition(
            e @ (TransitionError::Illegal { .. } | TransitionError::OrderInProgress),
        ) => {
            // Stale form from another tab; show the current step instead.
            tracing::debug!(error = %e, "Ignoring out-of-order checkout action");
            Redirect::to("/checkout")
        }
    }
}

/// Display the current checkout step. An empty cart goes back to `/cart`.
#[instrument(skip(shopper))]
pub async fn show(mut shopper: Shopper) -> Result<Response> {
    let step = match shopper.begin_checkout() {
        Ok(step) => step,
        Err(e) => {
            tracing::debug!(error = %e, "Checkout without items");
            shopper.save().await?;
            return Ok(Redirect::to("/cart").into_response());
        }
    };

    let checkout = shopper.checkout();
    let template = CheckoutTemplate {
        step: step_key(step),
        steps: StepView::all(step),
        lines: CartLineView::all(shopper.cart()),
        summary: SummaryView::new(shopper.cart()),
        saved_addresses: saved_addresses()
            .iter()
            .map(|saved| SavedAddressView {
                id: saved.id.to_string(),
                label: saved.label.clone(),
                is_default: saved.is_default,
                address: AddressView::from(&saved.address),
            })
            .collect(),
        address: checkout.address().map(AddressView::from),
        payment_methods: PaymentMethod::ALL
            .iter()
            .map(|method| PaymentMethodView {
                value: method.as_str(),
                label: method.label(),
                checked: *method == PaymentMethod::default(),
            })
            .collect(),
        payment: checkout
            .payment()
            .map(ToString::to_string)
            .unwrap_or_default(),
        order_id: checkout.order_id().map(ToString::to_string).unwrap_or_default(),
        placed_at: checkout
            .placed_at()
            .map(|at| at.format(PLACED_AT_FORMAT).to_string()),
        processing: checkout.pending_order(Utc::now()).is_some(),
        merchant_upi_id: MERCHANT_UPI_ID,
        estimated_delivery: ESTIMATED_DELIVERY,
        next_steps: &NEXT_STEPS,
        page: shopper.page(),
    };

    shopper.save().await?;
    Ok(template.into_response())
}

/// Address step form: a saved address or a new one.
#[derive(Debug, Deserialize)]
pub struct AddressSubmission {
    /// "saved" or "new".
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub address_id: String,
    #[serde(flatten)]
    pub address: AddressForm,
}

impl AddressSubmission {
    #[must_use]
    pub fn into_choice(self) -> AddressChoice {
        match self.mode.as_str() {
            "new" => AddressChoice::New(self.address),
            "saved" if !self.address_id.trim().is_empty() => {
                AddressChoice::Saved(AddressId::new(self.address_id.trim()))
            }
            _ => AddressChoice::None,
        }
    }
}

/// Choose the delivery address and move to payment.
#[instrument(skip(shopper, form))]
pub async fn submit_address(
    mut shopper: Shopper,
    Form(form): Form<AddressSubmission>,
) -> Result<Redirect> {
    let redirect = match shopper.submit_address(form.into_choice()) {
        Ok(address) => {
            add_breadcrumb(
                "checkout",
                "Delivery address chosen",
                Some(&[("city", address.city.as_str())]),
            );
            Redirect::to("/checkout")
        }
        Err(e) => recover(&mut shopper, &e),
    };

    shopper.save().await?;
    Ok(redirect)
}

/// Go back from payment to the address step.
#[instrument(skip(shopper))]
pub async fn back(mut shopper: Shopper) -> Result<Redirect> {
    if let Err(e) = shopper.back_to_address() {
        tracing::debug!(error = %e, "Checkout back ignored");
    }
    shopper.save().await?;
    Ok(Redirect::to("/checkout"))
}

/// Validate payment, submit the order and show the confirmation.
///
/// The pending order is committed to the session before the backend is
/// called. A repeated POST for the same session, whether concurrent or
/// after the order went through, redirects to `/checkout` without
/// submitting again and without touching the session.
#[instrument(skip(state, shopper, form))]
pub async fn submit_payment(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<PaymentForm>,
) -> Result<Redirect> {
    let payment = match shopper.authorize_payment(&form) {
        Ok(payment) => payment,
        Err(e) => {
            let redirect = recover(&mut shopper, &e);
            shopper.save().await?;
            return Ok(redirect);
        }
    };

    let Some(_claim) = shopper
        .session_id()
        .and_then(|id| state.in_flight_orders().claim(id))
    else {
        tracing::debug!("Order submission already running for this session");
        return Ok(Redirect::to("/checkout"));
    };

    let order_id = OrderId::generate();
    if let Err(e) = shopper.begin_order(order_id.clone(), Utc::now()) {
        tracing::debug!(error = %e, "Duplicate payment submission ignored");
        return Ok(Redirect::to("/checkout"));
    }
    shopper.commit().await?;

    let address = shopper
        .checkout()
        .address()
        .cloned()
        .ok_or_else(|| AppError::Internal("payment step without an address".to_string()))?;
    let cart = shopper.cart();
    let request = OrderRequest {
        order_id,
        lines: cart.lines().to_vec(),
        coupon: cart.coupon().cloned(),
        address,
        payment: payment.clone(),
        summary: cart.summary(),
    };

    let receipt = match state.orders().submit_order(request).await {
        Ok(receipt) => receipt,
        Err(e) => {
            // Error responses are not saved by the session layer.
            shopper.abandon_order();
            shopper.commit().await?;
            return Err(e.into());
        }
    };
    shopper
        .complete_order(payment, receipt.order_id.clone(), receipt.placed_at)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", receipt.order_id.as_str())]),
    );
    tracing::info!(order_id = %receipt.order_id, placed_at = %receipt.placed_at, "Order placed");

    shopper.save().await?;
    Ok(Redirect::to("/checkout"))
}
