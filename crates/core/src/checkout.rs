//! Checkout flow: address, then payment, then confirmation.
//!
//! [`Checkout`] only records where the shopper is and what they chose.
//! Payment is split in two so the caller can await order submission
//! between validating the payment form ([`Checkout::authorize_payment`])
//! and reaching confirmation ([`Checkout::confirm`]). While that submission
//! is in flight the machine carries a [`PendingOrder`], and a second
//! [`Checkout::begin_order`] is refused until it confirms, is abandoned or
//! goes stale.
//!
//! ```text
//!  Address ──submit_address──▶ Payment ──confirm──▶ Confirmation
//!     ▲                          │
//!     └──────────back────────────┘
//! ```

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AddressId, OrderId};

/// How long an order submission may stay pending before another attempt
/// is allowed. Covers requests that died mid-submission.
pub const PENDING_ORDER_TIMEOUT_SECONDS: i64 = 60;

/// Where the shopper is in checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Address,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    /// Every step, in order.
    pub const ALL: [Self; 3] = [Self::Address, Self::Payment, Self::Confirmation];

    /// 1-based position for the progress indicator.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Address => 1,
            Self::Payment => 2,
            Self::Confirmation => 3,
        }
    }

    /// Heading used in the progress indicator.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Address => "Address",
            Self::Payment => "Payment",
            Self::Confirmation => "Confirmation",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A form field the shopper left out.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select or add a delivery address")]
    NoAddressSelected,
    #[error("Please fill all required fields")]
    MissingAddressFields,
    #[error("Please enter your UPI ID")]
    MissingUpiId,
    #[error("Please fill all card details")]
    MissingCardDetails,
}

/// A step change the machine does not allow.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot go from {from} to {to}")]
    Illegal { from: CheckoutStep, to: CheckoutStep },
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("Your order is already being placed")]
    OrderInProgress,
}

/// Either kind of checkout failure.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

// =============================================================================
// Addresses
// =============================================================================

/// A validated delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub full_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

impl DeliveryAddress {
    /// "City, State - Pincode".
    #[must_use]
    pub fn locality(&self) -> String {
        format!("{}, {} - {}", self.city, self.state, self.pincode)
    }
}

/// Raw new-address form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddressForm {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub landmark: String,
}

impl AddressForm {
    /// Check required fields and trim everything.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingAddressFields`] when any of full
    /// name, phone, address, city, state or pincode is blank.
    pub fn validate(&self) -> Result<DeliveryAddress, ValidationError> {
        let required = [
            &self.full_name,
            &self.phone,
            &self.address,
            &self.city,
            &self.state,
            &self.pincode,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(ValidationError::MissingAddressFields);
        }
        Ok(DeliveryAddress {
            full_name: self.full_name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            email: non_blank(&self.email),
            address: self.address.trim().to_owned(),
            city: self.city.trim().to_owned(),
            state: self.state.trim().to_owned(),
            pincode: self.pincode.trim().to_owned(),
            landmark: non_blank(&self.landmark),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// An address on file for the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedAddress {
    pub id: AddressId,
    /// "Home", "Office", ...
    pub label: String,
    pub address: DeliveryAddress,
    pub is_default: bool,
}

/// The shopper's saved addresses. There are no accounts, so these are
/// fixed.
#[must_use]
pub fn saved_addresses() -> Vec<SavedAddress> {
    vec![
        SavedAddress {
            id: AddressId::new("1"),
            label: "Home".to_owned(),
            address: DeliveryAddress {
                full_name: "Amit Kumar".to_owned(),
                phone: "9876543210".to_owned(),
                email: Some("amit@email.com".to_owned()),
                address: "123, Temple Street, Sector 15".to_owned(),
                city: "Noida".to_owned(),
                state: "Uttar Pradesh".to_owned(),
                pincode: "201301".to_owned(),
                landmark: Some("Near Shiv Temple".to_owned()),
            },
            is_default: true,
        },
        SavedAddress {
            id: AddressId::new("2"),
            label: "Office".to_owned(),
            address: DeliveryAddress {
                full_name: "Amit Kumar".to_owned(),
                phone: "9876543211".to_owned(),
                email: Some("amit.work@email.com".to_owned()),
                address: "456, Business Park, Cyber City".to_owned(),
                city: "Gurugram".to_owned(),
                state: "Haryana".to_owned(),
                pincode: "122001".to_owned(),
                landmark: Some("Near Metro Station".to_owned()),
            },
            is_default: false,
        },
    ]
}

/// How the shopper picked a delivery address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressChoice {
    /// One of [`saved_addresses`].
    Saved(AddressId),
    /// A freshly entered address.
    New(AddressForm),
    /// Nothing chosen.
    None,
}

impl AddressChoice {
    /// Turn the choice into a concrete address.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NoAddressSelected`] when nothing (or an unknown
    /// saved id) was chosen, [`ValidationError::MissingAddressFields`] when
    /// a new address is incomplete.
    pub fn resolve(self) -> Result<DeliveryAddress, ValidationError> {
        match self {
            Self::Saved(id) => saved_addresses()
                .into_iter()
                .find(|saved| saved.id == id)
                .map(|saved| saved.address)
                .ok_or(ValidationError::NoAddressSelected),
            Self::New(form) => form.validate(),
            Self::None => Err(ValidationError::NoAddressSelected),
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Supported payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Upi,
    Card,
    #[serde(rename = "netbanking", alias = "net_banking")]
    NetBanking,
    #[serde(rename = "cod", alias = "cash_on_delivery")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Every method, in display order.
    pub const ALL: [Self; 4] = [Self::Upi, Self::Card, Self::NetBanking, Self::CashOnDelivery];

    /// Form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::Card => "card",
            Self::NetBanking => "netbanking",
            Self::CashOnDelivery => "cod",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upi => "UPI",
            Self::Card => "Credit / Debit Card",
            Self::NetBanking => "Net Banking",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upi" => Ok(Self::Upi),
            "card" => Ok(Self::Card),
            "netbanking" | "net_banking" => Ok(Self::NetBanking),
            "cod" | "cash_on_delivery" => Ok(Self::CashOnDelivery),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Raw payment form input. Only the fields for `method` are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaymentForm {
    pub method: PaymentMethod,
    pub upi_id: String,
    pub card_number: String,
    pub card_expiry: String,
    pub card_cvv: String,
    pub card_name: String,
}

impl PaymentForm {
    /// Check the fields the chosen method requires.
    ///
    /// Card numbers are reduced to their last four digits; the CVV is
    /// never kept.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingUpiId`] or
    /// [`ValidationError::MissingCardDetails`].
    pub fn validate(&self) -> Result<PaymentDetails, ValidationError> {
        match self.method {
            PaymentMethod::Upi => non_blank(&self.upi_id)
                .map(|upi_id| PaymentDetails::Upi { upi_id })
                .ok_or(ValidationError::MissingUpiId),
            PaymentMethod::Card => {
                let fields = [
                    &self.card_number,
                    &self.card_expiry,
                    &self.card_cvv,
                    &self.card_name,
                ];
                if fields.iter().any(|field| field.trim().is_empty()) {
                    return Err(ValidationError::MissingCardDetails);
                }
                let digits: Vec<char> = self
                    .card_number
                    .chars()
                    .filter(char::is_ascii_digit)
                    .collect();
                let last4 = digits.iter().skip(digits.len().saturating_sub(4)).collect();
                Ok(PaymentDetails::Card {
                    last4,
                    name_on_card: self.card_name.trim().to_owned(),
                })
            }
            PaymentMethod::NetBanking => Ok(PaymentDetails::NetBanking),
            PaymentMethod::CashOnDelivery => Ok(PaymentDetails::CashOnDelivery),
        }
    }
}

/// What was kept from a validated payment form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentDetails {
    Upi { upi_id: String },
    Card { last4: String, name_on_card: String },
    NetBanking,
    CashOnDelivery,
}

impl PaymentDetails {
    /// The method these details belong to.
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        match self {
            Self::Upi { .. } => PaymentMethod::Upi,
            Self::Card { .. } => PaymentMethod::Card,
            Self::NetBanking => PaymentMethod::NetBanking,
            Self::CashOnDelivery => PaymentMethod::CashOnDelivery,
        }
    }
}

impl fmt::Display for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upi { upi_id } => write!(f, "UPI ({upi_id})"),
            Self::Card { last4, .. } => write!(f, "Card ending {last4}"),
            Self::NetBanking | Self::CashOnDelivery => f.write_str(self.method().label()),
        }
    }
}

// =============================================================================
// Machine
// =============================================================================

/// An order handed to the backend but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub order_id: OrderId,
    pub started_at: DateTime<Utc>,
}

impl PendingOrder {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.started_at)
            < TimeDelta::seconds(PENDING_ORDER_TIMEOUT_SECONDS)
    }
}

/// Checkout progress for one cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    step: CheckoutStep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<DeliveryAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payment: Option<PaymentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order_id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending: Option<PendingOrder>,
}

impl Checkout {
    /// A fresh machine at the address step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Address chosen in the first step.
    #[must_use]
    pub const fn address(&self) -> Option<&DeliveryAddress> {
        self.address.as_ref()
    }

    /// Payment recorded at confirmation.
    #[must_use]
    pub const fn payment(&self) -> Option<&PaymentDetails> {
        self.payment.as_ref()
    }

    /// Order number, set once confirmed.
    #[must_use]
    pub const fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    /// When the backend accepted the order, set once confirmed.
    #[must_use]
    pub const fn placed_at(&self) -> Option<DateTime<Utc>> {
        self.placed_at
    }

    /// The order being submitted, unless it has gone stale.
    #[must_use]
    pub fn pending_order(&self, now: DateTime<Utc>) -> Option<&OrderId> {
        self.pending
            .as_ref()
            .filter(|pending| pending.is_fresh(now))
            .map(|pending| &pending.order_id)
    }

    /// Whether the order has been placed.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.step == CheckoutStep::Confirmation
    }

    /// Address → Payment.
    ///
    /// # Errors
    ///
    /// [`TransitionError::Illegal`] outside the address step; a
    /// [`ValidationError`] if the choice does not resolve to an address.
    /// The machine is unchanged on error.
    pub fn submit_address(
        &mut self,
        choice: AddressChoice,
    ) -> Result<&DeliveryAddress, CheckoutError> {
        self.expect_step(CheckoutStep::Address, CheckoutStep::Payment)?;
        let address = choice.resolve()?;
        self.step = CheckoutStep::Payment;
        Ok(&*self.address.insert(address))
    }

    /// Payment → Address.
    ///
    /// # Errors
    ///
    /// [`TransitionError::Illegal`] outside the payment step.
    pub fn back(&mut self) -> Result<(), TransitionError> {
        self.expect_step(CheckoutStep::Payment, CheckoutStep::Address)?;
        self.step = CheckoutStep::Address;
        Ok(())
    }

    /// Validate the payment form without moving.
    ///
    /// # Errors
    ///
    /// [`TransitionError::Illegal`] outside the payment step, or the
    /// form's [`ValidationError`].
    pub fn authorize_payment(&self, form: &PaymentForm) -> Result<PaymentDetails, CheckoutError> {
        self.expect_step(CheckoutStep::Payment, CheckoutStep::Confirmation)?;
        Ok(form.validate()?)
    }

    /// Mark `order_id` as being submitted. Call after
    /// [`Checkout::authorize_payment`] and persist the machine before
    /// awaiting the backend.
    ///
    /// # Errors
    ///
    /// [`TransitionError::Illegal`] outside the payment step;
    /// [`TransitionError::OrderInProgress`] while another order is pending
    /// and not yet stale.
    pub fn begin_order(
        &mut self,
        order_id: OrderId,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.expect_step(CheckoutStep::Payment, CheckoutStep::Confirmation)?;
        if self.pending_order(now).is_some() {
            return Err(TransitionError::OrderInProgress);
        }
        self.pending = Some(PendingOrder {
            order_id,
            started_at: now,
        });
        Ok(())
    }

    /// Drop the pending marker after a failed submission. Returns whether
    /// there was one.
    pub fn abandon_order(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Payment → Confirmation, recording the order.
    ///
    /// # Errors
    ///
    /// [`TransitionError::Illegal`] outside the payment step.
    pub fn confirm(
        &mut self,
        payment: PaymentDetails,
        order_id: OrderId,
        placed_at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.expect_step(CheckoutStep::Payment, CheckoutStep::Confirmation)?;
        self.step = CheckoutStep::Confirmation;
        self.payment = Some(payment);
        self.order_id = Some(order_id);
        self.placed_at = Some(placed_at);
        self.pending = None;
        Ok(())
    }

    /// Start over at the address step.
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    fn expect_step(&self, from: CheckoutStep, to: CheckoutStep) -> Result<(), TransitionError> {
        if self.step == from {
            Ok(())
        } else {
            Err(TransitionError::Illegal {
                from: self.step,
                to,
            })
        }
    }
}
