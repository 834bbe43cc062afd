//! Order and contact submission.
//!
//! There is no order service yet. Handlers talk to the two port traits
//! below, and [`SimulatedBackend`] answers both after a fixed delay.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use puja_samagri_core::{
    CartLine, CouponCode, DeliveryAddress, Email, OrderId, OrderSummary, PaymentDetails,
};

/// Errors a submission backend can report.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The backend refused the request.
    #[error("Submission rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached.
    #[error("Submission backend unavailable: {0}")]
    Unavailable(String),
}

/// Everything needed to place an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub order_id: OrderId,
    pub lines: Vec<CartLine>,
    pub coupon: Option<CouponCode>,
    pub address: DeliveryAddress,
    pub payment: PaymentDetails,
    pub summary: OrderSummary,
}

/// Acknowledgement of a placed order. `placed_at` is shown on the
/// confirmation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub placed_at: DateTime<Utc>,
}

/// A message from the contact page.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

#[async_trait]
pub trait OrderSubmissionPort: Send + Sync {
    async fn submit_order(&self, order: OrderRequest) -> Result<OrderReceipt, SubmissionError>;
}

#[async_trait]
pub trait ContactSubmissionPort: Send + Sync {
    async fn submit_contact(&self, message: ContactMessage) -> Result<(), SubmissionError>;
}

/// Accepts everything after a pause that mimics a payment gateway or mail
/// relay.
#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    order_delay: Duration,
    contact_delay: Duration,
}

impl SimulatedBackend {
    #[must_use]
    pub const fn new(order_delay: Duration, contact_delay: Duration) -> Self {
        Self {
            order_delay,
            contact_delay,
        }
    }
}

#[async_trait]
impl OrderSubmissionPort for SimulatedBackend {
    async fn submit_order(&self, order: OrderRequest) -> Result<OrderReceipt, SubmissionError> {
        tokio::time::sleep(self.order_delay).await;
        tracing::info!(
            order_id = %order.order_id,
            lines = order.lines.len(),
            total = %order.summary.total,
            payment = %order.payment,
            "Order placed (simulated)"
        );
        Ok(OrderReceipt {
            order_id: order.order_id,
            placed_at: Utc::now(),
        })
    }
}

#[async_trait]
impl ContactSubmissionPort for SimulatedBackend {
    async fn submit_contact(&self, message: ContactMessage) -> Result<(), SubmissionError> {
        tokio::time::sleep(self.contact_delay).await;
        tracing::info!(
            email = %message.email,
            subject = message.subject.as_deref().unwrap_or(""),
            "Contact message received (simulated)"
        );
        Ok(())
    }
}
