//! Backend collaborators for the storefront.
//!
//! # Services
//!
//! - `submission` - Order and contact-message submission ports, plus the
//!   simulated backend that stands in for a real order service
//! - `in_flight` - Per-session claims that keep one order submission
//!   running per visitor

pub mod in_flight;
pub mod submission;

pub use in_flight::{InFlightOrders, OrderClaim};
pub use submission::{
    ContactMessage, ContactSubmissionPort, OrderReceipt, OrderRequest, OrderSubmissionPort,
    SimulatedBackend, SubmissionError,
};
