//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, capture errors; added in `main.rs`)
//! 2. Request ID
//! 3. `TraceLayer` (request tracing)
//! 4. Security headers
//! 5. Session layer (tower-sessions over a `moka` cache)
//!
//! The contact form route adds its own rate limiter, and handlers pull
//! shopper state through the [`Shopper`] extractor.

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod shopper;

pub use rate_limit::contact_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{CacheSessionStore, create_session_layer};
pub use shopper::{SessionStorage, Shopper};
