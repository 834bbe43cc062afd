//! Integration test harness for the Puja Samagri storefront.
//!
//! [`TestClient`] drives the full router in-process with
//! `tower::ServiceExt::oneshot`, carrying the session cookie between
//! requests the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p puja-samagri-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use puja_samagri_storefront::{app, catalog, config::StorefrontConfig, state::AppState};
use tower::ServiceExt;

/// Largest response body the harness reads.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Configuration for tests: no simulated latency and toasts that outlive
/// the test.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        order_processing_delay: Duration::ZERO,
        contact_submit_delay: Duration::ZERO,
        toast_ttl: chrono::Duration::seconds(60),
        ..StorefrontConfig::default()
    }
}

/// Build the storefront router over the bundled catalog.
///
/// # Panics
///
/// Panics if the bundled catalog does not parse.
#[must_use]
pub fn test_app() -> Router {
    let catalog = catalog::load().expect("bundled catalog should load");
    app(AppState::new(test_config(), catalog))
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    /// Assert a 303 redirect to `target`.
    ///
    /// # Panics
    ///
    /// Panics if the response is not that redirect.
    pub fn assert_redirect(&self, target: &str) {
        assert_eq!(
            self.status,
            StatusCode::SEE_OTHER,
            "expected redirect to {target}, body: {}",
            self.body
        );
        assert_eq!(self.location(), Some(target));
    }
}

/// One browser-like visitor: a router plus the session cookie it was
/// given. Clones share the cookie they were cloned with, like two tabs.
#[derive(Clone)]
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClient {
    /// A fresh visitor on a fresh app.
    #[must_use]
    pub fn new() -> Self {
        Self::with_app(test_app())
    }

    /// A fresh visitor on an existing app (sharing its session store).
    #[must_use]
    pub const fn with_app(app: Router) -> Self {
        Self { app, cookie: None }
    }

    /// Whether the server has issued a session cookie yet.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty());
        self.send(request.expect("valid request")).await
    }

    /// Send a urlencoded form POST.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn post(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()));
        self.send(request.expect("valid request")).await
    }

    /// Send a urlencoded form POST with extra headers.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn post_with_headers(
        &mut self,
        uri: &str,
        form: &str,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let request = headers
            .iter()
            .fold(self.request("POST", uri), |builder, (name, value)| {
                builder.header(*name, *value)
            })
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()));
        self.send(request.expect("valid request")).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("body should be readable");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
