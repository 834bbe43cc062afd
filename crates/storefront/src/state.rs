//! Application state shared across handlers.

use std::sync::Arc;

use puja_samagri_core::Catalog;

use crate::config::StorefrontConfig;
use crate::services::{
    ContactSubmissionPort, InFlightOrders, OrderSubmissionPort, SimulatedBackend,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Per-visitor state lives in
/// the session; the only shared mutable piece is the set of in-flight
/// order claims.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    orders: Arc<dyn OrderSubmissionPort>,
    contact: Arc<dyn ContactSubmissionPort>,
    in_flight: InFlightOrders,
}

impl AppState {
    /// Create application state backed by the simulated order service.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let backend = Arc::new(SimulatedBackend::new(
            config.order_processing_delay,
            config.contact_submit_delay,
        ));
        Self::with_ports(config, catalog, backend.clone(), backend)
    }

    /// Create application state with explicit submission backends.
    #[must_use]
    pub fn with_ports(
        config: StorefrontConfig,
        catalog: Catalog,
        orders: Arc<dyn OrderSubmissionPort>,
        contact: Arc<dyn ContactSubmissionPort>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders,
                contact,
                in_flight: InFlightOrders::default(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the kit catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Order submission backend.
    #[must_use]
    pub fn orders(&self) -> &dyn OrderSubmissionPort {
        self.inner.orders.as_ref()
    }

    /// Order submissions currently running, by session.
    #[must_use]
    pub fn in_flight_orders(&self) -> &InFlightOrders {
        &self.inner.in_flight
    }

    /// Contact message backend.
    #[must_use]
    pub fn contact(&self) -> &dyn ContactSubmissionPort {
        self.inner.contact.as_ref()
    }
}
