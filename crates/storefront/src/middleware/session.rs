//! Session middleware configuration.
//!
//! Sessions hold each visitor's cart, wishlist, checkout progress and
//! toasts. They live in a bounded in-process cache and are lost on
//! restart, like a browser profile being cleared. Each record is evicted
//! once its own expiry date passes, so abandoned sessions do not pile up.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry as CacheExpiry;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "ps_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Most sessions kept at once. Past this the least recently used go first.
const SESSION_CAPACITY: u64 = 100_000;

/// Create the session layer with the in-process store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<CacheSessionStore> {
    SessionManagerLayer::new(CacheSessionStore::new(SESSION_CAPACITY))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Session store on a `moka` cache whose entries expire at the record's
/// own expiry date.
#[derive(Clone)]
pub struct CacheSessionStore {
    cache: Cache<Id, Record>,
}

impl CacheSessionStore {
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .expire_after(RecordExpiry)
            .build();
        Self { cache }
    }

    /// Sessions currently held, including any not yet swept.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run pending evictions now instead of on the next access.
    pub async fn sweep(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl fmt::Debug for CacheSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSessionStore")
            .field("sessions", &self.cache.entry_count())
            .finish()
    }
}

#[async_trait]
impl SessionStore for CacheSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        loop {
            let entry = self.cache.entry(record.id).or_insert(record.clone()).await;
            if entry.is_fresh() {
                return Ok(());
            }
            // Id collision with a live session.
            record.id = Id::default();
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .cache
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(session_id).await;
        Ok(())
    }
}

/// Expires each cache entry at its record's `expiry_date`.
struct RecordExpiry;

impl RecordExpiry {
    fn remaining(record: &Record) -> Duration {
        Duration::try_from(record.expiry_date - OffsetDateTime::now_utc()).unwrap_or(Duration::ZERO)
    }
}

impl CacheExpiry<Id, Record> for RecordExpiry {
    fn expire_after_create(&self, _id: &Id, record: &Record, _now: Instant) -> Option<Duration> {
        Some(Self::remaining(record))
    }

    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _now: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(Self::remaining(record))
    }
}
