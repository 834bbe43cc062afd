//! Shopper state extractor.
//!
//! Loads the visitor's cart, wishlist, checkout and toasts from the
//! session at the start of a request. Handlers mutate it through the
//! core [`ShopperSession`] API and call [`Shopper::save`] before
//! responding; only keys that changed are written back.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::Utc;
use puja_samagri_core::{KeyValueStore, ShopperSession, ToastKind, storage::keys};
use tower_sessions::{Session, session::Id};

use crate::error::AppError;
use crate::models::{PageContext, ToastView};
use crate::state::AppState;

/// A [`KeyValueStore`] snapshot of the shopper keys in a session.
///
/// Reads are served from the snapshot; writes are recorded and applied
/// to the session by [`SessionStorage::flush`].
#[derive(Debug, Default)]
pub struct SessionStorage {
    values: HashMap<String, String>,
    changes: HashMap<String, Option<String>>,
}

impl SessionStorage {
    /// Read every shopper key from the session.
    ///
    /// Values that are not strings are skipped with a warning, the same
    /// way malformed JSON is treated by the core.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        let mut values = HashMap::new();
        for key in keys::ALL {
            match session.get_value(key).await? {
                Some(serde_json::Value::String(value)) => {
                    values.insert(key.to_string(), value);
                }
                Some(other) => {
                    tracing::warn!(key, kind = ?other, "Ignoring non-string session value");
                }
                None => {}
            }
        }
        Ok(Self {
            values,
            changes: HashMap::new(),
        })
    }

    /// Whether anything was written since loading.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Apply recorded writes to the session and forget them.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn flush(&mut self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        for (key, change) in self.changes.drain() {
            match change {
                Some(value) => session.insert(&key, value).await?,
                None => {
                    session.remove_value(&key).await?;
                }
            }
        }
        Ok(())
    }
}

impl KeyValueStore for SessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value.clone());
        self.changes.insert(key.to_string(), Some(value));
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.changes.insert(key.to_string(), None);
        }
    }
}

/// Extractor giving handlers the visitor's shopper state.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut shopper: Shopper) -> Result<Redirect> {
///     shopper.clear_cart();
///     shopper.save().await?;
///     Ok(Redirect::to("/cart"))
/// }
/// ```
pub struct Shopper {
    session: Session,
    inner: ShopperSession<SessionStorage>,
    current_path: String,
}

impl Shopper {
    /// Queue a toast for the next rendered page.
    pub fn toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.inner.notify(message, kind, Utc::now());
    }

    /// Layout data for the page being rendered. Expired toasts are
    /// swept, so call [`Shopper::save`] afterwards.
    pub fn page(&mut self) -> PageContext {
        let toasts = self
            .inner
            .visible_toasts(Utc::now())
            .iter()
            .map(ToastView::from)
            .collect();
        PageContext {
            cart_count: self.inner.cart().total_items(),
            wishlist_count: self.inner.wishlist().len(),
            toasts,
            current_path: self.current_path.clone(),
        }
    }

    /// Write changed keys back to the session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Session`] if the session store fails.
    pub async fn save(self) -> Result<(), AppError> {
        let mut storage = self.inner.into_store();
        if storage.is_dirty() {
            storage.flush(&self.session).await?;
        }
        Ok(())
    }

    /// Write changed keys and push the session to the store now, so other
    /// requests see them before this one finishes. The shopper stays
    /// usable; call [`Shopper::save`] at the end as usual.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Session`] if the session store fails.
    pub async fn commit(&mut self) -> Result<(), AppError> {
        let storage = self.inner.store_mut();
        if storage.is_dirty() {
            storage.flush(&self.session).await?;
        }
        self.session.save().await?;
        Ok(())
    }

    /// Id of the stored session, once it has been saved at least once.
    #[must_use]
    pub fn session_id(&self) -> Option<Id> {
        self.session.id()
    }
}

impl Deref for Shopper {
    type Target = ShopperSession<SessionStorage>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Shopper {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl FromRequestParts<AppState> for Shopper {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))?;

        let storage = SessionStorage::load(&session).await?;
        let inner = ShopperSession::open(storage).with_toast_ttl(state.config().toast_ttl);
        let current_path = parts
            .uri
            .path_and_query()
            .map_or_else(|| "/".to_string(), ToString::to_string);

        Ok(Self {
            session,
            inner,
            current_path,
        })
    }
}
