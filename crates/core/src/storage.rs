//! Key-value persistence for shopper state.
//!
//! Values are stored as JSON strings under fixed keys. A value that fails
//! to parse is treated as absent; the caller starts from empty state.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage keys for each piece of shopper state.
pub mod keys {
    /// JSON array of cart lines.
    pub const CART: &str = "puja-cart";
    /// Active coupon code; absent when none is active.
    pub const COUPON: &str = "puja-coupon";
    /// JSON array of wishlist entries.
    pub const WISHLIST: &str = "puja-wishlist";
    /// Checkout progress.
    pub const CHECKOUT: &str = "puja-checkout";
    /// Pending toasts.
    pub const TOASTS: &str = "puja-toasts";

    /// Every key the shopper session reads or writes.
    pub const ALL: [&str; 5] = [CART, COUPON, WISHLIST, CHECKOUT, TOASTS];
}

/// String-keyed, string-valued storage.
pub trait KeyValueStore {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: String);

    /// Delete a value. Missing keys are ignored.
    fn remove(&mut self, key: &str);
}

/// A plain in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        (**self).set(key, value);
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key);
    }
}

/// Read and decode a JSON value. Missing keys and malformed JSON both
/// yield `None`; the latter is logged.
pub fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding malformed stored value");
            None
        }
    }
}

/// Encode a value as JSON and store it.
pub fn save_json<T: Serialize + ?Sized>(store: &mut impl KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.set(key, json),
        Err(e) => tracing::error!(key, error = %e, "Failed to encode value for storage"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let mut store = MemoryStore::new();
        store.set(keys::COUPON, "FIRST10".to_string());
        assert_eq!(store.get(keys::COUPON).as_deref(), Some("FIRST10"));

        store.remove(keys::COUPON);
        assert_eq!(store.get(keys::COUPON), None);
        store.remove(keys::COUPON);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_json_treats_malformed_as_absent() {
        let mut store = MemoryStore::new();
        store.set(keys::CART, "{not json".to_string());
        assert_eq!(load_json::<Vec<u32>>(&store, keys::CART), None);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save_json(&mut store, keys::WISHLIST, &vec!["a", "b"]);
        assert_eq!(store.get(keys::WISHLIST).as_deref(), Some(r#"["a","b"]"#));
        assert_eq!(
            load_json::<Vec<String>>(&store, keys::WISHLIST),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }
}
