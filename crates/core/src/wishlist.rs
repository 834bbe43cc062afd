//! Saved-for-later kits.

use serde::{Deserialize, Serialize};

use crate::types::{PackageId, Price};

/// A saved catalog reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: PackageId,
    pub name: String,
    pub name_hindi: String,
    pub price: Price,
    pub image: String,
}

/// A set of entries keyed by id, kept in the order they were saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    /// An empty wishlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, dropping repeated ids.
    #[must_use]
    pub fn from_entries(entries: Vec<WishlistEntry>) -> Self {
        let mut wishlist = Self::new();
        for entry in entries {
            wishlist.add(entry);
        }
        wishlist
    }

    /// Saved entries.
    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Number of saved entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id.as_str() == id)
    }

    /// Save an entry. Returns `false` if the id was already saved.
    pub fn add(&mut self, entry: WishlistEntry) -> bool {
        if self.contains(entry.id.as_str()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove by id. Returns whether something was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id.as_str() != id);
        self.entries.len() != before
    }

    /// Remove the entry if saved, otherwise save it. Returns the new
    /// membership.
    pub fn toggle(&mut self, entry: WishlistEntry) -> bool {
        if self.remove(entry.id.as_str()) {
            false
        } else {
            self.entries.push(entry);
            true
        }
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn entry(id: &str) -> WishlistEntry {
        WishlistEntry {
            id: PackageId::new(id),
            name: format!("{id} kit"),
            name_hindi: String::new(),
            price: Price::from_rupees(599),
            image: format!("/images/{id}.jpg"),
        }
    }

    #[test]
    fn test_adding_twice_keeps_one_entry() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.add(entry("x")));
        assert!(!wishlist.add(entry("x")));
        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist.entries()[0].id.as_str(), "x");
    }

    #[test]
    fn test_remove_and_contains() {
        let mut wishlist = Wishlist::new();
        wishlist.add(entry("x"));
        assert!(wishlist.contains("x"));
        assert!(!wishlist.remove("y"));
        assert!(wishlist.remove("x"));
        assert!(!wishlist.contains("x"));
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.toggle(entry("x")));
        assert!(!wishlist.toggle(entry("x")));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_from_entries_deduplicates() {
        let wishlist = Wishlist::from_entries(vec![entry("a"), entry("b"), entry("a")]);
        assert_eq!(wishlist.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut wishlist = Wishlist::from_entries(vec![entry("a"), entry("b")]);
        wishlist.clear();
        assert!(wishlist.is_empty());
    }
}
