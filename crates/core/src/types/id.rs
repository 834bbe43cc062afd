//! Newtype IDs for type-safe entity references.
//!
//! Catalog ids are human-readable slugs (`satyanarayan-katha`), so every id
//! wraps a `String`. Use the `define_id!` macro to create wrappers that
//! prevent mixing ids of different entity types.

use uuid::Uuid;

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display`
///
/// # Example
///
/// ```rust
/// # use puja_samagri_core::define_id;
/// define_id!(KitId);
/// define_id!(ReviewId);
///
/// let kit = KitId::new("havan-samagri");
/// let review = ReviewId::new("havan-samagri");
///
/// // Same text, different types, so this won't compile:
/// // let _: KitId = review;
/// assert_eq!(kit.as_str(), review.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Catalog and shopper entities
define_id!(PackageId);
define_id!(CategoryId);
define_id!(LineId);
define_id!(AddressId);
define_id!(OrderId);
define_id!(ToastId);

impl OrderId {
    /// Prefix shared by every storefront order number.
    pub const PREFIX: &'static str = "PS";

    /// Generate a fresh order number.
    ///
    /// The random part is a full UUID v4, so two checkouts completing in
    /// the same instant still get distinct numbers.
    #[must_use]
    pub fn generate() -> Self {
        let random = Uuid::new_v4().simple().to_string().to_uppercase();
        Self(format!("{}{random}", Self::PREFIX))
    }
}

impl ToastId {
    /// Generate a fresh toast id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl From<&PackageId> for LineId {
    /// A package added without customizations uses its own id as line id.
    fn from(id: &PackageId) -> Self {
        Self(id.as_str().to_owned())
    }
}

impl LineId {
    /// Line id for a customized package: `{package}?{index}={value}&...`.
    ///
    /// Values are percent-encoded, so `&` and `=` never appear inside a
    /// choice and two different selections cannot share an id.
    #[must_use]
    pub fn customized<'a>(
        package: &PackageId,
        choices: impl IntoIterator<Item = (usize, &'a str)>,
    ) -> Self {
        let query: Vec<String> = choices
            .into_iter()
            .map(|(index, value)| format!("{index}={}", urlencoding::encode(value)))
            .collect();
        if query.is_empty() {
            return Self::from(package);
        }
        Self(format!("{package}?{}", query.join("&")))
    }

    /// The package this line was built from.
    #[must_use]
    pub fn package_id(&self) -> &str {
        self.0.split_once('?').map_or(self.0.as_str(), |(package, _)| package)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_ids_are_prefixed_and_unique() {
        let first = OrderId::generate();
        let second = OrderId::generate();

        assert!(first.as_str().starts_with("PS"));
        assert_eq!(first.as_str().len(), 2 + 32);
        assert_ne!(first, second);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = PackageId::new("tulsi-pujan");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"tulsi-pujan\"");

        let parsed: PackageId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_line_id_from_package_id() {
        let package = PackageId::new("havan-samagri");
        assert_eq!(LineId::from(&package).as_str(), "havan-samagri");
    }

    #[test]
    fn test_customized_line_ids_do_not_collide() {
        let package = PackageId::new("kit");
        let joined = LineId::customized(&package, [(0, "x-1-y")]);
        let split = LineId::customized(&package, [(0, "x"), (1, "y")]);
        assert_ne!(joined, split);

        let first = LineId::customized(&package, [(0, "Small")]);
        let second = LineId::customized(&package, [(1, "Small")]);
        assert_ne!(first, second);

        let tricky = LineId::customized(&package, [(0, "a&1=b")]);
        assert_eq!(tricky.as_str(), "kit?0=a%261%3Db");
    }

    #[test]
    fn test_line_id_package_id() {
        let package = PackageId::new("havan-samagri");
        let custom = LineId::customized(&package, [(0, "1kg"), (1, "Peepal")]);
        assert_eq!(custom.as_str(), "havan-samagri?0=1kg&1=Peepal");
        assert_eq!(custom.package_id(), "havan-samagri");
        let none: Vec<(usize, &str)> = Vec::new();
        assert_eq!(LineId::customized(&package, none), LineId::from(&package));
        assert_eq!(LineId::new("tulsi-pujan").package_id(), "tulsi-pujan");
    }
}
