//! Built-in kit catalog.
//!
//! The catalog ships inside the binary as `data/catalog.json` and is
//! validated once at startup.

use puja_samagri_core::{Catalog, CatalogError};

const CATALOG_JSON: &str = include_str!("../data/catalog.json");

/// Parse and validate the bundled catalog.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the bundled data is inconsistent.
pub fn load() -> Result<Catalog, CatalogError> {
    let catalog = Catalog::from_json(CATALOG_JSON)?;
    tracing::debug!(
        packages = catalog.packages().len(),
        categories = catalog.categories().len(),
        "Catalog loaded"
    );
    Ok(catalog)
}
