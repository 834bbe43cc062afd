//! Kit summary card used on listings, the home page and the cart.

use puja_samagri_core::{Catalog, Category, Package, Wishlist};

/// Items previewed on a card before "+N more".
const PREVIEW_ITEMS: usize = 3;

/// A kit as shown on a card.
#[derive(Debug, Clone)]
pub struct PackageCard {
    pub id: String,
    pub name: String,
    pub name_hindi: String,
    pub description: String,
    pub price: String,
    pub original_price: String,
    pub discount: u32,
    pub image: String,
    pub rating: String,
    pub reviews: u32,
    pub duration: String,
    pub item_count: u32,
    pub preview_items: Vec<String>,
    pub more_items: usize,
    pub featured: bool,
    pub in_wishlist: bool,
}

impl PackageCard {
    #[must_use]
    pub fn new(package: &Package, wishlist: &Wishlist) -> Self {
        Self {
            id: package.id.to_string(),
            name: package.name.clone(),
            name_hindi: package.name_hindi.clone(),
            description: package.description.clone(),
            price: package.price.to_string(),
            original_price: package.original_price.to_string(),
            discount: package.discount_percent(),
            image: package.image.clone(),
            rating: format!("{:.1}", package.rating),
            reviews: package.reviews,
            duration: package.duration.clone(),
            item_count: package.item_count(),
            preview_items: package
                .items
                .iter()
                .take(PREVIEW_ITEMS)
                .map(|item| item.name.clone())
                .collect(),
            more_items: package.items.len().saturating_sub(PREVIEW_ITEMS),
            featured: package.featured,
            in_wishlist: wishlist.contains(package.id.as_str()),
        }
    }

    /// Build cards for a list of kits.
    #[must_use]
    pub fn many<'a>(packages: impl IntoIterator<Item = &'a Package>, wishlist: &Wishlist) -> Vec<Self> {
        packages
            .into_iter()
            .map(|package| Self::new(package, wishlist))
            .collect()
    }

    /// Whether to show the struck-through original price.
    #[must_use]
    pub const fn has_discount(&self) -> bool {
        self.discount > 0
    }
}

/// A category tile or filter checkbox.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub name_hindi: String,
    pub icon: String,
    pub count: usize,
    pub selected: bool,
}

impl CategoryView {
    /// Every catalog category, marking those in `selected`.
    #[must_use]
    pub fn all(catalog: &Catalog, selected: &[String]) -> Vec<Self> {
        catalog
            .categories()
            .iter()
            .map(|category| Self::new(catalog, category, selected))
            .collect()
    }

    fn new(catalog: &Catalog, category: &Category, selected: &[String]) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            name_hindi: category.name_hindi.clone(),
            icon: category.icon.clone(),
            count: catalog.count_in_category(category.id.as_str()),
            selected: selected.iter().any(|id| id == category.id.as_str()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        crate::catalog::load().unwrap()
    }

    #[test]
    fn test_card_formats_prices_and_discount() {
        let catalog = catalog();
        let package = catalog.get("havan-samagri").unwrap();
        let card = PackageCard::new(package, &Wishlist::new());

        assert_eq!(card.price, "₹599");
        assert_eq!(card.original_price, "₹799");
        assert_eq!(card.discount, 25);
        assert!(card.has_discount());
        assert!(!card.in_wishlist);
    }

    #[test]
    fn test_card_previews_first_items() {
        let catalog = catalog();
        let package = catalog.get("satyanarayan-katha").unwrap();
        let card = PackageCard::new(package, &Wishlist::new());

        assert_eq!(card.preview_items.len(), PREVIEW_ITEMS);
        assert_eq!(card.more_items, package.items.len() - PREVIEW_ITEMS);
    }

    #[test]
    fn test_card_marks_wishlisted_kits() {
        let catalog = catalog();
        let package = catalog.get("tulsi-pujan").unwrap();
        let mut wishlist = Wishlist::new();
        wishlist.add(package.wishlist_entry());

        assert!(PackageCard::new(package, &wishlist).in_wishlist);
    }

    #[test]
    fn test_category_views_count_and_select() {
        let catalog = catalog();
        let views = CategoryView::all(&catalog, &["festival".to_string()]);

        let festival = views.iter().find(|view| view.id == "festival").unwrap();
        assert!(festival.selected);
        assert_eq!(festival.count, 2);
        assert!(views.iter().filter(|view| view.selected).count() == 1);
    }
}
