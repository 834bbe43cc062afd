//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::Shopper;
use crate::models::{CategoryView, PackageCard, PageContext};
use crate::state::AppState;

/// Packages shown in the "popular" grid.
const HOME_PACKAGES: usize = 8;

/// A customer quote on the home page.
pub struct Testimonial {
    pub name: &'static str,
    pub location: &'static str,
    pub text: &'static str,
}

const TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        name: "Priya Sharma",
        location: "Delhi",
        text: "The Satyanarayan Katha kit was complete and authentic. Every item was carefully packed. Highly recommend!",
    },
    Testimonial {
        name: "Rajesh Patel",
        location: "Mumbai",
        text: "We performed Griha Shanti using their kit. The quality of materials was excellent. Will order again.",
    },
    Testimonial {
        name: "Sunita Devi",
        location: "Varanasi",
        text: "Fast delivery and premium quality havan samagri. The fragrance during havan was divine.",
    },
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub categories: Vec<CategoryView>,
    pub featured: Vec<PackageCard>,
    pub packages: Vec<PackageCard>,
    pub testimonials: &'static [Testimonial],
}

/// Display the home page.
#[instrument(skip(state, shopper))]
pub async fn home(State(state): State<AppState>, mut shopper: Shopper) -> Result<HomeTemplate> {
    let catalog = state.catalog();
    let wishlist = shopper.wishlist();

    let template = HomeTemplate {
        categories: CategoryView::all(catalog, &[]),
        featured: PackageCard::many(catalog.featured(), wishlist),
        packages: PackageCard::many(catalog.packages().iter().take(HOME_PACKAGES), wishlist),
        testimonials: &TESTIMONIALS,
        page: shopper.page(),
    };

    shopper.save().await?;
    Ok(template)
}
