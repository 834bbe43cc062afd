//! About, not-found and toast dismissal.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::Shopper;
use crate::models::PageContext;
use crate::routes::safe_return_to;

/// A "why choose us" card.
pub struct Feature {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// A team member card.
pub struct TeamMember {
    pub name: &'static str,
    pub role: &'static str,
    pub initials: &'static str,
}

const FEATURES: [Feature; 6] = [
    Feature {
        icon: "shield",
        title: "100% Authentic",
        description: "All materials sourced from trusted suppliers in Varanasi, Haridwar, and other holy places.",
    },
    Feature {
        icon: "package",
        title: "Complete Kits",
        description: "Every kit contains all items needed. No running around to gather individual materials.",
    },
    Feature {
        icon: "truck",
        title: "Fast Delivery",
        description: "Same-day delivery in select cities. Pan-India delivery within 2-4 business days.",
    },
    Feature {
        icon: "star",
        title: "Expert Curated",
        description: "Kits designed by experienced pandits ensuring nothing important is missed.",
    },
    Feature {
        icon: "award",
        title: "Quality Assured",
        description: "Strict quality checks to ensure fresh and pure materials in every package.",
    },
    Feature {
        icon: "users",
        title: "Customer Support",
        description: "Dedicated support team to help with any queries about rituals or orders.",
    },
];

const TEAM: [TeamMember; 4] = [
    TeamMember {
        name: "Pandit Ramesh Sharma",
        role: "Chief Puja Consultant",
        initials: "RS",
    },
    TeamMember {
        name: "Amit Verma",
        role: "Founder & CEO",
        initials: "AV",
    },
    TeamMember {
        name: "Priya Gupta",
        role: "Operations Head",
        initials: "PG",
    },
    TeamMember {
        name: "Suresh Pandey",
        role: "Quality Assurance",
        initials: "SP",
    },
];

/// Search shortcuts offered on the not-found page.
const SUGGESTED_SEARCHES: [(&str, &str); 4] = [
    ("Havan", "/packages?search=Havan"),
    ("Satyanarayan", "/packages?search=Satyanarayan"),
    ("Rudra Abhishek", "/packages?search=Rudra%20Abhishek"),
    ("Griha Shanti", "/packages?search=Griha%20Shanti"),
];

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub page: PageContext,
    pub features: &'static [Feature],
    pub team: &'static [TeamMember],
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub page: PageContext,
}

impl NotFoundTemplate {
    #[must_use]
    pub const fn suggestions(&self) -> &'static [(&'static str, &'static str)] {
        &SUGGESTED_SEARCHES
    }
}

/// Display the about page.
#[instrument(skip(shopper))]
pub async fn about(mut shopper: Shopper) -> Result<AboutTemplate> {
    let template = AboutTemplate {
        features: &FEATURES,
        team: &TEAM,
        page: shopper.page(),
    };
    shopper.save().await?;
    Ok(template)
}

/// Fallback for unknown paths.
#[instrument(skip(shopper))]
pub async fn not_found(mut shopper: Shopper) -> Result<Response> {
    let template = NotFoundTemplate {
        page: shopper.page(),
    };
    shopper.save().await?;
    Ok((StatusCode::NOT_FOUND, template).into_response())
}

/// Toast dismiss form data.
#[derive(Debug, Default, Deserialize)]
pub struct DismissForm {
    pub return_to: Option<String>,
}

/// Dismiss a toast and go back to the page it was shown on.
///
/// Dismissing an unknown or already expired toast is a no-op.
#[instrument(skip(shopper, form))]
pub async fn dismiss_toast(
    Path(id): Path<String>,
    mut shopper: Shopper,
    Form(form): Form<DismissForm>,
) -> Result<Redirect> {
    if !shopper.dismiss_toast(&id) {
        tracing::debug!(toast = %id, "Toast already gone");
    }
    shopper.save().await?;
    Ok(Redirect::to(&safe_return_to(form.return_to.as_deref(), "/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions_link_to_listing_search() {
        let template = NotFoundTemplate {
            page: PageContext::default(),
        };
        assert!(
            template
                .suggestions()
                .iter()
                .all(|(_, href)| href.starts_with("/packages?search="))
        );
    }
}
