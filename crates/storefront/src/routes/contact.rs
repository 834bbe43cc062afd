//! Contact page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use puja_samagri_core::{Email, ToastKind};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::Shopper;
use crate::models::PageContext;
use crate::services::ContactMessage;
use crate::state::AppState;

/// Subject dropdown: form value and label.
pub const SUBJECTS: [(&str, &str); 6] = [
    ("order", "Order Related"),
    ("delivery", "Delivery Issue"),
    ("product", "Product Inquiry"),
    ("refund", "Refund Request"),
    ("bulk", "Bulk Order"),
    ("other", "Other"),
];

/// A frequently asked question.
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

const FAQS: [Faq; 4] = [
    Faq {
        question: "How can I track my order?",
        answer: "You can track your order from the 'My Orders' section in your account. You will also receive tracking updates via SMS and email.",
    },
    Faq {
        question: "What is your return policy?",
        answer: "We offer a 7-day return policy for unused items. For perishable items, please contact us within 24 hours of delivery.",
    },
    Faq {
        question: "Do you deliver to all pin codes?",
        answer: "We currently deliver to 500+ cities across India. Enter your pin code at checkout to check availability.",
    },
    Faq {
        question: "Can I get a bulk order discount?",
        answer: "Yes! For orders of 10+ packages, contact us at bulk@pujasamagri.com for special pricing.",
    },
];

/// Why a contact form was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactFormError {
    #[error("Please enter your name")]
    MissingName,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter your message")]
    MissingMessage,
}

/// Contact form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl ContactForm {
    /// Check required fields and the email shape.
    ///
    /// # Errors
    ///
    /// Returns the first [`ContactFormError`] found, checking name, then
    /// email, then message.
    pub fn validate(&self) -> std::result::Result<ContactMessage, ContactFormError> {
        let name = optional(&self.name).ok_or(ContactFormError::MissingName)?;
        let email = Email::parse(&self.email).map_err(|_| ContactFormError::InvalidEmail)?;
        let message = optional(&self.message).ok_or(ContactFormError::MissingMessage)?;

        Ok(ContactMessage {
            name,
            email,
            phone: optional(&self.phone),
            subject: optional(&self.subject),
            message,
        })
    }
}

/// A subject dropdown option.
#[derive(Debug, Clone)]
pub struct SubjectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact/show.html")]
pub struct ContactTemplate {
    pub page: PageContext,
    pub form: ContactForm,
    pub subjects: Vec<SubjectOption>,
    pub faqs: &'static [Faq],
}

impl ContactTemplate {
    fn new(page: PageContext, form: ContactForm) -> Self {
        let subjects = SUBJECTS
            .iter()
            .map(|(value, label)| SubjectOption {
                value,
                label,
                selected: form.subject == *value,
            })
            .collect();
        Self {
            page,
            form,
            subjects,
            faqs: &FAQS,
        }
    }
}

/// Display the contact page.
#[instrument(skip(shopper))]
pub async fn show(mut shopper: Shopper) -> Result<ContactTemplate> {
    let template = ContactTemplate::new(shopper.page(), ContactForm::default());
    shopper.save().await?;
    Ok(template)
}

/// Validate and send a contact message.
///
/// Invalid input re-renders the form with what was typed; a sent message
/// redirects back to an empty form.
#[instrument(skip(state, shopper, form))]
pub async fn submit(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let message = match form.validate() {
        Ok(message) => message,
        Err(e) => {
            shopper.toast(e.to_string(), ToastKind::Error);
            let template = ContactTemplate::new(shopper.page(), form);
            shopper.save().await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    state.contact().submit_contact(message).await?;
    shopper.toast(
        "Message sent successfully! We will get back to you soon.",
        ToastKind::Success,
    );
    shopper.save().await?;
    Ok(Redirect::to("/contact").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: " Priya ".to_string(),
            email: "priya@example.com".to_string(),
            phone: String::new(),
            subject: "bulk".to_string(),
            message: "Need 20 havan kits".to_string(),
        }
    }

    #[test]
    fn test_valid_form_trims_and_drops_blank_optionals() {
        let message = form().validate().unwrap();
        assert_eq!(message.name, "Priya");
        assert_eq!(message.phone, None);
        assert_eq!(message.subject.as_deref(), Some("bulk"));
    }

    #[test]
    fn test_missing_fields_in_order() {
        let mut form = form();
        form.message = "   ".to_string();
        assert_eq!(form.validate().unwrap_err(), ContactFormError::MissingMessage);

        form.email = "not-an-email".to_string();
        assert_eq!(form.validate().unwrap_err(), ContactFormError::InvalidEmail);

        form.name = String::new();
        assert_eq!(form.validate().unwrap_err(), ContactFormError::MissingName);
    }

    #[test]
    fn test_selected_subject_is_marked() {
        let template = ContactTemplate::new(PageContext::default(), form());
        let selected: Vec<_> = template
            .subjects
            .iter()
            .filter(|subject| subject.selected)
            .map(|subject| subject.value)
            .collect();
        assert_eq!(selected, vec!["bulk"]);
    }
}
