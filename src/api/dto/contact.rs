//! DTO for the contact form endpoint.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::Submission;

/// Contact form submission.
///
/// The address format is not checked here; the address gate owns that decision.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    pub from: String,

    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: String,

    #[validate(length(min = 1, max = 10000, message = "Body must be 1-10000 characters"))]
    pub body: String,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default, rename = "recaptchaToken")]
    pub recaptcha_token: Option<String>,
}

impl From<ContactRequest> for Submission {
    fn from(req: ContactRequest) -> Self {
        Submission::new(
            req.from.trim().to_string(),
            req.subject.trim().to_string(),
            req.body,
            req.name.map(|n| n.trim().to_string()),
            req.recaptcha_token,
        )
    }
}
