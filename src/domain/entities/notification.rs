//! Layered notification document.
//!
//! A document is made of three independent components (header, footer, message slot)
//! plus site metadata. The composer renders each component on its own and a final
//! layout step stitches them together.

use chrono::{Datelike, Utc};

use crate::domain::entities::Submission;
use crate::utils::html::looks_like_markup;

const DEFAULT_APP_NAME: &str = "Portfolio";
const DEFAULT_SITE_URL: &str = "https://yourdomain.com";

/// Branding shared by every notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMetadata {
    pub app_name: String,
    pub site_url: String,
    pub year: i32,
}

impl SiteMetadata {
    /// Builds metadata, substituting defaults for blank values.
    pub fn new(app_name: &str, site_url: &str, year: i32) -> Self {
        let app_name = match app_name.trim() {
            "" => DEFAULT_APP_NAME,
            name => name,
        };
        let site_url = match site_url.trim() {
            "" => DEFAULT_SITE_URL,
            url => url,
        };
        Self {
            app_name: app_name.to_string(),
            site_url: site_url.to_string(),
            year,
        }
    }

    /// Same as [`SiteMetadata::new`] with the current calendar year.
    pub fn current(app_name: &str, site_url: &str) -> Self {
        Self::new(app_name, site_url, Utc::now().year())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub text: String,
}

/// Message body as submitted, tagged with the markup flavour it was detected as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyContent {
    Markup(String),
    Markdown(String),
}

impl BodyContent {
    /// Treats the body as markup when it contains anything tag-shaped.
    pub fn detect(raw: &str) -> Self {
        if looks_like_markup(raw) {
            Self::Markup(raw.to_string())
        } else {
            Self::Markdown(raw.to_string())
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            Self::Markup(s) | Self::Markdown(s) => s,
        }
    }
}

/// Main message content: sender block plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub content: BodyContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDocument {
    pub header: Header,
    pub footer: Footer,
    pub slot: Slot,
    pub meta: SiteMetadata,
}

impl NotificationDocument {
    pub fn for_submission(submission: &Submission, meta: &SiteMetadata) -> Self {
        Self::assemble(
            meta,
            Slot {
                sender_name: submission.sender_name(),
                sender_email: submission.from.clone(),
                subject: submission.subject.clone(),
                content: BodyContent::detect(&submission.body),
            },
        )
    }

    /// Fixed sample document used by the preview endpoint and the admin CLI.
    pub fn preview(meta: &SiteMetadata) -> Self {
        Self::assemble(
            meta,
            Slot {
                sender_name: "John Doe".to_string(),
                sender_email: "john.doe@example.com".to_string(),
                subject: "Contact Form Preview".to_string(),
                content: BodyContent::detect(
                    "This is a **preview** of the contact notification.\n\n\
                     - Markdown bodies are converted to HTML\n\
                     - HTML bodies are passed through the sanitizer",
                ),
            },
        )
    }

    fn assemble(meta: &SiteMetadata, slot: Slot) -> Self {
        Self {
            header: Header {
                url: meta.site_url.clone(),
                title: meta.app_name.clone(),
            },
            footer: Footer {
                text: format!("© {} {}. All rights reserved.", meta.year, meta.app_name),
            },
            slot,
            meta: meta.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(body: &str) -> Submission {
        Submission::new(
            "ada.lovelace@example.com".to_string(),
            "Engine".to_string(),
            body.to_string(),
            None,
            None,
        )
    }

    #[test]
    fn test_site_metadata_defaults() {
        let meta = SiteMetadata::new("  ", "", 2024);
        assert_eq!(meta.app_name, "Portfolio");
        assert_eq!(meta.site_url, "https://yourdomain.com");
        assert_eq!(meta.year, 2024);
    }

    #[test]
    fn test_document_components() {
        let meta = SiteMetadata::new("Ada Portfolio", "https://ada.dev", 2025);
        let doc = NotificationDocument::for_submission(&submission("hello"), &meta);

        assert_eq!(doc.header.url, "https://ada.dev");
        assert_eq!(doc.header.title, "Ada Portfolio");
        assert_eq!(doc.footer.text, "© 2025 Ada Portfolio. All rights reserved.");
        assert_eq!(doc.slot.sender_name, "Ada Lovelace");
        assert_eq!(doc.slot.subject, "Engine");
    }

    #[test]
    fn test_body_detection() {
        assert_eq!(
            BodyContent::detect("plain *markdown*"),
            BodyContent::Markdown("plain *markdown*".to_string())
        );
        assert_eq!(
            BodyContent::detect("<p>hi</p>"),
            BodyContent::Markup("<p>hi</p>".to_string())
        );
        assert_eq!(BodyContent::detect("a < b > c").raw(), "a < b > c");
    }
}
