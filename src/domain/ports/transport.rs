//! I/O primitives wrapped by the delivery channels.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::ChannelError;

/// A fully addressed email with HTML and plain-text alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: String,
    pub plain_text_body: String,
}

/// Transmits a single email through a relay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), ChannelError>;
}

/// Posts a JSON document to the configured webhook URL.
///
/// The body is forwarded exactly as given.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post(&self, body: Bytes) -> Result<(), ChannelError>;
}
