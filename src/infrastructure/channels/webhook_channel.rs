//! Chat webhook delivery channel.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::entities::RenderedNotification;
use crate::domain::errors::ChannelError;
use crate::domain::ports::{Channel, WebhookTransport};

const CONTENT: &str = "📬 New contact form submission";
const TITLE_LIMIT: usize = 256;
const DESCRIPTION_LIMIT: usize = 4096;
const FIELD_LIMIT: usize = 1024;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    embeds: Vec<Embed>,
    allowed_mentions: AllowedMentions,
}

#[derive(Debug, Serialize)]
struct Embed {
    title: String,
    description: String,
    fields: Vec<EmbedField>,
}

#[derive(Debug, Serialize)]
struct EmbedField {
    name: &'static str,
    value: String,
    inline: bool,
}

/// Suppresses `@everyone` and role pings from submitter-controlled text.
#[derive(Debug, Serialize)]
struct AllowedMentions {
    parse: [&'static str; 0],
}

/// Truncates to at most `limit` characters, marking the cut with an ellipsis.
fn truncate(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let mut out: String = value.chars().take(limit.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() { "(empty)" } else { value }
}

/// Mirrors the notification into a chat channel as a single embed.
pub struct WebhookChannel {
    transport: Arc<dyn WebhookTransport>,
}

impl WebhookChannel {
    pub fn new(transport: Arc<dyn WebhookTransport>) -> Self {
        Self { transport }
    }

    fn payload(notification: &RenderedNotification) -> Result<Bytes, ChannelError> {
        let payload = WebhookPayload {
            content: CONTENT,
            embeds: vec![Embed {
                title: truncate(or_placeholder(&notification.subject), TITLE_LIMIT),
                description: truncate(or_placeholder(&notification.body), DESCRIPTION_LIMIT),
                fields: vec![
                    EmbedField {
                        name: "From",
                        value: truncate(&notification.sender_name, FIELD_LIMIT),
                        inline: true,
                    },
                    EmbedField {
                        name: "Email",
                        value: truncate(&notification.sender_email, FIELD_LIMIT),
                        inline: true,
                    },
                ],
            }],
            allowed_mentions: AllowedMentions { parse: [] },
        };

        serde_json::to_vec(&payload)
            .map(Bytes::from)
            .map_err(|e| ChannelError::InvalidMessage(e.to_string()))
    }
}

#[async_trait]
impl Channel for WebhookChannel {
    async fn deliver(&self, notification: &RenderedNotification) -> Result<(), ChannelError> {
        let body = Self::payload(notification)?;
        self.transport.post(body).await
    }
}
