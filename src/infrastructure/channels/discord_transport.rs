//! Webhook HTTP transport.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use tracing::warn;

use crate::domain::errors::ChannelError;
use crate::domain::ports::WebhookTransport;

/// Posts JSON bodies to a Discord-compatible webhook URL.
pub struct DiscordTransport {
    client: reqwest::Client,
    url: String,
}

impl DiscordTransport {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl WebhookTransport for DiscordTransport {
    async fn post(&self, body: Bytes) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        let status = response.status();
        if status.as_u16() >= 300 {
            warn!("Webhook target answered {}", status);
            return Err(ChannelError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}
