//! Pass-through relay for caller-built webhook payloads.

use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::services::rate_limiter::RateGate;
use crate::domain::errors::ChannelError;
use crate::domain::ports::WebhookTransport;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid or missing API key")]
    Unauthorized,
    #[error("too many requests, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("webhook payload is empty")]
    EmptyPayload,
    #[error("webhook payload is not a JSON object: {0}")]
    Malformed(String),
    #[error("webhook payload needs a non-empty `content` or `embeds`")]
    MissingContent,
    #[error("webhook relay is not configured")]
    NotConfigured,
    #[error("webhook delivery failed: {0}")]
    Delivery(#[from] ChannelError),
}

/// Forwards opaque JSON payloads byte-for-byte to the configured webhook.
///
/// Vacuous payloads are rejected before any network call.
pub struct WebhookRelay {
    rate_gate: RateGate,
    transport: Option<Arc<dyn WebhookTransport>>,
    api_key: Option<String>,
}

fn keys_match(expected: &str, presented: &str) -> bool {
    bool::from(expected.as_bytes().ct_eq(presented.as_bytes()))
}

fn non_empty(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        _ => false,
    }
}

impl WebhookRelay {
    pub fn new(
        rate_gate: RateGate,
        transport: Option<Arc<dyn WebhookTransport>>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            rate_gate,
            transport,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    pub fn requires_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Checks that `body` is a JSON object with a non-empty `content` string or a
    /// non-empty `embeds` array.
    pub fn validate_payload(body: &[u8]) -> Result<(), RelayError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(RelayError::EmptyPayload);
        }

        let value: Value =
            serde_json::from_slice(body).map_err(|e| RelayError::Malformed(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| RelayError::Malformed("expected an object".to_string()))?;

        if object.is_empty() {
            return Err(RelayError::EmptyPayload);
        }

        if non_empty(object.get("content")) || non_empty(object.get("embeds")) {
            Ok(())
        } else {
            Err(RelayError::MissingContent)
        }
    }

    /// Authenticates, rate-limits, validates and forwards `body`.
    ///
    /// # Errors
    ///
    /// See [`RelayError`]. Every variant except [`RelayError::Delivery`] is raised
    /// before the webhook target is contacted.
    pub async fn relay(
        &self,
        body: Bytes,
        presented_key: Option<&str>,
        client_ip: &str,
    ) -> Result<(), RelayError> {
        if let Some(expected) = &self.api_key {
            let authorized = presented_key.is_some_and(|k| keys_match(expected, k));
            if !authorized {
                warn!(client_ip = %client_ip, "Webhook relay rejected API key");
                return Err(RelayError::Unauthorized);
            }
        }

        let decision = self.rate_gate.check(client_ip).await;
        if !decision.admitted {
            return Err(RelayError::RateLimited {
                retry_after_secs: decision.retry_after_secs,
            });
        }

        Self::validate_payload(&body)?;

        let transport = self.transport.as_ref().ok_or(RelayError::NotConfigured)?;
        transport.post(body).await?;

        info!(client_ip = %client_ip, channel = "webhook", delivered = true, "Webhook relayed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::rate_limiter::{FailureMode, RateLimiter};
    use crate::domain::entities::RateLimitPolicy;
    use crate::domain::ports::MockWebhookTransport;
    use crate::infrastructure::counter::MemoryCounterStore;

    fn gate(limit: i64) -> RateGate {
        RateGate::new(
            Arc::new(RateLimiter::new(Arc::new(MemoryCounterStore::new()))),
            "webhook",
            RateLimitPolicy::new(limit, 60),
            FailureMode::Closed,
        )
    }

    fn relay(transport: MockWebhookTransport, api_key: Option<&str>) -> WebhookRelay {
        WebhookRelay::new(gate(10), Some(Arc::new(transport)), api_key.map(str::to_string))
    }

    #[tokio::test]
    async fn test_empty_object_rejected_without_network_call() {
        let mut transport = MockWebhookTransport::new();
        transport.expect_post().never();

        let result = relay(transport, None)
            .relay(Bytes::from_static(b"{}"), None, "203.0.113.7")
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, RelayError::EmptyPayload));
        assert!(err.to_string().contains("empty"));
    }

    #[tokio::test]
    async fn test_payload_forwarded_byte_for_byte() {
        let body = Bytes::from_static(br#"{"content":"hi",  "custom":{"kept":true}}"#);
        let expected = body.clone();

        let mut transport = MockWebhookTransport::new();
        transport
            .expect_post()
            .withf(move |b| *b == expected)
            .times(1)
            .returning(|_| Ok(()));

        assert!(relay(transport, None).relay(body, None, "203.0.113.7").await.is_ok());
    }

    #[tokio::test]
    async fn test_api_key_required_when_configured() {
        let mut transport = MockWebhookTransport::new();
        transport.expect_post().times(1).returning(|_| Ok(()));
        let relay = relay(transport, Some("s3cret"));

        let body = || Bytes::from_static(br#"{"content":"hi"}"#);
        assert!(matches!(
            relay.relay(body(), None, "203.0.113.7").await,
            Err(RelayError::Unauthorized)
        ));
        assert!(matches!(
            relay.relay(body(), Some("wrong"), "203.0.113.7").await,
            Err(RelayError::Unauthorized)
        ));
        assert!(relay.relay(body(), Some("s3cret"), "203.0.113.7").await.is_ok());
    }

    #[tokio::test]
    async fn test_rate_limit_applies_before_forwarding() {
        let mut transport = MockWebhookTransport::new();
        transport.expect_post().times(1).returning(|_| Ok(()));
        let relay = WebhookRelay::new(gate(1), Some(Arc::new(transport)), None);

        let body = || Bytes::from_static(br#"{"content":"hi"}"#);
        assert!(relay.relay(body(), None, "203.0.113.7").await.is_ok());
        assert!(matches!(
            relay.relay(body(), None, "203.0.113.7").await,
            Err(RelayError::RateLimited { .. })
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_relay() {
        let relay = WebhookRelay::new(gate(10), None, None);
        let result = relay
            .relay(Bytes::from_static(br#"{"content":"hi"}"#), None, "203.0.113.7")
            .await;
        assert!(matches!(result, Err(RelayError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_target_rejection_is_delivery_error() {
        let mut transport = MockWebhookTransport::new();
        transport
            .expect_post()
            .returning(|_| Err(ChannelError::Rejected(400)));

        let result = relay(transport, None)
            .relay(Bytes::from_static(br#"{"content":"hi"}"#), None, "203.0.113.7")
            .await;
        assert!(matches!(result, Err(RelayError::Delivery(ChannelError::Rejected(400)))));
    }

    #[test]
    fn test_validate_payload() {
        assert!(matches!(WebhookRelay::validate_payload(b""), Err(RelayError::EmptyPayload)));
        assert!(matches!(WebhookRelay::validate_payload(b"  \n"), Err(RelayError::EmptyPayload)));
        assert!(matches!(WebhookRelay::validate_payload(b"[1]"), Err(RelayError::Malformed(_))));
        assert!(matches!(WebhookRelay::validate_payload(b"{not json"), Err(RelayError::Malformed(_))));
        assert!(matches!(
            WebhookRelay::validate_payload(br#"{"content":"  ","embeds":[]}"#),
            Err(RelayError::MissingContent)
        ));
        assert!(matches!(
            WebhookRelay::validate_payload(br#"{"username":"bot"}"#),
            Err(RelayError::MissingContent)
        ));
        assert!(WebhookRelay::validate_payload(br#"{"embeds":[{"title":"x"}]}"#).is_ok());
        assert!(WebhookRelay::validate_payload(br#"{"content":"hello"}"#).is_ok());
    }

    #[test]
    fn test_keys_match() {
        assert!(keys_match("abc", "abc"));
        assert!(!keys_match("abc", "abd"));
        assert!(!keys_match("abc", "ab"));
        assert!(!keys_match("abc", "abcd"));
        assert!(!keys_match("abc", ""));
    }
}
