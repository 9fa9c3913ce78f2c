//! reCAPTCHA v3 site-verify client.

use async_trait::async_trait;
use tracing::debug;

use super::fetch_ok;
use crate::domain::errors::OracleError;
use crate::domain::ports::{BotOracle, BotOracleResponse, BotVerifyRequest};

/// Google's site-verify endpoint.
pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Posts tokens to a reCAPTCHA-compatible site-verify endpoint.
pub struct RecaptchaOracle {
    client: reqwest::Client,
    verify_url: String,
}

impl RecaptchaOracle {
    pub fn new(client: reqwest::Client, verify_url: impl Into<String>) -> Self {
        Self {
            client,
            verify_url: verify_url.into(),
        }
    }
}

#[async_trait]
impl BotOracle for RecaptchaOracle {
    async fn site_verify(
        &self,
        request: BotVerifyRequest,
    ) -> Result<BotOracleResponse, OracleError> {
        let mut form = vec![
            ("secret", request.secret.as_str()),
            ("response", request.token.as_str()),
        ];
        if let Some(ip) = request.remote_ip.as_deref() {
            form.push(("remoteip", ip));
        }

        let body = fetch_ok(self.client.post(&self.verify_url).form(&form)).await?;
        let answer = parse_response(&body)?;

        debug!(
            success = answer.success,
            score = answer.score,
            action = %answer.action,
            "Bot oracle answered"
        );

        Ok(answer)
    }
}

fn parse_response(body: &[u8]) -> Result<BotOracleResponse, OracleError> {
    serde_json::from_slice(body).map_err(|e| OracleError::Decode(e.to_string()))
}
