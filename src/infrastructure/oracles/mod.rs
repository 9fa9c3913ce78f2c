//! HTTP clients for the remote verification oracles.
//!
//! - [`RecaptchaOracle`] - Bot-risk scoring (form POST, JSON answer)
//! - [`PrimaryEmailOracle`] - Deliverability check with query-string auth
//! - [`SecondaryEmailOracle`] - Validity check with header auth
//!
//! All clients share one `reqwest::Client` built by [`http_client`] so every call
//! is bounded by the configured upstream timeout.

mod primary_email;
mod recaptcha;
mod secondary_email;

pub use primary_email::PrimaryEmailOracle;
pub use recaptcha::{DEFAULT_VERIFY_URL, RecaptchaOracle};
pub use secondary_email::SecondaryEmailOracle;

use std::time::Duration;

use crate::domain::errors::OracleError;

/// Builds the outbound HTTP client used by oracles and the webhook transport.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("contact-gateway/", env!("CARGO_PKG_VERSION")))
        .build()
}

impl From<reqwest::Error> for OracleError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Sends a prepared request and returns the body of a 200 response.
async fn fetch_ok(request: reqwest::RequestBuilder) -> Result<bytes::Bytes, OracleError> {
    let response = request.send().await?;
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(OracleError::Status(status.as_u16()));
    }
    Ok(response.bytes().await?)
}
