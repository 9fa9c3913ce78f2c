//! Bot-risk scoring oracle trait.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::errors::OracleError;

/// Form fields posted to the oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct BotVerifyRequest {
    pub secret: String,
    pub token: String,
    pub remote_ip: Option<String>,
}

/// Oracle answer. Missing fields decode to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BotOracleResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

/// Remote oracle that scores how likely a client token belongs to a human.
///
/// Called exactly once per verification, never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BotOracle: Send + Sync {
    async fn site_verify(&self, request: BotVerifyRequest)
    -> Result<BotOracleResponse, OracleError>;
}
