//! Bot-risk verification against a remote scoring oracle.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::errors::OracleError;
use crate::domain::ports::{BotOracle, BotVerifyRequest};

/// Why a token could not be accepted.
#[derive(Debug, Error)]
pub enum BotVerifyError {
    /// No secret configured or no token supplied. Verification is impossible.
    #[error("bot verification misconfigured: {0}")]
    Config(&'static str),
    /// The oracle could not be reached or answered garbage.
    #[error("bot oracle unavailable: {0}")]
    Transport(#[from] OracleError),
    /// The oracle answered and the answer did not pass.
    #[error("bot verification rejected: {reason}")]
    Rejected { reason: String, score: f64 },
}

/// Thresholds a verification must meet.
#[derive(Debug, Clone, PartialEq)]
pub struct BotPolicy {
    /// Required action name. Empty disables the action check.
    pub expected_action: String,
    /// Minimum score. Zero disables the score check.
    pub min_score: f64,
}

/// Result of a passed verification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotVerdict {
    pub score: f64,
}

/// Checks client tokens with a single [`BotOracle`] call. No retry, no fallback oracle.
pub struct BotScoreVerifier {
    oracle: Arc<dyn BotOracle>,
    secret: Option<String>,
}

impl BotScoreVerifier {
    pub fn new(oracle: Arc<dyn BotOracle>, secret: Option<String>) -> Self {
        let secret = secret.filter(|s| !s.trim().is_empty());
        if secret.is_none() {
            warn!("No bot verification secret configured; every submission will be rejected");
        }
        Self { oracle, secret }
    }

    /// Verifies `token` against the oracle.
    ///
    /// A pass requires the oracle's success flag, an exact action match and a score
    /// of at least `policy.min_score` (when that is above zero).
    ///
    /// # Errors
    ///
    /// - [`BotVerifyError::Config`] when no secret is configured or `token` is empty
    /// - [`BotVerifyError::Transport`] when the oracle did not answer
    /// - [`BotVerifyError::Rejected`] when the answer did not pass
    pub async fn verify(
        &self,
        token: &str,
        policy: &BotPolicy,
        client_ip: Option<&str>,
    ) -> Result<BotVerdict, BotVerifyError> {
        let secret = self
            .secret
            .as_ref()
            .ok_or(BotVerifyError::Config("verification secret is not set"))?;

        if token.trim().is_empty() {
            return Err(BotVerifyError::Config("token is empty"));
        }

        let response = self
            .oracle
            .site_verify(BotVerifyRequest {
                secret: secret.clone(),
                token: token.to_string(),
                remote_ip: client_ip.map(str::to_string),
            })
            .await?;

        let rejected = |reason: String| BotVerifyError::Rejected {
            reason,
            score: response.score,
        };

        if !response.success {
            return Err(rejected(format!(
                "oracle reported failure: {}",
                response.error_codes.join(",")
            )));
        }

        if !policy.expected_action.is_empty() && response.action != policy.expected_action {
            return Err(rejected(format!(
                "action mismatch: expected `{}`, got `{}`",
                policy.expected_action, response.action
            )));
        }

        if policy.min_score > 0.0 && response.score < policy.min_score {
            return Err(rejected(format!(
                "score {:.2} below threshold {:.2}",
                response.score, policy.min_score
            )));
        }

        info!(score = response.score, action = %response.action, "Bot verification passed");
        Ok(BotVerdict {
            score: response.score,
        })
    }
}
