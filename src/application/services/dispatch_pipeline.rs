//! Submission pipeline: rate limit, bot score, address, render, deliver.
//!
//! Gates run strictly in sequence so that the cheap rejection (rate limit)
//! short-circuits before any external call. Nothing is retried; the only
//! substitution is the address oracle fallback inside [`AddressValidator`].
//! The origin check runs before this pipeline, in the HTTP layer.

use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::services::address_validator::{AddressError, AddressValidator};
use crate::application::services::bot_verifier::{BotPolicy, BotScoreVerifier, BotVerifyError};
use crate::application::services::rate_limiter::RateGate;
use crate::application::services::template_composer::fallback_document;
use crate::domain::entities::{
    ChannelPolicy, DispatchOutcome, DispatchReport, NotificationDocument, RenderedNotification,
    SiteMetadata, Submission,
};
use crate::domain::ports::{Channel, NotificationRenderer};
use crate::utils::client_ip::UNKNOWN_CLIENT;
use crate::utils::html::to_plain_text;

/// Terminal rejection or failure of a submission.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("too many requests, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    /// Detailed reason is logged, never returned.
    #[error("bot verification failed")]
    BotSuspected,
    #[error("invalid email address format")]
    InvalidAddress,
    #[error("email address could not be verified")]
    UnverifiableAddress,
    #[error("email validation service unavailable")]
    ValidationUnavailable,
    #[error("failed to deliver message")]
    DeliveryFailed(DispatchReport),
}

/// A channel with the id used in logs and reports, and its failure policy.
pub struct ChannelBinding {
    pub id: String,
    pub policy: ChannelPolicy,
    pub channel: Arc<dyn Channel>,
}

/// Orchestrates the gates for one submission at a time. Shared across handlers.
pub struct DispatchPipeline {
    rate_gate: RateGate,
    bot_verifier: Arc<BotScoreVerifier>,
    bot_policy: BotPolicy,
    address_validator: Arc<AddressValidator>,
    renderer: Arc<dyn NotificationRenderer>,
    site: SiteMetadata,
    channels: Vec<ChannelBinding>,
}

impl DispatchPipeline {
    pub fn new(
        rate_gate: RateGate,
        bot_verifier: Arc<BotScoreVerifier>,
        bot_policy: BotPolicy,
        address_validator: Arc<AddressValidator>,
        renderer: Arc<dyn NotificationRenderer>,
        site: SiteMetadata,
    ) -> Self {
        Self {
            rate_gate,
            bot_verifier,
            bot_policy,
            address_validator,
            renderer,
            site,
            channels: Vec::new(),
        }
    }

    /// Adds a delivery channel. Channels are attempted in the order they were added.
    pub fn with_channel(
        mut self,
        id: impl Into<String>,
        policy: ChannelPolicy,
        channel: Arc<dyn Channel>,
    ) -> Self {
        self.channels.push(ChannelBinding {
            id: id.into(),
            policy,
            channel,
        });
        self
    }

    pub fn channel_ids(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.id.as_str()).collect()
    }

    /// Runs every gate for `submission` and delivers it.
    ///
    /// # Errors
    ///
    /// Returns the first gate rejection, or [`PipelineError::DeliveryFailed`] when a
    /// required channel (or, without required channels, every channel) failed.
    pub async fn submit(
        &self,
        submission: &Submission,
        client_ip: &str,
    ) -> Result<DispatchReport, PipelineError> {
        self.check_rate(client_ip).await?;
        self.dispatch(submission, client_ip).await
    }

    /// Counts one attempt for `client_ip` against the rate limit window.
    ///
    /// Callers that reject malformed input of their own run this first, so a
    /// rejected attempt still uses up the window.
    ///
    /// # Errors
    ///
    /// [`PipelineError::RateLimited`] once the window is exhausted.
    pub async fn check_rate(&self, client_ip: &str) -> Result<(), PipelineError> {
        let decision = self.rate_gate.check(client_ip).await;
        if decision.admitted {
            Ok(())
        } else {
            Err(PipelineError::RateLimited {
                retry_after_secs: decision.retry_after_secs,
            })
        }
    }

    /// Runs the gates after the rate limit, renders and delivers.
    ///
    /// # Errors
    ///
    /// Same as [`DispatchPipeline::submit`] minus [`PipelineError::RateLimited`].
    pub async fn dispatch(
        &self,
        submission: &Submission,
        client_ip: &str,
    ) -> Result<DispatchReport, PipelineError> {
        self.check_bot(submission, client_ip).await?;
        self.check_address(&submission.from).await?;

        let notification = self.render(submission);
        let report = self.deliver(&notification).await;

        if report.delivered() {
            info!(
                client_ip = %client_ip,
                fallback = report.fallback_document,
                "Submission delivered"
            );
            Ok(report)
        } else {
            error!(client_ip = %client_ip, "Submission delivery failed");
            Err(PipelineError::DeliveryFailed(report))
        }
    }

    async fn check_bot(&self, submission: &Submission, client_ip: &str) -> Result<(), PipelineError> {
        let token = submission.bot_token.as_deref().unwrap_or_default();
        let remote_ip = (client_ip != UNKNOWN_CLIENT).then_some(client_ip);

        match self.bot_verifier.verify(token, &self.bot_policy, remote_ip).await {
            Ok(verdict) => {
                info!(client_ip = %client_ip, score = verdict.score, "Bot gate passed");
                Ok(())
            }
            Err(BotVerifyError::Rejected { reason, score }) => {
                warn!(client_ip = %client_ip, score, "Bot gate rejected: {}", reason);
                Err(PipelineError::BotSuspected)
            }
            Err(e) => {
                error!(client_ip = %client_ip, "Bot gate could not verify: {}", e);
                Err(PipelineError::BotSuspected)
            }
        }
    }

    async fn check_address(&self, address: &str) -> Result<(), PipelineError> {
        match self.address_validator.validate(address).await {
            Ok(verdict) if verdict.valid => Ok(()),
            Ok(verdict) => {
                warn!(
                    oracle = %verdict.oracle,
                    reason = verdict.reason.map(|r| r.as_str()).unwrap_or("unknown"),
                    "Address gate rejected"
                );
                Err(PipelineError::UnverifiableAddress)
            }
            Err(AddressError::InvalidFormat) => {
                info!("Address gate rejected malformed address");
                Err(PipelineError::InvalidAddress)
            }
            Err(AddressError::ValidationUnavailable) => {
                error!("Address gate could not reach any oracle");
                Err(PipelineError::ValidationUnavailable)
            }
        }
    }

    /// Renders the notification. Render failure degrades to the fallback document.
    fn render(&self, submission: &Submission) -> RenderedNotification {
        let site = SiteMetadata::current(&self.site.app_name, &self.site.site_url);
        let document = NotificationDocument::for_submission(submission, &site);

        let (html, fallback) = match self.renderer.render(&document) {
            Ok(html) => (html, false),
            Err(e) => {
                warn!("Template render failed, using fallback document: {}", e);
                (fallback_document(&document), true)
            }
        };

        let plain_text = to_plain_text(&html);
        RenderedNotification::new(submission, html, plain_text, fallback)
    }

    async fn deliver(&self, notification: &RenderedNotification) -> DispatchReport {
        let mut outcomes = Vec::with_capacity(self.channels.len());

        for binding in &self.channels {
            let outcome = match binding.channel.deliver(notification).await {
                Ok(()) => {
                    info!(channel = %binding.id, delivered = true, "Channel delivered");
                    DispatchOutcome {
                        channel: binding.id.clone(),
                        policy: binding.policy,
                        delivered: true,
                        error: None,
                    }
                }
                Err(e) => {
                    match binding.policy {
                        ChannelPolicy::Required => {
                            error!(channel = %binding.id, delivered = false, "Required channel failed: {}", e)
                        }
                        ChannelPolicy::BestEffort => {
                            warn!(channel = %binding.id, delivered = false, "Best-effort channel failed: {}", e)
                        }
                    }
                    DispatchOutcome {
                        channel: binding.id.clone(),
                        policy: binding.policy,
                        delivered: false,
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        DispatchReport {
            outcomes,
            fallback_document: notification.fallback,
        }
    }
}
