//! Gates and orchestration for inbound submissions.

pub mod address_validator;
pub mod bot_verifier;
pub mod dispatch_pipeline;
pub mod rate_limiter;
pub mod template_composer;
pub mod webhook_relay;

pub use address_validator::{AddressError, AddressValidator};
pub use bot_verifier::{BotPolicy, BotScoreVerifier, BotVerdict, BotVerifyError};
pub use dispatch_pipeline::{ChannelBinding, DispatchPipeline, PipelineError};
pub use rate_limiter::{FailureMode, RateGate, RateLimiter};
pub use template_composer::{RenderMode, RenderStep, TemplateComposer, fallback_document};
pub use webhook_relay::{RelayError, WebhookRelay};
