//! Application layer: the gates a submission passes and the pipeline that
//! sequences them.
//!
//! Services consume the collaborator traits from [`crate::domain::ports`] and are
//! constructed once at startup, then shared across handlers.
//!
//! # Available Services
//!
//! - [`services::RateLimiter`] / [`services::RateGate`] - Fixed-window counters per bucket and client
//! - [`services::BotScoreVerifier`] - Remote bot-score check
//! - [`services::AddressValidator`] - Mailbox grammar plus primary/secondary oracle chain
//! - [`services::TemplateComposer`] - Header, footer, slot and layout rendering
//! - [`services::DispatchPipeline`] - Gate sequencing and channel delivery
//! - [`services::WebhookRelay`] - Validated pass-through to the chat webhook

pub mod services;
