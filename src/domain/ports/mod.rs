//! Collaborator contracts consumed by the gates.
//!
//! Each trait abstracts one external dependency so the application services can be
//! exercised without Redis, HTTP or SMTP. Implementations live in
//! `crate::infrastructure`; mocks are generated with `mockall` under `cfg(test)`.
//!
//! # Available Ports
//!
//! - [`CounterStore`] - Atomic, TTL-capable counters backing the rate limiter
//! - [`BotOracle`] - Remote bot-risk scoring
//! - [`PrimaryAddressOracle`] / [`SecondaryAddressOracle`] - Address deliverability checks
//! - [`Channel`] - A delivery target for rendered notifications
//! - [`Mailer`] / [`WebhookTransport`] - SMTP and webhook I/O primitives
//! - [`NotificationRenderer`] - Turns a document into final markup

pub mod address_oracle;
pub mod bot_oracle;
pub mod channel;
pub mod counter_store;
pub mod renderer;
pub mod transport;

pub use address_oracle::{PrimaryAddressOracle, SecondaryAddressOracle};
pub use bot_oracle::{BotOracle, BotOracleResponse, BotVerifyRequest};
pub use channel::Channel;
pub use counter_store::CounterStore;
pub use renderer::NotificationRenderer;
pub use transport::{Mailer, OutgoingEmail, WebhookTransport};

#[cfg(test)]
pub use address_oracle::{MockPrimaryAddressOracle, MockSecondaryAddressOracle};
#[cfg(test)]
pub use bot_oracle::MockBotOracle;
#[cfg(test)]
pub use channel::MockChannel;
#[cfg(test)]
pub use counter_store::MockCounterStore;
#[cfg(test)]
pub use renderer::MockNotificationRenderer;
#[cfg(test)]
pub use transport::{MockMailer, MockWebhookTransport};
