//! Delivery channels and the I/O primitives they wrap.
//!
//! - [`EmailChannel`] - Builds an email from the rendered notification and hands it to a [`crate::domain::ports::Mailer`]
//! - [`WebhookChannel`] - Builds a chat embed payload and hands it to a [`crate::domain::ports::WebhookTransport`]
//! - [`SmtpMailer`] - `lettre` SMTP relay
//! - [`DiscordTransport`] - `reqwest` webhook POST

mod discord_transport;
mod email_channel;
mod smtp_mailer;
mod webhook_channel;

pub use discord_transport::DiscordTransport;
pub use email_channel::EmailChannel;
pub use smtp_mailer::{SmtpMailer, SmtpSecurity};
pub use webhook_channel::WebhookChannel;
