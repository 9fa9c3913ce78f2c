//! SMTP relay mailer.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, error};

use crate::domain::errors::ChannelError;
use crate::domain::ports::{Mailer, OutgoingEmail};

/// Connection security towards the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Implicit TLS (usually port 465).
    Tls,
    /// Plain connection upgraded with STARTTLS (usually port 587).
    StartTls,
    /// Unencrypted, for local capture servers only.
    None,
}

impl SmtpSecurity {
    /// Parses `tls`, `starttls` or `none`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tls" | "ssl" => Some(Self::Tls),
            "starttls" => Some(Self::StartTls),
            "none" | "plain" => Some(Self::None),
            _ => None,
        }
    }

    /// Security conventionally used on `port`.
    pub fn for_port(port: u16) -> Self {
        if port == 465 { Self::Tls } else { Self::StartTls }
    }
}

/// Sends mail through an SMTP relay with `lettre`.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Builds the relay transport. No connection is opened until the first send.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Config`] if the TLS parameters for `host` are invalid.
    pub fn new(
        host: &str,
        port: u16,
        security: SmtpSecurity,
        credentials: Option<(String, String)>,
        timeout: Duration,
    ) -> Result<Self, ChannelError> {
        let builder = match security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| ChannelError::Config(format!("SMTP relay {}: {}", host, e)))?,
            SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| ChannelError::Config(format!("SMTP relay {}: {}", host, e)))?,
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        };

        let mut builder = builder.port(port).timeout(Some(timeout));
        if let Some((user, pass)) = credentials {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

/// Converts an [`OutgoingEmail`] into a multipart/alternative message.
fn build_message(email: OutgoingEmail) -> Result<Message, ChannelError> {
    let from: Mailbox = email
        .from
        .parse()
        .map_err(|e| ChannelError::Config(format!("invalid sender address: {}", e)))?;
    let to: Mailbox = email
        .to
        .parse()
        .map_err(|e| ChannelError::Config(format!("invalid recipient address: {}", e)))?;

    let mut builder = Message::builder().from(from).to(to).subject(email.subject);

    if let Some(reply_to) = email.reply_to.as_deref() {
        match reply_to.parse::<Mailbox>() {
            Ok(mailbox) => builder = builder.reply_to(mailbox),
            Err(e) => debug!("Skipping unparseable Reply-To {}: {}", reply_to, e),
        }
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            email.plain_text_body,
            email.html_body,
        ))
        .map_err(|e| ChannelError::InvalidMessage(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), ChannelError> {
        let message = build_message(email)?;

        match self.transport.send(message).await {
            Ok(response) => {
                debug!("SMTP relay accepted message: {:?}", response.code());
                Ok(())
            }
            Err(e) => {
                error!("Failed to send email: {}", e);
                Err(ChannelError::Transport(e.to_string()))
            }
        }
    }
}
