//! Errors raised by collaborators at the edge of the domain.

use thiserror::Error;

/// Failure talking to the shared counter store.
#[derive(Debug, Error)]
pub enum CounterStoreError {
    #[error("counter store unreachable: {0}")]
    Unavailable(String),
    #[error("counter store command failed: {0}")]
    Command(String),
}

/// Failure calling a remote verification oracle.
///
/// Every variant means the oracle did not give an answer. An oracle that answers
/// "invalid" is not an error.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Failure delivering a rendered notification through a channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel not configured: {0}")]
    Config(String),
    #[error("channel transport failure: {0}")]
    Transport(String),
    #[error("channel target rejected the message with status {0}")]
    Rejected(u16),
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

/// Failure composing the notification document.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("render step `{step}` failed: {message}")]
    Step { step: &'static str, message: String },
    #[error("layout requested before `{0}` was rendered")]
    MissingComponent(&'static str),
}
