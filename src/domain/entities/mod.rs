//! Request-scoped value objects flowing through the dispatch pipeline.
//!
//! # Entity Types
//!
//! - [`Submission`] - An inbound contact form message
//! - [`RateLimitKey`] / [`RateLimitPolicy`] - Limiter bookkeeping for one bucket and client
//! - [`ValidationVerdict`] / [`AddressOracleResult`] - Address verification results
//! - [`NotificationDocument`] - The layered document handed to the template composer
//! - [`DispatchOutcome`] / [`DispatchReport`] - Per-channel delivery results
//!
//! None of these are persisted; they are created and dropped within one pipeline run.

pub mod dispatch;
pub mod notification;
pub mod rate_limit;
pub mod submission;
pub mod verdict;

pub use dispatch::{ChannelPolicy, DispatchOutcome, DispatchReport, RenderedNotification};
pub use notification::{BodyContent, Footer, Header, NotificationDocument, SiteMetadata, Slot};
pub use rate_limit::{RateDecision, RateLimitKey, RateLimitPolicy};
pub use submission::Submission;
pub use verdict::{
    AddressOracleResult, AddressRejection, OracleSource, PrimaryReport, SecondaryReport,
    ValidationVerdict,
};
