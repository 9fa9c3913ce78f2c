//! # Contact Gateway
//!
//! Backend for a portfolio contact form. A submission passes an origin check, a
//! per-client rate limit, a bot score and an address check, is rendered into a
//! branded notification and delivered over email and an optional chat webhook.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Submissions, notifications, rate limit types and port traits
//! - **Application Layer** ([`application`]) - Gates, template composition and the dispatch pipeline
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis counters, HTTP oracles, SMTP and webhook channels
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export SMTP_HOST="smtp.example.com"
//! export EMAIL_FROM="noreply@example.com"
//! export THIS_PORTFOLIO_CONTACT_EMAIL="me@example.com"
//! export REDIS_URL="redis://localhost:6379"  # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        DispatchPipeline, PipelineError, RateGate, RateLimiter, TemplateComposer, WebhookRelay,
    };
    pub use crate::domain::entities::{DispatchReport, Submission};
    pub use crate::error::AppError;
    pub use crate::routes::{ThrottleSettings, app_router};
    pub use crate::state::AppState;
}
