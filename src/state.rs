//! Shared application state.

use std::sync::Arc;

use crate::application::services::{DispatchPipeline, RateLimiter, TemplateComposer, WebhookRelay};
use crate::config::CorsConfig;
use crate::domain::entities::SiteMetadata;

/// Services and settings shared by every handler.
///
/// Built once at startup by [`crate::server::build_state`]; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DispatchPipeline>,
    pub relay: Arc<WebhookRelay>,
    /// Unsanitized renderer for the fixed preview sample.
    pub preview_renderer: Arc<TemplateComposer>,
    pub rate_limiter: Arc<RateLimiter>,
    pub cors: Arc<CorsConfig>,
    pub site: SiteMetadata,
    pub behind_proxy: bool,
    pub debug: bool,
}
