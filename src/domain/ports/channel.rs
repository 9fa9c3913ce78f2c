//! Delivery channel trait.

use async_trait::async_trait;

use crate::domain::entities::RenderedNotification;
use crate::domain::errors::ChannelError;

/// A destination the rendered notification is delivered to.
///
/// Implementations make one attempt with a bounded timeout and report the result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Channel: Send + Sync {
    async fn deliver(&self, notification: &RenderedNotification) -> Result<(), ChannelError>;
}
