//! Notification rendering trait.

use crate::domain::entities::NotificationDocument;
use crate::domain::errors::TemplateError;

/// Turns a [`NotificationDocument`] into a complete markup document.
///
/// Either the whole document renders or an error is returned; partial output
/// is never produced.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationRenderer: Send + Sync {
    fn render(&self, document: &NotificationDocument) -> Result<String, TemplateError>;
}
