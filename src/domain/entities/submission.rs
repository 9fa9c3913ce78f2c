//! Inbound contact form submission.

use crate::utils::display_name::display_name_from_address;

/// A single contact form message as received from the caller.
///
/// Immutable once built; the pipeline only borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub from: String,
    pub subject: String,
    pub body: String,
    pub display_name: Option<String>,
    pub bot_token: Option<String>,
}

impl Submission {
    pub fn new(
        from: String,
        subject: String,
        body: String,
        display_name: Option<String>,
        bot_token: Option<String>,
    ) -> Self {
        Self {
            from,
            subject,
            body,
            display_name: display_name.filter(|n| !n.trim().is_empty()),
            bot_token: bot_token.filter(|t| !t.is_empty()),
        }
    }

    /// Name shown in the notification.
    ///
    /// Falls back to a name derived from the local part of the sender address.
    pub fn sender_name(&self) -> String {
        match &self.display_name {
            Some(name) => name.trim().to_string(),
            None => display_name_from_address(&self.from),
        }
    }
}
