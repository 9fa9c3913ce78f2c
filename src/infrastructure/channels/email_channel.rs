//! Email delivery channel.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::RenderedNotification;
use crate::domain::errors::ChannelError;
use crate::domain::ports::{Channel, Mailer, OutgoingEmail};

/// Delivers the notification to the site owner's mailbox.
///
/// The submitter's address becomes the `Reply-To` so the owner can answer directly.
pub struct EmailChannel {
    mailer: Arc<dyn Mailer>,
    from: String,
    to: String,
}

impl EmailChannel {
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            mailer,
            from: from.into(),
            to: to.into(),
        }
    }

    fn compose(&self, notification: &RenderedNotification) -> OutgoingEmail {
        OutgoingEmail {
            from: self.from.clone(),
            to: self.to.clone(),
            reply_to: Some(notification.sender_email.clone()),
            subject: notification.subject.clone(),
            html_body: notification.html.clone(),
            plain_text_body: notification.plain_text.clone(),
        }
    }
}

#[async_trait]
impl Channel for EmailChannel {
    async fn deliver(&self, notification: &RenderedNotification) -> Result<(), ChannelError> {
        self.mailer.send(self.compose(notification)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockMailer;

    fn notification() -> RenderedNotification {
        RenderedNotification {
            sender_name: "Jane Doe".to_string(),
            sender_email: "jane.doe@example.org".to_string(),
            subject: "Project inquiry".to_string(),
            body: "Hi there".to_string(),
            html: "<p>Hi there</p>".to_string(),
            plain_text: "Hi there".to_string(),
            fallback: false,
        }
    }

    #[tokio::test]
    async fn test_deliver_addresses_owner_and_replies_to_sender() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email| {
                email.from == "noreply@example.com"
                    && email.to == "owner@example.com"
                    && email.reply_to.as_deref() == Some("jane.doe@example.org")
                    && email.subject == "Project inquiry"
                    && email.html_body == "<p>Hi there</p>"
                    && email.plain_text_body == "Hi there"
            })
            .times(1)
            .returning(|_| Ok(()));

        let channel = EmailChannel::new(Arc::new(mailer), "noreply@example.com", "owner@example.com");
        assert!(channel.deliver(&notification()).await.is_ok());
    }

    #[tokio::test]
    async fn test_deliver_propagates_transport_error() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .returning(|_| Err(ChannelError::Transport("connection refused".to_string())));

        let channel = EmailChannel::new(Arc::new(mailer), "noreply@example.com", "owner@example.com");
        let result = channel.deliver(&notification()).await;

        assert!(matches!(result, Err(ChannelError::Transport(_))));
    }
}
