//! Delivery outcomes.

use serde::Serialize;

use crate::domain::entities::Submission;

/// Whether a channel's failure fails the whole dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPolicy {
    Required,
    BestEffort,
}

impl ChannelPolicy {
    /// Parses `required` / `best_effort` (also `best-effort`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "required" => Some(Self::Required),
            "best_effort" | "best-effort" => Some(Self::BestEffort),
            _ => None,
        }
    }
}

/// Rendered payload handed to every channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNotification {
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub body: String,
    pub html: String,
    pub plain_text: String,
    /// True when the templated render failed and the hard-coded document was used.
    pub fallback: bool,
}

impl RenderedNotification {
    pub fn new(submission: &Submission, html: String, plain_text: String, fallback: bool) -> Self {
        Self {
            sender_name: submission.sender_name(),
            sender_email: submission.from.clone(),
            subject: submission.subject.clone(),
            body: submission.body.clone(),
            html,
            plain_text,
            fallback,
        }
    }
}

/// Result of one channel delivery attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    pub channel: String,
    pub policy: ChannelPolicy,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything that happened after the gates admitted a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchReport {
    pub outcomes: Vec<DispatchOutcome>,
    pub fallback_document: bool,
}

impl DispatchReport {
    /// A dispatch succeeds when every required channel delivered.
    ///
    /// With no required channel configured, at least one best-effort channel must
    /// have delivered.
    pub fn delivered(&self) -> bool {
        let mut required = self
            .outcomes
            .iter()
            .filter(|o| o.policy == ChannelPolicy::Required)
            .peekable();

        if required.peek().is_some() {
            required.all(|o| o.delivered)
        } else {
            self.outcomes.iter().any(|o| o.delivered)
        }
    }

    pub fn outcome(&self, channel: &str) -> Option<&DispatchOutcome> {
        self.outcomes.iter().find(|o| o.channel == channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(channel: &str, policy: ChannelPolicy, delivered: bool) -> DispatchOutcome {
        DispatchOutcome {
            channel: channel.to_string(),
            policy,
            delivered,
            error: None,
        }
    }

    #[test]
    fn test_best_effort_failure_does_not_fail_report() {
        let report = DispatchReport {
            outcomes: vec![
                outcome("email", ChannelPolicy::Required, true),
                outcome("webhook", ChannelPolicy::BestEffort, false),
            ],
            fallback_document: false,
        };
        assert!(report.delivered());
    }

    #[test]
    fn test_required_failure_fails_report() {
        let report = DispatchReport {
            outcomes: vec![
                outcome("email", ChannelPolicy::Required, false),
                outcome("webhook", ChannelPolicy::BestEffort, true),
            ],
            fallback_document: false,
        };
        assert!(!report.delivered());
    }

    #[test]
    fn test_only_best_effort_channels_need_one_success() {
        let failed = DispatchReport {
            outcomes: vec![outcome("webhook", ChannelPolicy::BestEffort, false)],
            fallback_document: false,
        };
        assert!(!failed.delivered());

        let ok = DispatchReport {
            outcomes: vec![outcome("webhook", ChannelPolicy::BestEffort, true)],
            fallback_document: false,
        };
        assert!(ok.delivered());
    }

    #[test]
    fn test_channel_policy_parse() {
        assert_eq!(ChannelPolicy::parse("required"), Some(ChannelPolicy::Required));
        assert_eq!(ChannelPolicy::parse("Best-Effort"), Some(ChannelPolicy::BestEffort));
        assert_eq!(ChannelPolicy::parse("sometimes"), None);
    }
}
