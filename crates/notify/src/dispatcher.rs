use crate::mailer::Mailer;
use crate::message::EmailMessage;

/// Sender identity and link target used in every message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    /// `From:` header, e.g. `"Registrar" records@univ.edu`.
    pub from: String,
    /// Base URL embedded in notification bodies.
    pub site_url: String,
}

/// Composes and sends workflow notifications.
///
/// Fire-and-forget: a transport failure is logged and absorbed here, so it
/// can never fail the membership or workflow operation that triggered it.
pub struct NotificationDispatcher<M> {
    mailer: M,
    settings: MailSettings,
}

impl<M: Mailer> NotificationDispatcher<M> {
    pub fn new(mailer: M, settings: MailSettings) -> Self {
        Self { mailer, settings }
    }

    pub fn site_url(&self) -> &str {
        &self.settings.site_url
    }

    /// Compose and send one message; swallow any transport failure.
    ///
    /// An empty recipient list is skipped outright (a section with no staff
    /// has no distribution list).
    pub fn dispatch(&self, recipients: &[String], subject: &str, html: String) {
        if recipients.is_empty() {
            tracing::debug!(subject, "notification skipped: no recipients");
            return;
        }

        let message = EmailMessage::new(self.settings.from.clone(), recipients, subject, html);
        if let Err(err) = self.mailer.send(&message) {
            tracing::warn!(subject, to = %message.to, error = %err, "notification dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mailer::{FailingMailer, RecordingMailer};

    fn settings() -> MailSettings {
        MailSettings {
            from: "\"Registrar\" records@univ.edu".to_string(),
            site_url: "https://records.univ.edu".to_string(),
        }
    }

    #[test]
    fn dispatch_sends_one_multi_recipient_message() {
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = NotificationDispatcher::new(mailer.clone(), settings());

        dispatcher.dispatch(
            &["a@univ.edu".to_string(), "b@univ.edu".to_string()],
            "New Bonafide Applied",
            "<p>hi</p>".to_string(),
        );

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@univ.edu,b@univ.edu");
        assert_eq!(sent[0].from, settings().from);
    }

    #[test]
    fn transport_failure_is_swallowed() {
        let dispatcher = NotificationDispatcher::new(FailingMailer, settings());
        // Must not panic or propagate.
        dispatcher.dispatch(
            &["a@univ.edu".to_string()],
            "subject",
            "<p>body</p>".to_string(),
        );
    }

    #[test]
    fn empty_recipient_list_sends_nothing() {
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = NotificationDispatcher::new(mailer.clone(), settings());
        dispatcher.dispatch(&[], "subject", "<p>body</p>".to_string());
        assert!(mailer.sent().is_empty());
    }
}
