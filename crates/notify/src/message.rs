use serde::{Deserialize, Serialize};

/// One outbound email, ready for the transport.
///
/// `to` is the comma-joined recipient list: staff-facing notices go to the
/// whole distribution list of a section as a single multi-recipient send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl EmailMessage {
    pub fn new(
        from: impl Into<String>,
        recipients: &[String],
        subject: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: recipients.join(","),
            subject: subject.into(),
            html: html.into(),
        }
    }

    pub fn recipient_count(&self) -> usize {
        if self.to.is_empty() {
            0
        } else {
            self.to.split(',').count()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipients_are_comma_joined() {
        let msg = EmailMessage::new(
            "registrar@univ.edu",
            &["a@univ.edu".to_string(), "b@univ.edu".to_string()],
            "subject",
            "<p>body</p>",
        );
        assert_eq!(msg.to, "a@univ.edu,b@univ.edu");
        assert_eq!(msg.recipient_count(), 2);
    }

    #[test]
    fn empty_recipient_list_counts_zero() {
        let msg = EmailMessage::new("registrar@univ.edu", &[], "s", "b");
        assert_eq!(msg.recipient_count(), 0);
    }
}
