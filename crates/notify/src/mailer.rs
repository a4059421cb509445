use std::sync::Mutex;

use thiserror::Error;

use crate::message::EmailMessage;

/// Failure inside the mail transport.
///
/// Never escapes this crate: the dispatcher logs and absorbs it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("mail transport failure: {0}")]
pub struct TransportFailure(pub String);

/// Mail transport port.
///
/// Real deployments plug an SMTP-backed implementation in here; the in-tree
/// implementations cover dev and tests.
pub trait Mailer: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<(), TransportFailure>;
}

impl<M> Mailer for std::sync::Arc<M>
where
    M: Mailer + ?Sized,
{
    fn send(&self, message: &EmailMessage) -> Result<(), TransportFailure> {
        (**self).send(message)
    }
}

/// Drops messages on the floor (dev default).
#[derive(Debug, Default)]
pub struct NullMailer;

impl Mailer for NullMailer {
    fn send(&self, _message: &EmailMessage) -> Result<(), TransportFailure> {
        Ok(())
    }
}

/// Keeps every sent message in memory for assertions.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, message: &EmailMessage) -> Result<(), TransportFailure> {
        self.sent
            .lock()
            .map_err(|_| TransportFailure("recording mailer poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }
}

/// Always fails; exercises the dispatch boundary in tests.
#[derive(Debug, Default)]
pub struct FailingMailer;

impl Mailer for FailingMailer {
    fn send(&self, _message: &EmailMessage) -> Result<(), TransportFailure> {
        Err(TransportFailure("connection refused".to_string()))
    }
}
