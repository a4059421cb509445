//! `registrar-notify` — email notification side effects.
//!
//! Pure side-effect component: composing a message and handing it to the
//! mail transport. Transport failures are logged and swallowed at this
//! boundary; they never propagate into the operation that triggered the
//! notification.

pub mod dispatcher;
pub mod mailer;
pub mod message;
pub mod templates;

pub use dispatcher::{MailSettings, NotificationDispatcher};
pub use mailer::{FailingMailer, Mailer, NullMailer, RecordingMailer, TransportFailure};
pub use message::EmailMessage;
