//! Outbound mail: subject parsing and SMTP transmission.

pub mod sender;
pub mod smtp;

pub use sender::{EmailSender, SendResult, extract_subject};
pub use smtp::{MailCredentials, MailTransport, OutgoingEmail, SmtpMailer};
