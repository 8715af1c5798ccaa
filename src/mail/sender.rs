//! Approved-email sender: credential check, subject parsing, transmission.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::config::{DEFAULT_SUBJECT, MailConfig};
use crate::error::MailError;
use crate::mail::smtp::{MailCredentials, MailTransport, OutgoingEmail};

/// Outcome of one send attempt. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub success: bool,
    pub message: Option<String>,
}

impl SendResult {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Sends the final email to the configured recipient.
pub struct EmailSender {
    config: MailConfig,
    transport: Arc<dyn MailTransport>,
}

impl EmailSender {
    pub fn new(config: MailConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self { config, transport }
    }

    /// Parse `final_email` and transmit it. Failures are reported, not raised.
    pub fn send(&self, final_email: &str) -> SendResult {
        let credentials = match self.credentials() {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!(error = %e, "Not sending: mail credentials missing");
                return SendResult::failed(e.to_string());
            }
        };

        let (subject, body) = extract_subject(final_email);
        let email = OutgoingEmail {
            from: credentials.username.clone(),
            to: self.config.recipient_address.clone(),
            subject,
            body,
        };

        match self.transport.deliver(&credentials, &email) {
            Ok(()) => SendResult::sent(),
            Err(e) => {
                error!(error = %e, "Email transmission failed");
                SendResult::failed(e.to_string())
            }
        }
    }

    fn credentials(&self) -> Result<MailCredentials, MailError> {
        let missing: Vec<&str> = [
            ("SENDER_EMAIL", self.config.sender_address.is_none()),
            ("EMAIL_PASSWORD", self.config.sender_secret.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        match (&self.config.sender_address, &self.config.sender_secret) {
            (Some(username), Some(secret)) => Ok(MailCredentials {
                username: username.clone(),
                secret: secret.clone(),
            }),
            _ => Err(MailError::MissingCredentials {
                missing: missing.join(", "),
            }),
        }
    }
}

/// Split an email into (subject, body).
///
/// The first line starting with `SUBJECT:` (any case) supplies the subject;
/// every line after it is the body. Without such a line the default subject
/// is used and the whole text is the body. Both parts are trimmed.
pub fn extract_subject(content: &str) -> (String, String) {
    let lines: Vec<&str> = content.trim().lines().collect();

    for (i, line) in lines.iter().enumerate() {
        if line
            .get(..8)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("subject:"))
        {
            let subject = line[8..].trim().to_string();
            let body = lines[i + 1..].join("\n").trim().to_string();
            return (subject, body);
        }
    }

    (DEFAULT_SUBJECT.to_string(), lines.join("\n").trim().to_string())
}
