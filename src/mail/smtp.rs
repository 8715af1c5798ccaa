//! SMTP transport via lettre.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::error::MailError;

/// A fully addressed message ready for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Login for the mail relay.
#[derive(Debug, Clone)]
pub struct MailCredentials {
    pub username: String,
    pub secret: SecretString,
}

/// Something that can deliver exactly one message.
pub trait MailTransport: Send + Sync {
    fn deliver(&self, credentials: &MailCredentials, email: &OutgoingEmail)
    -> Result<(), MailError>;
}

/// Implicit-TLS SMTP relay (e.g. port 465).
pub struct SmtpMailer {
    host: String,
    port: u16,
    accept_invalid_certs: bool,
}

impl SmtpMailer {
    pub fn new(host: impl Into<String>, port: u16, accept_invalid_certs: bool) -> Self {
        Self {
            host: host.into(),
            port,
            accept_invalid_certs,
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(&config.smtp_host, config.smtp_port, config.accept_invalid_certs)
    }

    fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
        let from: Mailbox = email.from.parse().map_err(|e| MailError::InvalidAddress {
            address: email.from.clone(),
            reason: format!("{e}"),
        })?;
        let to: Mailbox = email.to.parse().map_err(|e| MailError::InvalidAddress {
            address: email.to.clone(),
            reason: format!("{e}"),
        })?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.as_str())
            .body(email.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }

    fn build_transport(&self, credentials: &MailCredentials) -> Result<SmtpTransport, MailError> {
        if self.accept_invalid_certs {
            warn!(
                host = %self.host,
                "TLS certificate verification is disabled for the mail relay"
            );
        }

        let tls = TlsParameters::builder(self.host.clone())
            .dangerous_accept_invalid_certs(self.accept_invalid_certs)
            .build_rustls()
            .map_err(|e| MailError::Transport(format!("TLS setup failed: {e}")))?;

        let creds = Credentials::new(
            credentials.username.clone(),
            credentials.secret.expose_secret().to_string(),
        );

        Ok(SmtpTransport::builder_dangerous(&self.host)
            .port(self.port)
            .tls(Tls::Wrapper(tls))
            .credentials(creds)
            .build())
    }
}

impl MailTransport for SmtpMailer {
    fn deliver(
        &self,
        credentials: &MailCredentials,
        email: &OutgoingEmail,
    ) -> Result<(), MailError> {
        let message = Self::build_message(email)?;
        let transport = self.build_transport(credentials)?;

        // One connection, one message; lettre closes it when `send` returns.
        transport
            .send(&message)
            .map_err(|e| MailError::Transport(format!("SMTP send failed: {e}")))?;

        info!(to = %email.to, host = %self.host, "Email sent");
        Ok(())
    }
}
