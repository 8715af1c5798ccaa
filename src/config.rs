//! Configuration types.
//!
//! Everything the run needs is resolved once at startup into an [`AppConfig`]
//! and passed by reference to each component.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};

/// Subject used when the final email carries no `SUBJECT:` line.
pub const DEFAULT_SUBJECT: &str = "PhD Interest - Prospective Student";

/// Default model per backend.
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";

/// Who is sending the email. Fixed for the whole run.
#[derive(Debug, Clone, Default)]
pub struct SenderIdentity {
    pub name: String,
    pub program: String,
    pub interests: String,
    pub contact: String,
    /// Optional social-profile link (e.g. LinkedIn).
    pub profile_link: Option<String>,
}

/// Who the email is addressed to and where their profile lives.
#[derive(Debug, Clone)]
pub struct RecipientConfig {
    pub name: String,
    pub institution: String,
    pub email: String,
    /// Browser-rendered academic profile (primary source).
    pub primary_url: String,
    /// Static institutional page (secondary source).
    pub secondary_url: String,
    /// Label used for the secondary-source section of the composed profile.
    pub secondary_label: String,
}

/// Outbound mail settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender_address: Option<String>,
    pub sender_secret: Option<SecretString>,
    pub recipient_address: String,
    /// Skip TLS certificate verification on the relay connection.
    pub accept_invalid_certs: bool,
}

/// Browser family driven over WebDriver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Edge,
}

impl BrowserKind {
    /// Capability key holding the browser's launch options.
    pub fn options_key(self) -> &'static str {
        match self {
            Self::Chrome => "goog:chromeOptions",
            Self::Edge => "ms:edgeOptions",
        }
    }

    /// W3C `browserName` capability.
    pub fn browser_name(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Edge => "MicrosoftEdge",
        }
    }
}

/// Headless browser session settings for the primary source.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub kind: BrowserKind,
    /// Upper bound on waiting for the profile anchor element.
    pub anchor_wait: Duration,
    /// Fixed delay after the anchor appears, for late client-side rendering.
    pub settle_delay: Duration,
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            kind: BrowserKind::Chrome,
            anchor_wait: Duration::from_secs(10),
            settle_delay: Duration::from_secs(3),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub sender: SenderIdentity,
    pub recipient: RecipientConfig,
    pub mail: MailConfig,
    pub browser: BrowserConfig,
    /// Directory for rolling log files. Logs go to stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Build config from the process environment (after `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal; real env vars still apply.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str, hint: &str| {
            get(key).ok_or_else(|| ConfigError::MissingRequired {
                key: key.to_string(),
                hint: hint.to_string(),
            })
        };

        let backend = match get("OUTREACH_LLM_BACKEND").as_deref() {
            None => LlmBackend::OpenAi,
            Some(raw) => parse_backend(raw)?,
        };
        let (key_var, default_model) = match backend {
            LlmBackend::OpenAi => ("OPENAI_API_KEY", DEFAULT_OPENAI_MODEL),
            LlmBackend::Anthropic => ("ANTHROPIC_API_KEY", DEFAULT_ANTHROPIC_MODEL),
        };
        let api_key = require(key_var, "Set the API key for the selected LLM backend.")?;
        let llm = LlmConfig {
            backend,
            api_key: SecretString::from(api_key),
            model: get("OUTREACH_MODEL").unwrap_or_else(|| default_model.to_string()),
        };

        let sender = SenderIdentity {
            name: require("SENDER_NAME", "The email is signed with this name.")?,
            program: get("SENDER_PROGRAM").unwrap_or_default(),
            interests: get("SENDER_INTERESTS").unwrap_or_default(),
            contact: get("SENDER_CONTACT").unwrap_or_default(),
            profile_link: get("SENDER_PROFILE_LINK"),
        };

        let recipient_email = require("RECEIVER_EMAIL", "Address the approved email is sent to.")?;
        let recipient = RecipientConfig {
            name: require("RECIPIENT_NAME", "Shown in the profile header and the email.")?,
            institution: get("RECIPIENT_INSTITUTION").unwrap_or_default(),
            email: recipient_email.clone(),
            primary_url: require("SCHOLAR_URL", "Academic profile page to scrape.")?,
            secondary_url: require("FACULTY_URL", "Fallback faculty page.")?,
            secondary_label: get("SECONDARY_SOURCE_LABEL")
                .unwrap_or_else(|| "SMU website".to_string()),
        };

        let mail = MailConfig {
            smtp_host: get("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            smtp_port: match get("SMTP_PORT") {
                Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                    key: "SMTP_PORT".to_string(),
                    message: format!("{raw:?} is not a port number: {e}"),
                })?,
                None => 465,
            },
            sender_address: get("SENDER_EMAIL"),
            sender_secret: get("EMAIL_PASSWORD").map(SecretString::from),
            recipient_address: recipient_email,
            accept_invalid_certs: match get("SMTP_ACCEPT_INVALID_CERTS") {
                Some(raw) => parse_flag("SMTP_ACCEPT_INVALID_CERTS", &raw)?,
                None => false,
            },
        };

        let mut browser = BrowserConfig::default();
        if let Some(url) = get("WEBDRIVER_URL") {
            browser.webdriver_url = url;
        }
        if let Some(raw) = get("OUTREACH_BROWSER") {
            browser.kind = match raw.to_ascii_lowercase().as_str() {
                "chrome" => BrowserKind::Chrome,
                "edge" => BrowserKind::Edge,
                other => {
                    return Err(ConfigError::InvalidValue {
                        key: "OUTREACH_BROWSER".to_string(),
                        message: format!("unknown browser {other:?} (expected chrome or edge)"),
                    });
                }
            };
        }

        Ok(Self {
            llm,
            sender,
            recipient,
            mail,
            browser,
            log_dir: get("OUTREACH_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn parse_backend(raw: &str) -> Result<LlmBackend, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "openai" => Ok(LlmBackend::OpenAi),
        "anthropic" => Ok(LlmBackend::Anthropic),
        other => Err(ConfigError::InvalidValue {
            key: "OUTREACH_LLM_BACKEND".to_string(),
            message: format!("unknown backend {other:?} (expected openai or anthropic)"),
        }),
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{other:?} is not a boolean"),
        }),
    }
}
