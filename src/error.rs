//! Error types for Scholar Outreach.

/// Errors that stop a pipeline from being built or from finishing a run.
///
/// Acquisition faults during a run and mail faults never reach this type:
/// they are folded into the profile record and the run outcome.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },
}

/// Profile acquisition errors.
///
/// Fetch failures never escape the acquirer; they are folded into the `error`
/// field of the resulting profile record. Only building the HTTP client can
/// fail outward.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("Browser session failed: {0}")]
    Browser(String),

    #[error("Anchor element {anchor} did not appear: {reason}")]
    AnchorTimeout { anchor: String, reason: String },

    #[error("HTTP request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("Failed to parse page markup: {0}")]
    Parse(String),
}

/// Outbound mail errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail credentials not configured: {missing}")]
    MissingCredentials { missing: String },

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),
}
