//! Text generation for the outreach stages.
//!
//! The topic matcher, composer and tone reviewer all talk to one
//! `LlmProvider`. Two hosted backends are wired through rig-core; the
//! `RigAdapter` turns rig's `CompletionModel` into our trait and prices each
//! call from the `costs` table so a run can report what it spent.

pub mod costs;
pub mod provider;
mod rig_adapter;

pub use provider::*;
pub use rig_adapter::RigAdapter;

use std::sync::Arc;

use rig::client::CompletionClient;
use secrecy::{ExposeSecret, SecretString};

use crate::error::LlmError;

/// Hosted backend the stages are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Anthropic,
    OpenAi,
}

impl LlmBackend {
    /// Provider label used in errors and logs.
    pub fn label(self) -> &'static str {
        match self {
            LlmBackend::Anthropic => "anthropic",
            LlmBackend::OpenAi => "openai",
        }
    }
}

/// Backend, credential and model for one run.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: SecretString,
    pub model: String,
}

/// Build the provider every generation stage shares.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let label = config.backend.label();
    let client_error = |e: &dyn std::fmt::Display| LlmError::RequestFailed {
        provider: label.to_string(),
        reason: format!("could not create {label} client: {e}"),
    };

    let provider: Arc<dyn LlmProvider> = match config.backend {
        LlmBackend::Anthropic => {
            use rig::providers::anthropic;
            let client: rig::client::Client<anthropic::client::AnthropicExt> =
                anthropic::Client::new(config.api_key.expose_secret())
                    .map_err(|e| client_error(&e))?;
            Arc::new(RigAdapter::new(
                client.completion_model(&config.model),
                &config.model,
                label,
            ))
        }
        LlmBackend::OpenAi => {
            use rig::providers::openai;
            let client: rig::client::Client<openai::client::OpenAIResponsesExt> =
                openai::Client::new(config.api_key.expose_secret())
                    .map_err(|e| client_error(&e))?;
            Arc::new(RigAdapter::new(
                client.completion_model(&config.model),
                &config.model,
                label,
            ))
        }
    };

    tracing::info!(backend = label, model = %config.model, "Text generation provider ready");
    Ok(provider)
}
