//! The three LLM generation stages: topic matching, composition, tone review.
//!
//! Each stage is one completion call. Output is returned verbatim; nothing
//! here parses or validates it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{RecipientConfig, SenderIdentity};
use crate::error::LlmError;
use crate::llm::costs;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};
use crate::pipeline::prompts;
use crate::pipeline::types::{StageOutput, TokenUsage};

/// Sampling settings for one stage.
#[derive(Debug, Clone, Copy)]
pub struct StageSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Per-stage settings. Composition runs hotter than the analytic stages.
#[derive(Debug, Clone, Copy)]
pub struct GenerationConfig {
    pub matcher: StageSettings,
    pub composer: StageSettings,
    pub reviewer: StageSettings,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            matcher: StageSettings {
                temperature: 0.3,
                max_tokens: 600,
            },
            composer: StageSettings {
                temperature: 0.6,
                max_tokens: 1024,
            },
            reviewer: StageSettings {
                temperature: 0.3,
                max_tokens: 1024,
            },
        }
    }
}

/// Runs the generation stages against one provider.
pub struct GenerationStages {
    llm: Arc<dyn LlmProvider>,
    config: GenerationConfig,
}

impl GenerationStages {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self::with_config(llm, GenerationConfig::default())
    }

    pub fn with_config(llm: Arc<dyn LlmProvider>, config: GenerationConfig) -> Self {
        Self { llm, config }
    }

    /// Bullet list of research overlaps between sender and recipient.
    pub async fn match_topics(
        &self,
        profile: &str,
        sender_interests: &str,
    ) -> Result<StageOutput, LlmError> {
        self.run(
            "topic_matcher",
            prompts::TOPIC_MATCHER_SYSTEM,
            prompts::topic_matcher_user(profile, sender_interests),
            self.config.matcher,
        )
        .await
    }

    /// First draft, expected to open with a `SUBJECT:` line.
    pub async fn compose_email(
        &self,
        profile: &str,
        matched_topics: &str,
        sender: &SenderIdentity,
        recipient: &RecipientConfig,
    ) -> Result<StageOutput, LlmError> {
        self.run(
            "email_composer",
            prompts::EMAIL_COMPOSER_SYSTEM,
            prompts::email_composer_user(profile, matched_topics, sender, recipient),
            self.config.composer,
        )
        .await
    }

    /// Polished final email.
    pub async fn review_tone(&self, draft: &str) -> Result<StageOutput, LlmError> {
        self.run(
            "tone_reviewer",
            prompts::TONE_REVIEWER_SYSTEM,
            prompts::tone_reviewer_user(draft),
            self.config.reviewer,
        )
        .await
    }

    async fn run(
        &self,
        stage: &str,
        system: &str,
        user: String,
        settings: StageSettings,
    ) -> Result<StageOutput, LlmError> {
        debug!(stage = stage, model = self.llm.model_name(), "Calling LLM");

        let request = CompletionRequest::new(vec![
            ChatMessage::system(system),
            ChatMessage::user(user),
        ])
        .with_temperature(settings.temperature)
        .with_max_tokens(settings.max_tokens);

        let response = self.llm.complete(request).await?;

        let usage = TokenUsage {
            input_tokens: response.input_tokens,
            output_tokens: response.output_tokens,
        };
        let cost = costs::estimate(
            self.llm.cost_per_token(),
            usage.input_tokens,
            usage.output_tokens,
        );

        info!(
            stage = stage,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Stage complete"
        );

        Ok(StageOutput {
            text: response.content,
            usage,
            cost,
        })
    }
}
