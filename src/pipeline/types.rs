//! Types flowing between pipeline stages.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mail::extract_subject;

/// Token usage from one or more LLM calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }

    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
    }
}

/// Text returned by a generation stage, verbatim, plus what it cost.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    pub text: String,
    pub usage: TokenUsage,
    pub cost: Decimal,
}

/// An email draft: free text carrying a `SUBJECT:` line and a body.
///
/// Each stage produces a new draft rather than editing the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub text: String,
}

impl EmailDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn subject(&self) -> String {
        extract_subject(&self.text).0
    }

    pub fn body(&self) -> String {
        extract_subject(&self.text).1
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Approved and accepted by the mail relay.
    Sent,
    /// Approved but not delivered (missing credentials or transport fault).
    NotSent { reason: String },
    /// Rejected at the approval gate.
    Cancelled,
}

/// Summary of one pipeline execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub outcome: RunOutcome,
    pub final_email: EmailDraft,
    pub usage: TokenUsage,
    pub estimated_cost: Decimal,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
