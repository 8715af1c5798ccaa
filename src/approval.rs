//! Approval gate: no email leaves without an explicit "yes".
//!
//! `AwaitingDecision -> {Approved, Rejected}`. Unrecognised input re-prompts
//! without changing state; there is no timeout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Terminal outcome of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

/// Gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    AwaitingDecision,
    Decided(ApprovalDecision),
}

/// Where approval answers come from (console in production, scripts in tests).
#[async_trait]
pub trait ApprovalSource: Send {
    /// Show the final email and the yes/no question.
    async fn present(&mut self, email: &str);

    /// Next line of input, or `None` once input is closed.
    async fn read_response(&mut self) -> Option<String>;

    /// Tell the human `input` was not understood.
    async fn reprompt(&mut self, input: &str);
}

/// Map one input line to a decision, if it is one.
pub fn parse_choice(input: &str) -> Option<ApprovalDecision> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(ApprovalDecision::Approved),
        "n" | "no" => Some(ApprovalDecision::Rejected),
        _ => None,
    }
}

/// The human-confirmation checkpoint between draft and transmission.
#[derive(Debug)]
pub struct ApprovalGate {
    state: GateState,
    reprompts: usize,
}

impl ApprovalGate {
    pub fn new() -> Self {
        Self {
            state: GateState::AwaitingDecision,
            reprompts: 0,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// How many inputs were rejected as invalid.
    pub fn reprompts(&self) -> usize {
        self.reprompts
    }

    /// Apply one input line. Once decided, further input is ignored.
    pub fn submit(&mut self, input: &str) -> GateState {
        if self.state == GateState::AwaitingDecision {
            match parse_choice(input) {
                Some(decision) => self.state = GateState::Decided(decision),
                None => self.reprompts += 1,
            }
        }
        self.state
    }

    /// Present `email` and block until the human decides.
    ///
    /// Closed input counts as a rejection: nothing is sent without a "yes".
    pub async fn decide(
        &mut self,
        source: &mut dyn ApprovalSource,
        email: &str,
    ) -> ApprovalDecision {
        source.present(email).await;

        loop {
            if let GateState::Decided(decision) = self.state {
                info!(?decision, reprompts = self.reprompts, "Approval decided");
                return decision;
            }

            let Some(input) = source.read_response().await else {
                warn!("Approval input closed before a decision; treating as rejection");
                self.state = GateState::Decided(ApprovalDecision::Rejected);
                continue;
            };

            if self.submit(&input) == GateState::AwaitingDecision {
                source.reprompt(&input).await;
            }
        }
    }
}

impl Default for ApprovalGate {
    fn default() -> Self {
        Self::new()
    }
}
