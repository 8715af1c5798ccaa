//! Outreach pipeline.
//!
//! Every run flows through:
//! 1. `ProfileAcquirer::acquire()`: primary source, secondary fallback
//! 2. `GenerationStages::match_topics()`: research overlaps
//! 3. `GenerationStages::compose_email()`: first draft
//! 4. `GenerationStages::review_tone()`: final email
//! 5. `ApprovalGate::decide()` then `EmailSender::send()`
//!
//! **No send path bypasses the gate.** Nothing is transmitted without an
//! explicit yes.

pub mod orchestrator;
pub mod prompts;
pub mod stages;
pub mod types;

pub use orchestrator::{Pipeline, PipelineDeps};
pub use stages::{GenerationConfig, GenerationStages, StageSettings};
pub use types::{EmailDraft, RunOutcome, RunReport, StageOutput, TokenUsage};
