//! Sequential pipeline: acquire, match, compose, review, approve, send.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::approval::{ApprovalDecision, ApprovalGate, ApprovalSource};
use crate::config::{AppConfig, RecipientConfig, SenderIdentity};
use crate::console::{Narrator, StatusUpdate};
use crate::error::Error;
use crate::llm::create_provider;
use crate::mail::{EmailSender, SmtpMailer};
use crate::pipeline::stages::GenerationStages;
use crate::pipeline::types::{EmailDraft, RunOutcome, RunReport, TokenUsage};
use crate::profile::{HttpPageFetcher, ProfileAcquirer, ProfileSource, WebDriverFetcher};

const TOTAL_STEPS: usize = 5;

/// Collaborators the pipeline drives.
pub struct PipelineDeps {
    pub acquirer: ProfileAcquirer,
    pub stages: GenerationStages,
    pub mailer: EmailSender,
    pub narrator: Arc<dyn Narrator>,
}

/// One outreach run for one sender and one recipient.
pub struct Pipeline {
    sender: SenderIdentity,
    recipient: RecipientConfig,
    deps: PipelineDeps,
}

impl Pipeline {
    pub fn new(sender: SenderIdentity, recipient: RecipientConfig, deps: PipelineDeps) -> Self {
        Self {
            sender,
            recipient,
            deps,
        }
    }

    /// Production wiring: rig-backed LLM, WebDriver primary source, HTTP
    /// secondary source, SMTP mailer.
    pub fn from_config(config: &AppConfig, narrator: Arc<dyn Narrator>) -> Result<Self, Error> {
        let acquirer = ProfileAcquirer::new(
            Arc::new(WebDriverFetcher::new(config.browser.clone())),
            Arc::new(HttpPageFetcher::new()?),
            config.recipient.secondary_url.clone(),
        );
        let mailer = EmailSender::new(
            config.mail.clone(),
            Arc::new(SmtpMailer::from_config(&config.mail)),
        );

        Ok(Self::new(
            config.sender.clone(),
            config.recipient.clone(),
            PipelineDeps {
                acquirer,
                stages: GenerationStages::new(create_provider(&config.llm)?),
                mailer,
                narrator,
            },
        ))
    }

    /// Run every step once, in order.
    ///
    /// A generation failure aborts the run before approval. Acquisition and
    /// send failures do not: they are recorded and the run continues.
    pub async fn run(&self, approval: &mut dyn ApprovalSource) -> Result<RunReport, Error> {
        let run_id = Uuid::new_v4();
        let span = info_span!("outreach_run", %run_id);
        self.run_inner(run_id, approval).instrument(span).await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        approval: &mut dyn ApprovalSource,
    ) -> Result<RunReport, Error> {
        let started_at = Utc::now();
        let narrator = self.deps.narrator.as_ref();
        let mut usage = TokenUsage::default();
        let mut cost = Decimal::ZERO;

        info!(recipient = %self.recipient.name, "Starting outreach run");
        narrator.status(StatusUpdate::Info(format!(
            "Sender: {} ({})",
            self.sender.name, self.sender.program
        )));
        narrator.status(StatusUpdate::Info(format!(
            "Recipient: Professor {} <{}>",
            self.recipient.name, self.recipient.email
        )));

        // Step 1: profile
        self.step(1, "Researching professor profile");
        let record = self.deps.acquirer.acquire(&self.recipient.primary_url).await;
        match record.source {
            ProfileSource::Primary => narrator.status(StatusUpdate::Success(format!(
                "Profile loaded: {} interests, {} publications",
                record.interests.as_ref().map_or(0, Vec::len),
                record.publications.as_ref().map_or(0, Vec::len),
            ))),
            ProfileSource::Secondary => {
                narrator.status(StatusUpdate::Warning(format!(
                    "Scholar data unavailable, using {}",
                    self.recipient.secondary_label
                )));
                if record.raw_content.is_some() {
                    narrator.status(StatusUpdate::Success("Fallback profile loaded".into()));
                }
            }
        }
        if let Some(error) = &record.error {
            narrator.status(StatusUpdate::Info(format!("Acquisition notes: {error}")));
        }
        let profile = record.compose(&self.recipient);

        // Step 2: topic matching
        self.step(2, "Matching research topics");
        let topics = self
            .deps
            .stages
            .match_topics(&profile, &self.sender.interests)
            .await?;
        usage.add(topics.usage);
        cost += topics.cost;
        narrator.status(StatusUpdate::Success("Research overlaps found:".into()));
        narrator.status(StatusUpdate::Block(topics.text.clone()));

        // Step 3: first draft
        self.step(3, "Composing email draft");
        let draft = self
            .deps
            .stages
            .compose_email(&profile, &topics.text, &self.sender, &self.recipient)
            .await?;
        usage.add(draft.usage);
        cost += draft.cost;
        narrator.status(StatusUpdate::Success("Draft written".into()));

        // Step 4: tone review
        self.step(4, "Reviewing tone");
        let reviewed = self.deps.stages.review_tone(&draft.text).await?;
        usage.add(reviewed.usage);
        cost += reviewed.cost;
        narrator.status(StatusUpdate::Success("Tone reviewed".into()));
        let final_email = EmailDraft::new(reviewed.text);

        // Step 5: approval, then send
        self.step(5, "Awaiting your approval");
        let mut gate = ApprovalGate::new();
        let outcome = match gate.decide(approval, &final_email.text).await {
            ApprovalDecision::Approved => {
                narrator.status(StatusUpdate::Info(format!(
                    "Sending to {}",
                    self.recipient.email
                )));
                let result = self.deps.mailer.send(&final_email.text);
                if result.success {
                    narrator.status(StatusUpdate::Success(format!(
                        "Email sent to {}",
                        self.recipient.email
                    )));
                    RunOutcome::Sent
                } else {
                    let reason = result
                        .message
                        .unwrap_or_else(|| "unknown send failure".to_string());
                    narrator.status(StatusUpdate::Warning(format!("Email not sent: {reason}")));
                    RunOutcome::NotSent { reason }
                }
            }
            ApprovalDecision::Rejected => {
                narrator.status(StatusUpdate::Info(
                    "Cancelled. No email was sent.".into(),
                ));
                RunOutcome::Cancelled
            }
        };

        narrator.status(StatusUpdate::Divider);
        narrator.status(StatusUpdate::Info(format!(
            "Tokens used: {} (estimated cost ${})",
            usage.total(),
            cost.round_dp(6)
        )));

        info!(
            outcome = ?outcome,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Outreach run finished"
        );

        Ok(RunReport {
            run_id,
            outcome,
            final_email,
            usage,
            estimated_cost: cost,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn step(&self, number: usize, label: &str) {
        self.deps.narrator.status(StatusUpdate::Step {
            number,
            total: TOTAL_STEPS,
            label: label.to_string(),
        });
    }
}
