//! End-to-end pipeline runs with stubbed LLM, browser, approval and SMTP.
//!
//! The secondary source is a real `HttpPageFetcher` pointed at a wiremock
//! server, so the fallback path exercises actual HTTP and HTML extraction.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::SecretString;
use tokio::time::timeout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scholar_outreach::approval::ApprovalSource;
use scholar_outreach::config::{MailConfig, RecipientConfig, SenderIdentity};
use scholar_outreach::console::SilentNarrator;
use scholar_outreach::error::{AcquisitionError, LlmError, MailError};
use scholar_outreach::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmProvider,
};
use scholar_outreach::mail::{EmailSender, MailCredentials, MailTransport, OutgoingEmail};
use scholar_outreach::pipeline::{GenerationStages, Pipeline, PipelineDeps, RunOutcome};
use scholar_outreach::profile::{
    DynamicPageFetcher, HttpPageFetcher, PrimaryProfile, ProfileAcquirer,
};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Stub LLM: answers by stage and records the user prompt of every call.
struct StubLlm {
    prompts: Mutex<Vec<String>>,
}

impl StubLlm {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }
    fn cost_per_token(&self) -> (Decimal, Decimal) {
        (Decimal::ZERO, Decimal::ZERO)
    }
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let system = request.system_text();
        self.prompts.lock().unwrap().push(request.user_text());
        let content = if system.contains("academic advisor") {
            "- Federated learning\n- Privacy-preserving ML"
        } else if system.contains("writing assistant") {
            "SUBJECT: Draft subject\n\nDear Professor, draft body."
        } else {
            "SUBJECT: Prospective PhD Student - Federated Learning\n\n\
             Dear Professor Zhang,\n\nPolished body.\n\nBest,\nAda"
        };
        Ok(CompletionResponse {
            content: content.to_string(),
            input_tokens: 200,
            output_tokens: 100,
            finish_reason: FinishReason::Stop,
            response_id: None,
        })
    }
}

struct DownLlm;

#[async_trait]
impl LlmProvider for DownLlm {
    fn model_name(&self) -> &str {
        "down"
    }
    fn cost_per_token(&self) -> (Decimal, Decimal) {
        (Decimal::ZERO, Decimal::ZERO)
    }
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::RequestFailed {
            provider: "down".to_string(),
            reason: "401 Unauthorized".to_string(),
        })
    }
}

/// Primary source that either returns a fixed profile or fails like a
/// browser whose anchor never appeared.
struct StubBrowser(Option<PrimaryProfile>);

#[async_trait]
impl DynamicPageFetcher for StubBrowser {
    async fn fetch_profile(&self, _url: &str) -> Result<PrimaryProfile, AcquisitionError> {
        self.0.clone().ok_or_else(|| AcquisitionError::AnchorTimeout {
            anchor: "gsc_prf_in".to_string(),
            reason: "timed out".to_string(),
        })
    }
}

#[derive(Default)]
struct RecordingTransport(Mutex<Vec<OutgoingEmail>>);

impl MailTransport for RecordingTransport {
    fn deliver(&self, _creds: &MailCredentials, email: &OutgoingEmail) -> Result<(), MailError> {
        self.0.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Scripted human at the approval prompt.
struct ScriptedHuman {
    answers: VecDeque<String>,
    presented: Option<String>,
}

impl ScriptedHuman {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            presented: None,
        }
    }
}

#[async_trait]
impl ApprovalSource for ScriptedHuman {
    async fn present(&mut self, email: &str) {
        self.presented = Some(email.to_string());
    }
    async fn read_response(&mut self) -> Option<String> {
        self.answers.pop_front()
    }
    async fn reprompt(&mut self, _input: &str) {}
}

fn sender() -> SenderIdentity {
    SenderIdentity {
        name: "Ada Student".to_string(),
        program: "MSc Computing Science".to_string(),
        interests: "federated learning, privacy".to_string(),
        contact: "ada@student.example".to_string(),
        profile_link: Some("https://linkedin.example/ada".to_string()),
    }
}

fn recipient(secondary_url: &str) -> RecipientConfig {
    RecipientConfig {
        name: "Michael Zhang".to_string(),
        institution: "Saint Mary's University".to_string(),
        email: "prof@uni.example".to_string(),
        primary_url: "https://scholar.example/citations?user=x".to_string(),
        secondary_url: secondary_url.to_string(),
        secondary_label: "SMU website".to_string(),
    }
}

fn mail_config(with_credentials: bool) -> MailConfig {
    MailConfig {
        smtp_host: "smtp.example".to_string(),
        smtp_port: 465,
        sender_address: with_credentials.then(|| "ada@student.example".to_string()),
        sender_secret: with_credentials.then(|| SecretString::from("app-password")),
        recipient_address: "prof@uni.example".to_string(),
        accept_invalid_certs: false,
    }
}

fn build(
    llm: Arc<dyn LlmProvider>,
    primary: Option<PrimaryProfile>,
    secondary_url: &str,
    mail: MailConfig,
    transport: Arc<RecordingTransport>,
) -> Pipeline {
    let acquirer = ProfileAcquirer::new(
        Arc::new(StubBrowser(primary)),
        Arc::new(HttpPageFetcher::new().unwrap()),
        secondary_url,
    );
    Pipeline::new(
        sender(),
        recipient(secondary_url),
        PipelineDeps {
            acquirer,
            stages: GenerationStages::new(llm),
            mailer: EmailSender::new(mail, transport),
            narrator: Arc::new(SilentNarrator),
        },
    )
}

fn scholar_profile() -> PrimaryProfile {
    PrimaryProfile {
        interests: vec!["Federated Learning".to_string(), "Privacy".to_string()],
        publications: vec!["Secure Aggregation at Scale".to_string()],
        stats: vec!["5000".into(), "3000".into(), "30".into(), "25".into()],
    }
}

#[tokio::test]
async fn approved_email_is_sent_once_with_reviewed_subject() {
    let llm = StubLlm::new();
    let transport = Arc::new(RecordingTransport::default());
    let pipeline = build(
        llm.clone(),
        Some(scholar_profile()),
        "http://127.0.0.1:9/unused",
        mail_config(true),
        transport.clone(),
    );
    let mut human = ScriptedHuman::new(&["maybe", "Y"]);

    let report = timeout(TEST_TIMEOUT, pipeline.run(&mut human))
        .await
        .expect("pipeline hung")
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Sent);
    assert_eq!(report.usage.total(), 900);

    let sent = transport.0.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].subject,
        "Prospective PhD Student - Federated Learning"
    );
    assert!(sent[0].body.starts_with("Dear Professor Zhang,"));
    assert_eq!(sent[0].to, "prof@uni.example");
    assert_eq!(sent[0].from, "ada@student.example");

    // The human saw exactly the reviewer's output
    assert_eq!(human.presented.as_deref(), Some(report.final_email.text.as_str()));

    // Matcher saw the scholar profile, composer saw matcher output
    let prompts = llm.prompts.lock().unwrap();
    assert!(prompts[0].contains("  - Federated Learning"));
    assert!(prompts[0].contains("CITATION STATS: Total Citations: 5000 | h-index: 30"));
    assert!(prompts[1].contains("- Privacy-preserving ML"));
    assert!(prompts[2].contains("draft body."));
}

#[tokio::test]
async fn rejection_sends_nothing() {
    let transport = Arc::new(RecordingTransport::default());
    let pipeline = build(
        StubLlm::new(),
        Some(scholar_profile()),
        "http://127.0.0.1:9/unused",
        mail_config(true),
        transport.clone(),
    );

    let report = timeout(TEST_TIMEOUT, pipeline.run(&mut ScriptedHuman::new(&["n"])))
        .await
        .expect("pipeline hung")
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert!(transport.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_browser_falls_back_to_faculty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/faculty/zhang"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><h2>Dr. Michael Zhang</h2>\
             <p>Research on federated optimisation.</p>\
             <script>ignored()</script></body></html>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let llm = StubLlm::new();
    let transport = Arc::new(RecordingTransport::default());
    let url = format!("{}/faculty/zhang", server.uri());
    let pipeline = build(llm.clone(), None, &url, mail_config(true), transport);

    timeout(TEST_TIMEOUT, pipeline.run(&mut ScriptedHuman::new(&["no"])))
        .await
        .expect("pipeline hung")
        .unwrap();

    let prompts = llm.prompts.lock().unwrap();
    assert!(prompts[0].contains("PROFILE (from SMU website):"));
    assert!(prompts[0].contains("Research on federated optimisation."));
    assert!(!prompts[0].contains("ignored()"));
    assert!(!prompts[0].contains("RESEARCH INTERESTS:"));
}

#[tokio::test]
async fn both_sources_down_still_reaches_approval() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let transport = Arc::new(RecordingTransport::default());
    let url = format!("{}/faculty", server.uri());
    let pipeline = build(StubLlm::new(), None, &url, mail_config(true), transport.clone());
    let mut human = ScriptedHuman::new(&["yes"]);

    let report = timeout(TEST_TIMEOUT, pipeline.run(&mut human))
        .await
        .expect("pipeline hung")
        .unwrap();

    assert!(human.presented.is_some());
    assert_eq!(report.outcome, RunOutcome::Sent);
    assert_eq!(transport.0.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_credentials_reports_not_sent() {
    let transport = Arc::new(RecordingTransport::default());
    let pipeline = build(
        StubLlm::new(),
        Some(scholar_profile()),
        "http://127.0.0.1:9/unused",
        mail_config(false),
        transport.clone(),
    );

    let report = timeout(TEST_TIMEOUT, pipeline.run(&mut ScriptedHuman::new(&["y"])))
        .await
        .expect("pipeline hung")
        .unwrap();

    match report.outcome {
        RunOutcome::NotSent { reason } => {
            assert!(reason.contains("SENDER_EMAIL"));
            assert!(reason.contains("EMAIL_PASSWORD"));
        }
        other => panic!("expected NotSent, got {other:?}"),
    }
    assert!(transport.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn llm_failure_aborts_before_approval() {
    let transport = Arc::new(RecordingTransport::default());
    let pipeline = build(
        Arc::new(DownLlm),
        Some(scholar_profile()),
        "http://127.0.0.1:9/unused",
        mail_config(true),
        transport.clone(),
    );
    let mut human = ScriptedHuman::new(&["y"]);

    let result = timeout(TEST_TIMEOUT, pipeline.run(&mut human))
        .await
        .expect("pipeline hung");

    assert!(result.is_err());
    assert!(human.presented.is_none());
    assert!(transport.0.lock().unwrap().is_empty());
}
