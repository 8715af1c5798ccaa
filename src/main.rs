use std::path::Path;
use std::sync::Arc;

use scholar_outreach::config::AppConfig;
use scholar_outreach::console::{Console, ConsoleApproval};
use scholar_outreach::pipeline::Pipeline;
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Warning: a rustls crypto provider was already installed");
    }

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(config.log_dir.as_deref());

    let console = Arc::new(Console::new());
    console.banner();

    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   WebDriver: {}\n", config.browser.webdriver_url);

    let pipeline = Pipeline::from_config(&config, console.clone())?;

    let mut approval = ConsoleApproval::new();
    let report = pipeline.run(&mut approval).await?;
    console.closing();

    match serde_json::to_string(&report) {
        Ok(json) => tracing::debug!(report = %json, "Run report"),
        Err(e) => tracing::warn!("Could not serialize run report: {}", e),
    }

    Ok(())
}

/// Log to stderr, or to a daily rolling file under `log_dir` when set.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "scholar-outreach.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
            None
        }
    }
}
