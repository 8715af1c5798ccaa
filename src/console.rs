//! Console I/O: progress narrative on stdout, approval answers from stdin.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::approval::ApprovalSource;

const RULE_WIDTH: usize = 54;

/// A progress event worth showing the human.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Numbered pipeline step starting.
    Step {
        number: usize,
        total: usize,
        label: String,
    },
    Success(String),
    Info(String),
    Warning(String),
    /// Multi-line text shown indented (matched topics, previews).
    Block(String),
    Divider,
}

/// Receives progress events.
pub trait Narrator: Send + Sync {
    fn status(&self, update: StatusUpdate);
}

/// Narrator that drops everything (for tests and quiet runs).
#[derive(Debug, Default)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn status(&self, _update: StatusUpdate) {}
}

/// Plain-text narrator writing to stdout.
#[derive(Debug, Default)]
pub struct Console;

impl Console {
    pub fn new() -> Self {
        Self
    }

    pub fn banner(&self) {
        println!();
        println!("  +----------------------------------------------------------+");
        println!("  |        PhD Application Email Assistant                   |");
        println!("  |        Profile research, drafting and approved sending   |");
        println!("  +----------------------------------------------------------+");
        println!();
    }

    pub fn closing(&self) {
        println!("  Session complete.\n");
    }
}

impl Narrator for Console {
    fn status(&self, update: StatusUpdate) {
        match update {
            StatusUpdate::Step {
                number,
                total,
                label,
            } => {
                println!();
                println!("  Step {number}/{total}  [{}]", progress_bar(number, total));
                println!("  {label}");
                println!("  {}", "-".repeat(RULE_WIDTH));
            }
            StatusUpdate::Success(msg) => println!("    [OK]  {msg}"),
            StatusUpdate::Info(msg) => println!("    >>   {msg}"),
            StatusUpdate::Warning(msg) => println!("    [!]  {msg}"),
            StatusUpdate::Block(text) => {
                for line in text.lines() {
                    println!("    {line}");
                }
            }
            StatusUpdate::Divider => println!("\n  {}\n", "=".repeat(RULE_WIDTH + 2)),
        }
    }
}

/// "+++--" style bar for step `number` of `total`.
pub fn progress_bar(number: usize, total: usize) -> String {
    let done = number.min(total);
    format!("{}{}", "+".repeat(done), "-".repeat(total - done))
}

/// Reads approval answers from stdin.
pub struct ConsoleApproval {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleApproval {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for ConsoleApproval {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApprovalSource for ConsoleApproval {
    async fn present(&mut self, email: &str) {
        println!("\n  {}\n", "=".repeat(RULE_WIDTH + 2));
        println!("  HUMAN-IN-THE-LOOP APPROVAL");
        println!("  {}", "-".repeat(RULE_WIDTH));
        println!("\n  EMAIL PREVIEW\n");
        for line in email.lines() {
            println!("    {line}");
        }
        println!("\n  {}\n", "=".repeat(RULE_WIDTH + 2));
        println!("  Does this email look good to send?");
        println!("    [Y] Yes, send it!");
        println!("    [N] No, cancel.");
        println!();
        eprint!("    Your choice (Y/N): ");
    }

    async fn read_response(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                None
            }
        }
    }

    async fn reprompt(&mut self, _input: &str) {
        println!("    Please enter Y or N");
        eprint!("    Your choice (Y/N): ");
    }
}
