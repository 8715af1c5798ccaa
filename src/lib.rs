//! Scholar Outreach: researched, human-approved academic outreach email.

pub mod approval;
pub mod config;
pub mod console;
pub mod error;
pub mod llm;
pub mod mail;
pub mod pipeline;
pub mod profile;
