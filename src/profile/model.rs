//! Profile data model and the text presentation handed to the generation stages.

use serde::{Deserialize, Serialize};

use crate::config::RecipientConfig;
use crate::error::AcquisitionError;

/// Publication titles kept from the primary source.
pub const MAX_PUBLICATIONS: usize = 10;

/// Summary statistics kept from the primary source.
pub const MAX_STATS: usize = 4;

/// Characters of secondary-source text kept on the record.
pub const SECONDARY_CONTENT_CAP: usize = 3000;

/// Characters of secondary-source text included in the composed profile.
pub const PROFILE_EXCERPT_CAP: usize = 1500;

/// Recorded when the primary scrape succeeds but finds nothing.
const EMPTY_PRIMARY: &str = "primary source returned no interests or publications";

/// Where the profile data ultimately came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Primary,
    Secondary,
}

/// Raw field groups scraped from the primary source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryProfile {
    pub interests: Vec<String>,
    pub publications: Vec<String>,
    pub stats: Vec<String>,
}

impl PrimaryProfile {
    /// "Total Citations: X | h-index: Y" from the 1st and 3rd statistic.
    pub fn citation_summary(&self) -> Option<String> {
        if self.stats.len() < 3 {
            return None;
        }
        Some(format!(
            "Total Citations: {} | h-index: {}",
            self.stats[0], self.stats[2]
        ))
    }
}

/// What the acquirer learned about the recipient.
///
/// At least one of `interests`, `publications`, `raw_content` or `error` is
/// always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub source: ProfileSource,
    pub interests: Option<Vec<String>>,
    pub publications: Option<Vec<String>>,
    pub citation_summary: Option<String>,
    pub raw_content: Option<String>,
    pub error: Option<String>,
}

impl ProfileRecord {
    /// Record built from a successful primary scrape.
    pub fn from_primary(profile: PrimaryProfile) -> Self {
        let citation_summary = profile.citation_summary();
        let PrimaryProfile {
            interests,
            mut publications,
            ..
        } = profile;
        publications.truncate(MAX_PUBLICATIONS);

        let interests = non_empty(interests);
        let publications = non_empty(publications);
        let error = if interests.is_none() && publications.is_none() {
            Some(EMPTY_PRIMARY.to_string())
        } else {
            None
        };

        Self {
            source: ProfileSource::Primary,
            interests,
            publications,
            citation_summary,
            raw_content: None,
            error,
        }
    }

    /// Record for a primary scrape that failed outright.
    pub fn from_primary_error(error: &AcquisitionError) -> Self {
        Self {
            source: ProfileSource::Primary,
            interests: None,
            publications: None,
            citation_summary: None,
            raw_content: None,
            error: Some(error.to_string()),
        }
    }

    /// Whether the primary source produced anything worth writing about.
    pub fn has_primary_data(&self) -> bool {
        self.interests.is_some() || self.publications.is_some()
    }

    /// Fold the secondary-source outcome into this record.
    pub fn with_secondary(mut self, outcome: Result<String, AcquisitionError>) -> Self {
        self.source = ProfileSource::Secondary;
        match outcome {
            Ok(text) => {
                let text = truncate_chars(text.trim(), SECONDARY_CONTENT_CAP);
                if text.is_empty() {
                    self.error = Some(join_errors(
                        self.error.take(),
                        "secondary source had no readable content".to_string(),
                    ));
                } else {
                    self.raw_content = Some(text);
                    // Usable content supersedes the note about an empty primary scrape.
                    if self.error.as_deref() == Some(EMPTY_PRIMARY) {
                        self.error = None;
                    }
                }
            }
            Err(e) => {
                self.error = Some(join_errors(self.error.take(), e.to_string()));
            }
        }
        self
    }

    /// Text presentation of the profile, sections without data omitted.
    pub fn compose(&self, recipient: &RecipientConfig) -> String {
        let mut lines = vec![
            format!("PROFESSOR: {}", recipient.name),
            format!("INSTITUTION: {}", recipient.institution),
            String::new(),
        ];

        if let Some(interests) = &self.interests {
            lines.push("RESEARCH INTERESTS:".to_string());
            lines.extend(interests.iter().map(|i| format!("  - {i}")));
            lines.push(String::new());
        }

        if let Some(publications) = &self.publications {
            lines.push("TOP PUBLICATIONS:".to_string());
            lines.extend(
                publications
                    .iter()
                    .enumerate()
                    .map(|(n, p)| format!("  {}. {p}", n + 1)),
            );
            lines.push(String::new());
        }

        if let Some(citations) = &self.citation_summary {
            lines.push(format!("CITATION STATS: {citations}"));
            lines.push(String::new());
        }

        if let Some(content) = &self.raw_content {
            lines.push(format!("PROFILE (from {}):", recipient.secondary_label));
            lines.push(truncate_chars(content, PROFILE_EXCERPT_CAP));
        }

        lines.join("\n").trim().to_string()
    }
}

/// First `max` characters of `text`, respecting char boundaries.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    if items.is_empty() { None } else { Some(items) }
}

fn join_errors(existing: Option<String>, next: String) -> String {
    match existing {
        Some(prev) => format!("{prev}; {next}"),
        None => next,
    }
}
