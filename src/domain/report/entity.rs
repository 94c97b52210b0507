//! Report entity and title derivation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when the generated text has no usable first line
pub const DEFAULT_TITLE: &str = "Radiology Report";

/// Maximum title length in characters, ellipsis included
pub const MAX_TITLE_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

/// Derive a display title from generated report text.
///
/// Picks the first non-blank line, falling back to [`DEFAULT_TITLE`].
/// Titles longer than [`MAX_TITLE_CHARS`] keep their first 47 characters
/// followed by `...`. Lengths are counted in chars, not bytes.
pub fn derive_title(processed_text: &str) -> String {
    let line = processed_text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    if line.chars().count() <= MAX_TITLE_CHARS {
        return line.to_string();
    }

    let keep = MAX_TITLE_CHARS - ELLIPSIS.len();
    let mut title: String = line.chars().take(keep).collect();
    title.push_str(ELLIPSIS);
    title
}

/// A report that has been generated but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub title: String,
    pub raw_transcription: String,
    pub processed_text: String,
    pub template_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewReport {
    /// Build the report value for one successful pipeline run.
    ///
    /// `template_name` is kept exactly as requested, whether or not a
    /// template with that name was found.
    pub fn record(
        raw_transcription: impl Into<String>,
        processed_text: impl Into<String>,
        template_name: Option<String>,
    ) -> Self {
        let processed_text = processed_text.into();
        Self {
            title: derive_title(&processed_text),
            raw_transcription: raw_transcription.into(),
            processed_text,
            template_name,
            created_at: Utc::now(),
        }
    }

    /// Attach the identifier assigned by storage
    pub fn into_report(self, id: i64) -> Report {
        Report {
            id,
            title: self.title,
            raw_transcription: self.raw_transcription,
            processed_text: self.processed_text,
            template_name: self.template_name,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// A stored report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub title: String,
    pub raw_transcription: String,
    pub processed_text: String,
    pub template_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Metadata view used by recent-report listings
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            id: self.id,
            title: self.title.clone(),
            created_at: self.created_at,
            template_name: self.template_name.clone(),
        }
    }
}

/// Report metadata without the transcription or generated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub template_name: Option<String>,
}
