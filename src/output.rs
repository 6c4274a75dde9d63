//! Output types: generated sections, the finished paper and run statistics.

use crate::request::PaperRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the paper a [`Section`] holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionKind {
    Toc,
    Introduction,
    /// A body chapter. `number` is its printed label (the first chapter is 2).
    Chapter { number: usize, title: String },
    Conclusion,
    References,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Toc => f.write_str("table of contents"),
            SectionKind::Introduction => f.write_str("introduction"),
            SectionKind::Chapter { number, title } => write!(f, "chapter {number} ({title})"),
            SectionKind::Conclusion => f.write_str("conclusion"),
            SectionKind::References => f.write_str("references"),
        }
    }
}

/// One generated unit of content, already cleaned and terminated by
/// exactly one page-break marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub html: String,
}

/// Aggregate statistics for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Body chapters generated (after outline padding).
    pub chapter_count: usize,
    /// Words across all generated sections, excluding the table of contents.
    pub total_words: usize,
    /// Generative-text calls that returned successfully.
    pub api_calls: usize,
    /// Rate-limited attempts that were retried.
    pub retries: usize,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
}

/// A finished paper. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPaper {
    /// Paper title; always the request theme.
    pub title: String,
    /// Full page-break-delimited HTML document.
    pub content: String,
    pub request: PaperRequest,
    pub created_at: DateTime<Utc>,
    pub stats: GenerationStats,
}

impl GeneratedPaper {
    /// Split the content into renderable pages (see [`crate::pages::paginate`]).
    pub fn pages(&self) -> Vec<&str> {
        crate::pages::paginate(&self.content)
    }
}
