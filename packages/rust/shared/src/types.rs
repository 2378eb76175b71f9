//! Core domain types for the lesson generation pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Lesson difficulty level as declared in the roadmap catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// LessonConfig
// ---------------------------------------------------------------------------

/// Everything the pipeline needs to generate one lesson.
///
/// Built from the catalog entry at selection time and immutable for the
/// duration of a generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonConfig {
    /// Stable lesson slug, also the content file name.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Catalog description; drives the search query.
    pub description: String,
    /// Minutes to complete.
    pub estimated_time: u32,
    /// Difficulty level.
    pub difficulty: Difficulty,
    /// Search query derived from title + description.
    pub search_query: String,
    /// Owning module slug (used for cross-link paths in the prompt).
    pub module_id: String,
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// A candidate source document returned by the search provider,
/// optionally enriched by the content extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Document title.
    pub title: String,
    /// Document URL.
    pub url: String,
    /// Extracted text (possibly truncated by the provider).
    pub content: String,
    /// Author, when the provider knows it.
    pub author: Option<String>,
    /// Publication date (provider-formatted string).
    pub published_date: Option<String>,
}

// ---------------------------------------------------------------------------
// SourceRecord
// ---------------------------------------------------------------------------

/// Provenance record for one source, persisted alongside the lesson body
/// for the web app's source display. Serialized camelCase because the
/// consumer is the TypeScript front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub title: String,
    pub url: String,
    /// Fixed to "article" for search-derived sources.
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    /// Date the source was fetched (UTC, `YYYY-MM-DD`).
    pub accessed_date: NaiveDate,
}

impl SourceRecord {
    /// Derive a provenance record from a source at generation time.
    pub fn from_source(source: &Source, accessed_date: NaiveDate) -> Self {
        Self {
            title: source.title.clone(),
            url: source.url.clone(),
            source_type: "article".to_string(),
            author: source.author.clone(),
            published_date: source.published_date.clone(),
            accessed_date,
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationResult
// ---------------------------------------------------------------------------

/// Output of one successful pipeline run for one lesson.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    /// Final lesson body (markdown, no front-matter).
    pub markdown: String,
    /// Provenance records for the sources used, in provider order.
    pub sources: Vec<SourceRecord>,
}

// ---------------------------------------------------------------------------
// JobStatus
// ---------------------------------------------------------------------------

/// Lifecycle of one lesson's generation within a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Generating,
    Success,
    Error,
}
