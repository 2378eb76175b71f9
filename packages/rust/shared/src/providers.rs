//! Provider trait seams for the generation pipeline.
//!
//! Concrete clients live in the `search`, `extract`, and `synthesis` crates;
//! the orchestrator only sees these traits, so clients are constructed once
//! at process start and passed in, and tests substitute scripted
//! implementations instead of hitting the network.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{LessonConfig, Source};

/// Semantic web search returning ranked candidate sources.
#[async_trait]
pub trait SourceFinder: Send + Sync {
    /// Search for up to `num_results` candidate sources matching `query`.
    ///
    /// Result ordering is the provider's ranking; no local re-ranking or
    /// deduplication happens downstream.
    async fn find_sources(&self, query: &str, num_results: usize) -> Result<Vec<Source>>;
}

/// Optional per-URL markdown extraction.
///
/// Implementations never fail: a URL that cannot be extracted yields an
/// empty string and the caller keeps the inline search excerpt instead.
/// One bad source must not abort a lesson.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Fetch `url` and return its content as markdown, or an empty string.
    async fn extract(&self, url: &str) -> String;

    /// Whether this extractor performs real work. A disabled extractor is
    /// skipped entirely, so no network call is ever attempted.
    fn is_enabled(&self) -> bool;
}

/// Generative synthesis of one lesson body from the gathered sources.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Produce the lesson markdown. An empty source list is valid input.
    async fn synthesize(&self, lesson: &LessonConfig, sources: &[Source]) -> Result<String>;
}
