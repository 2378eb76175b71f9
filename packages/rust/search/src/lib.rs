//! Exa search client, the pipeline's source finder.
//!
//! Issues a neural-ranked, auto-rewritten search with inline text
//! extraction and a documentation-category bias, returning candidate
//! sources in the provider's ranking order. No local re-ranking or
//! deduplication happens here; trusting the provider is deliberate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use lessonforge_shared::{LessonForgeError, Result, Source, SourceFinder};

/// Production search endpoint.
pub const EXA_API_URL: &str = "https://api.exa.ai/search";

/// How much of an error body to keep in error messages.
const ERROR_BODY_EXCERPT: usize = 300;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Tunable search behavior (per-result text cap, category hint, timeout).
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Per-result inline text cap requested from the provider, in characters.
    pub max_chars: usize,
    /// Content-category hint sent with every query.
    pub category: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_chars: 3_000,
            category: "documentation".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaSearchRequest<'a> {
    query: &'a str,
    #[serde(rename = "type")]
    search_type: &'a str,
    use_autoprompt: bool,
    num_results: usize,
    category: &'a str,
    contents: ExaContentsSpec,
}

#[derive(Debug, Serialize)]
struct ExaContentsSpec {
    text: ExaTextSpec,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaTextSpec {
    max_characters: usize,
}

#[derive(Debug, Deserialize)]
struct ExaSearchResponse {
    results: Vec<ExaResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExaResult {
    #[serde(default)]
    title: Option<String>,
    url: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Exa API client.
pub struct ExaClient {
    api_key: String,
    endpoint: String,
    options: SearchOptions,
    client: reqwest::Client,
}

impl ExaClient {
    /// Create a new client against the production endpoint.
    pub fn new(api_key: String, options: SearchOptions) -> Result<Self> {
        Self::with_endpoint(api_key, EXA_API_URL.to_string(), options)
    }

    /// Create a client against a specific endpoint (used by tests).
    pub fn with_endpoint(api_key: String, endpoint: String, options: SearchOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| LessonForgeError::Search(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            endpoint,
            options,
            client,
        })
    }
}

#[async_trait]
impl SourceFinder for ExaClient {
    #[instrument(skip(self, query), fields(query_chars = query.len()))]
    async fn find_sources(&self, query: &str, num_results: usize) -> Result<Vec<Source>> {
        let request = ExaSearchRequest {
            query,
            search_type: "neural",
            use_autoprompt: true,
            num_results,
            category: &self.options.category,
            contents: ExaContentsSpec {
                text: ExaTextSpec {
                    max_characters: self.options.max_chars,
                },
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LessonForgeError::Search(format!("search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
            return Err(LessonForgeError::Search(format!(
                "search API error {status}: {excerpt}"
            )));
        }

        let parsed: ExaSearchResponse = response
            .json()
            .await
            .map_err(|e| LessonForgeError::Search(format!("invalid search response: {e}")))?;

        let sources: Vec<Source> = parsed
            .results
            .into_iter()
            .map(|r| Source {
                title: r.title.unwrap_or_else(|| r.url.clone()),
                url: r.url,
                content: r.text,
                author: r.author,
                published_date: r.published_date,
            })
            .collect();

        debug!(found = sources.len(), "search complete");
        Ok(sources)
    }
}
