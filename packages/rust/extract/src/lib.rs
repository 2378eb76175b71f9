//! Firecrawl extraction client, the pipeline's optional content enricher.
//!
//! Given a source URL, fetches a clean markdown rendering of the page.
//! Failure handling is deliberately lossy: any error for a URL yields an
//! empty string so the caller falls back to the search provider's inline
//! excerpt. One bad source never aborts a lesson. When no API key is
//! configured the component is a no-op that performs no network calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lessonforge_shared::{ContentExtractor, LessonForgeError, Result};

/// Production scrape endpoint.
pub const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1/scrape";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Tunable extraction behavior.
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

/// Firecrawl API client.
pub struct FirecrawlClient {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl FirecrawlClient {
    /// Create a new client against the production endpoint.
    pub fn new(api_key: String, options: ExtractionOptions) -> Result<Self> {
        Self::with_endpoint(api_key, FIRECRAWL_API_URL.to_string(), options)
    }

    /// Create a client against a specific endpoint (used by tests).
    pub fn with_endpoint(
        api_key: String,
        endpoint: String,
        options: ExtractionOptions,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| {
                LessonForgeError::config(format!("failed to build extraction HTTP client: {e}"))
            })?;

        Ok(Self {
            api_key,
            endpoint,
            client,
        })
    }

    /// The fallible inner call; the trait impl downgrades errors to empty.
    async fn try_extract(&self, url: &str) -> std::result::Result<String, String> {
        let request = ScrapeRequest {
            url,
            formats: ["markdown"],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("scrape request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("scrape API error {status}"));
        }

        let parsed: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid scrape response: {e}"))?;

        if !parsed.success {
            return Err("scrape reported failure".into());
        }

        Ok(parsed
            .data
            .and_then(|d| d.markdown)
            .unwrap_or_default())
    }
}

#[async_trait]
impl ContentExtractor for FirecrawlClient {
    async fn extract(&self, url: &str) -> String {
        match self.try_extract(url).await {
            Ok(markdown) => {
                debug!(url, chars = markdown.len(), "extracted content");
                markdown
            }
            Err(reason) => {
                warn!(url, %reason, "extraction failed, falling back to inline excerpt");
                String::new()
            }
        }
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// No-op extractor used when no Firecrawl key is configured.
pub struct DisabledExtractor;

#[async_trait]
impl ContentExtractor for DisabledExtractor {
    async fn extract(&self, _url: &str) -> String {
        String::new()
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Build the extractor for the given (optional) credential.
pub fn build_extractor(
    api_key: Option<String>,
    options: ExtractionOptions,
) -> Result<Box<dyn ContentExtractor>> {
    match api_key {
        Some(key) => Ok(Box::new(FirecrawlClient::new(key, options)?)),
        None => Ok(Box::new(DisabledExtractor)),
    }
}
