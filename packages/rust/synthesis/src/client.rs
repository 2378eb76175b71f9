//! Anthropic messages API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use lessonforge_shared::{LessonConfig, LessonForgeError, Result, Source, Synthesizer};

use crate::prompt::build_prompt;
use crate::structure;

/// Production messages endpoint.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// API version header value required by the messages endpoint.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// How much of an error body to keep in error messages.
const ERROR_BODY_EXCERPT: usize = 300;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Tunable synthesis behavior.
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Model identifier.
    pub model: String,
    /// Output-length budget in tokens.
    pub max_tokens: u32,
    /// Per-source content cap inside the prompt, in characters.
    /// Independent from the search provider's inline text cap.
    pub source_char_cap: usize,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            max_tokens: 4_000,
            source_char_cap: 2_000,
            timeout_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<UserMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

/// A typed content block in the model response. Only text blocks carry
/// the lesson body; anything else is preserved as `Other` and skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Anthropic messages API client.
pub struct AnthropicClient {
    api_key: String,
    endpoint: String,
    options: SynthesisOptions,
    client: reqwest::Client,
}

impl AnthropicClient {
    /// Create a new client against the production endpoint.
    pub fn new(api_key: String, options: SynthesisOptions) -> Result<Self> {
        Self::with_endpoint(api_key, ANTHROPIC_API_URL.to_string(), options)
    }

    /// Create a client against a specific endpoint (used by tests).
    pub fn with_endpoint(
        api_key: String,
        endpoint: String,
        options: SynthesisOptions,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| {
                LessonForgeError::Synthesis(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            api_key,
            endpoint,
            options,
            client,
        })
    }

    /// Send one prompt and return the first text content block.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = MessagesRequest {
            model: &self.options.model,
            max_tokens: self.options.max_tokens,
            messages: vec![UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| LessonForgeError::Synthesis(format!("model request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
            return Err(LessonForgeError::Synthesis(format!(
                "model API error {status}: {excerpt}"
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LessonForgeError::Synthesis(format!("invalid model response: {e}")))?;

        parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or_else(|| {
                LessonForgeError::Synthesis(
                    "unexpected response format: no text content block".into(),
                )
            })
    }
}

#[async_trait]
impl Synthesizer for AnthropicClient {
    #[instrument(skip_all, fields(lesson = %lesson.id, sources = sources.len()))]
    async fn synthesize(&self, lesson: &LessonConfig, sources: &[Source]) -> Result<String> {
        let prompt = build_prompt(lesson, sources, self.options.source_char_cap);
        debug!(prompt_chars = prompt.len(), model = %self.options.model, "invoking model");

        let markdown = self.complete(&prompt).await?;

        // Output is opaque (model sampling), but a grossly off-target length
        // or missing section structure is worth flagging in the logs.
        let words = structure::word_count(&markdown);
        if !(structure::TARGET_WORDS_MIN..=structure::TARGET_WORDS_MAX).contains(&words) {
            warn!(lesson = %lesson.id, words, "synthesized lesson outside target length");
        }
        if !structure::has_section_headers(&markdown) {
            warn!(lesson = %lesson.id, "synthesized lesson has no ## section headers");
        }

        Ok(markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonforge_shared::Difficulty;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_lesson() -> LessonConfig {
        LessonConfig {
            id: "welcome".into(),
            title: "Welcome to the System".into(),
            description: "Why we have a design system.".into(),
            estimated_time: 10,
            difficulty: Difficulty::Beginner,
            search_query: "welcome ...".into(),
            module_id: "fundamentals".into(),
        }
    }

    fn client_for(server: &MockServer) -> AnthropicClient {
        AnthropicClient::with_endpoint(
            "sk-ant-test".into(),
            format!("{}/v1/messages", server.uri()),
            SynthesisOptions::default(),
        )
        .expect("build client")
    }

    #[tokio::test]
    async fn synthesize_returns_first_text_block() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(serde_json::json!({
                "model": "claude-sonnet-4-20250514",
                "max_tokens": 4000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    { "type": "text", "text": "# Welcome\n\n## Why\n\nBody." }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let markdown = client
            .synthesize(&make_lesson(), &[])
            .await
            .expect("synthesize");
        assert_eq!(markdown, "# Welcome\n\n## Why\n\nBody.");
    }

    #[tokio::test]
    async fn non_text_leading_block_is_skipped() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    { "type": "tool_use", "id": "t1", "name": "noop", "input": {} },
                    { "type": "text", "text": "# Lesson" }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let markdown = client
            .synthesize(&make_lesson(), &[])
            .await
            .expect("synthesize");
        assert_eq!(markdown, "# Lesson");
    }

    #[tokio::test]
    async fn missing_text_block_is_a_response_shape_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    { "type": "tool_use", "id": "t1", "name": "noop", "input": {} }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.synthesize(&make_lesson(), &[]).await.unwrap_err();
        assert!(
            err.to_string().contains("unexpected response format"),
            "got: {err}"
        );
    }

    #[tokio::test]
    async fn model_api_error_propagates_with_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_string("{\"error\":{\"type\":\"rate_limit_error\"}}"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.synthesize(&make_lesson(), &[]).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("429"), "expected status in error: {msg}");
        assert!(matches!(err, LessonForgeError::Synthesis(_)));
    }
}
