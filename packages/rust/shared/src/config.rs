//! Application configuration for lessonforge.
//!
//! User config lives at `~/.lessonforge/lessonforge.toml`.
//! CLI flags override config file values, which override defaults.
//! The file stores the *names* of credential environment variables,
//! never the credentials themselves.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LessonForgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "lessonforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".lessonforge";

// ---------------------------------------------------------------------------
// Config structs (matching lessonforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Search provider (Exa) settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Extraction provider (Firecrawl) settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Synthesis provider (Anthropic) settings.
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Batch pacing settings.
    #[serde(default)]
    pub batch: BatchConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Path to the lesson catalog JSON.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Directory holding generated lesson markdown.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            content_dir: default_content_dir(),
        }
    }
}

fn default_catalog_path() -> String {
    "roadmap.json".into()
}
fn default_content_dir() -> String {
    "public/content/lessons".into()
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Name of the env var holding the Exa API key (never the key itself).
    #[serde(default = "default_search_key_env")]
    pub api_key_env: String,

    /// Number of results to request per query.
    #[serde(default = "default_num_results")]
    pub num_results: usize,

    /// Per-result inline text cap requested from the provider, in characters.
    #[serde(default = "default_search_max_chars")]
    pub max_chars: usize,

    /// Content-category hint sent with every query.
    #[serde(default = "default_search_category")]
    pub category: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_search_key_env(),
            num_results: default_num_results(),
            max_chars: default_search_max_chars(),
            category: default_search_category(),
            timeout_secs: default_search_timeout(),
        }
    }
}

fn default_search_key_env() -> String {
    "EXA_API_KEY".into()
}
fn default_num_results() -> usize {
    5
}
fn default_search_max_chars() -> usize {
    3_000
}
fn default_search_category() -> String {
    "documentation".into()
}
fn default_search_timeout() -> u64 {
    30
}

/// `[extraction]` section.
///
/// Extraction is optional: when the key env var is unset the component is
/// disabled and the pipeline relies on the search provider's inline text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Name of the env var holding the Firecrawl API key.
    #[serde(default = "default_extraction_key_env")]
    pub api_key_env: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_extraction_timeout")]
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_extraction_key_env(),
            timeout_secs: default_extraction_timeout(),
        }
    }
}

fn default_extraction_key_env() -> String {
    "FIRECRAWL_API_KEY".into()
}
fn default_extraction_timeout() -> u64 {
    30
}

/// `[synthesis]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Name of the env var holding the Anthropic API key.
    #[serde(default = "default_synthesis_key_env")]
    pub api_key_env: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Output-length budget in tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-source content cap inside the prompt, in characters.
    /// Deliberately independent from `search.max_chars`.
    #[serde(default = "default_source_char_cap")]
    pub source_char_cap: usize,

    /// HTTP timeout in seconds. Synthesis responses are slow.
    #[serde(default = "default_synthesis_timeout")]
    pub timeout_secs: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_synthesis_key_env(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            source_char_cap: default_source_char_cap(),
            timeout_secs: default_synthesis_timeout(),
        }
    }
}

fn default_synthesis_key_env() -> String {
    "ANTHROPIC_API_KEY".into()
}
fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}
fn default_max_tokens() -> u32 {
    4_000
}
fn default_source_char_cap() -> usize {
    2_000
}
fn default_synthesis_timeout() -> u64 {
    120
}

/// `[batch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Fixed delay between consecutive lessons, in milliseconds.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pacing_ms: default_pacing_ms(),
        }
    }
}

fn default_pacing_ms() -> u64 {
    2_000
}

// ---------------------------------------------------------------------------
// Credential resolution
// ---------------------------------------------------------------------------

/// Resolved provider credentials, read from the environment once at
/// process start and passed into client constructors.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Exa API key (required).
    pub search_api_key: String,
    /// Anthropic API key (required).
    pub synthesis_api_key: String,
    /// Firecrawl API key; `None` disables the extraction component.
    pub extraction_api_key: Option<String>,
}

/// Resolve all provider credentials, failing fast on missing required keys.
///
/// This must run before any client is constructed so a missing credential
/// aborts the run before a single network call is attempted.
pub fn resolve_credentials(config: &AppConfig) -> Result<Credentials> {
    let search_api_key = require_env(&config.search.api_key_env)?;
    let synthesis_api_key = require_env(&config.synthesis.api_key_env)?;

    let extraction_api_key = std::env::var(&config.extraction.api_key_env)
        .ok()
        .filter(|v| !v.is_empty());
    if extraction_api_key.is_none() {
        tracing::info!(
            var = %config.extraction.api_key_env,
            "extraction key not set, content extraction disabled"
        );
    }

    Ok(Credentials {
        search_api_key,
        synthesis_api_key,
        extraction_api_key,
    })
}

/// Read a required env var, naming it in the error when missing.
fn require_env(var_name: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(LessonForgeError::config(format!(
            "required credential not found: set the {var_name} environment variable"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.lessonforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LessonForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.lessonforge/lessonforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LessonForgeError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        LessonForgeError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LessonForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LessonForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LessonForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
