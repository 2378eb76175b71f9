//! Shared types, error model, and configuration for lessonforge.
//!
//! This crate is the foundation depended on by all other lessonforge crates.
//! It provides:
//! - [`LessonForgeError`] — the unified error type
//! - Domain types ([`LessonConfig`], [`Source`], [`SourceRecord`], [`GenerationResult`])
//! - Provider trait seams ([`SourceFinder`], [`ContentExtractor`], [`Synthesizer`])
//! - Configuration ([`AppConfig`], credential resolution, config loading)

pub mod config;
pub mod error;
pub mod providers;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BatchConfig, Credentials, DefaultsConfig, ExtractionConfig, SearchConfig,
    SynthesisConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
    resolve_credentials,
};
pub use error::{FailureClass, LessonForgeError, Result};
pub use providers::{ContentExtractor, SourceFinder, Synthesizer};
pub use types::{Difficulty, GenerationResult, JobStatus, LessonConfig, Source, SourceRecord};
