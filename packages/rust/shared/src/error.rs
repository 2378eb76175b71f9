//! Error types for lessonforge.
//!
//! Library crates use [`LessonForgeError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all lessonforge operations.
#[derive(Debug, thiserror::Error)]
pub enum LessonForgeError {
    /// Configuration loading or missing-credential error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Lesson catalog loading or shape error.
    #[error("catalog error: {message}")]
    Catalog { message: String },

    /// Search provider error (auth, quota, network, malformed response).
    #[error("search error: {0}")]
    Search(String),

    /// Synthesis provider error (API failure or unusable response shape).
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input validation error (unknown lesson id, malformed arguments).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LessonForgeError>;

/// Coarse failure classification for request/response boundaries.
///
/// The single-lesson path is consumed by a synchronous trigger that must
/// distinguish caller mistakes from deployment problems from everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The caller supplied bad input (unknown lesson id, missing argument).
    InvalidRequest,
    /// The process is misconfigured (missing credential, unreadable catalog).
    Configuration,
    /// A provider or I/O failure during generation.
    Internal,
}

impl LessonForgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a catalog error from any displayable message.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify this error for a request/response boundary.
    pub fn class(&self) -> FailureClass {
        match self {
            Self::Validation { .. } => FailureClass::InvalidRequest,
            Self::Config { .. } | Self::Catalog { .. } => FailureClass::Configuration,
            Self::Search(_) | Self::Synthesis(_) | Self::Io { .. } => FailureClass::Internal,
        }
    }
}
