//! Core pipeline orchestration for lessonforge.
//!
//! This crate ties together source finding, extraction, synthesis, and
//! persistence into the per-lesson generation unit, and drives it across
//! many lessons as a paced, partial-failure-tolerant batch.

pub mod batch;
pub mod pipeline;
pub mod progress;
pub mod writer;

pub use batch::{BatchOptions, BatchSummary, FailedLesson, GenerationJob, run_batch};
pub use pipeline::{GenerationPipeline, SavedLesson, generate_single};
pub use progress::{BatchProgress, SilentProgress};
