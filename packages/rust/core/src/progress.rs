//! Progress callbacks for batch runs.

use std::path::Path;
use std::time::Duration;

use lessonforge_shared::{LessonConfig, LessonForgeError};

use crate::batch::BatchSummary;

/// Progress callback for reporting batch status.
pub trait BatchProgress: Send + Sync {
    /// Called once after selection, before the first lesson.
    fn batch_started(&self, scheduled: usize, needing_content: usize);
    /// Called when a lesson's generation unit begins.
    fn lesson_started(&self, current: usize, total: usize, lesson: &LessonConfig);
    /// Called when a lesson was generated and persisted.
    fn lesson_succeeded(&self, lesson_id: &str, path: &Path);
    /// Called when a lesson's generation unit failed.
    fn lesson_failed(&self, lesson_id: &str, error: &LessonForgeError);
    /// Called before the inter-lesson pacing delay.
    fn pacing(&self, delay: Duration);
    /// Called when the batch completes.
    fn batch_finished(&self, summary: &BatchSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl BatchProgress for SilentProgress {
    fn batch_started(&self, _scheduled: usize, _needing_content: usize) {}
    fn lesson_started(&self, _current: usize, _total: usize, _lesson: &LessonConfig) {}
    fn lesson_succeeded(&self, _lesson_id: &str, _path: &Path) {}
    fn lesson_failed(&self, _lesson_id: &str, _error: &LessonForgeError) {}
    fn pacing(&self, _delay: Duration) {}
    fn batch_finished(&self, _summary: &BatchSummary) {}
}
