//! Batch orchestrator: drive the generation unit across many lessons.
//!
//! Lessons are processed strictly in catalog order, one at a time, with a
//! fixed pacing delay between consecutive lessons. Each lesson's outcome
//! is recorded as a per-lesson result; a failure never aborts the batch.
//! This is the only place per-lesson errors are caught.

use std::time::Duration;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use lessonforge_catalog::{Module, lessons_needing_content};
use lessonforge_shared::{GenerationResult, JobStatus, LessonConfig, Result};

use crate::pipeline::GenerationPipeline;
use crate::progress::BatchProgress;

// ---------------------------------------------------------------------------
// Options and records
// ---------------------------------------------------------------------------

/// Options for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Attempt at most this many lessons (first N in catalog order).
    pub limit: Option<usize>,
    /// Fixed delay between consecutive lessons.
    pub pacing: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            limit: None,
            pacing: Duration::from_millis(2_000),
        }
    }
}

/// In-memory record of one lesson's generation within a batch.
/// Created per scheduled lesson, mutated as the unit progresses,
/// and discarded with the summary at process end.
#[derive(Debug)]
pub struct GenerationJob {
    pub lesson_id: String,
    pub lesson_title: String,
    pub status: JobStatus,
    /// Populated on success.
    pub result: Option<GenerationResult>,
    /// Populated on failure.
    pub error: Option<String>,
}

impl GenerationJob {
    fn new(lesson: &LessonConfig) -> Self {
        Self {
            lesson_id: lesson.id.clone(),
            lesson_title: lesson.title.clone(),
            status: JobStatus::Pending,
            result: None,
            error: None,
        }
    }
}

/// A failed lesson and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedLesson {
    pub lesson_id: String,
    pub reason: String,
}

/// Outcome of one batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Identifier for this run (logs correlation only).
    pub run_id: Uuid,
    /// How many lessons needed content before the limit was applied.
    pub needing_content: usize,
    /// How many lessons were attempted.
    pub attempted: usize,
    /// Ids of lessons generated and persisted, in processing order.
    pub succeeded: Vec<String>,
    /// Lessons that failed, with reasons, in processing order.
    pub failed: Vec<FailedLesson>,
}

impl BatchSummary {
    fn from_jobs(run_id: Uuid, needing_content: usize, jobs: &[GenerationJob]) -> Self {
        let succeeded = jobs
            .iter()
            .filter(|j| j.status == JobStatus::Success)
            .map(|j| j.lesson_id.clone())
            .collect();
        let failed = jobs
            .iter()
            .filter(|j| j.status == JobStatus::Error)
            .map(|j| FailedLesson {
                lesson_id: j.lesson_id.clone(),
                reason: j.error.clone().unwrap_or_default(),
            })
            .collect();

        Self {
            run_id,
            needing_content,
            attempted: jobs.len(),
            succeeded,
            failed,
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Run the batch: select lessons needing content, truncate to the limit,
/// and process each in order with pacing between consecutive lessons.
///
/// Only pre-run failures (catalog selection) return `Err`; once lessons
/// are scheduled, every outcome lands in the summary.
#[instrument(skip_all, fields(limit = ?options.limit))]
pub async fn run_batch(
    pipeline: &GenerationPipeline,
    modules: &[Module],
    options: &BatchOptions,
    progress: &dyn BatchProgress,
) -> Result<BatchSummary> {
    let run_id = Uuid::now_v7();

    let needing = lessons_needing_content(modules, pipeline.content_dir())?;
    let needing_content = needing.len();

    let scheduled: Vec<LessonConfig> = match options.limit {
        Some(limit) => needing.into_iter().take(limit).collect(),
        None => needing,
    };

    info!(
        %run_id,
        needing_content,
        scheduled = scheduled.len(),
        "starting batch generation"
    );
    progress.batch_started(scheduled.len(), needing_content);

    let mut jobs: Vec<GenerationJob> = scheduled.iter().map(GenerationJob::new).collect();

    for (i, lesson) in scheduled.iter().enumerate() {
        let job = &mut jobs[i];
        job.status = JobStatus::Generating;
        progress.lesson_started(i + 1, scheduled.len(), lesson);

        match pipeline.generate_and_save(lesson).await {
            Ok(saved) => {
                job.status = JobStatus::Success;
                progress.lesson_succeeded(&lesson.id, &saved.path);
                job.result = Some(saved.result);
            }
            Err(e) => {
                warn!(lesson = %lesson.id, error = %e, "lesson generation failed");
                job.status = JobStatus::Error;
                job.error = Some(e.to_string());
                progress.lesson_failed(&lesson.id, &e);
            }
        }

        // Fixed-rate pacing between consecutive lessons, success or not;
        // nothing to wait for after the last one.
        if i + 1 < scheduled.len() {
            progress.pacing(options.pacing);
            tokio::time::sleep(options.pacing).await;
        }
    }

    let summary = BatchSummary::from_jobs(run_id, needing_content, &jobs);
    info!(
        %run_id,
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "batch generation complete"
    );
    progress.batch_finished(&summary);

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
