//! Read-only coverage scan of the catalog against the content directory.
//!
//! Drives the `status` CLI command: which lessons have content, which are
//! generatable, which can never be generated (no description), and which
//! markdown files on disk no longer match any catalog entry.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

use lessonforge_shared::{LessonForgeError, Result};

use crate::{Module, selector};

/// Content state of one catalog lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentState {
    /// Markdown file exists on disk.
    Generated,
    /// No file yet, but the lesson has a description and can be generated.
    Pending,
    /// No file and no description, so generation is impossible.
    Ungeneratable,
}

/// Status of one catalog lesson.
#[derive(Debug, Clone)]
pub struct LessonStatus {
    pub module_id: String,
    pub lesson_id: String,
    pub title: String,
    pub state: ContentState,
}

/// Full coverage report for a catalog + content directory pair.
#[derive(Debug, Clone, Default)]
pub struct CatalogStatus {
    /// Per-lesson status in catalog order.
    pub lessons: Vec<LessonStatus>,
    /// Markdown file stems in the content dir with no catalog entry.
    pub orphans: Vec<String>,
}

impl CatalogStatus {
    pub fn generated(&self) -> usize {
        self.count(ContentState::Generated)
    }

    pub fn pending(&self) -> usize {
        self.count(ContentState::Pending)
    }

    pub fn ungeneratable(&self) -> usize {
        self.count(ContentState::Ungeneratable)
    }

    fn count(&self, state: ContentState) -> usize {
        self.lessons.iter().filter(|l| l.state == state).count()
    }
}

/// Scan the catalog and content directory and build a coverage report.
pub fn catalog_status(modules: &[Module], content_dir: &Path) -> Result<CatalogStatus> {
    let mut report = CatalogStatus::default();
    let mut known_ids: HashSet<&str> = HashSet::new();

    for module in modules {
        for lesson in &module.lessons {
            known_ids.insert(lesson.id.as_str());

            let state = if selector::has_content(content_dir, &lesson.id)? {
                ContentState::Generated
            } else if lesson.description.as_deref().is_some_and(|d| !d.is_empty()) {
                ContentState::Pending
            } else {
                ContentState::Ungeneratable
            };

            report.lessons.push(LessonStatus {
                module_id: module.id.clone(),
                lesson_id: lesson.id.clone(),
                title: lesson.title.clone(),
                state,
            });
        }
    }

    report.orphans = orphan_files(content_dir, &known_ids)?;
    Ok(report)
}

/// List `.md` file stems in the content directory with no catalog entry.
/// A missing content directory means no orphans.
fn orphan_files(content_dir: &Path, known_ids: &HashSet<&str>) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(content_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(LessonForgeError::io(content_dir, e)),
    };

    let mut orphans = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LessonForgeError::io(content_dir, e))?;
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if !known_ids.contains(stem) {
                orphans.push(stem.to_string());
            }
        }
    }

    orphans.sort();
    Ok(orphans)
}
