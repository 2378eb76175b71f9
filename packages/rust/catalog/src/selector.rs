//! Lesson selection: which lessons still need generated content.
//!
//! A lesson "has content" exactly when its markdown file exists at the
//! deterministic per-lesson path. There is no separate completion ledger.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use lessonforge_shared::{LessonConfig, LessonForgeError, Result};

use crate::Module;

/// Fallback estimated time (minutes) for lessons that don't declare one.
const DEFAULT_ESTIMATED_TIME: u32 = 15;

/// Suffix appended to every search query to bias results toward
/// educational long-form content.
const SEARCH_QUERY_SUFFIX: &str = "comprehensive guide tutorial best practices";

/// Deterministic content file path for a lesson: `<content_dir>/<lesson_id>.md`.
pub fn content_path(content_dir: &Path, lesson_id: &str) -> PathBuf {
    content_dir.join(format!("{lesson_id}.md"))
}

/// Check whether a lesson already has generated content on disk.
///
/// "Not found" is a negative result; any other I/O error (permissions,
/// bad mount) propagates; it must not be silently treated as "missing".
pub fn has_content(content_dir: &Path, lesson_id: &str) -> Result<bool> {
    let path = content_path(content_dir, lesson_id);
    match std::fs::metadata(&path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(LessonForgeError::io(path, e)),
    }
}

/// Build the search query for a lesson from its title and description.
pub fn build_search_query(title: &str, description: &str) -> String {
    format!("{title} {description} {SEARCH_QUERY_SUFFIX}")
}

/// Produce the subset of catalog lessons lacking generated content.
///
/// Ordering is stable: module order, then lesson order within the module.
/// Batch `limit` semantics ("first N") rely on this. Lessons without a
/// description are excluded, since they cannot seed a search query.
pub fn lessons_needing_content(modules: &[Module], content_dir: &Path) -> Result<Vec<LessonConfig>> {
    let mut needing = Vec::new();

    for module in modules {
        for lesson in &module.lessons {
            if has_content(content_dir, &lesson.id)? {
                continue;
            }

            let Some(description) = lesson.description.as_deref().filter(|d| !d.is_empty())
            else {
                debug!(lesson = %lesson.id, "skipping: no description to search with");
                continue;
            };

            needing.push(lesson_config(module, lesson, description));
        }
    }

    Ok(needing)
}

/// Look up a single lesson by id across all modules.
///
/// Used by the single-lesson path, so (unlike batch selection) an existing
/// content file does not exclude it: re-generation overwrites.
pub fn find_lesson(modules: &[Module], lesson_id: &str) -> Option<LessonConfig> {
    for module in modules {
        if let Some(lesson) = module.lessons.iter().find(|l| l.id == lesson_id) {
            let description = lesson.description.clone().unwrap_or_default();
            return Some(lesson_config(module, lesson, &description));
        }
    }
    None
}

fn lesson_config(module: &Module, lesson: &crate::Lesson, description: &str) -> LessonConfig {
    LessonConfig {
        id: lesson.id.clone(),
        title: lesson.title.clone(),
        description: description.to_string(),
        estimated_time: lesson.estimated_time.unwrap_or(DEFAULT_ESTIMATED_TIME),
        difficulty: lesson.difficulty.unwrap_or_default(),
        search_query: build_search_query(&lesson.title, description),
        module_id: module.id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lesson;
    use lessonforge_shared::Difficulty;

    fn temp_content_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lf-selector-test-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_modules() -> Vec<Module> {
        vec![
            Module {
                id: "fundamentals".into(),
                title: "Fundamentals".into(),
                description: None,
                lessons: vec![
                    Lesson {
                        id: "welcome".into(),
                        title: "Welcome to the System".into(),
                        description: Some("Why we have a design system.".into()),
                        estimated_time: Some(10),
                        difficulty: Some(Difficulty::Beginner),
                    },
                    Lesson {
                        id: "no-description".into(),
                        title: "Undocumented".into(),
                        description: None,
                        estimated_time: None,
                        difficulty: None,
                    },
                ],
            },
            Module {
                id: "terminology".into(),
                title: "Terminology".into(),
                description: None,
                lessons: vec![Lesson {
                    id: "design-tokens".into(),
                    title: "Design Tokens".into(),
                    description: Some("Named values for visual decisions.".into()),
                    estimated_time: None,
                    difficulty: Some(Difficulty::Intermediate),
                }],
            },
        ]
    }

    #[test]
    fn content_path_is_deterministic() {
        let path = content_path(Path::new("public/content/lessons"), "design-tokens");
        assert_eq!(
            path,
            Path::new("public/content/lessons/design-tokens.md")
        );
    }

    #[test]
    fn search_query_has_fixed_suffix() {
        let q = build_search_query("Design Tokens", "Named values.");
        assert_eq!(
            q,
            "Design Tokens Named values. comprehensive guide tutorial best practices"
        );
    }

    #[test]
    fn selects_lessons_without_content_in_catalog_order() {
        let dir = temp_content_dir();
        let modules = make_modules();

        let needing = lessons_needing_content(&modules, &dir).expect("select");
        let ids: Vec<&str> = needing.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["welcome", "design-tokens"]);

        // Defaults fill in for missing catalog fields.
        let tokens = &needing[1];
        assert_eq!(tokens.estimated_time, 15);
        assert_eq!(tokens.module_id, "terminology");
        assert!(tokens.search_query.ends_with("comprehensive guide tutorial best practices"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn excludes_lessons_with_existing_files() {
        let dir = temp_content_dir();
        let modules = make_modules();
        std::fs::write(dir.join("welcome.md"), "# Welcome\n").unwrap();

        let needing = lessons_needing_content(&modules, &dir).expect("select");
        let ids: Vec<&str> = needing.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["design-tokens"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn excludes_lessons_without_description_even_when_missing_content() {
        let dir = temp_content_dir();
        let modules = make_modules();

        let needing = lessons_needing_content(&modules, &dir).expect("select");
        assert!(needing.iter().all(|l| l.id != "no-description"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn selection_is_idempotent() {
        let dir = temp_content_dir();
        let modules = make_modules();

        let first = lessons_needing_content(&modules, &dir).expect("select");
        let second = lessons_needing_content(&modules, &dir).expect("select again");
        assert_eq!(
            first.iter().map(|l| &l.id).collect::<Vec<_>>(),
            second.iter().map(|l| &l.id).collect::<Vec<_>>()
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_content_dir_means_nothing_has_content() {
        let dir = std::env::temp_dir().join("lf-selector-test-does-not-exist");
        let modules = make_modules();

        // Probing a nonexistent directory is a negative result, not an error.
        let needing = lessons_needing_content(&modules, &dir).expect("select");
        assert_eq!(needing.len(), 2);
    }

    #[test]
    fn find_lesson_by_id() {
        let modules = make_modules();

        let found = find_lesson(&modules, "design-tokens").expect("found");
        assert_eq!(found.title, "Design Tokens");
        assert_eq!(found.module_id, "terminology");

        assert!(find_lesson(&modules, "nope").is_none());
    }

    #[test]
    fn find_lesson_tolerates_missing_description() {
        let modules = make_modules();
        let found = find_lesson(&modules, "no-description").expect("found");
        assert_eq!(found.description, "");
    }
}
