//! Lesson catalog loading and selection.
//!
//! The catalog is a JSON array of modules, each holding ordered lessons:
//! the same data the web app renders as the roadmap. This crate loads it
//! and decides which lessons still need generated content.

pub mod selector;
pub mod status;

use std::path::Path;

use serde::{Deserialize, Serialize};

use lessonforge_shared::{Difficulty, LessonForgeError, Result};

pub use selector::{
    build_search_query, content_path, find_lesson, has_content, lessons_needing_content,
};
pub use status::{CatalogStatus, ContentState, LessonStatus, catalog_status};

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// An ordered grouping of lessons in the learning roadmap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Stable module slug.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Module summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lessons in display order.
    pub lessons: Vec<Lesson>,
}

/// A single catalog lesson entry.
///
/// Field names are camelCase on the wire because the catalog file is owned
/// by the TypeScript front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    /// Stable lesson slug, also the content file name.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Lesson summary; required for generation (it seeds the search query).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Minutes to complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
    /// Difficulty level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the lesson catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Vec<Module>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        LessonForgeError::catalog(format!("cannot read catalog at {}: {e}", path.display()))
    })?;

    let modules: Vec<Module> = serde_json::from_str(&content).map_err(|e| {
        LessonForgeError::catalog(format!("invalid catalog JSON at {}: {e}", path.display()))
    })?;

    tracing::debug!(
        path = %path.display(),
        modules = modules.len(),
        lessons = modules.iter().map(|m| m.lessons.len()).sum::<usize>(),
        "catalog loaded"
    );

    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_path(name: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    #[test]
    fn load_catalog_fixture() {
        let modules = load_catalog(&fixture_path("catalog/roadmap.json")).expect("load");
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].id, "fundamentals");
        assert_eq!(modules[0].lessons.len(), 3);

        let tokens = &modules[1].lessons[0];
        assert_eq!(tokens.id, "design-tokens");
        assert_eq!(tokens.estimated_time, Some(20));
        assert_eq!(tokens.difficulty, Some(Difficulty::Intermediate));
    }

    #[test]
    fn load_catalog_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/roadmap.json")).unwrap_err();
        assert!(err.to_string().contains("catalog"));
        assert!(err.to_string().contains("/nonexistent/roadmap.json"));
    }

    #[test]
    fn load_catalog_rejects_bad_json() {
        let dir = std::env::temp_dir().join("lf-catalog-test-bad-json");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roadmap.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_catalog(&path).unwrap_err();
        assert!(err.to_string().contains("invalid catalog JSON"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn lesson_optional_fields_default() {
        let json = r#"[{"id": "m", "title": "M", "lessons": [{"id": "l", "title": "L"}]}]"#;
        let modules: Vec<Module> = serde_json::from_str(json).expect("parse");
        let lesson = &modules[0].lessons[0];
        assert!(lesson.description.is_none());
        assert!(lesson.estimated_time.is_none());
        assert!(lesson.difficulty.is_none());
    }
}
