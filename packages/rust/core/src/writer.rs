//! Persistence of generated lesson content.
//!
//! One markdown file per lesson at `<content_dir>/<lesson_id>.md`; this
//! file's existence is the sole "has content" signal. Provenance records
//! go to a `.sources.json` sidecar for the web app's source display.
//! Re-generation overwrites both.

use std::path::{Path, PathBuf};

use tracing::debug;

use lessonforge_catalog::content_path;
use lessonforge_shared::{LessonForgeError, Result, SourceRecord};

/// Write the lesson body as UTF-8 markdown, creating the content directory
/// if needed. Returns the path written.
pub fn save_lesson(content_dir: &Path, lesson_id: &str, markdown: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(content_dir).map_err(|e| LessonForgeError::io(content_dir, e))?;

    let path = content_path(content_dir, lesson_id);
    std::fs::write(&path, markdown).map_err(|e| LessonForgeError::io(&path, e))?;

    debug!(path = %path.display(), bytes = markdown.len(), "wrote lesson body");
    Ok(path)
}

/// Path of the provenance sidecar for a lesson.
pub fn sources_path(content_dir: &Path, lesson_id: &str) -> PathBuf {
    content_dir.join(format!("{lesson_id}.sources.json"))
}

/// Write the provenance records as pretty-printed JSON next to the body.
pub fn save_sources(
    content_dir: &Path,
    lesson_id: &str,
    records: &[SourceRecord],
) -> Result<PathBuf> {
    std::fs::create_dir_all(content_dir).map_err(|e| LessonForgeError::io(content_dir, e))?;

    let path = sources_path(content_dir, lesson_id);
    let json = serde_json::to_string_pretty(records).map_err(|e| {
        LessonForgeError::validation(format!("source records serialization failed: {e}"))
    })?;
    std::fs::write(&path, json).map_err(|e| LessonForgeError::io(&path, e))?;

    debug!(path = %path.display(), records = records.len(), "wrote source records");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lessonforge_shared::{Source, SourceRecord};

    fn temp_content_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lf-writer-test-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        // Not created here: save_lesson must handle a missing directory.
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn save_lesson_creates_dir_and_writes_utf8() {
        let dir = temp_content_dir();

        let path = save_lesson(&dir, "welcome", "# Welcome\n\nCafé ☕\n").expect("save");
        assert_eq!(path, dir.join("welcome.md"));

        let content = std::fs::read_to_string(&path).expect("read back");
        assert!(content.contains("Café ☕"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_lesson_overwrites_existing_content() {
        let dir = temp_content_dir();

        save_lesson(&dir, "welcome", "old body").expect("first save");
        save_lesson(&dir, "welcome", "new body").expect("second save");

        let content = std::fs::read_to_string(dir.join("welcome.md")).expect("read back");
        assert_eq!(content, "new body");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_sources_round_trips() {
        let dir = temp_content_dir();
        let source = Source {
            title: "Guide".into(),
            url: "https://example.com/guide".into(),
            content: "text".into(),
            author: None,
            published_date: Some("2024-05-05".into()),
        };
        let accessed = NaiveDate::from_ymd_opt(2025, 3, 3).expect("valid date");
        let records = vec![SourceRecord::from_source(&source, accessed)];

        let path = save_sources(&dir, "welcome", &records).expect("save");
        assert_eq!(path, dir.join("welcome.sources.json"));

        let json = std::fs::read_to_string(&path).expect("read back");
        let parsed: Vec<SourceRecord> = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, records);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
