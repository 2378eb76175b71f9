//! Per-lesson generation unit: find sources → enrich → synthesize → persist.
//!
//! The three external calls are strictly sequential: synthesis never runs
//! without a source-finding attempt, and persistence never runs on a
//! synthesis failure.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, instrument};

use lessonforge_catalog::{Module, find_lesson};
use lessonforge_shared::{
    ContentExtractor, GenerationResult, LessonConfig, LessonForgeError, Result, SourceFinder,
    SourceRecord, Synthesizer,
};

use crate::writer;

/// Maximum number of sources carried into synthesis and provenance.
const MAX_SOURCES: usize = 5;

/// A generation that has been persisted to disk.
#[derive(Debug)]
pub struct SavedLesson {
    /// The generated content and provenance records.
    pub result: GenerationResult,
    /// Where the markdown body was written.
    pub path: PathBuf,
}

/// The per-lesson generation unit with its injected provider handles.
///
/// Clients are constructed once at process start and passed in; there is
/// no hidden module-level state, so tests substitute scripted providers.
pub struct GenerationPipeline {
    finder: Box<dyn SourceFinder>,
    extractor: Box<dyn ContentExtractor>,
    synthesizer: Box<dyn Synthesizer>,
    content_dir: PathBuf,
    num_results: usize,
}

impl GenerationPipeline {
    pub fn new(
        finder: Box<dyn SourceFinder>,
        extractor: Box<dyn ContentExtractor>,
        synthesizer: Box<dyn Synthesizer>,
        content_dir: PathBuf,
        num_results: usize,
    ) -> Self {
        Self {
            finder,
            extractor,
            synthesizer,
            content_dir,
            num_results,
        }
    }

    /// Directory that holds generated lesson markdown.
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Run the generation unit for one lesson without persisting.
    ///
    /// Steps, in order:
    /// 1. Search for candidate sources (fatal on provider error)
    /// 2. Enrich each source via the extractor, keeping the inline excerpt
    ///    when extraction yields nothing (never fatal)
    /// 3. Synthesize the lesson body (fatal on provider/shape error)
    /// 4. Stamp provenance records with today's date
    #[instrument(skip_all, fields(lesson = %lesson.id))]
    pub async fn generate(&self, lesson: &LessonConfig) -> Result<GenerationResult> {
        info!(title = %lesson.title, query = %lesson.search_query, "generating lesson");

        let found = self
            .finder
            .find_sources(&lesson.search_query, self.num_results)
            .await?;
        debug!(found = found.len(), "sources found");

        let mut sources: Vec<_> = found.into_iter().take(MAX_SOURCES).collect();

        if self.extractor.is_enabled() {
            for source in &mut sources {
                let extracted = self.extractor.extract(&source.url).await;
                if !extracted.is_empty() {
                    debug!(url = %source.url, chars = extracted.len(), "source enriched");
                    source.content = extracted;
                }
            }
        }

        let markdown = self.synthesizer.synthesize(lesson, &sources).await?;

        let accessed_date = Utc::now().date_naive();
        let records = sources
            .iter()
            .map(|s| SourceRecord::from_source(s, accessed_date))
            .collect();

        Ok(GenerationResult {
            markdown,
            sources: records,
        })
    }

    /// Run the generation unit and persist the outcome.
    pub async fn generate_and_save(&self, lesson: &LessonConfig) -> Result<SavedLesson> {
        let result = self.generate(lesson).await?;

        let path = writer::save_lesson(&self.content_dir, &lesson.id, &result.markdown)?;
        writer::save_sources(&self.content_dir, &lesson.id, &result.sources)?;

        info!(lesson = %lesson.id, path = %path.display(), "lesson saved");
        Ok(SavedLesson { result, path })
    }
}

/// Generate and persist a single lesson by id (the request/response path).
///
/// An unknown or empty id is an invalid request; everything else follows
/// the same generation unit as the batch. Callers wrapping this in a
/// synchronous trigger classify failures via [`LessonForgeError::class`].
pub async fn generate_single(
    pipeline: &GenerationPipeline,
    modules: &[Module],
    lesson_id: &str,
) -> Result<SavedLesson> {
    if lesson_id.trim().is_empty() {
        return Err(LessonForgeError::validation("lesson id is required"));
    }

    let lesson = find_lesson(modules, lesson_id).ok_or_else(|| {
        LessonForgeError::validation(format!("lesson '{lesson_id}' not found in catalog"))
    })?;

    pipeline.generate_and_save(&lesson).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use lessonforge_catalog::Lesson;
    use lessonforge_shared::{Difficulty, FailureClass, Source};

    fn temp_content_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lf-pipeline-test-{tag}-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_lesson() -> LessonConfig {
        LessonConfig {
            id: "design-tokens".into(),
            title: "Design Tokens".into(),
            description: "Named values.".into(),
            estimated_time: 20,
            difficulty: Difficulty::Intermediate,
            search_query: "design tokens ...".into(),
            module_id: "terminology".into(),
        }
    }

    fn make_modules() -> Vec<Module> {
        vec![Module {
            id: "terminology".into(),
            title: "Terminology".into(),
            description: None,
            lessons: vec![Lesson {
                id: "design-tokens".into(),
                title: "Design Tokens".into(),
                description: Some("Named values.".into()),
                estimated_time: Some(20),
                difficulty: Some(Difficulty::Intermediate),
            }],
        }]
    }

    struct FixedFinder {
        sources: Vec<Source>,
    }

    #[async_trait]
    impl SourceFinder for FixedFinder {
        async fn find_sources(&self, _query: &str, _num_results: usize) -> Result<Vec<Source>> {
            Ok(self.sources.clone())
        }
    }

    /// Extractor that returns a canned body for one URL and empty otherwise.
    struct MapExtractor {
        url: String,
        body: String,
    }

    #[async_trait]
    impl ContentExtractor for MapExtractor {
        async fn extract(&self, url: &str) -> String {
            if url == self.url {
                self.body.clone()
            } else {
                String::new()
            }
        }
        fn is_enabled(&self) -> bool {
            true
        }
    }

    struct DisabledExtractor;

    #[async_trait]
    impl ContentExtractor for DisabledExtractor {
        async fn extract(&self, _url: &str) -> String {
            String::new()
        }
        fn is_enabled(&self) -> bool {
            false
        }
    }

    /// Synthesizer that records the sources it was handed.
    #[derive(Default)]
    struct CapturingSynthesizer {
        seen: Mutex<Vec<Source>>,
    }

    #[async_trait]
    impl Synthesizer for CapturingSynthesizer {
        async fn synthesize(&self, lesson: &LessonConfig, sources: &[Source]) -> Result<String> {
            *self.seen.lock().unwrap() = sources.to_vec();
            Ok(format!("# {}\n\n## Overview\n\nBody.\n", lesson.title))
        }
    }

    fn source(n: usize) -> Source {
        Source {
            title: format!("S{n}"),
            url: format!("https://example.com/{n}"),
            content: format!("inline excerpt {n}"),
            author: None,
            published_date: None,
        }
    }

    #[tokio::test]
    async fn generate_caps_sources_at_five() {
        let dir = temp_content_dir("cap");
        let pipeline = GenerationPipeline::new(
            Box::new(FixedFinder {
                sources: (1..=8).map(source).collect(),
            }),
            Box::new(DisabledExtractor),
            Box::new(CapturingSynthesizer::default()),
            dir.clone(),
            8,
        );

        let result = pipeline.generate(&make_lesson()).await.expect("generate");
        assert_eq!(result.sources.len(), 5);
        assert_eq!(result.sources[0].title, "S1");
        assert_eq!(result.sources[4].title, "S5");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn zero_search_results_still_reach_the_synthesizer() {
        let dir = temp_content_dir("zero");
        let pipeline = GenerationPipeline::new(
            Box::new(FixedFinder { sources: vec![] }),
            Box::new(DisabledExtractor),
            Box::new(CapturingSynthesizer::default()),
            dir.clone(),
            5,
        );

        let result = pipeline.generate(&make_lesson()).await.expect("generate");
        assert!(result.sources.is_empty());
        assert!(result.markdown.contains("# Design Tokens"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn enrichment_replaces_content_and_falls_back_on_empty() {
        let dir = temp_content_dir("enrich");
        let synthesizer = std::sync::Arc::new(CapturingSynthesizer::default());

        struct SharedSynth(std::sync::Arc<CapturingSynthesizer>);

        #[async_trait]
        impl Synthesizer for SharedSynth {
            async fn synthesize(&self, lesson: &LessonConfig, sources: &[Source]) -> Result<String> {
                self.0.synthesize(lesson, sources).await
            }
        }

        let pipeline = GenerationPipeline::new(
            Box::new(FixedFinder {
                sources: vec![source(1), source(2)],
            }),
            Box::new(MapExtractor {
                url: "https://example.com/1".into(),
                body: "# Rich markdown body".into(),
            }),
            Box::new(SharedSynth(synthesizer.clone())),
            dir.clone(),
            5,
        );

        pipeline.generate(&make_lesson()).await.expect("generate");

        let seen = synthesizer.seen.lock().unwrap();
        assert_eq!(seen[0].content, "# Rich markdown body");
        // Extraction returned empty for source 2 → inline excerpt kept.
        assert_eq!(seen[1].content, "inline excerpt 2");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn generate_single_unknown_lesson_is_invalid_request() {
        let dir = temp_content_dir("single-unknown");
        let pipeline = GenerationPipeline::new(
            Box::new(FixedFinder { sources: vec![] }),
            Box::new(DisabledExtractor),
            Box::new(CapturingSynthesizer::default()),
            dir.clone(),
            5,
        );

        let err = generate_single(&pipeline, &make_modules(), "missing-lesson")
            .await
            .unwrap_err();
        assert_eq!(err.class(), FailureClass::InvalidRequest);
        assert!(err.to_string().contains("missing-lesson"));

        let err = generate_single(&pipeline, &make_modules(), "  ")
            .await
            .unwrap_err();
        assert_eq!(err.class(), FailureClass::InvalidRequest);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn generate_single_saves_body_and_sidecar() {
        let dir = temp_content_dir("single-save");
        let pipeline = GenerationPipeline::new(
            Box::new(FixedFinder {
                sources: vec![source(1)],
            }),
            Box::new(DisabledExtractor),
            Box::new(CapturingSynthesizer::default()),
            dir.clone(),
            5,
        );

        let saved = generate_single(&pipeline, &make_modules(), "design-tokens")
            .await
            .expect("generate");

        assert_eq!(saved.path, dir.join("design-tokens.md"));
        assert!(saved.path.exists());
        assert!(dir.join("design-tokens.sources.json").exists());
        assert_eq!(saved.result.sources.len(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
