//! Structured prompt assembly for lesson synthesis.

use lessonforge_shared::{LessonConfig, Source};

/// Maximum number of sources included in one prompt.
pub const MAX_PROMPT_SOURCES: usize = 5;

/// Build the synthesis prompt from lesson metadata and gathered sources.
///
/// Each source contributes at most `source_char_cap` characters of content.
/// An empty source list is valid; the model is then asked to write from
/// the lesson metadata alone.
pub fn build_prompt(lesson: &LessonConfig, sources: &[Source], source_char_cap: usize) -> String {
    let capped = &sources[..sources.len().min(MAX_PROMPT_SOURCES)];

    let sources_text: String = capped
        .iter()
        .enumerate()
        .map(|(i, s)| format_source(i + 1, s, source_char_cap))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert technical educator creating a lesson for a design systems learning platform.\n\
         \n\
         LESSON DETAILS:\n\
         - Title: {title}\n\
         - Description: {description}\n\
         - Difficulty: {difficulty}\n\
         - Estimated Time: {estimated_time} minutes\n\
         \n\
         I have gathered {count} authoritative sources on this topic. Your task is to synthesize them into a comprehensive, engaging lesson in markdown format.\n\
         \n\
         SOURCES:\n\
         {sources_text}\n\
         \n\
         REQUIREMENTS:\n\
         1. Write a complete lesson (1500-2500 words) that teaches \"{title}\"\n\
         2. Use clear section headers (##) to organize content\n\
         3. Include practical examples and code snippets where relevant\n\
         4. Add blockquotes for key insights from industry leaders\n\
         5. Create actionable takeaways and next steps\n\
         6. Write in an engaging, educational tone (not dry documentation)\n\
         7. Use the sources above but synthesize them - don't just copy\n\
         8. Include internal links to related lessons where appropriate, using the /roadmap/<module-id>/<lesson-id> convention (e.g., [a related lesson](/roadmap/{module_id}/some-lesson))\n\
         \n\
         STRUCTURE:\n\
         # {title}\n\
         \n\
         [Opening paragraph that hooks the reader]\n\
         \n\
         ## [Main sections - 3-5 major topics]\n\
         \n\
         ## Key Takeaways\n\
         \n\
         ## Further Reading/Next Steps\n\
         \n\
         OUTPUT:\n\
         Only return the markdown content. Do not include meta-commentary.",
        title = lesson.title,
        description = lesson.description,
        difficulty = lesson.difficulty,
        estimated_time = lesson.estimated_time,
        count = capped.len(),
        module_id = lesson.module_id,
        sources_text = sources_text,
    )
}

/// Format one source block, clearly delimited from its neighbors.
fn format_source(index: usize, source: &Source, char_cap: usize) -> String {
    let mut block = format!("SOURCE {index}: {}\nURL: {}\n", source.title, source.url);

    if let Some(author) = &source.author {
        block.push_str(&format!("Author: {author}\n"));
    }
    if let Some(published) = &source.published_date {
        block.push_str(&format!("Published: {published}\n"));
    }

    let (content, truncated) = truncate_chars(&source.content, char_cap);
    block.push_str("\nCONTENT:\n");
    block.push_str(content);
    if truncated {
        block.push_str("...");
    }
    block.push_str("\n---\n");
    block
}

/// Truncate to at most `max_chars` characters, never splitting a char.
/// Returns the slice and whether truncation happened.
fn truncate_chars(s: &str, max_chars: usize) -> (&str, bool) {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&s[..byte_idx], true),
        None => (s, false),
    }
}
