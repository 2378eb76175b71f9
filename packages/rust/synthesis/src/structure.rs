//! Structural inspection of synthesized markdown.
//!
//! Model output is non-deterministic, so nothing here gates success; the
//! pipeline only logs when output drifts far from the prompt's targets.

use std::sync::LazyLock;

use regex::Regex;

/// Lower bound of the prompt's word-count target.
pub const TARGET_WORDS_MIN: usize = 1_500;

/// Upper bound of the prompt's word-count target.
pub const TARGET_WORDS_MAX: usize = 2_500;

/// Count words in a markdown body, excluding fenced code blocks.
pub fn word_count(markdown: &str) -> usize {
    static CODE_BLOCK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid regex"));

    let without_code = CODE_BLOCK_RE.replace_all(markdown, "");
    without_code.split_whitespace().count()
}

/// Whether the body contains at least one second-level section header.
pub fn has_section_headers(markdown: &str) -> bool {
    static H2_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^## ").expect("valid regex"));

    H2_RE.is_match(markdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_excludes_code_fences() {
        let md = "# Title\n\nOne two three.\n\n```rust\nlet lots = \"of code words here\";\n```\n";
        assert_eq!(word_count(md), 5);
    }

    #[test]
    fn word_count_plain_text() {
        assert_eq!(word_count("alpha beta gamma"), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn detects_section_headers() {
        assert!(has_section_headers("# T\n\n## Section One\n\nBody."));
        assert!(!has_section_headers("# T\n\nOnly a title and prose."));
        // An h2 mid-line is not a header.
        assert!(!has_section_headers("This mentions ## inline."));
    }
}
