//! Lesson synthesis: prompt assembly and the Anthropic messages client.
//!
//! Turns a lesson's metadata plus up to five gathered sources into one
//! structured prompt, invokes the model with a bounded output budget, and
//! extracts the markdown body from the first text content block.

mod client;
mod prompt;
mod structure;

pub use client::{ANTHROPIC_API_URL, AnthropicClient, DEFAULT_MODEL, SynthesisOptions};
pub use prompt::{MAX_PROMPT_SOURCES, build_prompt};
pub use structure::{TARGET_WORDS_MAX, TARGET_WORDS_MIN, has_section_headers, word_count};
