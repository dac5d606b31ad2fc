//! Degraded local answer used when the provider keeps refusing
//!
//! Purely local: no cache, no quota, no network, and it cannot fail.

use crate::config::FallbackConfig;

const ELLIPSIS: &str = "...";

/// Build a substitute answer from the prompt itself.
///
/// Prompts longer than `word_threshold` words that contain at least three
/// `.`-separated segments become "first sentence. second-to-last sentence.".
/// Everything else is cut to `truncate_chars` characters with an ellipsis, or
/// returned unchanged if it already fits.
pub fn fallback_response(prompt: &str, config: &FallbackConfig) -> String {
    if prompt.split_whitespace().count() > config.word_threshold {
        let sentences: Vec<&str> = prompt.split('.').collect();
        if sentences.len() > 2 {
            let first = sentences[0].trim();
            let second_to_last = sentences[sentences.len() - 2].trim();
            return format!("{}. {}.", first, second_to_last);
        }
    }

    truncate_chars(prompt, config.truncate_chars)
}

fn truncate_chars(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
