//! Text tokenization for indexing and query processing.
//!
//! Normalizes free text into a deduplicated list of lowercase terms:
//! lowercase, split on non-word characters, drop short tokens and common
//! English stop words, keep first-seen order. Both document indexing and
//! query parsing go through [`tokenize`], so the two sides always agree
//! on what a term is.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Common English function words excluded from the index.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
    "of", "with", "by", "is", "are", "was", "were", "be", "been", "have",
    "has", "had", "do", "does", "did", "will", "would", "could", "should",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Minimum token length; anything this short or shorter is discarded.
const MIN_TOKEN_CHARS: usize = 3;

/// Tokenize text into normalized, deduplicated terms.
///
/// Word characters are letters, digits, and underscores; every other
/// character acts as a separator. Duplicates are removed preserving
/// first-seen order, so the output is deterministic for a given input.
///
/// # Example
///
/// ```
/// use worklens::tokenize;
///
/// let tokens = tokenize("The Quick Brown Fox!");
/// assert_eq!(tokens, vec!["quick", "brown", "fox"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    split_terms(&lowered)
}

/// Like [`tokenize`] but keeps each term's original casing, for
/// case-sensitive query parsing. Stop words are still recognized
/// case-insensitively.
pub(crate) fn tokenize_preserving_case(text: &str) -> Vec<String> {
    split_terms(text)
}

fn split_terms(text: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut tokens = Vec::new();
    for token in text.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
        if token.chars().count() < MIN_TOKEN_CHARS {
            continue;
        }
        if STOP_WORD_SET.contains(token.to_lowercase().as_str()) {
            continue;
        }
        if seen.insert(token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}
