// File: src/core/normalizer.rs
use crate::core::stemmer::Stemmer;
use crate::core::stopwords::StopWords;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

/// Deterministic review-text cleaner. The steps run in a fixed order and each
/// one relies on the previous ones having run.
#[derive(Clone)]
pub struct TextNormalizer {
    stemmer: Arc<dyn Stemmer>,
    stop_words: Arc<StopWords>,
}

impl TextNormalizer {
    pub fn new(stemmer: Arc<dyn Stemmer>, stop_words: Arc<StopWords>) -> Self {
        Self { stemmer, stop_words }
    }

    /// Case folding, digit and symbol removal, whitespace collapsing, stemming
    /// and stopword filtering. Empty or all-noise input yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        let cleaned = clean(text);
        if cleaned.is_empty() {
            return cleaned;
        }
        let stemmed = self.stemmer.stem_text(&cleaned);
        stemmed
            .split_whitespace()
            .filter(|token| !self.stop_words.contains(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

lazy_static! {
    static ref DIGIT_REGEX: Regex = Regex::new(r"\d+").unwrap();
    static ref SYMBOL_REGEX: Regex = Regex::new(r"[^\p{Alphabetic}\p{N}\s]").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// Steps 1-4: lowercase, drop decimal digits, drop anything that is neither
/// alphanumeric nor whitespace, then collapse whitespace.
fn clean(text: &str) -> String {
    let lowered = text.to_lowercase();
    let no_digits = DIGIT_REGEX.replace_all(&lowered, "");
    let no_symbols = SYMBOL_REGEX.replace_all(&no_digits, "");
    WHITESPACE_REGEX
        .replace_all(&no_symbols, " ")
        .trim()
        .to_string()
}
