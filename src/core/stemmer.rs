// File: src/core/stemmer.rs
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Read};

/// Shortest stem the rule-based stripper will produce.
const MIN_STEM_LEN: usize = 4;
/// `di-`, `ke-` and `se-` are short enough to be part of many roots, so they
/// need a longer remainder before they are stripped.
const MIN_STEM_LEN_SHORT_PREFIX: usize = 5;
const MAX_PREFIXES: usize = 3;

const PARTICLES: [&str; 4] = ["lah", "kah", "tah", "pun"];
const POSSESSIVES: [&str; 3] = ["nya", "ku", "mu"];
const DERIVATIONAL_SUFFIXES: [&str; 3] = ["kan", "an", "i"];

/// Reduces inflected word forms to a root.
pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;

    /// Stems each whitespace-separated token and rejoins them with single spaces.
    fn stem_text(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| self.stem(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Affix-stripping stemmer for Indonesian.
///
/// Without a root dictionary every rule whose remainder is long enough is
/// applied, and the result is iterated until it stops changing. With a root
/// dictionary a candidate is only accepted when the dictionary knows it; a word
/// with no known root is returned unchanged.
#[derive(Debug, Clone, Default)]
pub struct IndonesianStemmer {
    root_words: Option<HashSet<String>>,
}

impl IndonesianStemmer {
    pub fn new() -> Self {
        Self { root_words: None }
    }

    pub fn with_root_words(root_words: HashSet<String>) -> Self {
        Self {
            root_words: Some(root_words),
        }
    }

    /// Reads a root dictionary, one word per line. `#` starts a comment line.
    pub fn from_root_words_reader<R: Read>(reader: R) -> std::io::Result<Self> {
        let mut root_words = HashSet::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() && !word.starts_with('#') {
                root_words.insert(word.to_lowercase());
            }
        }
        Ok(Self::with_root_words(root_words))
    }

    pub fn has_dictionary(&self) -> bool {
        self.root_words.is_some()
    }

    fn stem_with_rules(&self, word: &str) -> String {
        let mut current = word.to_string();
        loop {
            let next = strip_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn stem_with_dictionary(&self, word: &str, roots: &HashSet<String>) -> String {
        if roots.contains(word) {
            return word.to_string();
        }
        let suffix_forms = suffix_chain(word);
        if let Some(found) = suffix_forms.iter().find(|form| roots.contains(form.as_str())) {
            return found.clone();
        }
        for form in &suffix_forms {
            for candidate in prefix_candidates(form, MAX_PREFIXES) {
                if roots.contains(&candidate) {
                    return candidate;
                }
            }
        }
        word.to_string()
    }
}

impl Stemmer for IndonesianStemmer {
    fn stem(&self, word: &str) -> String {
        match &self.root_words {
            Some(roots) => self.stem_with_dictionary(word, roots),
            None => self.stem_with_rules(word),
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn starts_with_vowel(s: &str) -> bool {
    s.chars().next().map_or(false, is_vowel)
}

fn starts_with_any(s: &str, set: &[char]) -> bool {
    s.chars().next().map_or(false, |c| set.contains(&c))
}

fn starts_with_consonant(s: &str) -> bool {
    s.chars()
        .next()
        .map_or(false, |c| c.is_alphabetic() && !is_vowel(c))
}

/// One prefix removal with nasal restoration. Alternatives are ordered from the
/// most to the least common reading.
fn strip_prefix_step(word: &str) -> Vec<String> {
    if let Some(rest) = word.strip_prefix("meng").or_else(|| word.strip_prefix("peng")) {
        return if starts_with_vowel(rest) {
            vec![rest.to_string(), format!("k{}", rest)]
        } else {
            vec![rest.to_string()]
        };
    }
    if let Some(rest) = word.strip_prefix("meny").or_else(|| word.strip_prefix("peny")) {
        if starts_with_vowel(rest) {
            return vec![format!("s{}", rest)];
        }
    }
    if let Some(rest) = word.strip_prefix("mem").or_else(|| word.strip_prefix("pem")) {
        if starts_with_any(rest, &['b', 'f', 'v', 'p']) {
            return vec![rest.to_string()];
        }
        if starts_with_vowel(rest) {
            return vec![format!("p{}", rest), format!("m{}", rest)];
        }
    }
    if let Some(rest) = word.strip_prefix("men").or_else(|| word.strip_prefix("pen")) {
        if starts_with_any(rest, &['c', 'd', 'j', 'z', 't', 's']) {
            return vec![rest.to_string()];
        }
        if starts_with_vowel(rest) {
            return vec![format!("t{}", rest), format!("n{}", rest)];
        }
    }
    if let Some(rest) = word.strip_prefix("me") {
        if starts_with_any(rest, &['l', 'r', 'w', 'y', 'm', 'n']) {
            return vec![rest.to_string()];
        }
    }
    if let Some(rest) = word.strip_prefix("per").or_else(|| word.strip_prefix("ber")) {
        return vec![rest.to_string()];
    }
    if let Some(rest) = word.strip_prefix("pe") {
        if starts_with_consonant(rest) {
            return vec![rest.to_string()];
        }
    }
    if let Some(rest) = word.strip_prefix("be") {
        let mut chars = rest.chars();
        if chars.next().map_or(false, |c| !is_vowel(c)) && chars.as_str().starts_with("er") {
            return vec![rest.to_string()];
        }
    }
    if let Some(rest) = word.strip_prefix("ter") {
        return vec![rest.to_string()];
    }
    for prefix in ["di", "ke", "se"] {
        if let Some(rest) = word.strip_prefix(prefix) {
            return vec![rest.to_string()];
        }
    }
    Vec::new()
}

fn has_short_prefix(word: &str) -> bool {
    ["di", "ke", "se"].iter().any(|p| word.starts_with(p))
}

fn min_len_after_prefix(word: &str) -> usize {
    if has_short_prefix(word) {
        MIN_STEM_LEN_SHORT_PREFIX
    } else {
        MIN_STEM_LEN
    }
}

fn strip_suffix_from<'a>(word: &'a str, suffixes: &[&str], min_len: usize) -> &'a str {
    for suffix in suffixes {
        if let Some(rest) = word.strip_suffix(suffix) {
            if char_len(rest) >= min_len {
                return rest;
            }
        }
    }
    word
}

/// Prefixes first, then particle, possessive and derivational suffixes.
/// `di-`, `ke-` and `se-` are only recognised as the outermost prefix, and
/// `-i` only comes off together with a prefix.
fn strip_once(word: &str) -> String {
    let mut current = word.to_string();
    for depth in 0..MAX_PREFIXES {
        if depth > 0 && has_short_prefix(&current) {
            break;
        }
        let min_len = min_len_after_prefix(&current);
        match strip_prefix_step(&current).into_iter().next() {
            Some(candidate) if char_len(&candidate) >= min_len => current = candidate,
            _ => break,
        }
    }
    let had_prefix = current != word;
    let current = strip_suffix_from(&current, &PARTICLES, MIN_STEM_LEN);
    let current = strip_suffix_from(current, &POSSESSIVES, MIN_STEM_LEN);
    // A bare -i is almost always part of the root (sekali, kali, hati).
    let derivational: &[&str] = if had_prefix {
        &DERIVATIONAL_SUFFIXES
    } else {
        &DERIVATIONAL_SUFFIXES[..2]
    };
    strip_suffix_from(current, derivational, MIN_STEM_LEN).to_string()
}

/// The word with progressively more suffix classes removed.
fn suffix_chain(word: &str) -> Vec<String> {
    let mut forms = vec![word.to_string()];
    let mut current = word;
    for suffixes in [&PARTICLES[..], &POSSESSIVES[..], &DERIVATIONAL_SUFFIXES[..]] {
        let next = strip_suffix_from(current, suffixes, 2);
        if next != current {
            forms.push(next.to_string());
            current = next;
        }
    }
    forms
}

/// Every form reachable by removing up to `depth` prefixes.
fn prefix_candidates(word: &str, depth: usize) -> Vec<String> {
    let mut candidates = Vec::new();
    if depth == 0 {
        return candidates;
    }
    for candidate in strip_prefix_step(word) {
        if char_len(&candidate) < 2 {
            continue;
        }
        let deeper = prefix_candidates(&candidate, depth - 1);
        candidates.push(candidate);
        candidates.extend(deeper);
    }
    candidates
}

/// Table-driven stemmer. Each line holds a stem followed by its inflections,
/// comma separated; unknown words are returned unchanged.
pub struct HashMapStemmer {
    values: HashMap<String, String>,
}

impl HashMapStemmer {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut values = HashMap::<String, String>::new();
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .quoting(false)
            .flexible(true)
            .has_headers(false)
            .from_reader(reader);

        for record in csv_reader.records() {
            let elements = record?;
            let stem = match elements.get(0) {
                Some(stem) if !stem.is_empty() => stem,
                _ => continue,
            };
            for value in elements.iter().skip(1) {
                values.insert(value.to_string(), stem.to_string());
            }
        }
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Stemmer for HashMapStemmer {
    fn stem(&self, value: &str) -> String {
        self.values
            .get(value)
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }
}
