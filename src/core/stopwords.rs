// File: src/core/stopwords.rs
use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};

/// High-frequency words dropped after stemming.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Reads one word per line. Blank lines and lines starting with `#` are skipped.
    pub fn from_reader<R: Read>(reader: R) -> std::io::Result<Self> {
        let mut words = HashSet::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() && !word.starts_with('#') {
                words.insert(word.to_lowercase());
            }
        }
        Ok(Self { words })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}
