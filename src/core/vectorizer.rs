// --- File: src/core/vectorizer.rs
use crate::core::traits::{Fittable, Transformer};
use crate::core::types::CountVector;
use crate::error::{Result, SentimentError, TrainingError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Minimum number of documents a token must appear in to enter the vocabulary.
pub const DEFAULT_MIN_DF: usize = 5;

/// Token to column mapping. Columns follow the lexicographic order of the
/// tokens, so the layout only depends on the set of tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        tokens.sort();
        tokens.dedup();
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { tokens, index }
    }

    pub fn column(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Bag-of-words count vectorizer over already-normalized text.
///
/// Documents are split on whitespace. `fit` may only run once; `transform`
/// never touches the vocabulary and drops tokens it does not know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountVectorizer {
    min_df: usize,
    vocabulary: Option<Vocabulary>,
}

impl CountVectorizer {
    pub fn new(min_df: usize) -> Self {
        Self {
            min_df,
            vocabulary: None,
        }
    }

    pub fn min_df(&self) -> usize {
        self.min_df
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// Transforms a batch of documents.
    pub fn transform_all<S: AsRef<str>>(&self, docs: &[S]) -> Result<Vec<CountVector>> {
        docs.iter().map(|doc| self.transform(doc.as_ref())).collect()
    }

    /// Document frequency of every token in the corpus.
    fn document_frequencies<S: AsRef<str>>(corpus: &[S]) -> BTreeMap<&str, usize> {
        let mut frequencies = BTreeMap::new();
        for doc in corpus {
            let unique: HashSet<&str> = doc.as_ref().split_whitespace().collect();
            for token in unique {
                *frequencies.entry(token).or_insert(0) += 1;
            }
        }
        frequencies
    }
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DF)
    }
}

impl<S: AsRef<str>> Fittable<[S], Vocabulary> for CountVectorizer {
    fn fit(&mut self, corpus: &[S]) -> Result<Vocabulary> {
        if self.vocabulary.is_some() {
            return Err(TrainingError::AlreadyFitted.into());
        }
        let kept = Self::document_frequencies(corpus)
            .into_iter()
            .filter(|&(_, df)| df >= self.min_df)
            .map(|(token, _)| token);
        let vocabulary = Vocabulary::from_tokens(kept);
        if vocabulary.is_empty() {
            return Err(TrainingError::EmptyVocabulary {
                min_df: self.min_df,
            }
            .into());
        }
        self.vocabulary = Some(vocabulary.clone());
        Ok(vocabulary)
    }
}

impl Transformer<str, CountVector> for CountVectorizer {
    fn transform(&self, doc: &str) -> Result<CountVector> {
        let vocabulary = self.vocabulary.as_ref().ok_or(SentimentError::NotFitted)?;
        let mut counts = vec![0u32; vocabulary.len()];
        for token in doc.split_whitespace() {
            if let Some(column) = vocabulary.column(token) {
                counts[column] += 1;
            }
        }
        Ok(counts)
    }
}
