//! Language resources: stopword list and stemmer.

use crate::core::normalizer::TextNormalizer;
use crate::core::stemmer::{HashMapStemmer, IndonesianStemmer, Stemmer};
use crate::core::stopwords::StopWords;
use crate::error::{Result, SentimentError};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub const STOP_WORDS_FILE: &str = "stopwords.txt";
pub const ROOT_WORDS_FILE: &str = "root_words.txt";
pub const STEMS_FILE: &str = "stems.txt";

/// Resources shared by every normalization call, loaded once at startup.
#[derive(Clone)]
pub struct LanguageResources {
    pub stemmer: Arc<dyn Stemmer>,
    pub stop_words: Arc<StopWords>,
}

impl LanguageResources {
    pub fn new(stemmer: Arc<dyn Stemmer>, stop_words: Arc<StopWords>) -> Self {
        Self { stemmer, stop_words }
    }

    /// Loads `stopwords.txt` (required) and the stemmer from `dir`.
    ///
    /// `stems.txt` selects a table-driven stemmer; otherwise `root_words.txt`,
    /// when present, gives the rule-based stemmer a root dictionary.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let stop_words = load_stop_words(dir)?;
        let stemmer = load_stemmer(dir)?;
        Ok(Self::new(stemmer, Arc::new(stop_words)))
    }

    pub fn normalizer(&self) -> TextNormalizer {
        TextNormalizer::new(self.stemmer.clone(), self.stop_words.clone())
    }
}

fn unavailable(path: &Path, reason: impl ToString) -> SentimentError {
    SentimentError::ResourceUnavailable {
        resource: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn load_stop_words(dir: &Path) -> Result<StopWords> {
    let path = dir.join(STOP_WORDS_FILE);
    info!("Loading stop words ({:?}) ...", path);
    let file = File::open(&path).map_err(|e| unavailable(&path, e))?;
    let stop_words = StopWords::from_reader(file).map_err(|e| unavailable(&path, e))?;
    if stop_words.is_empty() {
        return Err(unavailable(&path, "stop word list is empty"));
    }
    info!("{} stop words loaded", stop_words.len());
    Ok(stop_words)
}

fn load_stemmer(dir: &Path) -> Result<Arc<dyn Stemmer>> {
    let stems_path = dir.join(STEMS_FILE);
    if stems_path.exists() {
        info!("Loading stem table ({:?}) ...", stems_path);
        let file = File::open(&stems_path).map_err(|e| unavailable(&stems_path, e))?;
        let stemmer = HashMapStemmer::from_reader(file).map_err(|e| unavailable(&stems_path, e))?;
        info!("Stem table loaded with {} entries", stemmer.len());
        return Ok(Arc::new(stemmer));
    }

    let roots_path = dir.join(ROOT_WORDS_FILE);
    if roots_path.exists() {
        info!("Loading root words ({:?}) ...", roots_path);
        let file = File::open(&roots_path).map_err(|e| unavailable(&roots_path, e))?;
        let stemmer = IndonesianStemmer::from_root_words_reader(file)
            .map_err(|e| unavailable(&roots_path, e))?;
        return Ok(Arc::new(stemmer));
    }

    info!("No stemming dictionary in {:?}, using affix rules", dir);
    Ok(Arc::new(IndonesianStemmer::new()))
}
