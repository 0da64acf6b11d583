//! Configuration loading and management.

use crate::core::classifier::DEFAULT_ALPHA;
use crate::core::types::DEFAULT_POSITIVE_THRESHOLD;
use crate::core::vectorizer::DEFAULT_MIN_DF;
use crate::error::{Result, SentimentError};
use crate::sampling::smote::{DEFAULT_K_NEIGHBORS, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Everything the pipeline needs to train or load itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSV file with `review` and `rating` columns.
    pub corpus_path: PathBuf,
    /// Directory holding the two persisted artifacts.
    pub artifact_dir: PathBuf,
    pub model_file: String,
    pub vectorizer_file: String,
    /// Root of the language resources; files live under `<resources_dir>/<language>/`.
    pub resources_dir: PathBuf,
    pub language: String,
    /// Minimum document frequency for a vocabulary token.
    pub min_df: usize,
    /// Share of the corpus held out for evaluation.
    pub test_size: f64,
    /// Seed for the train/test split and oversampling.
    pub seed: u64,
    pub k_neighbors: usize,
    /// Additive smoothing constant.
    pub alpha: f64,
    /// Ratings at or above this are positive.
    pub positive_threshold: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("Review Aplikasi Halodoc.csv"),
            artifact_dir: PathBuf::from("."),
            model_file: "naive_bayes_model.bin".to_string(),
            vectorizer_file: "count_vectorizer.bin".to_string(),
            resources_dir: PathBuf::from("resources"),
            language: "id".to_string(),
            min_df: DEFAULT_MIN_DF,
            test_size: 0.2,
            seed: DEFAULT_SEED,
            k_neighbors: DEFAULT_K_NEIGHBORS,
            alpha: DEFAULT_ALPHA,
            positive_threshold: DEFAULT_POSITIVE_THRESHOLD,
        }
    }
}

impl Config {
    /// Reads a JSON config file. Missing keys take their default value.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            SentimentError::Config(format!("cannot open '{}': {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            SentimentError::Config(format!("cannot parse '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_df == 0 {
            return Err(SentimentError::Config("min_df must be at least 1".into()));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(SentimentError::Config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.k_neighbors == 0 {
            return Err(SentimentError::Config("k_neighbors must be at least 1".into()));
        }
        if !(self.alpha > 0.0) {
            return Err(SentimentError::Config(format!(
                "alpha must be positive, got {}",
                self.alpha
            )));
        }
        if self.model_file == self.vectorizer_file {
            return Err(SentimentError::Config(
                "model_file and vectorizer_file must differ".into(),
            ));
        }
        Ok(())
    }

    pub fn model_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.model_file)
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.vectorizer_file)
    }

    pub fn language_resources_dir(&self) -> PathBuf {
        self.resources_dir.join(&self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_reference_setup() {
        let config = Config::default();
        assert_eq!(config.min_df, 5);
        assert_eq!(config.seed, 42);
        assert_eq!(config.k_neighbors, 5);
        assert_eq!(config.positive_threshold, 3);
        assert_eq!(config.model_path(), PathBuf::from("./naive_bayes_model.bin"));
        assert_eq!(config.language_resources_dir(), PathBuf::from("resources/id"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_df": 2, "artifact_dir": "/tmp/artifacts"}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.min_df, 2);
        assert_eq!(config.artifact_dir, PathBuf::from("/tmp/artifacts"));
        assert_eq!(config.test_size, 0.2);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"test_size": 1.5}}"#).unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(SentimentError::Config(_))
        ));

        let config = Config {
            min_df: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        assert!(matches!(
            Config::from_file("/definitely/not/here.json"),
            Err(SentimentError::Config(_))
        ));
    }
}
