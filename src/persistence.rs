// File: src/persistence.rs
use crate::config::Config;
use crate::core::classifier::MultinomialNb;
use crate::core::vectorizer::CountVectorizer;
use crate::error::{Result, SentimentError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Bumped whenever the encoded layout of either artifact changes.
pub const FORMAT_VERSION: u32 = 1;

/// The fitted vectorizer and classifier that make up a trained pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub vectorizer: CountVectorizer,
    pub model: MultinomialNb,
}

impl Artifacts {
    /// Checks that the pair can be used together.
    pub fn check(&self) -> std::result::Result<(), String> {
        let vocabulary = self
            .vectorizer
            .vocabulary()
            .ok_or_else(|| "vectorizer is not fitted".to_string())?;
        if vocabulary.len() != self.model.n_features() {
            return Err(format!(
                "vocabulary has {} tokens but the model expects {}",
                vocabulary.len(),
                self.model.n_features()
            ));
        }
        Ok(())
    }
}

/// Durable storage for [`Artifacts`].
pub trait ArtifactStore {
    /// True when a complete artifact pair is present.
    fn exists(&self) -> bool;
    fn load(&self) -> Result<Artifacts>;
    fn save(&self, artifacts: &Artifacts) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    format_version: u32,
    payload: T,
}

/// Two bincode files: one for the vectorizer, one for the model.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    vectorizer_path: PathBuf,
    model_path: PathBuf,
}

impl FileArtifactStore {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(vectorizer_path: P, model_path: Q) -> Self {
        Self {
            vectorizer_path: vectorizer_path.into(),
            model_path: model_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.vectorizer_path(), config.model_path())
    }

    pub fn vectorizer_path(&self) -> &Path {
        &self.vectorizer_path
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

fn save_err(path: &Path, e: impl std::fmt::Display) -> SentimentError {
    SentimentError::ArtifactSave(format!("{}: {}", path.display(), e))
}

/// Encodes `payload` into a temporary file next to `path`. Nothing is visible at
/// `path` until the returned file is persisted.
fn write_temp<T: Serialize>(path: &Path, payload: &T) -> Result<NamedTempFile> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir).map_err(|e| save_err(parent_dir, e))?;

    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| save_err(parent_dir, e))?;
    {
        let mut writer = BufWriter::new(&temp_file);
        let envelope = Envelope {
            format_version: FORMAT_VERSION,
            payload,
        };
        bincode::serialize_into(&mut writer, &envelope).map_err(|e| save_err(path, e))?;
        writer.flush().map_err(|e| save_err(path, e))?;
    }
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| save_err(path, e))?;
    Ok(temp_file)
}

fn read_envelope<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let load_err = |reason: String| SentimentError::ArtifactLoad {
        path: path.to_path_buf(),
        reason,
    };
    let file = File::open(path).map_err(|e| load_err(e.to_string()))?;
    let reader = BufReader::new(file);
    let envelope: Envelope<T> =
        bincode::deserialize_from(reader).map_err(|e| load_err(e.to_string()))?;
    if envelope.format_version != FORMAT_VERSION {
        return Err(load_err(format!(
            "format version {} is not supported (expected {})",
            envelope.format_version, FORMAT_VERSION
        )));
    }
    Ok(envelope.payload)
}

impl ArtifactStore for FileArtifactStore {
    fn exists(&self) -> bool {
        self.vectorizer_path.is_file() && self.model_path.is_file()
    }

    fn load(&self) -> Result<Artifacts> {
        let vectorizer: CountVectorizer = read_envelope(&self.vectorizer_path)?;
        let model: MultinomialNb = read_envelope(&self.model_path)?;
        let artifacts = Artifacts { vectorizer, model };
        artifacts.check().map_err(|reason| SentimentError::ArtifactLoad {
            path: self.model_path.clone(),
            reason,
        })?;
        info!(
            "Loaded artifacts from {:?} and {:?}",
            self.vectorizer_path, self.model_path
        );
        Ok(artifacts)
    }

    /// Both files are fully written to temporary files before either is moved
    /// into place. If the second move fails the first file is removed again.
    fn save(&self, artifacts: &Artifacts) -> Result<()> {
        artifacts.check().map_err(SentimentError::ArtifactSave)?;

        let vectorizer_temp = write_temp(&self.vectorizer_path, &artifacts.vectorizer)?;
        let model_temp = write_temp(&self.model_path, &artifacts.model)?;

        model_temp
            .persist(&self.model_path)
            .map_err(|e| save_err(&self.model_path, e.error))?;
        if let Err(e) = vectorizer_temp.persist(&self.vectorizer_path) {
            if let Err(cleanup) = fs::remove_file(&self.model_path) {
                warn!("Could not remove {:?}: {}", self.model_path, cleanup);
            }
            return Err(save_err(&self.vectorizer_path, e.error));
        }

        info!(
            "Saved artifacts to {:?} and {:?}",
            self.vectorizer_path, self.model_path
        );
        Ok(())
    }
}
