//! Error types for the sentiment pipeline

use crate::core::engine::PipelineState;
use crate::core::types::Label;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, SentimentError>;

/// Failures raised while fitting any stage of the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainingError {
    #[error("Class {label} has {found} samples but oversampling needs at least {required}")]
    InsufficientSamples {
        label: Label,
        found: usize,
        required: usize,
    },

    #[error("No token appears in at least {min_df} documents")]
    EmptyVocabulary { min_df: usize },

    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Got {features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    #[error("Expected feature vectors of width {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Vectorizer has already been fitted")]
    AlreadyFitted,

    #[error("Oversampling needs at least one neighbour")]
    NoNeighbors,
}

/// Main error type for the library
#[derive(Error, Debug)]
pub enum SentimentError {
    /// Stopword list or morphological resource missing
    #[error("Resource '{resource}' is unavailable: {reason}")]
    ResourceUnavailable { resource: String, reason: String },

    #[error("Review corpus not found at '{}'", .0.display())]
    CorpusNotFound(PathBuf),

    #[error("Invalid review corpus: {0}")]
    InvalidCorpus(String),

    #[error("Training failed: {0}")]
    Training(#[from] TrainingError),

    /// Persisted files are present but cannot be used
    #[error("Cannot load artifact '{}': {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    #[error("Cannot save artifacts: {0}")]
    ArtifactSave(String),

    #[error("Vectorizer has not been fitted")]
    NotFitted,

    #[error("Pipeline is not ready (state: {0})")]
    NotReady(PipelineState),

    #[error("Pipeline cannot be initialized from state {0}")]
    InvalidTransition(PipelineState),

    #[error("Review text is empty")]
    EmptyInput,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SentimentError {
    /// Errors the user can fix by changing the request.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, SentimentError::EmptyInput)
    }

    /// Errors that halt startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SentimentError::ResourceUnavailable { .. }
                | SentimentError::CorpusNotFound(_)
                | SentimentError::InvalidCorpus(_)
                | SentimentError::Training(_)
                | SentimentError::ArtifactLoad { .. }
                | SentimentError::ArtifactSave(_)
                | SentimentError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_empty_input_is_user_correctable() {
        assert!(SentimentError::EmptyInput.is_user_correctable());
        assert!(!SentimentError::NotFitted.is_user_correctable());
        assert!(!SentimentError::EmptyInput.is_fatal());
    }

    #[test]
    fn training_errors_are_fatal() {
        let err: SentimentError = TrainingError::EmptyTrainingSet.into();
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Training failed: Training set is empty");
    }
}
