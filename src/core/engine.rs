use crate::config::Config;
use crate::core::normalizer::TextNormalizer;
use crate::core::traits::Transformer;
use crate::core::types::Prediction;
use crate::corpus::CorpusSource;
use crate::error::{Result, SentimentError};
use crate::learning::{LearningEngine, TrainingReport};
use crate::persistence::{ArtifactStore, Artifacts};
use crate::resources::LanguageResources;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Lifecycle of a [`SentimentPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uninitialized,
    Training,
    Loading,
    Ready,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Uninitialized => "UNINITIALIZED",
            PipelineState::Training => "TRAINING",
            PipelineState::Loading => "LOADING",
            PipelineState::Ready => "READY",
            PipelineState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Owns the normalizer and, once READY, the fitted artifacts.
pub struct SentimentPipeline {
    state: PipelineState,
    normalizer: TextNormalizer,
    learning_engine: LearningEngine,
    artifacts: Option<Artifacts>,
    report: Option<TrainingReport>,
}

impl SentimentPipeline {
    pub fn new(normalizer: TextNormalizer, learning_engine: LearningEngine) -> Self {
        Self {
            state: PipelineState::Uninitialized,
            normalizer,
            learning_engine,
            artifacts: None,
            report: None,
        }
    }

    /// Validates `config` and loads the language resources it names. Fails
    /// with `ResourceUnavailable` when the stopword list is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let resources = LanguageResources::load(config.language_resources_dir())?;
        Ok(Self::new(resources.normalizer(), LearningEngine::new(config)))
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Only set when this process went through TRAINING.
    pub fn training_report(&self) -> Option<&TrainingReport> {
        self.report.as_ref()
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Loads the artifacts from `store` when both are present, otherwise trains
    /// on `corpus` and saves the result. Runs once; any failure leaves the
    /// pipeline FAILED with no fallback.
    pub fn initialize<S, C>(&mut self, store: &S, corpus: &C) -> Result<PipelineState>
    where
        S: ArtifactStore + ?Sized,
        C: CorpusSource + ?Sized,
    {
        if self.state != PipelineState::Uninitialized {
            return Err(SentimentError::InvalidTransition(self.state));
        }

        let outcome = if store.exists() {
            self.state = PipelineState::Loading;
            info!("Artifacts found, loading");
            store.load()
        } else {
            self.state = PipelineState::Training;
            info!("No artifacts found, training from corpus");
            self.train(store, corpus)
        };

        match outcome {
            Ok(artifacts) => {
                self.artifacts = Some(artifacts);
                self.state = PipelineState::Ready;
                info!("Pipeline is {}", self.state);
                Ok(self.state)
            }
            Err(e) => {
                error!("Initialization failed during {}: {}", self.state, e);
                self.state = PipelineState::Failed;
                Err(e)
            }
        }
    }

    fn train<S, C>(&mut self, store: &S, corpus: &C) -> Result<Artifacts>
    where
        S: ArtifactStore + ?Sized,
        C: CorpusSource + ?Sized,
    {
        let reviews = corpus.load()?;
        let (artifacts, report) = self.learning_engine.train(&reviews, &self.normalizer)?;
        store.save(&artifacts)?;
        self.report = Some(report);
        Ok(artifacts)
    }

    /// Classifies one review. Empty input is rejected without touching the
    /// pipeline state.
    pub fn predict(&self, raw_text: &str) -> Result<Prediction> {
        let artifacts = match (&self.artifacts, self.state) {
            (Some(artifacts), PipelineState::Ready) => artifacts,
            _ => return Err(SentimentError::NotReady(self.state)),
        };
        if raw_text.trim().is_empty() {
            warn!("Empty review submitted");
            return Err(SentimentError::EmptyInput);
        }

        let normalized_text = self.normalizer.normalize(raw_text);
        if normalized_text.is_empty() {
            debug!("Review normalized to nothing, falling back to class priors");
        }
        let counts = artifacts.vectorizer.transform(&normalized_text)?;
        let features: Vec<f64> = counts.into_iter().map(f64::from).collect();
        let (label, confidence) = artifacts.model.predict_with_confidence(&features)?;
        debug!("'{}' -> {} ({:.3})", normalized_text, label, confidence);

        Ok(Prediction {
            label,
            normalized_text,
            confidence,
        })
    }
}
