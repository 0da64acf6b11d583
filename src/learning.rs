// File: src/learning.rs
use crate::config::Config;
use crate::core::classifier::{NaiveBayesTrainer, TrainingSet};
use crate::core::normalizer::TextNormalizer;
use crate::core::traits::{Fittable, Transformer};
use crate::core::types::{CountVector, Label, RawReview, Sample};
use crate::core::vectorizer::CountVectorizer;
use crate::error::{Result, TrainingError};
use crate::persistence::Artifacts;
use crate::sampling::Smote;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

/// Held-out counts, keyed by (actual, predicted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confusion {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl Confusion {
    pub fn record(&mut self, actual: Label, predicted: Label) {
        match (actual, predicted) {
            (Label::Positive, Label::Positive) => self.true_positive += 1,
            (Label::Negative, Label::Positive) => self.false_positive += 1,
            (Label::Negative, Label::Negative) => self.true_negative += 1,
            (Label::Positive, Label::Negative) => self.false_negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    /// `None` when nothing was evaluated.
    pub fn accuracy(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some((self.true_positive + self.true_negative) as f64 / total as f64),
        }
    }
}

/// Summary of one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub corpus_size: usize,
    pub train_size: usize,
    pub test_size: usize,
    /// Rows the classifier was fitted on, after oversampling.
    pub resampled_size: usize,
    pub vocabulary_size: usize,
    pub accuracy: Option<f64>,
    pub confusion: Confusion,
}

/// Runs the TRAINING path: split, fit the vectorizer, oversample, fit the
/// classifier and evaluate on the held-out split.
#[derive(Debug, Clone)]
pub struct LearningEngine {
    min_df: usize,
    test_size: f64,
    seed: u64,
    k_neighbors: usize,
    alpha: f64,
    positive_threshold: i64,
}

impl LearningEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            min_df: config.min_df,
            test_size: config.test_size,
            seed: config.seed,
            k_neighbors: config.k_neighbors,
            alpha: config.alpha,
            positive_threshold: config.positive_threshold,
        }
    }

    pub fn train(
        &self,
        reviews: &[RawReview],
        normalizer: &TextNormalizer,
    ) -> Result<(Artifacts, TrainingReport)> {
        if reviews.is_empty() {
            return Err(TrainingError::EmptyTrainingSet.into());
        }
        let labels: Vec<Label> = reviews
            .iter()
            .map(|r| r.label(self.positive_threshold))
            .collect();
        let texts: Vec<String> = reviews.iter().map(|r| normalizer.normalize(&r.text)).collect();
        debug!("Normalized {} reviews", texts.len());

        let (train_idx, test_idx) = self.split(reviews.len());
        let train_texts: Vec<&str> = train_idx.iter().map(|&i| texts[i].as_str()).collect();
        let train_labels: Vec<Label> = train_idx.iter().map(|&i| labels[i]).collect();
        if train_texts.is_empty() {
            return Err(TrainingError::EmptyTrainingSet.into());
        }
        info!(
            "Split {} reviews into {} train / {} test",
            reviews.len(),
            train_idx.len(),
            test_idx.len()
        );

        let mut vectorizer = CountVectorizer::new(self.min_df);
        let vocabulary = vectorizer.fit(&train_texts[..])?;
        info!("Vocabulary has {} tokens (min_df {})", vocabulary.len(), self.min_df);

        let train_rows: Vec<Sample> = vectorizer
            .transform_all(&train_texts)?
            .into_iter()
            .map(to_sample)
            .collect();
        let smote = Smote::new(self.k_neighbors, self.seed);
        let (resampled_rows, resampled_labels) = smote.resample(&train_rows, &train_labels)?;
        info!(
            "Oversampled training split from {} to {} rows",
            train_rows.len(),
            resampled_rows.len()
        );

        let resampled_size = resampled_rows.len();
        let mut trainer = NaiveBayesTrainer::new(self.alpha);
        let model = trainer.fit(&TrainingSet::new(resampled_rows, resampled_labels))?;
        info!("Fitted naive Bayes with alpha {}", model.alpha());

        let mut confusion = Confusion::default();
        for &i in &test_idx {
            let row = to_sample(vectorizer.transform(&texts[i])?);
            let (predicted, _) = model.predict_with_confidence(&row)?;
            confusion.record(labels[i], predicted);
        }

        let report = TrainingReport {
            corpus_size: reviews.len(),
            train_size: train_idx.len(),
            test_size: test_idx.len(),
            resampled_size,
            vocabulary_size: vocabulary.len(),
            accuracy: confusion.accuracy(),
            confusion,
        };
        match report.accuracy {
            Some(accuracy) => info!("Held-out accuracy: {:.4} ({:?})", accuracy, confusion),
            None => info!("No held-out reviews, accuracy not measured"),
        }

        Ok((Artifacts { vectorizer, model }, report))
    }

    /// Shuffles row indices with the seed and holds out the first
    /// `ceil(n * test_size)` of them.
    fn split(&self, n: usize) -> (Vec<usize>, Vec<usize>) {
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);
        let test_len = ((n as f64) * self.test_size).ceil() as usize;
        let test_len = test_len.min(n);
        let train = indices.split_off(test_len);
        (train, indices)
    }
}

fn to_sample(counts: CountVector) -> Sample {
    counts.into_iter().map(f64::from).collect()
}
