// File: src/core/classifier.rs
use crate::core::traits::{Fittable, Predictor};
use crate::core::types::{Label, Sample};
use crate::error::{Result, TrainingError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ALPHA: f64 = 1.0;

/// Rows and labels the classifier is fitted on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub samples: Vec<Sample>,
    pub labels: Vec<Label>,
}

impl TrainingSet {
    pub fn new(samples: Vec<Sample>, labels: Vec<Label>) -> Self {
        Self { samples, labels }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Fits a [`MultinomialNb`] with additive smoothing `alpha`.
#[derive(Debug, Clone)]
pub struct NaiveBayesTrainer {
    alpha: f64,
}

impl NaiveBayesTrainer {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }
}

impl Default for NaiveBayesTrainer {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl Fittable<TrainingSet, MultinomialNb> for NaiveBayesTrainer {
    fn fit(&mut self, set: &TrainingSet) -> Result<MultinomialNb> {
        Ok(MultinomialNb::fit(&set.samples, &set.labels, self.alpha)?)
    }
}

/// Multinomial naive Bayes over two classes, indexed by [`Label::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    alpha: f64,
    class_count: [f64; 2],
    class_log_prior: [f64; 2],
    /// log P(token | class), one row per class.
    feature_log_prob: [Vec<f64>; 2],
}

impl MultinomialNb {
    pub fn fit(samples: &[Sample], labels: &[Label], alpha: f64) -> std::result::Result<Self, TrainingError> {
        if samples.len() != labels.len() {
            return Err(TrainingError::LengthMismatch {
                features: samples.len(),
                labels: labels.len(),
            });
        }
        let width = match samples.first() {
            Some(first) => first.len(),
            None => return Err(TrainingError::EmptyTrainingSet),
        };

        let mut class_count = [0.0f64; 2];
        let mut feature_count = [vec![0.0f64; width], vec![0.0f64; width]];
        for (sample, label) in samples.iter().zip(labels) {
            if sample.len() != width {
                return Err(TrainingError::DimensionMismatch {
                    expected: width,
                    found: sample.len(),
                });
            }
            let c = label.index();
            class_count[c] += 1.0;
            for (total, value) in feature_count[c].iter_mut().zip(sample) {
                *total += value;
            }
        }

        let n = samples.len() as f64;
        let class_log_prior = [
            (class_count[0] / n).ln(),
            (class_count[1] / n).ln(),
        ];
        let feature_log_prob = feature_count.map(|counts| {
            let denominator = (counts.iter().sum::<f64>() + alpha * width as f64).ln();
            counts
                .into_iter()
                .map(|count| (count + alpha).ln() - denominator)
                .collect::<Vec<f64>>()
        });

        Ok(Self {
            alpha,
            class_count,
            class_log_prior,
            feature_log_prob,
        })
    }

    pub fn n_features(&self) -> usize {
        self.feature_log_prob[0].len()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn class_count(&self, label: Label) -> f64 {
        self.class_count[label.index()]
    }

    /// Joint log-likelihood of `features` under each class.
    pub fn joint_log_likelihood(&self, features: &[f64]) -> std::result::Result<[f64; 2], TrainingError> {
        if features.len() != self.n_features() {
            return Err(TrainingError::DimensionMismatch {
                expected: self.n_features(),
                found: features.len(),
            });
        }
        let mut scores = self.class_log_prior;
        for (score, log_probs) in scores.iter_mut().zip(&self.feature_log_prob) {
            *score += features
                .iter()
                .zip(log_probs)
                .filter(|(x, _)| **x != 0.0)
                .map(|(x, lp)| x * lp)
                .sum::<f64>();
        }
        Ok(scores)
    }

    /// Winning label and its posterior probability. Ties go to POSITIVE.
    pub fn predict_with_confidence(&self, features: &[f64]) -> std::result::Result<(Label, f64), TrainingError> {
        let scores = self.joint_log_likelihood(features)?;
        let positive = scores[Label::Positive.index()];
        let negative = scores[Label::Negative.index()];
        let label = if positive >= negative {
            Label::Positive
        } else {
            Label::Negative
        };
        // Posterior via log-sum-exp.
        let max = positive.max(negative);
        let norm = max + ((positive - max).exp() + (negative - max).exp()).ln();
        let confidence = (scores[label.index()] - norm).exp();
        Ok((label, confidence))
    }
}

impl Predictor<[f64], Label> for MultinomialNb {
    fn predict(&self, features: &[f64]) -> Result<Label> {
        Ok(self.predict_with_confidence(features)?.0)
    }
}

impl Predictor<[u32], Label> for MultinomialNb {
    fn predict(&self, counts: &[u32]) -> Result<Label> {
        let features: Vec<f64> = counts.iter().map(|&c| f64::from(c)).collect();
        Predictor::<[f64], Label>::predict(self, &features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SentimentError;

    fn toy_set() -> TrainingSet {
        // columns: bagus, buruk, aplikasi
        TrainingSet::new(
            vec![
                vec![2.0, 0.0, 1.0],
                vec![1.0, 0.0, 1.0],
                vec![3.0, 0.0, 0.0],
                vec![0.0, 2.0, 1.0],
                vec![0.0, 1.0, 1.0],
                vec![0.0, 3.0, 0.0],
            ],
            vec![
                Label::Positive,
                Label::Positive,
                Label::Positive,
                Label::Negative,
                Label::Negative,
                Label::Negative,
            ],
        )
    }

    #[test]
    fn learns_smoothed_log_probabilities() {
        let model = NaiveBayesTrainer::default().fit(&toy_set()).unwrap();
        // Positive counts: bagus 6, buruk 0, aplikasi 2; total 8 + alpha * 3.
        let expected = (1.0f64 / 11.0).ln();
        let got = model.feature_log_prob[Label::Positive.index()][1];
        assert!((got - expected).abs() < 1e-12);
        assert!((model.class_log_prior[0] - 0.5f64.ln()).abs() < 1e-12);
        assert_eq!(model.class_count(Label::Positive), 3.0);
    }

    #[test]
    fn predicts_by_dominant_tokens() {
        let model = NaiveBayesTrainer::default().fit(&toy_set()).unwrap();
        assert_eq!(model.predict(&[2.0f64, 0.0, 1.0][..]).unwrap(), Label::Positive);
        assert_eq!(model.predict(&[0u32, 2, 1][..]).unwrap(), Label::Negative);
    }

    #[test]
    fn ties_go_to_positive() {
        let model = NaiveBayesTrainer::default().fit(&toy_set()).unwrap();
        let (label, confidence) = model.predict_with_confidence(&[0.0, 0.0, 1.0]).unwrap();
        assert_eq!(label, Label::Positive);
        assert!((confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn long_vectors_do_not_underflow() {
        let model = NaiveBayesTrainer::default().fit(&toy_set()).unwrap();
        let (label, confidence) = model.predict_with_confidence(&[5000.0, 10.0, 3000.0]).unwrap();
        assert_eq!(label, Label::Positive);
        assert!(confidence.is_finite() && confidence > 0.99);
    }

    #[test]
    fn identical_fits_predict_identically() {
        let first = NaiveBayesTrainer::default().fit(&toy_set()).unwrap();
        let second = NaiveBayesTrainer::default().fit(&toy_set()).unwrap();
        assert_eq!(first, second);
        for row in &toy_set().samples {
            assert_eq!(
                first.predict(&row[..]).unwrap(),
                second.predict(&row[..]).unwrap()
            );
        }
    }

    #[test]
    fn rejects_wrong_width() {
        let model = NaiveBayesTrainer::default().fit(&toy_set()).unwrap();
        assert!(matches!(
            model.predict(&[1.0f64, 2.0][..]),
            Err(SentimentError::Training(TrainingError::DimensionMismatch { expected: 3, found: 2 }))
        ));
    }

    #[test]
    fn empty_training_set_is_rejected() {
        let result = NaiveBayesTrainer::default().fit(&TrainingSet::default());
        assert!(matches!(
            result,
            Err(SentimentError::Training(TrainingError::EmptyTrainingSet))
        ));
    }
}
