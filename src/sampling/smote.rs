// File: src/sampling/smote.rs
use crate::core::types::{Label, Sample};
use crate::error::TrainingError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;

pub const DEFAULT_K_NEIGHBORS: usize = 5;
pub const DEFAULT_SEED: u64 = 42;

/// Synthetic minority oversampling.
///
/// New minority rows are placed at a random point on the segment between a
/// minority row and one of its `k` nearest minority neighbours (Euclidean),
/// until both classes have the same number of rows. The original rows come
/// first in the output, in their original order.
#[derive(Debug, Clone)]
pub struct Smote {
    k_neighbors: usize,
    seed: u64,
}

impl Smote {
    pub fn new(k_neighbors: usize, seed: u64) -> Self {
        Self { k_neighbors, seed }
    }

    pub fn resample(
        &self,
        samples: &[Sample],
        labels: &[Label],
    ) -> Result<(Vec<Sample>, Vec<Label>), TrainingError> {
        if samples.len() != labels.len() {
            return Err(TrainingError::LengthMismatch {
                features: samples.len(),
                labels: labels.len(),
            });
        }
        if samples.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }
        if self.k_neighbors == 0 {
            return Err(TrainingError::NoNeighbors);
        }

        let mut counts = [0usize; 2];
        for label in labels {
            counts[label.index()] += 1;
        }
        let (minority, majority_count) = if counts[Label::Positive.index()]
            < counts[Label::Negative.index()]
        {
            (Label::Positive, counts[Label::Negative.index()])
        } else {
            (Label::Negative, counts[Label::Positive.index()])
        };
        let minority_count = counts[minority.index()];

        let mut out_samples = samples.to_vec();
        let mut out_labels = labels.to_vec();
        if minority_count == majority_count {
            return Ok((out_samples, out_labels));
        }

        let required = self.k_neighbors + 1;
        if minority_count < required {
            return Err(TrainingError::InsufficientSamples {
                label: minority,
                found: minority_count,
                required,
            });
        }

        let members: Vec<&Sample> = samples
            .iter()
            .zip(labels)
            .filter(|(_, label)| **label == minority)
            .map(|(sample, _)| sample)
            .collect();
        let neighbors = nearest_neighbors(&members, self.k_neighbors);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let to_generate = majority_count - minority_count;
        out_samples.reserve(to_generate);
        out_labels.reserve(to_generate);
        for _ in 0..to_generate {
            let base = rng.gen_range(0..members.len());
            let neighbor = neighbors[base][rng.gen_range(0..self.k_neighbors)];
            let gap: f64 = rng.gen();
            let synthetic = members[base]
                .iter()
                .zip(members[neighbor].iter())
                .map(|(&x, &n)| x + gap * (n - x))
                .collect();
            out_samples.push(synthetic);
            out_labels.push(minority);
        }

        Ok((out_samples, out_labels))
    }
}

impl Default for Smote {
    fn default() -> Self {
        Self::new(DEFAULT_K_NEIGHBORS, DEFAULT_SEED)
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// For each row, the indices of its `k` closest other rows. Ties resolve to
/// the lower index so the result is deterministic.
fn nearest_neighbors(rows: &[&Sample], k: usize) -> Vec<Vec<usize>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mut distances: Vec<(f64, usize)> = rows
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(j, other)| (squared_distance(row, other), j))
                .collect();
            distances.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(Ordering::Equal)
                    .then(a.1.cmp(&b.1))
            });
            distances.into_iter().take(k).map(|(_, j)| j).collect()
        })
        .collect()
}
