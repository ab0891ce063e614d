//! Row and feature sampling for ensemble members.
//!
//! Rows are drawn without replacement, uniformly or proportionally to a weight
//! vector. When labels are available, a draw that misses a class is repaired
//! with one extra row of that class so no member is trained on a single-class
//! partition.

use crate::core::error::{ConfensError, Result};
use crate::core::types::*;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::SeedableRng;

/// Rows drawn for one member.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Feature rows of the sample
    pub x: Array2<Feature>,
    /// Labels of the sample, when training is supervised
    pub y: Option<Array1<ClassLabel>>,
    /// Dataset row of every sample row, repaired rows last
    pub indices: Vec<usize>,
}

impl Sample {
    /// Number of rows in the sample
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the sample holds no row
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Number of rows drawn for a dataset of `n_rows` at `ratio`.
pub fn sample_size(n_rows: usize, ratio: f64) -> usize {
    (n_rows as f64 * ratio) as usize
}

/// Number of features drawn for a dataset of `n_features` at `max_features`.
pub fn feature_subset_size(n_features: usize, max_features: f64) -> usize {
    ((n_features as f64 * max_features) as usize).clamp(1, n_features.max(1))
}

/// Draws row samples and feature subsets.
#[derive(Debug, Clone)]
pub struct SampleDrawer {
    rng: StdRng,
}

impl SampleDrawer {
    /// Create a drawer, seeded for reproducibility when `seed` is given
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        SampleDrawer { rng }
    }

    /// Draw `n_samples` distinct rows.
    ///
    /// With `weights`, each row is picked with probability proportional to
    /// its weight; otherwise uniformly. When `y` is given and `classes` holds
    /// at least two labels, each class absent from the draw gets one extra row
    /// chosen uniformly among the rows of that class.
    pub fn draw(
        &mut self,
        x: ArrayView2<'_, Feature>,
        y: Option<ArrayView1<'_, ClassLabel>>,
        weights: Option<ArrayView1<'_, f64>>,
        n_samples: usize,
        classes: &[ClassLabel],
    ) -> Result<Sample> {
        let n_rows = x.nrows();
        if n_samples == 0 || n_samples > n_rows {
            return Err(ConfensError::invalid_sample_size(n_samples, n_rows));
        }

        let mut indices = match weights {
            Some(weights) => self.weighted_indices(weights, n_rows, n_samples)?,
            None => index::sample(&mut self.rng, n_rows, n_samples).into_vec(),
        };

        if let Some(y) = y {
            if classes.len() > 1 {
                self.repair_missing_classes(y, classes, &mut indices)?;
            }
        }

        Ok(Sample {
            x: x.select(Axis(0), &indices),
            y: y.map(|y| y.select(Axis(0), &indices)),
            indices,
        })
    }

    /// Draw an ascending subset of `max(1, floor(n_features * max_features))`
    /// distinct feature indices.
    pub fn draw_features(&mut self, n_features: usize, max_features: f64) -> Vec<FeatureIndex> {
        if n_features == 0 {
            return Vec::new();
        }
        let amount = feature_subset_size(n_features, max_features);
        let mut features = index::sample(&mut self.rng, n_features, amount).into_vec();
        features.sort_unstable();
        features
    }

    fn weighted_indices(&mut self, weights: ArrayView1<'_, f64>, n_rows: usize, n_samples: usize) -> Result<Vec<usize>> {
        if weights.len() != n_rows {
            return Err(ConfensError::dimension_mismatch(
                format!("{} weights", n_rows),
                format!("{} weights", weights.len()),
            ));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfensError::sampling("weights must be finite and non-negative"));
        }
        if weights.sum() <= 0.0 {
            return Err(ConfensError::sampling("weights must not all be zero"));
        }

        let rows: Vec<usize> = (0..n_rows).collect();
        let chosen = rows
            .choose_multiple_weighted(&mut self.rng, n_samples, |&row| weights[row])
            .map_err(|e| ConfensError::sampling(format!("weighted draw failed: {}", e)))?;
        Ok(chosen.copied().collect())
    }

    fn repair_missing_classes(
        &mut self,
        y: ArrayView1<'_, ClassLabel>,
        classes: &[ClassLabel],
        indices: &mut Vec<usize>,
    ) -> Result<()> {
        let present: Vec<ClassLabel> = {
            let mut labels: Vec<ClassLabel> = indices.iter().map(|&i| y[i]).collect();
            labels.sort_unstable();
            labels.dedup();
            labels
        };

        for &class in classes {
            if present.binary_search(&class).is_ok() {
                continue;
            }
            let candidates: Vec<usize> = y
                .iter()
                .enumerate()
                .filter(|(_, &label)| label == class)
                .map(|(row, _)| row)
                .collect();
            let row = candidates
                .choose(&mut self.rng)
                .copied()
                .ok_or(ConfensError::MissingClass { class })?;
            log::trace!("sample missed class {}, appending row {}", class, row);
            indices.push(row);
        }
        Ok(())
    }
}
