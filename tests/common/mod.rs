//! Common test utilities for confens integration tests.

#![allow(dead_code)]

use confens::*;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::prelude::*;

/// Two well-separated blobs: class `i % 2` is centred at -3 or +3 on every
/// feature.
pub fn create_separable_binary(num_samples: usize, num_features: usize) -> (Array2<f64>, Array1<usize>) {
    let mut rng = StdRng::seed_from_u64(123);
    let labels = Array1::from_shape_fn(num_samples, |i| i % 2);
    let mut features = Array2::zeros((num_samples, num_features));
    for i in 0..num_samples {
        let centre = if labels[i] == 1 { 3.0 } else { -3.0 };
        for j in 0..num_features {
            features[[i, j]] = centre + rng.gen_range(-1.0..1.0);
        }
    }
    (features, labels)
}

/// Blobs for `labels.len()` classes; class `c` is centred at `4 * c`. Rows
/// cycle through the classes except for the last class, which gets
/// `rare_rows` rows at the end.
pub fn create_multiclass(
    num_samples: usize,
    num_features: usize,
    labels: &[usize],
    rare_rows: usize,
) -> (Array2<f64>, Array1<usize>) {
    let mut rng = StdRng::seed_from_u64(456);
    let common = &labels[..labels.len() - 1];
    let positions = Array1::from_shape_fn(num_samples, |i| {
        if i >= num_samples - rare_rows {
            labels.len() - 1
        } else {
            i % common.len()
        }
    });
    let mut features = Array2::zeros((num_samples, num_features));
    for i in 0..num_samples {
        for j in 0..num_features {
            features[[i, j]] = 4.0 * positions[i] as f64 + rng.gen_range(-0.5..0.5);
        }
    }
    (features, positions.mapv(|p| labels[p]))
}

/// Unlabelled data: most rows near the origin, the last `num_outliers` far
/// away.
pub fn create_outlier_data(num_samples: usize, num_features: usize, num_outliers: usize) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(789);
    Array2::from_shape_fn((num_samples, num_features), |(i, _)| {
        let offset = if i >= num_samples - num_outliers { 8.0 } else { 0.0 };
        offset + rng.gen_range(-1.0..1.0)
    })
}

/// Fraction of equal entries.
pub fn accuracy(predicted: ArrayView1<'_, usize>, truth: ArrayView1<'_, usize>) -> f64 {
    let hits = predicted.iter().zip(truth.iter()).filter(|(a, b)| a == b).count();
    hits as f64 / truth.len() as f64
}

/// Unsupervised detector: outlier probability grows with the distance to the
/// training mean.
#[derive(Debug, Clone, Default)]
pub struct DistanceDetector {
    centre: Option<Array1<f64>>,
    training_rows: Option<Array2<f64>>,
}

impl DistanceDetector {
    pub fn holds_training_data(&self) -> bool {
        self.training_rows.is_some()
    }
}

impl BaseEstimator for DistanceDetector {
    fn fit(&mut self, x: ArrayView2<'_, Feature>, _y: Option<ArrayView1<'_, ClassLabel>>) -> Result<()> {
        self.centre = x.mean_axis(ndarray::Axis(0));
        self.training_rows = Some(x.to_owned());
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<'_, Feature>) -> Result<Array2<Score>> {
        let centre = self
            .centre
            .as_ref()
            .ok_or_else(|| ConfensError::estimator(0, "detector is not fitted"))?;
        let mut proba = Array2::zeros((x.nrows(), 2));
        for (i, row) in x.rows().into_iter().enumerate() {
            let distance = (&row - centre).mapv(|d| d * d).sum().sqrt();
            let outlier = 1.0 - (-distance / 4.0).exp();
            proba[[i, 0]] = 1.0 - outlier;
            proba[[i, 1]] = outlier;
        }
        Ok(proba)
    }

    fn release_training_data(&mut self) {
        self.training_rows = None;
    }

    fn name(&self) -> String {
        "DistanceDetector".to_string()
    }
}

/// Base estimator whose training always fails.
#[derive(Debug, Clone, Default)]
pub struct FailingEstimator;

impl BaseEstimator for FailingEstimator {
    fn fit(&mut self, _x: ArrayView2<'_, Feature>, _y: Option<ArrayView1<'_, ClassLabel>>) -> Result<()> {
        Err(ConfensError::estimator(0, "training diverged"))
    }

    fn predict_proba(&self, x: ArrayView2<'_, Feature>) -> Result<Array2<Score>> {
        Ok(Array2::from_elem((x.nrows(), 2), 0.5))
    }
}

/// Base estimator that fails on samples containing a row whose first feature
/// exceeds `limit`.
#[derive(Debug, Clone)]
pub struct PickyEstimator {
    pub limit: f64,
    inner: GaussianNB,
}

impl PickyEstimator {
    pub fn new(limit: f64) -> Self {
        PickyEstimator {
            limit,
            inner: GaussianNB::new(),
        }
    }
}

impl BaseEstimator for PickyEstimator {
    fn fit(&mut self, x: ArrayView2<'_, Feature>, y: Option<ArrayView1<'_, ClassLabel>>) -> Result<()> {
        if x.column(0).iter().any(|&v| v > self.limit) {
            return Err(ConfensError::estimator(0, "value out of range"));
        }
        self.inner.fit(x, y)
    }

    fn predict_proba(&self, x: ArrayView2<'_, Feature>) -> Result<Array2<Score>> {
        self.inner.predict_proba(x)
    }
}
