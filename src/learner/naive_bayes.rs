//! Gaussian naive Bayes.

use crate::core::error::{ConfensError, Result};
use crate::core::traits::BaseEstimator;
use crate::core::types::*;
use crate::core::utils::{unique_labels, validate_inputs};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Portion of the largest feature variance added to every variance.
pub const DEFAULT_VAR_SMOOTHING: f64 = 1e-9;

/// Gaussian naive Bayes classifier.
///
/// Each feature is modelled as an independent normal distribution per class.
/// Probability columns follow the sorted labels seen in `fit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNB {
    var_smoothing: f64,
    classes: Vec<ClassLabel>,
    log_priors: Array1<f64>,
    means: Array2<f64>,
    variances: Array2<f64>,
}

impl Default for GaussianNB {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianNB {
    /// Untrained classifier with the default smoothing
    pub fn new() -> Self {
        Self::with_var_smoothing(DEFAULT_VAR_SMOOTHING)
    }

    /// Untrained classifier with a custom variance smoothing
    pub fn with_var_smoothing(var_smoothing: f64) -> Self {
        GaussianNB {
            var_smoothing,
            classes: Vec::new(),
            log_priors: Array1::zeros(0),
            means: Array2::zeros((0, 0)),
            variances: Array2::zeros((0, 0)),
        }
    }

    /// Labels seen in training
    pub fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }
}

impl BaseEstimator for GaussianNB {
    fn fit(&mut self, x: ArrayView2<'_, Feature>, y: Option<ArrayView1<'_, ClassLabel>>) -> Result<()> {
        let y = y.ok_or_else(|| ConfensError::estimator(0, "GaussianNB needs class labels"))?;
        validate_inputs(x, Some(y))?;

        let classes = unique_labels(Some(y));
        let n_features = x.ncols();
        let mut means = Array2::zeros((classes.len(), n_features));
        let mut variances = Array2::zeros((classes.len(), n_features));
        let mut log_priors = Array1::zeros(classes.len());

        let epsilon = self.var_smoothing * x.var_axis(Axis(0), 0.0).fold(0.0_f64, |a, &b| a.max(b));

        for (c, &label) in classes.iter().enumerate() {
            let rows: Vec<usize> = y
                .iter()
                .enumerate()
                .filter(|(_, &l)| l == label)
                .map(|(i, _)| i)
                .collect();
            let subset = x.select(Axis(0), &rows);
            let mean = subset
                .mean_axis(Axis(0))
                .ok_or_else(|| ConfensError::estimator(0, format!("class {} has no rows", label)))?;
            let variance = subset.var_axis(Axis(0), 0.0) + epsilon;

            means.row_mut(c).assign(&mean);
            variances.row_mut(c).assign(&variance);
            log_priors[c] = (rows.len() as f64 / x.nrows() as f64).ln();
        }

        if variances.iter().any(|&v| v <= 0.0) {
            return Err(ConfensError::estimator(
                0,
                "zero feature variance; use a positive var_smoothing",
            ));
        }

        self.classes = classes;
        self.means = means;
        self.variances = variances;
        self.log_priors = log_priors;
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView2<'_, Feature>) -> Result<Array2<Score>> {
        if !self.is_fitted() {
            return Err(ConfensError::estimator(0, "GaussianNB is not fitted"));
        }
        if x.ncols() != self.means.ncols() {
            return Err(ConfensError::dimension_mismatch(
                format!("{} features", self.means.ncols()),
                format!("{} features", x.ncols()),
            ));
        }

        let n_classes = self.classes.len();
        let mut proba = Array2::zeros((x.nrows(), n_classes));
        for (i, row) in x.axis_iter(Axis(0)).enumerate() {
            let log_joint: Vec<f64> = (0..n_classes)
                .map(|c| {
                    let mean = self.means.row(c);
                    let var = self.variances.row(c);
                    let log_likelihood: f64 = row
                        .iter()
                        .zip(mean.iter().zip(var.iter()))
                        .map(|(&v, (&mu, &s2))| {
                            -0.5 * ((2.0 * std::f64::consts::PI * s2).ln() + (v - mu).powi(2) / s2)
                        })
                        .sum();
                    self.log_priors[c] + log_likelihood
                })
                .collect();

            let max = log_joint.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            let norm: f64 = log_joint.iter().map(|&l| (l - max).exp()).sum();
            for (c, &l) in log_joint.iter().enumerate() {
                proba[[i, c]] = (l - max).exp() / norm;
            }
        }
        Ok(proba)
    }

    fn name(&self) -> String {
        "GaussianNB".to_string()
    }
}
