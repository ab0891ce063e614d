//! Core trait definitions for confens.
//!
//! [`BaseEstimator`] is the contract consumed from the wrapped learner,
//! [`DiversityMetric`] the contract consumed from diversity formulas, and
//! [`ConfidenceEnsemble`] the surface both ensembles expose to callers.

use crate::core::error::Result;
use crate::core::types::*;
use crate::naming::ClassifierSummary;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use std::fmt::Debug;

/// A classifier or outlier detector that can be wrapped by an ensemble.
///
/// The ensembles clone an untrained prototype once per member, so
/// implementations must be cheap to clone before `fit` and must not share
/// mutable state between clones.
pub trait BaseEstimator: Clone + Send + Sync + Debug {
    /// Train on `x`. `y` is `None` for unsupervised detectors.
    fn fit(&mut self, x: ArrayView2<'_, Feature>, y: Option<ArrayView1<'_, ClassLabel>>) -> Result<()>;

    /// Per-class probabilities, one row per input row. Columns follow the
    /// ascending order of the labels seen in `fit`.
    fn predict_proba(&self, x: ArrayView2<'_, Feature>) -> Result<Array2<Score>>;

    /// Hard prediction as a column position into `predict_proba`.
    fn predict(&self, x: ArrayView2<'_, Feature>) -> Result<Array1<usize>> {
        Ok(argmax_rows(&self.predict_proba(x)?))
    }

    /// Drop any reference to the training partition. Called unconditionally
    /// after every member fit.
    fn release_training_data(&mut self) {}

    /// Short human-readable name used in classifier names.
    fn name(&self) -> String {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base).to_string()
    }
}

/// A diversity measure over the hard predictions of ensemble members.
pub trait DiversityMetric: Send + Sync + Debug {
    /// Name used as key in diversity reports.
    fn name(&self) -> &'static str;

    /// Score a prediction matrix (rows × members, entries are class
    /// positions) against the true class positions `y`.
    fn compute(&self, predictions: ArrayView2<'_, usize>, y: ArrayView1<'_, usize>) -> f64;
}

/// Operations shared by the confidence ensembles.
pub trait ConfidenceEnsemble {
    /// Train every member. `y` is optional for unsupervised base estimators.
    fn fit(&mut self, x: ArrayView2<'_, Feature>, y: Option<ArrayView1<'_, ClassLabel>>) -> Result<()>;

    /// Aggregated class probabilities (rows × classes).
    fn predict_proba(&self, x: ArrayView2<'_, Feature>) -> Result<Array2<Score>>;

    /// Most probable class label per row.
    fn predict(&self, x: ArrayView2<'_, Feature>) -> Result<Array1<ClassLabel>> {
        let proba = self.predict_proba(x)?;
        let classes = self.classes();
        Ok(argmax_rows(&proba).mapv(|j| classes[j]))
    }

    /// Sorted class labels seen during training.
    fn classes(&self) -> &[ClassLabel];

    /// Number of trained members.
    fn n_members(&self) -> usize;

    /// Whether the ensemble finished training.
    fn is_fitted(&self) -> bool;

    /// Structured description of the configuration.
    fn summary(&self) -> ClassifierSummary;

    /// Deterministic identifier encoding every hyperparameter.
    fn classifier_name(&self) -> String {
        self.summary().to_string()
    }
}

/// Column position of the largest value in each row. Ties resolve to the
/// first column.
pub fn argmax_rows(proba: &Array2<Score>) -> Array1<usize> {
    proba
        .axis_iter(Axis(0))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |(best, max), (j, &p)| {
                    if p > max {
                        (j, p)
                    } else {
                        (best, max)
                    }
                })
                .0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_argmax_rows() {
        let proba = array![[0.2, 0.8], [0.6, 0.4], [0.5, 0.5]];
        assert_eq!(argmax_rows(&proba), array![1, 0, 0]);
    }

    #[derive(Debug, Clone)]
    struct Constant;

    impl BaseEstimator for Constant {
        fn fit(&mut self, _x: ArrayView2<'_, Feature>, _y: Option<ArrayView1<'_, ClassLabel>>) -> Result<()> {
            Ok(())
        }

        fn predict_proba(&self, x: ArrayView2<'_, Feature>) -> Result<Array2<Score>> {
            Ok(Array2::from_elem((x.nrows(), 2), 0.5))
        }
    }

    #[test]
    fn test_default_name_strips_path() {
        assert_eq!(Constant.name(), "Constant");
    }
}
