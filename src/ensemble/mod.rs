//! Confidence-driven ensemble meta-learners.
//!
//! - [`boosting`]: sequential trainer that up-weights low-confidence rows
//! - [`bagging`]: parallel trainer over random row and feature subsets
//! - [`member`]: a trained estimator together with its feature subset

pub mod bagging;
pub mod boosting;
pub mod member;

pub use bagging::ConfidenceBagging;
pub use boosting::{BoostingRound, ConfidenceBoosting};
pub use member::EnsembleMember;

use crate::core::error::{ConfensError, Result};
use crate::core::traits::BaseEstimator;
use crate::core::types::*;
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

/// Probability matrices of every member on `x`, checked against the number of
/// classes seen in training.
pub(crate) fn member_probas<E: BaseEstimator>(
    members: &[EnsembleMember<E>],
    x: ArrayView2<'_, Feature>,
    n_classes: usize,
) -> Result<Vec<Array2<Score>>> {
    members
        .par_iter()
        .enumerate()
        .map(|(m, member)| {
            let proba = member.predict_proba(x).map_err(|e| e.in_member(m))?;
            if proba.dim() != (x.nrows(), n_classes) {
                return Err(ConfensError::dimension_mismatch(
                    format!("{}x{} probabilities", x.nrows(), n_classes),
                    format!("{}x{} probabilities from member {}", proba.nrows(), proba.ncols(), m),
                ));
            }
            Ok(proba)
        })
        .collect()
}
