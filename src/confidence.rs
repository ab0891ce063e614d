//! Confidence scores and the confidence threshold solver.
//!
//! The confidence of a prediction is the largest class probability of its row.
//! Boosting needs a cutoff that leaves a target fraction of the training rows
//! below it; [`solve_threshold`] finds one by bisection.

use crate::core::constants::MIN_THRESHOLD_BRACKET;
use crate::core::error::{ConfensError, Result};
use crate::core::types::Score;
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Per-row confidence: the maximum class probability.
pub fn row_confidences(proba: &Array2<Score>) -> Array1<Score> {
    proba.map_axis(Axis(1), |row| row.fold(f64::NEG_INFINITY, |max, &p| max.max(p)))
}

/// Fraction of `confidences` strictly below `cutoff`.
pub fn fraction_below(confidences: ArrayView1<'_, Score>, cutoff: Score) -> f64 {
    if confidences.is_empty() {
        return 0.0;
    }
    let below = confidences.iter().filter(|&&c| c < cutoff).count();
    below as f64 / confidences.len() as f64
}

/// Outcome of a threshold search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSolution {
    /// The cutoff, within `[min, max]` of the confidences
    pub cutoff: Score,
    /// Fraction of confidences strictly below `cutoff`
    pub achieved: f64,
    /// Width of the search bracket when the search stopped
    pub bracket_width: f64,
    /// Number of bisection steps taken
    pub iterations: usize,
}

/// Bisect `[min, max]` of `confidences` for a cutoff with `target_fraction`
/// of the values below it.
///
/// Stops once the achieved fraction is within `tolerance` of the target, or
/// when the bracket is narrower than `0.001` (the target may be unreachable,
/// e.g. when many values are equal). The result always lies in
/// `[min, max]`.
pub fn solve_threshold(confidences: ArrayView1<'_, Score>, target_fraction: f64, tolerance: f64) -> Result<Score> {
    search_threshold(confidences, target_fraction, tolerance).map(|solution| solution.cutoff)
}

/// Same search as [`solve_threshold`], reporting how it ended.
pub fn search_threshold(
    confidences: ArrayView1<'_, Score>,
    target_fraction: f64,
    tolerance: f64,
) -> Result<ThresholdSolution> {
    if confidences.is_empty() {
        return Err(ConfensError::invalid_parameter(
            "confidences",
            "[]",
            "at least one confidence is required",
        ));
    }
    if confidences.iter().any(|c| !c.is_finite()) {
        return Err(ConfensError::invalid_parameter(
            "confidences",
            "non-finite value",
            "confidences must be finite",
        ));
    }

    let mut lower = confidences.fold(f64::INFINITY, |a, &b| a.min(b));
    let mut upper = confidences.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let mut cutoff = (lower + upper) / 2.0;
    let mut actual = fraction_below(confidences, cutoff);
    let mut iterations = 0;

    while (actual - target_fraction).abs() > tolerance && (upper - lower).abs() > MIN_THRESHOLD_BRACKET {
        if actual < target_fraction {
            lower = cutoff;
            cutoff = (cutoff + upper) / 2.0;
        } else {
            upper = cutoff;
            cutoff = (cutoff + lower) / 2.0;
        }
        actual = fraction_below(confidences, cutoff);
        iterations += 1;
    }

    Ok(ThresholdSolution {
        cutoff,
        achieved: actual,
        bracket_width: (upper - lower).abs(),
        iterations,
    })
}
