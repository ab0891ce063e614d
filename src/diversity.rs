//! Ensemble diversity metrics.
//!
//! All metrics work on the oracle outputs of the members: whether member `m`
//! predicted row `i` correctly. Pairwise metrics are averaged over every pair
//! of members. See Kuncheva & Whitaker, "Measures of Diversity in Classifier
//! Ensembles" (2003).

use crate::core::traits::DiversityMetric;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// The metrics reported when the caller does not choose any.
pub fn default_metrics() -> Vec<Box<dyn DiversityMetric>> {
    vec![
        Box::new(Disagreement),
        Box::new(QStatistic),
        Box::new(Entropy),
        Box::new(KohaviWolpertVariance),
    ]
}

/// Correctness matrix (rows × members).
fn oracle(predictions: ArrayView2<'_, usize>, y: ArrayView1<'_, usize>) -> Array2<bool> {
    Array2::from_shape_fn(predictions.dim(), |(i, m)| predictions[[i, m]] == y[i])
}

/// Number of correct members on each row.
fn correct_counts(oracle: &Array2<bool>) -> Vec<usize> {
    oracle
        .axis_iter(Axis(0))
        .map(|row| row.iter().filter(|&&c| c).count())
        .collect()
}

/// Contingency counts of a member pair: (both right, first only, second only, both wrong).
fn pair_counts(oracle: &Array2<bool>, a: usize, b: usize) -> (f64, f64, f64, f64) {
    let mut counts = (0.0, 0.0, 0.0, 0.0);
    for row in oracle.axis_iter(Axis(0)) {
        match (row[a], row[b]) {
            (true, true) => counts.0 += 1.0,
            (true, false) => counts.1 += 1.0,
            (false, true) => counts.2 += 1.0,
            (false, false) => counts.3 += 1.0,
        }
    }
    counts
}

fn mean_over_pairs<F>(oracle: &Array2<bool>, pair_score: F) -> f64
where
    F: Fn(f64, f64, f64, f64) -> f64,
{
    let n_members = oracle.ncols();
    if n_members < 2 || oracle.nrows() == 0 {
        return 0.0;
    }
    let mut total = 0.0;
    let mut n_pairs = 0;
    for a in 0..n_members {
        for b in (a + 1)..n_members {
            let (n11, n10, n01, n00) = pair_counts(oracle, a, b);
            total += pair_score(n11, n10, n01, n00);
            n_pairs += 1;
        }
    }
    total / n_pairs as f64
}

/// Fraction of rows on which exactly one member of a pair is right,
/// averaged over pairs. 0 for identical members, 1 for complementary ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disagreement;

impl DiversityMetric for Disagreement {
    fn name(&self) -> &'static str {
        "disagreement"
    }

    fn compute(&self, predictions: ArrayView2<'_, usize>, y: ArrayView1<'_, usize>) -> f64 {
        let oracle = oracle(predictions, y);
        mean_over_pairs(&oracle, |n11, n10, n01, n00| (n10 + n01) / (n11 + n10 + n01 + n00))
    }
}

/// Yule's Q statistic averaged over pairs, in `[-1, 1]`. Lower means more
/// diverse. Pairs with a zero denominator score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct QStatistic;

impl DiversityMetric for QStatistic {
    fn name(&self) -> &'static str {
        "q_statistic"
    }

    fn compute(&self, predictions: ArrayView2<'_, usize>, y: ArrayView1<'_, usize>) -> f64 {
        let oracle = oracle(predictions, y);
        mean_over_pairs(&oracle, |n11, n10, n01, n00| {
            let denominator = n11 * n00 + n01 * n10;
            if denominator == 0.0 {
                0.0
            } else {
                (n11 * n00 - n01 * n10) / denominator
            }
        })
    }
}

/// Entropy measure E, in `[0, 1]`: 0 when all members agree on every row,
/// 1 when they split as evenly as possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct Entropy;

impl DiversityMetric for Entropy {
    fn name(&self) -> &'static str {
        "entropy"
    }

    fn compute(&self, predictions: ArrayView2<'_, usize>, y: ArrayView1<'_, usize>) -> f64 {
        let n_members = predictions.ncols();
        let n_rows = predictions.nrows();
        if n_members < 2 || n_rows == 0 {
            return 0.0;
        }
        let half = (n_members / 2) as f64;
        let total: f64 = correct_counts(&oracle(predictions, y))
            .into_iter()
            .map(|l| l.min(n_members - l) as f64 / half)
            .sum();
        total / n_rows as f64
    }
}

/// Kohavi-Wolpert variance: mean over rows of `l (L - l) / L²`, where `l`
/// members out of `L` are right.
#[derive(Debug, Clone, Copy, Default)]
pub struct KohaviWolpertVariance;

impl DiversityMetric for KohaviWolpertVariance {
    fn name(&self) -> &'static str {
        "kw_variance"
    }

    fn compute(&self, predictions: ArrayView2<'_, usize>, y: ArrayView1<'_, usize>) -> f64 {
        let n_members = predictions.ncols();
        let n_rows = predictions.nrows();
        if n_members == 0 || n_rows == 0 {
            return 0.0;
        }
        let total: f64 = correct_counts(&oracle(predictions, y))
            .into_iter()
            .map(|l| (l * (n_members - l)) as f64)
            .sum();
        total / (n_rows * n_members * n_members) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_identical_members() {
        let predictions = array![[0, 0], [1, 1], [1, 1], [0, 0]];
        let y = array![0, 1, 0, 0];
        assert_abs_diff_eq!(Disagreement.compute(predictions.view(), y.view()), 0.0);
        assert_abs_diff_eq!(QStatistic.compute(predictions.view(), y.view()), 1.0);
        assert_abs_diff_eq!(Entropy.compute(predictions.view(), y.view()), 0.0);
        assert_abs_diff_eq!(KohaviWolpertVariance.compute(predictions.view(), y.view()), 0.0);
    }

    #[test]
    fn test_complementary_members() {
        let predictions = array![[0, 1], [1, 0], [0, 1], [1, 0]];
        let y = array![0, 0, 1, 1];
        assert_abs_diff_eq!(Disagreement.compute(predictions.view(), y.view()), 1.0);
        assert_abs_diff_eq!(QStatistic.compute(predictions.view(), y.view()), -1.0);
        assert_abs_diff_eq!(Entropy.compute(predictions.view(), y.view()), 1.0);
        assert_abs_diff_eq!(KohaviWolpertVariance.compute(predictions.view(), y.view()), 0.25);
    }

    #[test]
    fn test_three_members() {
        // Row 0: all right; row 1: one right.
        let predictions = array![[1, 1, 1], [0, 1, 1]];
        let y = array![1, 0];
        // Pairs (0,1) and (0,2) disagree on row 1, pair (1,2) never does.
        assert_abs_diff_eq!(Disagreement.compute(predictions.view(), y.view()), 1.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Entropy.compute(predictions.view(), y.view()), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(
            KohaviWolpertVariance.compute(predictions.view(), y.view()),
            2.0 / 18.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_single_member_is_zero() {
        let predictions = array![[0], [1]];
        let y = array![0, 0];
        assert_eq!(Disagreement.compute(predictions.view(), y.view()), 0.0);
        assert_eq!(Entropy.compute(predictions.view(), y.view()), 0.0);
    }

    #[test]
    fn test_default_names() {
        let names: Vec<&str> = default_metrics().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["disagreement", "q_statistic", "entropy", "kw_variance"]);
    }
}
