//! Confidence-gated combination of member probabilities.
//!
//! Every member contributes a probability matrix over the same rows and
//! classes. For each row, [`AggregationMode`] decides which members vote and
//! with which weight; the output row is the weighted mean of their
//! probability rows.

use crate::core::error::{ConfensError, Result};
use crate::core::types::*;
use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};

/// Members voting on one row, with their weights.
///
/// `confidences[m]` is the confidence of member `m` on the row. Top-k keeps
/// every member whose confidence reaches the k-th highest, so ties at the
/// cutoff can yield more than `n_decisors` voters.
pub fn select_decisors(confidences: &[Score], mode: AggregationMode) -> Vec<(MemberIndex, f64)> {
    match mode {
        AggregationMode::Weighted => {
            let total: f64 = confidences.iter().sum();
            if total > 0.0 {
                confidences.iter().enumerate().map(|(m, &c)| (m, c / total)).collect()
            } else {
                equal_weights((0..confidences.len()).collect())
            }
        }
        AggregationMode::TopK { n_decisors } => top_k(confidences, n_decisors),
        AggregationMode::Threshold { conf_thr, n_decisors } => {
            let confident: Vec<MemberIndex> = confidences
                .iter()
                .enumerate()
                .filter(|(_, &c)| c >= conf_thr)
                .map(|(m, _)| m)
                .collect();
            if confident.is_empty() {
                top_k(confidences, n_decisors)
            } else {
                equal_weights(confident)
            }
        }
    }
}

fn top_k(confidences: &[Score], n_decisors: usize) -> Vec<(MemberIndex, f64)> {
    if confidences.is_empty() {
        return Vec::new();
    }
    let mut sorted = confidences.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let k = n_decisors.clamp(1, sorted.len());
    let cutoff = sorted[k - 1];
    let chosen = confidences
        .iter()
        .enumerate()
        .filter(|(_, &c)| c >= cutoff)
        .map(|(m, _)| m)
        .collect();
    equal_weights(chosen)
}

fn equal_weights(members: Vec<MemberIndex>) -> Vec<(MemberIndex, f64)> {
    let weight = 1.0 / members.len() as f64;
    members.into_iter().map(|m| (m, weight)).collect()
}

/// Combine member probability matrices row by row.
///
/// All matrices must share one shape. Rows are processed in parallel.
pub fn aggregate(probas: &[Array2<Score>], mode: AggregationMode) -> Result<Array2<Score>> {
    let first = probas
        .first()
        .ok_or_else(|| ConfensError::invalid_parameter("probas", "[]", "at least one member is required"))?;
    let (n_rows, n_classes) = first.dim();
    for (m, proba) in probas.iter().enumerate().skip(1) {
        if proba.dim() != (n_rows, n_classes) {
            return Err(ConfensError::dimension_mismatch(
                format!("{}x{} probabilities", n_rows, n_classes),
                format!("{}x{} probabilities from member {}", proba.nrows(), proba.ncols(), m),
            ));
        }
    }

    let mut output = Array2::<Score>::zeros((n_rows, n_classes));
    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let confidences: Vec<Score> = probas
                .iter()
                .map(|p| p.row(i).fold(f64::NEG_INFINITY, |max, &v| max.max(v)))
                .collect();
            for (m, weight) in select_decisors(&confidences, mode) {
                row.scaled_add(weight, &probas[m].row(i));
            }
        });
    Ok(output)
}
