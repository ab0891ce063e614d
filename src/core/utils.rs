//! Input validation and label helpers.

use crate::core::constants::UNSUPERVISED_CLASSES;
use crate::core::error::{ConfensError, Result};
use crate::core::types::*;
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Check that a training or prediction set is usable.
pub fn validate_inputs(x: ArrayView2<'_, Feature>, y: Option<ArrayView1<'_, ClassLabel>>) -> Result<()> {
    if x.nrows() == 0 {
        return Err(ConfensError::invalid_parameter("x", "0 rows", "dataset must not be empty"));
    }
    if x.ncols() == 0 {
        return Err(ConfensError::invalid_parameter("x", "0 columns", "dataset must have at least one feature"));
    }
    if let Some(y) = y {
        if y.len() != x.nrows() {
            return Err(ConfensError::dimension_mismatch(
                format!("{} labels", x.nrows()),
                format!("{} labels", y.len()),
            ));
        }
    }
    Ok(())
}

/// Check that a prediction set has the feature count seen in training.
pub fn validate_feature_count(x: ArrayView2<'_, Feature>, expected: usize) -> Result<()> {
    if x.ncols() != expected {
        return Err(ConfensError::dimension_mismatch(
            format!("{} features", expected),
            format!("{} features", x.ncols()),
        ));
    }
    Ok(())
}

/// Sorted distinct labels, or the two nominal classes when unlabeled.
pub fn unique_labels(y: Option<ArrayView1<'_, ClassLabel>>) -> Vec<ClassLabel> {
    match y {
        Some(y) => {
            let mut classes: Vec<ClassLabel> = y.iter().copied().collect();
            classes.sort_unstable();
            classes.dedup();
            classes
        }
        None => UNSUPERVISED_CLASSES.to_vec(),
    }
}

/// Map labels to their position in `classes`.
pub fn class_positions(classes: &[ClassLabel], y: ArrayView1<'_, ClassLabel>) -> Result<Array1<usize>> {
    y.iter()
        .map(|label| {
            classes.binary_search(label).map_err(|_| {
                ConfensError::invalid_parameter("y", label.to_string(), "label was not seen during training")
            })
        })
        .collect::<Result<Vec<usize>>>()
        .map(Array1::from)
}
