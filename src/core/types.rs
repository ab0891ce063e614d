//! Core data types shared by the ensembles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Feature value type.
pub type Feature = f64;

/// Probability and confidence value type.
pub type Score = f64;

/// Categorical class label. Labels need not be contiguous; every ensemble
/// keeps the sorted list of labels it saw during training.
pub type ClassLabel = usize;

/// Column index into the feature matrix.
pub type FeatureIndex = usize;

/// Position of a member inside an ensemble.
pub type MemberIndex = usize;

/// Lifecycle of an ensemble.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnsembleState {
    /// No member has been trained
    #[default]
    Empty,
    /// Training is in progress; holds the number of completed members.
    /// Bagging trains its members concurrently and reports `Training(0)`
    /// until all of them have finished.
    Training(usize),
    /// All members are trained and the ensemble can predict
    Trained,
}

impl fmt::Display for EnsembleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnsembleState::Empty => write!(f, "empty"),
            EnsembleState::Training(k) => write!(f, "training(round {})", k),
            EnsembleState::Trained => write!(f, "trained"),
        }
    }
}

/// How member probabilities are combined into the ensemble output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AggregationMode {
    /// Confidence-weighted mean over every member
    Weighted,
    /// Unweighted mean over the `n_decisors` most confident members of a row
    TopK {
        /// Number of decisors per row (ties at the cutoff are all included)
        n_decisors: usize,
    },
    /// Unweighted mean over the members whose confidence reaches `conf_thr`,
    /// falling back to top-k on rows where no member does
    Threshold {
        /// Minimum member confidence
        conf_thr: Score,
        /// Decisors used on rows without any qualifying member
        n_decisors: usize,
    },
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMode::Weighted => write!(f, "weighted"),
            AggregationMode::TopK { n_decisors } => write!(f, "top-{}", n_decisors),
            AggregationMode::Threshold { conf_thr, .. } => write!(f, "threshold({})", conf_thr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(EnsembleState::default(), EnsembleState::Empty);
        assert_eq!(EnsembleState::Training(2).to_string(), "training(round 2)");
        assert_eq!(EnsembleState::Trained.to_string(), "trained");
    }

    #[test]
    fn test_aggregation_display() {
        assert_eq!(AggregationMode::Weighted.to_string(), "weighted");
        assert_eq!(AggregationMode::TopK { n_decisors: 3 }.to_string(), "top-3");
    }
}
