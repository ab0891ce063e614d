//! Confidence boosting.
//!
//! Members are trained one after another on weighted samples of the training
//! set. After each round, the rows the new member is least confident about
//! (those below a cutoff that leaves `boost_thr` of the rows under it) get
//! their weight multiplied by `1 + learning_rate`, so later members see them
//! more often.

use crate::aggregation::aggregate;
use crate::config::BoostingConfig;
use crate::confidence::{fraction_below, row_confidences, solve_threshold};
use crate::core::error::{ConfensError, Result};
use crate::core::traits::{BaseEstimator, ConfidenceEnsemble};
use crate::core::types::*;
use crate::core::utils::{unique_labels, validate_feature_count, validate_inputs};
use crate::ensemble::member::EnsembleMember;
use crate::ensemble::member_probas;
use crate::naming::ClassifierSummary;
use crate::sampling::{sample_size, SampleDrawer};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// What happened in one boosting round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingRound {
    /// Confidence cutoff computed on the full training set
    pub threshold: Score,
    /// Rows whose weight was increased
    pub n_upweighted: usize,
    /// Fraction of rows strictly below `threshold`
    pub fraction_below: f64,
}

/// Sequential confidence-boosting ensemble.
#[derive(Debug, Clone)]
pub struct ConfidenceBoosting<E: BaseEstimator> {
    base: E,
    config: BoostingConfig,
    state: EnsembleState,
    members: Vec<EnsembleMember<E>>,
    rounds: Vec<BoostingRound>,
    classes: Vec<ClassLabel>,
    n_features: usize,
}

impl<E: BaseEstimator> ConfidenceBoosting<E> {
    /// Wrap an untrained base estimator.
    pub fn new(base: E, config: BoostingConfig) -> Self {
        ConfidenceBoosting {
            base,
            config,
            state: EnsembleState::Empty,
            members: Vec::new(),
            rounds: Vec::new(),
            classes: Vec::new(),
            n_features: 0,
        }
    }

    /// The resolved configuration
    pub fn config(&self) -> &BoostingConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> EnsembleState {
        self.state
    }

    /// Trained members in round order
    pub fn members(&self) -> &[EnsembleMember<E>] {
        &self.members
    }

    /// Per-round diagnostics of the last fit
    pub fn rounds(&self) -> &[BoostingRound] {
        &self.rounds
    }

    fn reset(&mut self) {
        self.state = EnsembleState::Empty;
        self.members.clear();
        self.rounds.clear();
        self.classes.clear();
        self.n_features = 0;
    }

    fn train(
        &mut self,
        x: ArrayView2<'_, Feature>,
        y: Option<ArrayView1<'_, ClassLabel>>,
        classes: &[ClassLabel],
    ) -> Result<(Vec<EnsembleMember<E>>, Vec<BoostingRound>)> {
        let n_rows = x.nrows();
        let n_features = x.ncols();
        let n_samples = sample_size(n_rows, self.config.sampling_ratio);
        let all_features: Vec<FeatureIndex> = (0..n_features).collect();

        let mut drawer = SampleDrawer::new(self.config.seed);
        let mut weights = Array1::from_elem(n_rows, 1.0 / n_rows as f64);
        let mut members = Vec::with_capacity(self.config.n_base);
        let mut rounds = Vec::with_capacity(self.config.n_base);

        for round in 0..self.config.n_base {
            self.state = EnsembleState::Training(round);

            let sample = drawer.draw(x, y, Some(weights.view()), n_samples, classes)?;
            let mut estimator = self.base.clone();
            estimator
                .fit(sample.x.view(), sample.y.as_ref().map(|y| y.view()))
                .map_err(|e| e.in_member(round))?;
            estimator.release_training_data();

            let proba = estimator.predict_proba(x).map_err(|e| e.in_member(round))?;
            if proba.ncols() != classes.len() {
                return Err(ConfensError::dimension_mismatch(
                    format!("{} classes", classes.len()),
                    format!("{} classes from member {}", proba.ncols(), round),
                ));
            }
            let confidences = row_confidences(&proba);
            let threshold = solve_threshold(confidences.view(), self.config.boost_thr, self.config.tolerance)?;
            let n_upweighted = reweight(&mut weights, confidences.view(), threshold, self.config.learning_rate);

            let record = BoostingRound {
                threshold,
                n_upweighted,
                fraction_below: fraction_below(confidences.view(), threshold),
            };
            log::debug!(
                "Boosting round {}: {} rows sampled, threshold {:.4}, {} rows up-weighted",
                round,
                sample.len(),
                threshold,
                n_upweighted
            );

            members.push(EnsembleMember::new(estimator, all_features.clone(), n_features));
            rounds.push(record);
        }

        Ok((members, rounds))
    }
}

/// Multiply the weight of every row below `threshold` by `1 + learning_rate`
/// and renormalize to sum 1. Returns the number of up-weighted rows.
pub(crate) fn reweight(
    weights: &mut Array1<f64>,
    confidences: ArrayView1<'_, Score>,
    threshold: Score,
    learning_rate: f64,
) -> usize {
    let mut n_upweighted = 0;
    for (w, &c) in weights.iter_mut().zip(confidences.iter()) {
        if c < threshold {
            *w *= 1.0 + learning_rate;
            n_upweighted += 1;
        }
    }
    let total = weights.sum();
    if total > 0.0 {
        weights.mapv_inplace(|w| w / total);
    }
    n_upweighted
}

impl<E: BaseEstimator> ConfidenceEnsemble for ConfidenceBoosting<E> {
    fn fit(&mut self, x: ArrayView2<'_, Feature>, y: Option<ArrayView1<'_, ClassLabel>>) -> Result<()> {
        validate_inputs(x, y)?;
        self.reset();
        let classes = unique_labels(y);

        log::info!(
            "Training {} on {} rows, {} features, {} classes",
            self.classifier_name(),
            x.nrows(),
            x.ncols(),
            classes.len()
        );

        match self.train(x, y, &classes) {
            Ok((members, rounds)) => {
                self.members = members;
                self.rounds = rounds;
                self.classes = classes;
                self.n_features = x.ncols();
                self.state = EnsembleState::Trained;
                log::info!("Boosting finished with {} members", self.members.len());
                Ok(())
            }
            Err(e) => {
                log::error!("Boosting failed ({}): {}", e.category(), e);
                self.reset();
                Err(e)
            }
        }
    }

    fn predict_proba(&self, x: ArrayView2<'_, Feature>) -> Result<Array2<Score>> {
        if !self.is_fitted() {
            return Err(ConfensError::not_fitted("predict_proba"));
        }
        validate_feature_count(x, self.n_features)?;
        let probas = member_probas(&self.members, x, self.classes.len())?;
        aggregate(&probas, self.config.voting.mode())
    }

    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    fn n_members(&self) -> usize {
        self.members.len()
    }

    fn is_fitted(&self) -> bool {
        self.state == EnsembleState::Trained
    }

    fn summary(&self) -> ClassifierSummary {
        let name = if self.config.voting.weighted {
            "ConfidenceBoosterWeighted"
        } else {
            "ConfidenceBooster"
        };
        ClassifierSummary::new(name, self.base.name())
            .param("n_base", self.config.n_base)
            .param("boost_thr", self.config.boost_thr)
            .param("learning_rate", self.config.learning_rate)
            .param("sampling_ratio", self.config.sampling_ratio)
            .optional("conf_thr", self.config.voting.conf_thr)
            .optional("perc_decisors", self.config.voting.perc_decisors)
            .param("n_decisors", self.config.voting.n_decisors)
            .param("tolerance", self.config.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_reweight_boosts_low_confidence_rows() {
        let mut weights = Array1::from_elem(4, 0.25);
        let confidences = array![0.55, 0.95, 0.6, 0.99];
        let n = reweight(&mut weights, confidences.view(), 0.9, 2.0);

        assert_eq!(n, 2);
        // Rows 0 and 2 weigh 3x rows 1 and 3: 3 + 1 + 3 + 1 = 8.
        assert_abs_diff_eq!(weights[0], 3.0 / 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(weights[1], 1.0 / 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(weights.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reweight_keeps_rows_at_threshold() {
        let mut weights = Array1::from_elem(2, 0.5);
        let n = reweight(&mut weights, array![0.7, 0.7].view(), 0.7, 2.0);
        assert_eq!(n, 0);
        assert_eq!(weights, array![0.5, 0.5]);
    }

    #[test]
    fn test_zero_learning_rate_keeps_weights() {
        let mut weights = array![0.1, 0.2, 0.7];
        reweight(&mut weights, array![0.1, 0.9, 0.5].view(), 0.6, 0.0);
        assert_abs_diff_eq!(weights[2], 0.7, epsilon = 1e-12);
    }
}
