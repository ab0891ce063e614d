//! Confidence bagging.
//!
//! Every member is trained independently on its own uniform row sample and
//! random feature subset. Training runs on a dedicated rayon pool; each
//! worker returns its member and the results are collected once all workers
//! have joined, so a single failing worker aborts the whole fit.

use crate::aggregation::aggregate;
use crate::config::BaggingConfig;
use crate::core::error::{ConfensError, Result};
use crate::core::traits::{BaseEstimator, ConfidenceEnsemble, DiversityMetric};
use crate::core::types::*;
use crate::core::utils::{class_positions, unique_labels, validate_feature_count, validate_inputs};
use crate::diversity::default_metrics;
use crate::ensemble::member::EnsembleMember;
use crate::ensemble::member_probas;
use crate::naming::ClassifierSummary;
use crate::sampling::{sample_size, SampleDrawer};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Parallel confidence-bagging ensemble.
#[derive(Debug, Clone)]
pub struct ConfidenceBagging<E: BaseEstimator> {
    base: E,
    config: BaggingConfig,
    state: EnsembleState,
    members: Vec<EnsembleMember<E>>,
    classes: Vec<ClassLabel>,
    n_features: usize,
}

/// Shared, read-only inputs of one member's training.
struct TrainingJob<'a> {
    x: ArrayView2<'a, Feature>,
    y: Option<ArrayView1<'a, ClassLabel>>,
    classes: &'a [ClassLabel],
    n_samples: usize,
}

impl<E: BaseEstimator> ConfidenceBagging<E> {
    /// Wrap an untrained base estimator.
    pub fn new(base: E, config: BaggingConfig) -> Self {
        ConfidenceBagging {
            base,
            config,
            state: EnsembleState::Empty,
            members: Vec::new(),
            classes: Vec::new(),
            n_features: 0,
        }
    }

    /// The resolved configuration
    pub fn config(&self) -> &BaggingConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> EnsembleState {
        self.state
    }

    /// Trained members
    pub fn members(&self) -> &[EnsembleMember<E>] {
        &self.members
    }

    /// Feature subset of every member, in member order
    pub fn feature_subsets(&self) -> Vec<&[FeatureIndex]> {
        self.members.iter().map(|m| m.features()).collect()
    }

    /// Fraction of members reading each training feature.
    pub fn feature_frequencies(&self) -> Result<Array1<f64>> {
        if !self.is_fitted() {
            return Err(ConfensError::not_fitted("feature_frequencies"));
        }
        let mut counts = Array1::<f64>::zeros(self.n_features);
        for member in &self.members {
            for &f in member.features() {
                counts[f] += 1.0;
            }
        }
        if !self.members.is_empty() {
            counts /= self.members.len() as f64;
        }
        Ok(counts)
    }

    /// Score the members' disagreement on a labelled set.
    ///
    /// Each member predicts on its own feature subset; the column-stacked
    /// predictions (rows × members) and the class positions of `y` are handed
    /// to every metric. Uses [`default_metrics`] when `metrics` is `None`.
    pub fn diversity(
        &self,
        x: ArrayView2<'_, Feature>,
        y: ArrayView1<'_, ClassLabel>,
        metrics: Option<&[Box<dyn DiversityMetric>]>,
    ) -> Result<BTreeMap<String, f64>> {
        if !self.is_fitted() {
            return Err(ConfensError::not_fitted("diversity"));
        }
        if self.members.is_empty() {
            return Ok(BTreeMap::new());
        }
        validate_inputs(x, Some(y))?;
        validate_feature_count(x, self.n_features)?;
        let truth = class_positions(&self.classes, y)?;

        let columns = self
            .members
            .par_iter()
            .enumerate()
            .map(|(m, member)| member.predict(x).map_err(|e| e.in_member(m)))
            .collect::<Result<Vec<Array1<usize>>>>()?;
        let predictions = Array2::from_shape_fn((x.nrows(), columns.len()), |(i, m)| columns[m][i]);

        let defaults;
        let metrics = match metrics {
            Some(metrics) => metrics,
            None => {
                defaults = default_metrics();
                &defaults[..]
            }
        };

        Ok(metrics
            .iter()
            .map(|metric| {
                let score = metric.compute(predictions.view(), truth.view());
                log::debug!("Diversity {} = {:.4}", metric.name(), score);
                (metric.name().to_string(), score)
            })
            .collect())
    }

    fn reset(&mut self) {
        self.state = EnsembleState::Empty;
        self.members.clear();
        self.classes.clear();
        self.n_features = 0;
    }

    fn train(&self, job: &TrainingJob<'_>) -> Result<Vec<EnsembleMember<E>>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.effective_num_threads())
            .build()
            .map_err(|e| ConfensError::threading(format!("Failed to create thread pool: {}", e)))?;

        pool.install(|| {
            (0..self.config.n_base)
                .into_par_iter()
                .map(|m| self.train_member(m, job))
                .collect::<Result<Vec<_>>>()
        })
    }

    fn train_member(&self, member: MemberIndex, job: &TrainingJob<'_>) -> Result<EnsembleMember<E>> {
        let seed = self.config.seed.map(|s| s.wrapping_add(member as u64));
        let mut drawer = SampleDrawer::new(seed);
        let n_features = job.x.ncols();

        let features = drawer.draw_features(n_features, self.config.max_features);
        let sample = drawer.draw(job.x, job.y, None, job.n_samples, job.classes)?;
        let sample_x = sample.x.select(Axis(1), &features);

        let mut estimator = self.base.clone();
        estimator
            .fit(sample_x.view(), sample.y.as_ref().map(|y| y.view()))
            .map_err(|e| e.in_member(member))?;
        estimator.release_training_data();

        log::debug!(
            "Bagging member {} trained on {} rows, features {:?}",
            member,
            sample.len(),
            features
        );
        Ok(EnsembleMember::new(estimator, features, n_features))
    }
}

impl<E: BaseEstimator> ConfidenceEnsemble for ConfidenceBagging<E> {
    fn fit(&mut self, x: ArrayView2<'_, Feature>, y: Option<ArrayView1<'_, ClassLabel>>) -> Result<()> {
        validate_inputs(x, y)?;
        self.reset();
        let classes = unique_labels(y);

        log::info!(
            "Training {} on {} rows, {} features, {} threads",
            self.classifier_name(),
            x.nrows(),
            x.ncols(),
            self.config.effective_num_threads()
        );

        // Members train concurrently, so the state stays at zero completed
        // members until every worker has joined.
        self.state = EnsembleState::Training(0);
        let trained = {
            let job = TrainingJob {
                x: x.view(),
                y: y.as_ref().map(|y| y.view()),
                classes: &classes,
                n_samples: sample_size(x.nrows(), self.config.sampling_ratio),
            };
            self.train(&job)
        };
        match trained {
            Ok(members) => {
                self.members = members;
                self.classes = classes;
                self.n_features = x.ncols();
                self.state = EnsembleState::Trained;
                log::info!("Bagging finished with {} members", self.members.len());
                Ok(())
            }
            Err(e) => {
                log::error!("Bagging failed ({}): {}", e.category(), e);
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
            "ConfidenceBaggerWeighted"
        } else {
            "ConfidenceBagger"
        };
        ClassifierSummary::new(name, self.base.name())
            .param("n_base", self.config.n_base)
            .param("n_decisors", self.config.voting.n_decisors)
            .param("max_features", self.config.max_features)
            .param("sampling_ratio", self.config.sampling_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learner::GaussianNB;
    use ndarray::s;

    fn two_blobs() -> Array2<Feature> {
        Array2::from_shape_fn((20, 3), |(i, j)| {
            let offset = if i < 10 { 0.0 } else { 5.0 };
            offset + ((i * 3 + j) % 7) as f64 * 0.1
        })
    }

    #[test]
    fn test_fit_accepts_views_with_unrelated_lifetimes() {
        let x = two_blobs();
        let config = BaggingConfig::builder().n_base(3).max_features(1.0).seed(1).build();
        let mut bagger = ConfidenceBagging::new(GaussianNB::new(), config);
        {
            let y: Array1<ClassLabel> = (0..20).map(|i| usize::from(i >= 10)).collect();
            bagger.fit(x.slice(s![.., ..]), Some(y.view())).unwrap();
        }

        assert_eq!(bagger.state(), EnsembleState::Trained);
        assert_eq!(bagger.classes(), &[0, 1]);
        assert_eq!(bagger.n_members(), 3);
        assert_eq!(bagger.predict_proba(x.view()).unwrap().dim(), (20, 2));
    }

    #[test]
    fn test_state_before_and_after_fit() {
        let x = two_blobs();
        let y: Array1<ClassLabel> = (0..20).map(|i| usize::from(i >= 10)).collect();
        let mut bagger = ConfidenceBagging::new(GaussianNB::new(), BaggingConfig::builder().n_base(2).seed(3).build());
        assert_eq!(bagger.state(), EnsembleState::Empty);
        bagger.fit(x.view(), Some(y.view())).unwrap();
        assert_eq!(bagger.state(), EnsembleState::Trained);
    }
}
