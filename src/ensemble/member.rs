//! Ensemble members.

use crate::core::error::Result;
use crate::core::traits::BaseEstimator;
use crate::core::types::*;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// A trained base estimator and the ascending feature columns it was fit on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleMember<E> {
    estimator: E,
    features: Vec<FeatureIndex>,
    all_features: bool,
}

impl<E: BaseEstimator> EnsembleMember<E> {
    /// Wrap an estimator trained on `features` of a dataset with `n_features`
    /// columns.
    pub fn new(estimator: E, features: Vec<FeatureIndex>, n_features: usize) -> Self {
        let all_features = features.len() == n_features && features.iter().enumerate().all(|(i, &f)| i == f);
        EnsembleMember {
            estimator,
            features,
            all_features,
        }
    }

    /// The trained estimator
    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Feature columns this member reads
    pub fn features(&self) -> &[FeatureIndex] {
        &self.features
    }

    /// Class probabilities on the member's own columns.
    pub fn predict_proba(&self, x: ArrayView2<'_, Feature>) -> Result<Array2<Score>> {
        if self.all_features {
            self.estimator.predict_proba(x)
        } else {
            self.estimator.predict_proba(x.select(Axis(1), &self.features).view())
        }
    }

    /// Hard predictions (class positions) on the member's own columns.
    pub fn predict(&self, x: ArrayView2<'_, Feature>) -> Result<Array1<usize>> {
        if self.all_features {
            self.estimator.predict(x)
        } else {
            self.estimator.predict(x.select(Axis(1), &self.features).view())
        }
    }
}
