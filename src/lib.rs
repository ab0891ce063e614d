//! # confens
//!
//! Confidence-driven ensemble meta-learners. A [`ConfidenceBoosting`] or
//! [`ConfidenceBagging`] ensemble wraps any [`BaseEstimator`] (a classifier or
//! an unsupervised outlier detector), trains several copies of it on
//! resampled data and combines them so that each prediction is made by the
//! members that are most *confident* about the row at hand.
//!
//! - **Boosting** trains members sequentially; rows the latest member is
//!   unsure about are up-weighted for the next draw.
//! - **Bagging** trains members in parallel, each on its own random rows and
//!   feature subset.
//! - **Aggregation** averages, per row, the `n_decisors` most confident
//!   members, or weights every member by its confidence.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use confens::{BaggingConfig, ConfidenceBagging, ConfidenceEnsemble, GaussianNB};
//! use ndarray::{array, Array1};
//!
//! # fn main() -> confens::Result<()> {
//! confens::init();
//!
//! let x = array![[0.0, 0.1], [0.2, 0.0], [0.1, 0.2], [5.0, 5.1], [5.2, 4.9], [4.9, 5.0]];
//! let y: Array1<usize> = array![0, 0, 0, 1, 1, 1];
//!
//! let config = BaggingConfig::builder()
//!     .n_base(4)
//!     .n_decisors(2)
//!     .max_features(1.0)
//!     .sampling_ratio(1.0)
//!     .seed(42)
//!     .build();
//!
//! let mut ensemble = ConfidenceBagging::new(GaussianNB::new(), config);
//! ensemble.fit(x.view(), Some(y.view()))?;
//!
//! let proba = ensemble.predict_proba(x.view())?;
//! println!("{}: {:?}", ensemble.classifier_name(), proba);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Hyperparameters are resolved once, by [`BoostingConfigBuilder`] and
//! [`BaggingConfigBuilder`]. Out-of-range values never fail: they are
//! replaced by their default and reported through `log::warn!`.
//!
//! ## Logging
//!
//! The crate logs through the `log` facade. Call [`init`] to install
//! `env_logger` (level taken from `RUST_LOG`, `info` by default), or install
//! any other logger.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Confidence scores and threshold solver
pub mod confidence;

// Row and feature sampling
pub mod sampling;

// Member aggregation
pub mod aggregation;

// Boosting and bagging ensembles
pub mod ensemble;

// Diversity metrics
pub mod diversity;

// Classifier naming
pub mod naming;

// Reference base estimators
pub mod learner;

// Re-export core functionality for convenience
pub use crate::core::{
    constants::*,
    error::{ConfensError, Result},
    traits::*,
    types::*,
};

pub use config::{
    BaggingConfig, BaggingConfigBuilder, BoostingConfig, BoostingConfigBuilder, ValidationWarning, VotingConfig,
};

pub use confidence::{row_confidences, solve_threshold, ThresholdSolution};
pub use diversity::default_metrics;
pub use ensemble::{BoostingRound, ConfidenceBagging, ConfidenceBoosting, EnsembleMember};
pub use learner::GaussianNB;
pub use naming::ClassifierSummary;
pub use sampling::{Sample, SampleDrawer};

/// Crate version
pub use crate::core::constants::CONFENS_VERSION as VERSION;

/// Install `env_logger` as the logging backend.
///
/// Safe to call several times; does nothing if a logger is already set.
///
/// ```rust
/// confens::init();
/// log::info!("ready");
/// ```
pub fn init() {
    crate::core::initialize_logging()
}
