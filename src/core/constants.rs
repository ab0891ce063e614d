//! Default values used when a configuration parameter is missing or invalid.

/// Crate version.
pub const CONFENS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of ensemble members.
pub const DEFAULT_N_BASE: usize = 10;

/// Smallest ensemble that is accepted.
pub const MIN_N_BASE: usize = 2;

/// Default fraction of features drawn for each bagging member.
pub const DEFAULT_MAX_FEATURES: f64 = 0.7;

/// Default fraction of rows drawn for each bagging member.
pub const DEFAULT_BAGGING_SAMPLING_RATIO: f64 = 0.7;

/// Default fraction of rows the boosting cutoff leaves below it.
pub const DEFAULT_BOOST_THR: f64 = 0.8;

/// Default weight multiplier increment for low-confidence rows.
pub const DEFAULT_LEARNING_RATE: f64 = 2.0;

/// Default stopping tolerance of the confidence threshold solver.
pub const DEFAULT_THRESHOLD_TOLERANCE: f64 = 0.01;

/// Bracket width at which the threshold solver gives up.
pub const MIN_THRESHOLD_BRACKET: f64 = 0.001;

/// Default number of worker threads (0 = all available cores).
pub const DEFAULT_NUM_THREADS: usize = 0;

/// Class labels assumed when training without labels.
pub const UNSUPERVISED_CLASSES: [usize; 2] = [0, 1];

/// Environment variable overriding the random seed.
pub const ENV_SEED: &str = "CONFENS_SEED";

/// Environment variable overriding the number of worker threads.
pub const ENV_NUM_THREADS: &str = "CONFENS_NUM_THREADS";

/// Boosting sampling ratio used when none is given: `1 / sqrt(n_base)`.
pub fn default_boosting_sampling_ratio(n_base: usize) -> f64 {
    1.0 / (n_base.max(1) as f64).sqrt()
}

/// Number of decisors used when neither a count nor a percentage is valid.
pub fn default_n_decisors(n_base: usize) -> usize {
    1 + n_base / 2
}
