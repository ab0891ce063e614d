//! Ensemble configuration structures and their builders.
//!
//! Builders accept raw, possibly invalid values; `build` resolves them through
//! [`ConfigValidator`], logging every fallback. Resolved configurations can be
//! saved to and loaded from JSON or TOML files.

use crate::config::validation::{ConfigValidator, ValidationWarning};
use crate::core::constants::*;
use crate::core::error::{ConfensError, Result};
use crate::core::types::AggregationMode;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How member predictions are combined at prediction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingConfig {
    /// Number of most-confident members averaged per row
    pub n_decisors: usize,
    /// Percentage of members that produced `n_decisors`, when given
    pub perc_decisors: Option<f64>,
    /// Confidence-weighted mean over all members instead of top-k
    pub weighted: bool,
    /// Minimum confidence for a member to vote on a row
    pub conf_thr: Option<f64>,
}

impl VotingConfig {
    /// The aggregation policy these settings describe.
    pub fn mode(&self) -> AggregationMode {
        if self.weighted {
            AggregationMode::Weighted
        } else if let Some(conf_thr) = self.conf_thr {
            AggregationMode::Threshold {
                conf_thr,
                n_decisors: self.n_decisors,
            }
        } else {
            AggregationMode::TopK {
                n_decisors: self.n_decisors,
            }
        }
    }
}

/// Configuration of a [`crate::ConfidenceBoosting`] ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostingConfig {
    /// Number of members (boosting rounds)
    pub n_base: usize,
    /// Low-confidence rows are multiplied by `1 + learning_rate`
    pub learning_rate: f64,
    /// Fraction of rows drawn each round
    pub sampling_ratio: f64,
    /// Target fraction of rows below the per-round confidence cutoff
    pub boost_thr: f64,
    /// Stopping tolerance of the threshold solver
    pub tolerance: f64,
    /// Seed for reproducible sampling
    pub seed: Option<u64>,
    /// Prediction-time aggregation
    pub voting: VotingConfig,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        BoostingConfigBuilder::new().build()
    }
}

impl BoostingConfig {
    /// Start a builder with every parameter unset
    pub fn builder() -> BoostingConfigBuilder {
        BoostingConfigBuilder::new()
    }

    /// Builder pre-filled with this configuration
    pub fn to_builder(&self) -> BoostingConfigBuilder {
        BoostingConfigBuilder {
            n_base: Some(self.n_base),
            learning_rate: Some(self.learning_rate),
            sampling_ratio: Some(self.sampling_ratio),
            boost_thr: Some(self.boost_thr),
            tolerance: Some(self.tolerance),
            conf_thr: self.voting.conf_thr,
            perc_decisors: self.voting.perc_decisors,
            n_decisors: self.voting.perc_decisors.map_or(Some(self.voting.n_decisors), |_| None),
            weighted: self.voting.weighted,
            seed: self.seed,
        }
    }

    /// Load a configuration from a `.json` or `.toml` file. Values are
    /// re-validated after parsing.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Self = load(path.as_ref())?;
        Ok(config.to_builder().build())
    }

    /// Save the configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save(self, path.as_ref())
    }

    /// Apply `CONFENS_SEED` if it is set
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        if let Some(seed) = env_override::<u64>(ENV_SEED)? {
            self.seed = Some(seed);
        }
        Ok(())
    }
}

/// Fluent builder for [`BoostingConfig`]
#[derive(Debug, Clone, Default)]
pub struct BoostingConfigBuilder {
    n_base: Option<usize>,
    learning_rate: Option<f64>,
    sampling_ratio: Option<f64>,
    boost_thr: Option<f64>,
    tolerance: Option<f64>,
    conf_thr: Option<f64>,
    perc_decisors: Option<f64>,
    n_decisors: Option<usize>,
    weighted: bool,
    seed: Option<u64>,
}

impl BoostingConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of members
    pub fn n_base(mut self, n_base: usize) -> Self {
        self.n_base = Some(n_base);
        self
    }

    /// Set the weight increment for low-confidence rows
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = Some(rate);
        self
    }

    /// Set the fraction of rows drawn each round
    pub fn sampling_ratio(mut self, ratio: f64) -> Self {
        self.sampling_ratio = Some(ratio);
        self
    }

    /// Set the target fraction of rows below the confidence cutoff
    pub fn boost_thr(mut self, thr: f64) -> Self {
        self.boost_thr = Some(thr);
        self
    }

    /// Set the threshold solver tolerance
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Only members at least this confident vote on a row
    pub fn conf_thr(mut self, thr: f64) -> Self {
        self.conf_thr = Some(thr);
        self
    }

    /// Set the decisor count as a fraction of the members
    pub fn perc_decisors(mut self, perc: f64) -> Self {
        self.perc_decisors = Some(perc);
        self
    }

    /// Set the decisor count
    pub fn n_decisors(mut self, n: usize) -> Self {
        self.n_decisors = Some(n);
        self
    }

    /// Use the confidence-weighted mean over all members
    pub fn weighted(mut self, weighted: bool) -> Self {
        self.weighted = weighted;
        self
    }

    /// Seed the sampler
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Resolve the configuration, logging every fallback
    pub fn build(self) -> BoostingConfig {
        self.build_with_warnings().0
    }

    /// Resolve the configuration and return the fallbacks that were applied
    pub fn build_with_warnings(self) -> (BoostingConfig, Vec<ValidationWarning>) {
        let mut validator = ConfigValidator::new();
        let n_base = validator.n_base(self.n_base);
        let sampling_ratio =
            validator.unit_fraction("sampling_ratio", self.sampling_ratio, default_boosting_sampling_ratio(n_base));
        let learning_rate = validator.learning_rate(self.learning_rate);
        let boost_thr = validator.boost_thr(self.boost_thr);
        let tolerance = validator.tolerance(self.tolerance);
        let conf_thr = validator.conf_thr(self.conf_thr);
        let (n_decisors, perc_decisors) = validator.decisors(n_base, self.perc_decisors, self.n_decisors);

        let config = BoostingConfig {
            n_base,
            learning_rate,
            sampling_ratio,
            boost_thr,
            tolerance,
            voting: VotingConfig {
                n_decisors,
                perc_decisors,
                weighted: self.weighted,
                conf_thr,
            },
            seed: self.seed,
        };
        (config, validator.finish())
    }
}

/// Configuration of a [`crate::ConfidenceBagging`] ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaggingConfig {
    /// Number of members
    pub n_base: usize,
    /// Fraction of features drawn per member
    pub max_features: f64,
    /// Fraction of rows drawn per member
    pub sampling_ratio: f64,
    /// Seed for reproducible sampling
    pub seed: Option<u64>,
    /// Worker threads for training (0 = all cores)
    pub num_threads: usize,
    /// Prediction-time aggregation
    pub voting: VotingConfig,
}

impl Default for BaggingConfig {
    fn default() -> Self {
        BaggingConfigBuilder::new().build()
    }
}

impl BaggingConfig {
    /// Start a builder with every parameter unset
    pub fn builder() -> BaggingConfigBuilder {
        BaggingConfigBuilder::new()
    }

    /// Builder pre-filled with this configuration
    pub fn to_builder(&self) -> BaggingConfigBuilder {
        BaggingConfigBuilder {
            n_base: Some(self.n_base),
            max_features: Some(self.max_features),
            sampling_ratio: Some(self.sampling_ratio),
            perc_decisors: self.voting.perc_decisors,
            n_decisors: self.voting.perc_decisors.map_or(Some(self.voting.n_decisors), |_| None),
            weighted: self.voting.weighted,
            seed: self.seed,
            num_threads: self.num_threads,
        }
    }

    /// Get the effective number of threads (0 means use all available cores)
    pub fn effective_num_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
    }

    /// Load a configuration from a `.json` or `.toml` file. Values are
    /// re-validated after parsing.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Self = load(path.as_ref())?;
        Ok(config.to_builder().build())
    }

    /// Save the configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save(self, path.as_ref())
    }

    /// Apply `CONFENS_SEED` and `CONFENS_NUM_THREADS` if they are set
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        if let Some(seed) = env_override::<u64>(ENV_SEED)? {
            self.seed = Some(seed);
        }
        if let Some(threads) = env_override::<usize>(ENV_NUM_THREADS)? {
            self.num_threads = threads;
        }
        Ok(())
    }
}

/// Fluent builder for [`BaggingConfig`]
#[derive(Debug, Clone, Default)]
pub struct BaggingConfigBuilder {
    n_base: Option<usize>,
    max_features: Option<f64>,
    sampling_ratio: Option<f64>,
    perc_decisors: Option<f64>,
    n_decisors: Option<usize>,
    weighted: bool,
    seed: Option<u64>,
    num_threads: usize,
}

impl BaggingConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of members
    pub fn n_base(mut self, n_base: usize) -> Self {
        self.n_base = Some(n_base);
        self
    }

    /// Set the fraction of features drawn per member
    pub fn max_features(mut self, fraction: f64) -> Self {
        self.max_features = Some(fraction);
        self
    }

    /// Set the fraction of rows drawn per member
    pub fn sampling_ratio(mut self, ratio: f64) -> Self {
        self.sampling_ratio = Some(ratio);
        self
    }

    /// Set the decisor count as a fraction of the members
    pub fn perc_decisors(mut self, perc: f64) -> Self {
        self.perc_decisors = Some(perc);
        self
    }

    /// Set the decisor count
    pub fn n_decisors(mut self, n: usize) -> Self {
        self.n_decisors = Some(n);
        self
    }

    /// Use the confidence-weighted mean over all members
    pub fn weighted(mut self, weighted: bool) -> Self {
        self.weighted = weighted;
        self
    }

    /// Seed the samplers
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of training threads (0 = all cores)
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }

    /// Resolve the configuration, logging every fallback
    pub fn build(self) -> BaggingConfig {
        self.build_with_warnings().0
    }

    /// Resolve the configuration and return the fallbacks that were applied
    pub fn build_with_warnings(self) -> (BaggingConfig, Vec<ValidationWarning>) {
        let mut validator = ConfigValidator::new();
        let n_base = validator.n_base(self.n_base);
        let max_features = validator.unit_fraction("max_features", self.max_features, DEFAULT_MAX_FEATURES);
        let sampling_ratio =
            validator.unit_fraction("sampling_ratio", self.sampling_ratio, DEFAULT_BAGGING_SAMPLING_RATIO);
        let (n_decisors, perc_decisors) = validator.decisors(n_base, self.perc_decisors, self.n_decisors);

        let config = BaggingConfig {
            n_base,
            max_features,
            sampling_ratio,
            voting: VotingConfig {
                n_decisors,
                perc_decisors,
                weighted: self.weighted,
                conf_thr: None,
            },
            seed: self.seed,
            num_threads: self.num_threads,
        };
        (config, validator.finish())
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        _ => Err(ConfensError::config(
            "Unsupported config file format. Use .json or .toml",
        )),
    }
}

fn save<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let content = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::to_string_pretty(value)?,
        Some("toml") => toml::to_string_pretty(value)?,
        _ => {
            return Err(ConfensError::config(
                "Unsupported config file format. Use .json or .toml",
            ))
        }
    };
    std::fs::write(path, content)?;
    Ok(())
}

fn env_override<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfensError::config(format!("Invalid value for {}: {}", name, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boosting_defaults() {
        let config = BoostingConfig::default();
        assert_eq!(config.n_base, DEFAULT_N_BASE);
        assert_eq!(config.learning_rate, DEFAULT_LEARNING_RATE);
        assert_eq!(config.boost_thr, DEFAULT_BOOST_THR);
        assert_eq!(config.sampling_ratio, default_boosting_sampling_ratio(DEFAULT_N_BASE));
        assert_eq!(config.voting.n_decisors, 6);
        assert!(!config.voting.weighted);
    }

    #[test]
    fn test_boosting_sampling_ratio_follows_n_base() {
        let config = BoostingConfig::builder().n_base(16).build();
        assert_eq!(config.sampling_ratio, 0.25);
    }

    #[test]
    fn test_bagging_defaults() {
        let config = BaggingConfig::default();
        assert_eq!(config.n_base, DEFAULT_N_BASE);
        assert_eq!(config.max_features, DEFAULT_MAX_FEATURES);
        assert_eq!(config.sampling_ratio, DEFAULT_BAGGING_SAMPLING_RATIO);
        assert_eq!(config.voting.mode(), AggregationMode::TopK { n_decisors: 6 });
    }

    #[test]
    fn test_bagging_builder_fallbacks() {
        let (config, warnings) = BaggingConfig::builder()
            .n_base(1)
            .max_features(0.0)
            .sampling_ratio(3.0)
            .build_with_warnings();

        assert_eq!(config.n_base, DEFAULT_N_BASE);
        assert_eq!(config.max_features, DEFAULT_MAX_FEATURES);
        assert_eq!(config.sampling_ratio, DEFAULT_BAGGING_SAMPLING_RATIO);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_voting_modes() {
        let weighted = BaggingConfig::builder().weighted(true).build();
        assert_eq!(weighted.voting.mode(), AggregationMode::Weighted);

        let gated = BoostingConfig::builder().n_base(4).conf_thr(0.9).n_decisors(2).build();
        assert_eq!(
            gated.voting.mode(),
            AggregationMode::Threshold { conf_thr: 0.9, n_decisors: 2 }
        );
    }

    #[test]
    fn test_to_builder_roundtrip() {
        let config = BoostingConfig::builder()
            .n_base(5)
            .perc_decisors(0.4)
            .learning_rate(1.5)
            .seed(7)
            .build();
        let (rebuilt, warnings) = config.to_builder().build_with_warnings();
        assert_eq!(rebuilt, config);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let config = BaggingConfig::default();
        assert!(config.save_to_file("config.yaml").is_err());
    }
}
