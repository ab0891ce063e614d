//! Configuration management for the confidence ensembles.
//!
//! All parameters are fixed at construction time. Builders validate and
//! default every value (see [`validation`]); the resolved configurations can be
//! persisted as JSON or TOML.

pub mod core;
pub mod validation;

pub use self::core::{
    BaggingConfig, BaggingConfigBuilder, BoostingConfig, BoostingConfigBuilder, VotingConfig,
};
pub use validation::{ConfigValidator, ValidationResult, ValidationWarning};
