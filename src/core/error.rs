//! Error handling and error types for confens.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is [`ConfensError`]. Configuration problems found at construction time are
//! never errors: they are logged and replaced by defaults (see
//! [`crate::config::validation`]).

use std::io;
use thiserror::Error;

/// Main error type for the confens library.
#[derive(Error, Debug)]
pub enum ConfensError {
    /// Configuration file or configuration value errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid argument passed to an operation
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// More rows were requested than the dataset holds
    #[error("Invalid sample size: requested {requested} rows, {available} available")]
    InvalidSampleSize { requested: usize, available: usize },

    /// A class that must be represented in a sample has no row in the dataset
    #[error("Class {class} has no row to draw from")]
    MissingClass { class: usize },

    /// Weighted sampling could not be performed
    #[error("Sampling error: {message}")]
    Sampling { message: String },

    /// Prediction or inspection requested before training
    #[error("Ensemble is not fitted: call fit before {operation}")]
    NotFitted { operation: String },

    /// The wrapped base estimator failed while training or predicting
    #[error("Base estimator failure in member {member}: {message}")]
    Estimator { member: usize, message: String },

    /// Dimension mismatch errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Thread pool construction errors
    #[error("Threading error: {message}")]
    Threading { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML parse error: {source}")]
    TomlDe {
        #[from]
        source: toml::de::Error,
    },

    /// TOML serialization errors
    #[error("TOML serialization error: {source}")]
    TomlSer {
        #[from]
        source: toml::ser::Error,
    },
}

/// Type alias for Results using ConfensError
pub type Result<T> = std::result::Result<T, ConfensError>;

impl ConfensError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        ConfensError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        ConfensError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid sample size error
    pub fn invalid_sample_size(requested: usize, available: usize) -> Self {
        ConfensError::InvalidSampleSize {
            requested,
            available,
        }
    }

    /// Create a sampling error
    pub fn sampling<S: Into<String>>(message: S) -> Self {
        ConfensError::Sampling {
            message: message.into(),
        }
    }

    /// Create a not-fitted error for the given operation
    pub fn not_fitted<S: Into<String>>(operation: S) -> Self {
        ConfensError::NotFitted {
            operation: operation.into(),
        }
    }

    /// Create a base estimator error attributed to an ensemble member
    pub fn estimator<S: Into<String>>(member: usize, message: S) -> Self {
        ConfensError::Estimator {
            member,
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        ConfensError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a threading error
    pub fn threading<S: Into<String>>(message: S) -> Self {
        ConfensError::Threading {
            message: message.into(),
        }
    }

    /// Re-attribute an estimator error to a given member.
    ///
    /// Base estimators report failures without knowing their position in the
    /// ensemble; the trainers tag them on the way up.
    pub fn in_member(self, member: usize) -> Self {
        match self {
            ConfensError::Estimator { message, .. } => ConfensError::Estimator { member, message },
            other => other,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ConfensError::Config { .. } => "config",
            ConfensError::InvalidParameter { .. } => "invalid_parameter",
            ConfensError::InvalidSampleSize { .. } => "invalid_sample_size",
            ConfensError::MissingClass { .. } => "missing_class",
            ConfensError::Sampling { .. } => "sampling",
            ConfensError::NotFitted { .. } => "not_fitted",
            ConfensError::Estimator { .. } => "estimator",
            ConfensError::DimensionMismatch { .. } => "dimension_mismatch",
            ConfensError::Threading { .. } => "threading",
            ConfensError::Io { .. } => "io",
            ConfensError::Json { .. } => "json",
            ConfensError::TomlDe { .. } | ConfensError::TomlSer { .. } => "toml",
        }
    }
}
