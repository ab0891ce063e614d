//! Parameter validation for ensemble configurations.
//!
//! Construction never fails: every out-of-range parameter is replaced by its
//! default and reported as a [`ValidationWarning`], which is also logged at
//! `warn` level when the validator is finished.

use crate::core::constants::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of checking one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationResult {
    /// Parameter is valid
    Valid,
    /// Parameter was replaced by a fallback
    Warning(ValidationWarning),
}

/// A parameter that was rejected and replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Parameter name
    pub parameter: String,
    /// Rejected value
    pub value: String,
    /// Why it was rejected
    pub message: String,
    /// Value used instead
    pub fallback: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parameter '{}' = '{}': {}, using {}",
            self.parameter, self.value, self.message, self.fallback
        )
    }
}

/// Collects warnings while resolving configuration parameters.
#[derive(Debug, Default)]
pub struct ConfigValidator {
    results: Vec<ValidationResult>,
}

impl ConfigValidator {
    /// Create an empty validator
    pub fn new() -> Self {
        Self::default()
    }

    fn check<T: fmt::Display>(&mut self, parameter: &str, value: T, valid: bool, message: &str, fallback: T) -> T {
        if valid {
            self.results.push(ValidationResult::Valid);
            value
        } else {
            self.results.push(ValidationResult::Warning(ValidationWarning {
                parameter: parameter.to_string(),
                value: value.to_string(),
                message: message.to_string(),
                fallback: fallback.to_string(),
            }));
            fallback
        }
    }

    /// Ensemble size: at least [`MIN_N_BASE`].
    pub fn n_base(&mut self, value: Option<usize>) -> usize {
        match value {
            None => DEFAULT_N_BASE,
            Some(n) => self.check(
                "n_base",
                n,
                n >= MIN_N_BASE,
                "ensembles have to be at least 2",
                DEFAULT_N_BASE,
            ),
        }
    }

    /// A fraction in `(0, 1]`.
    pub fn unit_fraction(&mut self, parameter: &str, value: Option<f64>, default: f64) -> f64 {
        match value {
            None => default,
            Some(v) => self.check(
                parameter,
                v,
                v > 0.0 && v <= 1.0,
                "must be in range (0.0, 1.0]",
                default,
            ),
        }
    }

    /// A target fraction in `[0, 1]`.
    pub fn boost_thr(&mut self, value: Option<f64>) -> f64 {
        match value {
            None => DEFAULT_BOOST_THR,
            Some(v) => self.check(
                "boost_thr",
                v,
                (0.0..=1.0).contains(&v),
                "must be in range [0.0, 1.0]",
                DEFAULT_BOOST_THR,
            ),
        }
    }

    /// A finite, non-negative learning rate.
    pub fn learning_rate(&mut self, value: Option<f64>) -> f64 {
        match value {
            None => DEFAULT_LEARNING_RATE,
            Some(v) => self.check(
                "learning_rate",
                v,
                v.is_finite() && v >= 0.0,
                "must be finite and non-negative",
                DEFAULT_LEARNING_RATE,
            ),
        }
    }

    /// A strictly positive solver tolerance.
    pub fn tolerance(&mut self, value: Option<f64>) -> f64 {
        match value {
            None => DEFAULT_THRESHOLD_TOLERANCE,
            Some(v) => self.check(
                "tolerance",
                v,
                v.is_finite() && v > 0.0,
                "must be positive",
                DEFAULT_THRESHOLD_TOLERANCE,
            ),
        }
    }

    /// Optional confidence gate in `[0, 1]`; rejected values disable it.
    pub fn conf_thr(&mut self, value: Option<f64>) -> Option<f64> {
        let v = value?;
        if (0.0..=1.0).contains(&v) {
            self.results.push(ValidationResult::Valid);
            Some(v)
        } else {
            self.results.push(ValidationResult::Warning(ValidationWarning {
                parameter: "conf_thr".to_string(),
                value: v.to_string(),
                message: "must be in range [0.0, 1.0]".to_string(),
                fallback: "None".to_string(),
            }));
            None
        }
    }

    /// Resolve the decisor count. A valid percentage wins over a valid count;
    /// with neither, `1 + n_base / 2` is used.
    ///
    /// Returns the decisor count and the percentage that produced it, if any.
    pub fn decisors(
        &mut self,
        n_base: usize,
        perc_decisors: Option<f64>,
        n_decisors: Option<usize>,
    ) -> (usize, Option<f64>) {
        let count_valid = n_decisors.map_or(false, |n| n > 0 && n <= n_base);
        let default = default_n_decisors(n_base);

        if let Some(perc) = perc_decisors {
            if perc > 0.0 && perc <= 1.0 {
                let resolved = ((n_base as f64 * perc) as usize).max(1);
                if count_valid {
                    self.results.push(ValidationResult::Warning(ValidationWarning {
                        parameter: "n_decisors".to_string(),
                        value: n_decisors.map(|n| n.to_string()).unwrap_or_default(),
                        message: "both perc_decisors and n_decisors are specified, prioritizing perc_decisors"
                            .to_string(),
                        fallback: resolved.to_string(),
                    }));
                } else {
                    self.results.push(ValidationResult::Valid);
                }
                return (resolved, Some(perc));
            }
            let fallback = if count_valid { n_decisors.unwrap_or(default) } else { default };
            self.check("perc_decisors", perc, false, "must be in range (0.0, 1.0]", perc);
            if let Some(ValidationResult::Warning(w)) = self.results.last_mut() {
                w.fallback = format!("{} decisors", fallback);
            }
            if count_valid {
                return (fallback, None);
            }
        }

        match n_decisors {
            Some(n) => {
                let n = self.check("n_decisors", n, count_valid, "must be in range [1, n_base]", default);
                (n, None)
            }
            None => (default, None),
        }
    }

    /// Log and return the warnings.
    pub fn finish(self) -> Vec<ValidationWarning> {
        self.results
            .into_iter()
            .filter_map(|result| match result {
                ValidationResult::Warning(warning) => {
                    log::warn!("{}", warning);
                    Some(warning)
                }
                ValidationResult::Valid => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n_base_fallback() {
        let mut validator = ConfigValidator::new();
        assert_eq!(validator.n_base(Some(1)), DEFAULT_N_BASE);
        assert_eq!(validator.n_base(Some(4)), 4);
        assert_eq!(validator.n_base(None), DEFAULT_N_BASE);
        let warnings = validator.finish();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].parameter, "n_base");
    }

    #[test]
    fn test_unit_fraction() {
        let mut validator = ConfigValidator::new();
        assert_eq!(validator.unit_fraction("max_features", Some(1.0), 0.7), 1.0);
        assert_eq!(validator.unit_fraction("max_features", Some(0.0), 0.7), 0.7);
        assert_eq!(validator.unit_fraction("max_features", Some(1.5), 0.7), 0.7);
        assert_eq!(validator.finish().len(), 2);
    }

    #[test]
    fn test_percentage_wins() {
        let mut validator = ConfigValidator::new();
        assert_eq!(validator.decisors(10, Some(0.3), Some(5)), (3, Some(0.3)));
        let warnings = validator.finish();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("prioritizing"));
    }

    #[test]
    fn test_small_percentage_keeps_one_decisor() {
        let mut validator = ConfigValidator::new();
        assert_eq!(validator.decisors(4, Some(0.1), None), (1, Some(0.1)));
        assert!(validator.finish().is_empty());
    }

    #[test]
    fn test_invalid_percentage_falls_back_to_count() {
        let mut validator = ConfigValidator::new();
        assert_eq!(validator.decisors(10, Some(2.0), Some(4)), (4, None));
        assert_eq!(validator.finish().len(), 1);
    }

    #[test]
    fn test_decisor_defaults() {
        let mut validator = ConfigValidator::new();
        assert_eq!(validator.decisors(10, None, None), (6, None));
        assert_eq!(validator.decisors(10, None, Some(11)), (6, None));
        assert_eq!(validator.decisors(10, None, Some(0)), (6, None));
        assert_eq!(validator.decisors(10, None, Some(10)), (10, None));
        assert_eq!(validator.finish().len(), 2);
    }

    #[test]
    fn test_conf_thr_rejected() {
        let mut validator = ConfigValidator::new();
        assert_eq!(validator.conf_thr(Some(1.2)), None);
        assert_eq!(validator.conf_thr(Some(0.9)), Some(0.9));
        assert_eq!(validator.conf_thr(None), None);
        assert_eq!(validator.finish().len(), 1);
    }

    #[test]
    fn test_learning_rate_and_tolerance() {
        let mut validator = ConfigValidator::new();
        assert_eq!(validator.learning_rate(Some(-1.0)), DEFAULT_LEARNING_RATE);
        assert_eq!(validator.learning_rate(Some(f64::NAN)), DEFAULT_LEARNING_RATE);
        assert_eq!(validator.learning_rate(Some(0.5)), 0.5);
        assert_eq!(validator.tolerance(Some(0.0)), DEFAULT_THRESHOLD_TOLERANCE);
        assert_eq!(validator.boost_thr(Some(1.5)), DEFAULT_BOOST_THR);
        assert_eq!(validator.finish().len(), 4);
    }
}
