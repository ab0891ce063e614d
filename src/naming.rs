//! Deterministic classifier names.
//!
//! A [`ClassifierSummary`] lists the hyperparameters of an ensemble in a fixed
//! order and renders them as `Name(base-v1-v2-...)`. Two ensembles with
//! different hyperparameters always get different names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered description of an ensemble configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierSummary {
    /// Ensemble kind, e.g. `ConfidenceBagger`
    pub name: String,
    /// Name of the wrapped base estimator
    pub base: String,
    /// Hyperparameters in rendering order
    pub params: Vec<(String, String)>,
}

impl ClassifierSummary {
    /// Start a summary for `name` wrapping `base`
    pub fn new<N: Into<String>, B: Into<String>>(name: N, base: B) -> Self {
        ClassifierSummary {
            name: name.into(),
            base: base.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter
    pub fn param<V: fmt::Display>(mut self, key: &str, value: V) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Append an optional parameter, rendered as `None` when absent
    pub fn optional<V: fmt::Display>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self.param(key, "None"),
        }
    }

    /// Look up a rendered parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ClassifierSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}", self.name, self.base)?;
        for (_, value) in &self.params {
            write!(f, "-{}", value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let summary = ClassifierSummary::new("ConfidenceBagger", "GaussianNB")
            .param("n_base", 10)
            .param("n_decisors", 6)
            .param("max_features", 0.7)
            .param("sampling_ratio", 0.7);
        assert_eq!(summary.to_string(), "ConfidenceBagger(GaussianNB-10-6-0.7-0.7)");
    }

    #[test]
    fn test_optional_and_lookup() {
        let summary = ClassifierSummary::new("ConfidenceBooster", "Tree")
            .param("learning_rate", 2.0)
            .optional::<f64>("conf_thr", None)
            .optional("perc_decisors", Some(0.5));
        assert_eq!(summary.to_string(), "ConfidenceBooster(Tree-2-None-0.5)");
        assert_eq!(summary.get("conf_thr"), Some("None"));
        assert_eq!(summary.get("missing"), None);
    }
}
