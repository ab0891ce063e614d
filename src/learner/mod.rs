//! Reference base estimators.
//!
//! Any [`crate::BaseEstimator`] can be wrapped by the ensembles; this module
//! ships a small Gaussian naive Bayes classifier so the crate is usable on its
//! own.

pub mod naive_bayes;

pub use naive_bayes::GaussianNB;
