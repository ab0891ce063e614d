//! Core infrastructure module for confens.
//!
//! - [`types`]: fundamental data types and enumerations
//! - [`constants`]: configuration defaults
//! - [`error`]: error type and `Result` alias
//! - [`traits`]: base estimator, diversity metric and ensemble contracts
//! - [`utils`]: input validation and label helpers

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
pub mod utils;

pub use constants::*;
pub use error::{ConfensError, Result};
pub use traits::*;
pub use types::*;

use std::sync::Once;

static LOGGER: Once = Once::new();

/// Install `env_logger` as the `log` backend.
///
/// Defaults to the `info` level when `RUST_LOG` is unset. Calling it more than
/// once, or after another logger was installed, is harmless.
pub fn initialize_logging() {
    LOGGER.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("info");
        if env_logger::Builder::from_env(env).try_init().is_ok() {
            log::debug!("confens {} logging initialized", env!("CARGO_PKG_VERSION"));
        }
    });
}
