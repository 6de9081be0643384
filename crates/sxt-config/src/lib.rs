#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Layered configuration for the SxT client.
//!
//! # Usage
//!
//! ```rust,no_run
//! use sxt_config::Config;
//!
//! let resolved = Config::load(None).unwrap();
//! println!("auth endpoint: {}", resolved.config.api.base_url);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Explicit file** (`--config path.toml`)
//! 2. **User** (`~/.sxt/config.toml`, or `$SXT_HOME/config.toml`)
//! 3. **Environment variables** (`SXT_*`, plus the legacy `USERID`,
//!    `JOINCODE`, `SCHEME`, `BASEURL_DISCOVERY`); fallback only
//! 4. **Embedded defaults** (`defaults.toml` compiled into the binary)

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered configuration merging.
pub mod merge;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::ResolvedConfig;
pub use merge::ConfigLayer;
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// See [`loader::load`] for the algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(explicit_file: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit_file, None)
    }

    /// Load configuration with an explicit SxT home directory.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_with_home(
        explicit_file: Option<&std::path::Path>,
        sxt_home: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit_file, Some(sxt_home))
    }

    /// Load a single file over the defaults (no user file, no env).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
