//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge the user file (`{home}/config.toml`)
//! 3. Merge the explicit `--config` file, if any
//! 4. Apply env var fallbacks for fields no file set
//! 5. Deserialize the merged tree → `Config`
//! 6. Validate

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, record_leaves};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Variable overriding the SxT home directory.
const SXT_HOME_VAR: &str = "SXT_HOME";

/// A loaded configuration plus where each value came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The validated configuration.
    pub config: Config,
    /// Source layer of every leaf field, keyed by dotted path.
    pub field_sources: FieldSources,
    /// Files that contributed, in merge order.
    pub loaded_files: Vec<String>,
}

impl ResolvedConfig {
    /// Layer that set `path`, if known.
    #[must_use]
    pub fn source_of(&self, path: &str) -> Option<&ConfigLayer> {
        self.field_sources.get(path)
    }
}

/// Load configuration from the process environment.
///
/// `sxt_home` overrides home discovery; the user file is then
/// `{sxt_home}/config.toml`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is malformed, the explicit
/// file cannot be read, or the merged configuration fails validation.
pub fn load(explicit_file: Option<&Path>, sxt_home: Option<&Path>) -> ConfigResult<ResolvedConfig> {
    load_with_env(explicit_file, sxt_home, &collect_env_vars())
}

/// Load configuration against an explicit set of environment variables.
///
/// # Errors
///
/// Same as [`load`].
pub fn load_with_env<S: BuildHasher>(
    explicit_file: Option<&Path>,
    sxt_home: Option<&Path>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<ResolvedConfig> {
    // 1. Embedded defaults.
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", &ConfigLayer::Defaults, &mut field_sources);

    // 2. User file.
    let user_path = user_config_path(sxt_home, env_vars)?;
    if let Some(overlay) = try_load_file(&user_path)? {
        deep_merge_tracking(&mut merged, &overlay, "", &ConfigLayer::User, &mut field_sources);
        loaded_files.push(user_path.display().to_string());
        info!(path = %user_path.display(), "loaded user config");
    }

    // 3. Explicit file; it must exist.
    if let Some(path) = explicit_file {
        let overlay = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        })?;
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::Explicit,
            &mut field_sources,
        );
        loaded_files.push(path.display().to_string());
        info!(path = %path.display(), "loaded explicit config");
    }

    // 4. Env fallbacks.
    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    // 5. Deserialize.
    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    // 6. Validate.
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Load a config from a single file on top of the defaults (no env, no user file).
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let overlay = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
    })?;

    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;
    let mut sources = FieldSources::new();
    deep_merge_tracking(&mut merged, &overlay, "", &ConfigLayer::Explicit, &mut sources);

    let config: Config = merged
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;

    validate::validate(&config)?;
    Ok(config)
}

/// `{sxt_home}/config.toml`, `$SXT_HOME/config.toml`, or `~/.sxt/config.toml`.
fn user_config_path<S: BuildHasher>(
    sxt_home: Option<&Path>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<PathBuf> {
    if let Some(home) = sxt_home {
        return Ok(home.join("config.toml"));
    }
    if let Some(custom) = env_vars.get(SXT_HOME_VAR).filter(|v| !v.trim().is_empty()) {
        return Ok(PathBuf::from(custom).join("config.toml"));
    }
    Ok(home_directory()?.join(".sxt").join("config.toml"))
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}

/// Try to load a file, returning `None` if the file doesn't exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len()
            ),
        });
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyPolicyKind, SessionBackendKind};

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_defaults_deserialize_to_default_config() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_without_files() {
        let home = tempfile::tempdir().unwrap();
        let resolved = load_with_env(None, Some(home.path()), &no_env()).unwrap();

        assert_eq!(resolved.config, Config::default());
        assert!(resolved.loaded_files.is_empty());
        assert_eq!(
            resolved.source_of("api.base_url"),
            Some(&ConfigLayer::Defaults)
        );
    }

    #[test]
    fn test_layering_order() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "[identity]\nuser_id = \"from-user\"\n[http]\ntimeout_secs = 10\n",
        )
        .unwrap();
        let explicit = home.path().join("explicit.toml");
        std::fs::write(&explicit, "[http]\ntimeout_secs = 20\n").unwrap();

        let env: HashMap<String, String> = [
            ("SXT_USER_ID", "from-env"),
            ("SXT_LOG_LEVEL", "debug"),
        ]
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();

        let resolved = load_with_env(Some(&explicit), Some(home.path()), &env).unwrap();

        assert_eq!(resolved.config.identity.user_id.as_deref(), Some("from-user"));
        assert_eq!(resolved.config.http.timeout_secs, 20);
        assert_eq!(resolved.config.logging.level, "debug");
        assert_eq!(resolved.loaded_files.len(), 2);
        assert_eq!(
            resolved.source_of("http.timeout_secs"),
            Some(&ConfigLayer::Explicit)
        );
        assert_eq!(
            resolved.source_of("logging.level"),
            Some(&ConfigLayer::Environment)
        );
    }

    #[test]
    fn test_sxt_home_env_locates_user_file() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "[session]\nbackend = \"memory\"\nkey_policy = \"regenerate\"\n",
        )
        .unwrap();
        let env: HashMap<String, String> = [(
            SXT_HOME_VAR.to_owned(),
            home.path().display().to_string(),
        )]
        .into_iter()
        .collect();

        let resolved = load_with_env(None, None, &env).unwrap();

        assert_eq!(resolved.config.session.backend, SessionBackendKind::Memory);
        assert_eq!(resolved.config.session.key_policy, KeyPolicyKind::Regenerate);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let home = tempfile::tempdir().unwrap();
        let result = load_with_env(
            Some(Path::new("/nonexistent/sxt.toml")),
            Some(home.path()),
            &no_env(),
        );
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join("config.toml"), "[api\nbase_url = ").unwrap();

        let result = load_with_env(None, Some(home.path()), &no_env());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_invalid_merged_value_is_validation_error() {
        let home = tempfile::tempdir().unwrap();
        let env: HashMap<String, String> = [("SCHEME".to_owned(), "rsa".to_owned())]
            .into_iter()
            .collect();

        let result = load_with_env(None, Some(home.path()), &env);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "api.scheme"
        ));
    }

    #[test]
    fn test_load_file_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sxt.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://localhost:8080\"\n").unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.scheme, "ed25519");
    }

    #[test]
    fn test_oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("huge.toml");
        let data = format!("x = \"{}\"", "a".repeat(1_100_000));
        std::fs::write(&file_path, data).unwrap();

        let result = try_load_file(&file_path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
