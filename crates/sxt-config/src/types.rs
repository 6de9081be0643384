//! Configuration types for the SxT client.
//!
//! Types here have no dependencies on other internal crates; the CLI maps
//! them onto transport, store and logging settings at startup. Every struct
//! implements [`Default`] with the same values as the embedded
//! `defaults.toml`.

use std::path::PathBuf;

use serde::Deserialize;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.spaceandtime.app/v1";

/// The only supported signature scheme.
pub const DEFAULT_SCHEME: &str = "ed25519";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Auth endpoint location and signature scheme.
    pub api: ApiSection,
    /// Who to authenticate as.
    pub identity: IdentitySection,
    /// Where and how sessions are kept.
    pub session: SessionSection,
    /// HTTP transport settings.
    pub http: HttpSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

/// Auth endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Base URL; auth routes live under `{base_url}/auth/`.
    pub base_url: String,
    /// Signature scheme sent with the token exchange.
    pub scheme: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            scheme: DEFAULT_SCHEME.to_owned(),
        }
    }
}

/// Identity settings.
///
/// `Debug` never prints the join code.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IdentitySection {
    /// User id registered with the service.
    pub user_id: Option<String>,
    /// Join code, needed only for first enrollment.
    pub join_code: Option<String>,
}

impl std::fmt::Debug for IdentitySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentitySection")
            .field("user_id", &self.user_id)
            .field("has_join_code", &self.join_code.is_some())
            .finish()
    }
}

/// Session store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackendKind {
    /// One JSON file per user under the session directory.
    #[default]
    File,
    /// Process memory only; nothing survives exit.
    Memory,
}

/// What to do with the stored key pair when a session must be re-established.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicyKind {
    /// Keep the stored key pair.
    #[default]
    Reuse,
    /// Generate a fresh key pair.
    Regenerate,
}

/// Session settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Store backend.
    pub backend: SessionBackendKind,
    /// Directory for the file backend. Defaults to `{home}/sessions`.
    pub directory: Option<PathBuf>,
    /// Key pair handling on re-login.
    pub key_policy: KeyPolicyKind,
}

/// HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Level filter (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Output format (`pretty`, `compact`, `json`, `full`).
    pub format: String,
    /// Extra filter directives such as `sxt_auth=debug`.
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
