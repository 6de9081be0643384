//! Bridge from `sxt_config::Config` to client types.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use sxt_auth::{AuthClient, AuthSession, KeyPolicy, ReqwestTransport};
use sxt_config::{Config, KeyPolicyKind, SessionBackendKind};
use sxt_core::dirs::SxtHome;
use sxt_core::{JoinCode, UserId};
use sxt_storage::SessionBackend;
use sxt_telemetry::LogConfig;

/// Logging settings from `[logging]`, with `--verbose` forcing debug.
pub(crate) fn to_log_config(config: &Config, verbose: bool) -> Result<LogConfig> {
    let log_config = LogConfig::from_section(&config.logging)?;
    Ok(if verbose {
        log_config.with_level("debug")
    } else {
        log_config
    })
}

/// Where sessions live for this configuration.
pub(crate) fn session_backend(config: &Config, home: &SxtHome) -> SessionBackend {
    match config.session.backend {
        SessionBackendKind::Memory => SessionBackend::Memory,
        SessionBackendKind::File => SessionBackend::File(
            config
                .session
                .directory
                .clone()
                .unwrap_or_else(|| home.sessions_dir()),
        ),
    }
}

/// Key handling on re-login.
pub(crate) fn key_policy(config: &Config) -> KeyPolicy {
    match config.session.key_policy {
        KeyPolicyKind::Reuse => KeyPolicy::Reuse,
        KeyPolicyKind::Regenerate => KeyPolicy::Regenerate,
    }
}

/// Protocol client over HTTP for `[api]` and `[http]`.
pub(crate) fn build_client(config: &Config) -> Result<AuthClient> {
    let transport = ReqwestTransport::new(
        &config.api.base_url,
        Duration::from_secs(config.http.timeout_secs),
    )?;
    Ok(AuthClient::new(Arc::new(transport)).with_scheme(config.api.scheme.clone()))
}

/// Session state machine wired to the configured transport and store.
pub(crate) fn build_session(config: &Config, home: &SxtHome) -> Result<AuthSession> {
    let client = build_client(config)?;
    let store = session_backend(config, home).open();
    Ok(AuthSession::new(client, store).with_key_policy(key_policy(config)))
}

/// The `--userid` flag, else `identity.user_id`.
pub(crate) fn resolve_user_id(flag: Option<&str>, config: &Config) -> Result<UserId> {
    let Some(raw) = flag.or(config.identity.user_id.as_deref()) else {
        bail!("no user id; pass --userid or set SXT_USER_ID");
    };
    UserId::new(raw).context("invalid user id")
}

/// The `--joincode` flag, else `identity.join_code`.
pub(crate) fn resolve_join_code(flag: Option<&str>, config: &Config) -> Result<Option<JoinCode>> {
    flag.or(config.identity.join_code.as_deref())
        .map(|raw| JoinCode::new(raw).context("invalid join code"))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_backend_defaults_to_home_sessions() {
        let config = Config::default();
        let home = SxtHome::from_path("/tmp/sxt-home");
        assert_eq!(
            session_backend(&config, &home),
            SessionBackend::File(PathBuf::from("/tmp/sxt-home/sessions"))
        );
    }

    #[test]
    fn test_explicit_directory_and_memory_backend() {
        let mut config = Config::default();
        config.session.directory = Some(PathBuf::from("/var/lib/sxt"));
        let home = SxtHome::from_path("/tmp/sxt-home");
        assert_eq!(
            session_backend(&config, &home),
            SessionBackend::File(PathBuf::from("/var/lib/sxt"))
        );

        config.session.backend = SessionBackendKind::Memory;
        assert_eq!(session_backend(&config, &home), SessionBackend::Memory);
    }

    #[test]
    fn test_key_policy_mapping() {
        let mut config = Config::default();
        assert_eq!(key_policy(&config), KeyPolicy::Reuse);
        config.session.key_policy = KeyPolicyKind::Regenerate;
        assert_eq!(key_policy(&config), KeyPolicy::Regenerate);
    }

    #[test]
    fn test_user_id_flag_wins() {
        let mut config = Config::default();
        config.identity.user_id = Some("from-config".to_owned());

        assert_eq!(
            resolve_user_id(Some("from-flag"), &config).unwrap().as_str(),
            "from-flag"
        );
        assert_eq!(
            resolve_user_id(None, &config).unwrap().as_str(),
            "from-config"
        );
        assert!(resolve_user_id(None, &Config::default()).is_err());
    }

    #[test]
    fn test_join_code_optional() {
        assert!(resolve_join_code(None, &Config::default()).unwrap().is_none());
        let code = resolve_join_code(Some("jc"), &Config::default()).unwrap();
        assert_eq!(code.unwrap().expose(), "jc");
    }

    #[test]
    fn test_verbose_forces_debug() {
        let log = to_log_config(&Config::default(), true).unwrap();
        assert_eq!(log.level, "debug");
        let log = to_log_config(&Config::default(), false).unwrap();
        assert_eq!(log.level, "warn");
    }

    #[test]
    fn test_build_client_uses_scheme() {
        let client = build_client(&Config::default()).unwrap();
        assert_eq!(client.scheme(), "ed25519");
    }
}
