//! Test fixtures for common types.

use serde_json::{Value, json};
use sxt_core::dirs::SxtHome;
use sxt_core::{JoinCode, TokenPair, UserId};
use sxt_crypto::KeyPair;
use sxt_storage::SessionRecord;
use tempfile::TempDir;

/// Create a test user id.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn test_user_id() -> UserId {
    #[allow(clippy::unwrap_used)]
    UserId::new("test-user").unwrap()
}

/// Create a test join code.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn test_join_code() -> JoinCode {
    #[allow(clippy::unwrap_used)]
    JoinCode::new("test-join-code").unwrap()
}

/// Create a complete token pair.
#[must_use]
pub fn test_token_pair() -> TokenPair {
    TokenPair::new("test-access-token", "test-refresh-token")
        .with_expiries(1_900_000_000, 1_900_086_400)
}

/// Create a stored session for [`test_user_id`] with a fresh key pair.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn test_session_record() -> SessionRecord {
    #[allow(clippy::unwrap_used)]
    SessionRecord::new(test_user_id(), test_token_pair(), KeyPair::generate().unwrap())
}

/// A token endpoint response body.
#[must_use]
pub fn token_response(access: &str, refresh: &str) -> Value {
    json!({
        "accessToken": access,
        "refreshToken": refresh,
        "accessTokenExpires": 1_900_000_000_i64,
        "refreshTokenExpires": 1_900_086_400_i64,
    })
}

/// A challenge endpoint response body.
#[must_use]
pub fn auth_code_response(code: &str) -> Value {
    json!({ "authCode": code })
}

/// A temporary SxT home directory. Dropping the `TempDir` removes it.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn temp_home() -> (TempDir, SxtHome) {
    #[allow(clippy::unwrap_used)]
    let dir = tempfile::tempdir().unwrap();
    let home = SxtHome::from_path(dir.path().join(".sxt"));
    (dir, home)
}

/// Install a test subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
