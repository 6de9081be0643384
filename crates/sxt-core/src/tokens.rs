//! Bearer tokens issued by the auth endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access and refresh tokens plus their expiry instants.
///
/// Tokens are opaque and never parsed. Expiries are epoch seconds as reported
/// by the platform; `0` means the platform did not report one.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived bearer token presented on every platform request.
    pub access_token: String,
    /// Longer-lived token exchanged for a fresh pair.
    pub refresh_token: String,
    /// Access token expiry (epoch seconds).
    #[serde(default)]
    pub access_token_expires: i64,
    /// Refresh token expiry (epoch seconds).
    #[serde(default)]
    pub refresh_token_expires: i64,
}

impl TokenPair {
    /// Create a pair without expiry information.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            access_token_expires: 0,
            refresh_token_expires: 0,
        }
    }

    /// Builder method to set both expiry instants.
    #[must_use]
    pub fn with_expiries(mut self, access: i64, refresh: i64) -> Self {
        self.access_token_expires = access;
        self.refresh_token_expires = refresh;
        self
    }

    /// Whether both tokens are present. Incomplete pairs are never persisted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }

    /// Access token expiry as a timestamp, if one was reported.
    #[must_use]
    pub fn access_expires_at(&self) -> Option<DateTime<Utc>> {
        expiry(self.access_token_expires)
    }

    /// Refresh token expiry as a timestamp, if one was reported.
    #[must_use]
    pub fn refresh_expires_at(&self) -> Option<DateTime<Utc>> {
        expiry(self.refresh_token_expires)
    }

    /// Whether the access token is known to have expired at `now`.
    ///
    /// Unknown expiry counts as not expired; the endpoint stays authoritative.
    #[must_use]
    pub fn access_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.access_expires_at().is_some_and(|at| at <= now)
    }

    /// Whether the access token is known to have expired already.
    #[must_use]
    pub fn access_expired(&self) -> bool {
        self.access_expired_at(Utc::now())
    }
}

fn expiry(secs: i64) -> Option<DateTime<Utc>> {
    if secs <= 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("access_token_expires", &self.access_token_expires)
            .field("refresh_token_expires", &self.refresh_token_expires)
            .finish()
    }
}

fn redact(token: &str) -> &'static str {
    if token.is_empty() { "<empty>" } else { "<redacted>" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let json = r#"{
            "accessToken": "a",
            "refreshToken": "r",
            "accessTokenExpires": 1700000000,
            "refreshTokenExpires": 1700003600
        }"#;
        let pair: TokenPair = serde_json::from_str(json).unwrap();

        assert_eq!(pair.access_token, "a");
        assert_eq!(pair.refresh_token, "r");
        assert_eq!(pair.access_token_expires, 1_700_000_000);
        assert_eq!(pair.refresh_token_expires, 1_700_003_600);
    }

    #[test]
    fn test_missing_expiries_default() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"accessToken":"a","refreshToken":"r"}"#).unwrap();
        assert_eq!(pair, TokenPair::new("a", "r"));
        assert!(pair.access_expires_at().is_none());
        assert!(!pair.access_expired_at(Utc::now()));
    }

    #[test]
    fn test_is_complete() {
        assert!(TokenPair::new("a", "r").is_complete());
        assert!(!TokenPair::new("", "r").is_complete());
        assert!(!TokenPair::new("a", "").is_complete());
    }

    #[test]
    fn test_access_expiry() {
        let pair = TokenPair::new("a", "r").with_expiries(1_000, 2_000);
        let before = DateTime::from_timestamp(999, 0).unwrap();
        let after = DateTime::from_timestamp(1_001, 0).unwrap();

        assert!(!pair.access_expired_at(before));
        assert!(pair.access_expired_at(after));
        assert!(pair.access_expired());
        assert!(!TokenPair::new("a", "r").access_expired());
        assert_eq!(pair.refresh_expires_at().unwrap().timestamp(), 2_000);
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let pair = TokenPair::new("secret-access", "secret-refresh");
        let debug = format!("{pair:?}");
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
    }
}
