//! Session lifecycle: bootstrap from stored state, refresh, re-login, logout.
//!
//! ```text
//! NoSession -> Authenticating -> Authenticated
//!                   ^                  |
//!                   |            (access rejected)
//!                   |                  v
//!                Expired  <-------  Refreshing -> Authenticated
//!
//! any state -> LoggedOut
//! ```
//!
//! The resolved session is handed back as an [`ActiveSession`] value; the
//! access token never travels through process state.

use std::fmt;
use std::sync::Arc;
use sxt_core::{JoinCode, TokenPair, UserId};
use sxt_crypto::KeyPair;
use sxt_storage::{SessionRecord, SessionStore};
use tracing::{debug, info, warn};

use crate::client::AuthClient;
use crate::error::{AuthError, AuthResult};

/// Where the session state machine currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing resolved yet.
    NoSession,
    /// A challenge-response login is in flight.
    Authenticating,
    /// A usable access token is held.
    Authenticated,
    /// The stored access token was rejected; refreshing.
    Refreshing,
    /// Refresh failed; a full login is required.
    Expired,
    /// The session was revoked and removed.
    LoggedOut,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoSession => "no_session",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::Refreshing => "refreshing",
            Self::Expired => "expired",
            Self::LoggedOut => "logged_out",
        };
        f.write_str(name)
    }
}

/// What to do with the stored key pair when a refresh fails and a full
/// login is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Log in again with the enrolled key pair.
    #[default]
    Reuse,
    /// Generate a fresh key pair for the new login.
    Regenerate,
}

/// How the caller identifies itself.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Use whatever the session store holds for the user.
    Stored {
        /// Platform user id.
        user_id: UserId,
        /// Needed only if the user has never enrolled a key.
        join_code: Option<JoinCode>,
    },
    /// Log in with a caller-supplied key pair, bypassing the store lookup.
    Explicit {
        /// Platform user id.
        user_id: UserId,
        /// Sent with the challenge request when present.
        join_code: Option<JoinCode>,
        /// Key pair already registered with the platform.
        keypair: KeyPair,
    },
}

impl Credentials {
    /// Credentials resolved through the session store.
    #[must_use]
    pub fn stored(user_id: UserId, join_code: Option<JoinCode>) -> Self {
        Self::Stored { user_id, join_code }
    }

    /// Build credentials from optional user-supplied base64 keys.
    ///
    /// Both keys must be given together, or neither. The private key may be
    /// the 32-byte seed or the 64-byte `seed || public` form.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::IncompleteCredentials`] if only one key is given,
    /// or [`AuthError::Signing`] if the key material is unusable.
    pub fn from_parts(
        user_id: UserId,
        join_code: Option<JoinCode>,
        public_key_b64: Option<&str>,
        private_key_b64: Option<&str>,
    ) -> AuthResult<Self> {
        match (public_key_b64, private_key_b64) {
            (None, None) => Ok(Self::stored(user_id, join_code)),
            (Some(public), Some(private)) => {
                let keypair =
                    KeyPair::from_base64(private, public).map_err(AuthError::Signing)?;
                Ok(Self::Explicit {
                    user_id,
                    join_code,
                    keypair,
                })
            },
            (Some(_), None) => Err(AuthError::IncompleteCredentials(
                "public key given without private key".into(),
            )),
            (None, Some(_)) => Err(AuthError::IncompleteCredentials(
                "private key given without public key".into(),
            )),
        }
    }

    /// The user these credentials name.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        match self {
            Self::Stored { user_id, .. } | Self::Explicit { user_id, .. } => user_id,
        }
    }
}

/// How bootstrap arrived at the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No stored session; a new key pair was enrolled.
    NewLogin,
    /// The stored access token was still valid.
    Reused,
    /// The stored refresh token produced new tokens.
    Refreshed,
    /// Refresh failed; logged in again.
    ReLogin,
    /// Logged in with caller-supplied keys.
    ExplicitLogin,
}

impl fmt::Display for BootstrapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NewLogin => "new login",
            Self::Reused => "reused stored session",
            Self::Refreshed => "refreshed",
            Self::ReLogin => "logged in again",
            Self::ExplicitLogin => "explicit login",
        };
        f.write_str(name)
    }
}

/// A resolved, usable session.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    record: SessionRecord,
    outcome: BootstrapOutcome,
}

impl ActiveSession {
    /// Bearer token for platform requests.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.record.tokens.access_token
    }

    /// Current token pair.
    #[must_use]
    pub fn tokens(&self) -> &TokenPair {
        &self.record.tokens
    }

    /// Key pair that roots capability tokens for this session.
    #[must_use]
    pub fn keypair(&self) -> &KeyPair {
        &self.record.keypair
    }

    /// The session's user.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.record.user_id
    }

    /// How this session was obtained.
    #[must_use]
    pub fn outcome(&self) -> BootstrapOutcome {
        self.outcome
    }

    /// The underlying record.
    #[must_use]
    pub fn record(&self) -> &SessionRecord {
        &self.record
    }
}

/// Drives the login, refresh, validate and logout state machine.
pub struct AuthSession {
    client: AuthClient,
    store: Arc<dyn SessionStore>,
    key_policy: KeyPolicy,
    state: SessionState,
}

impl AuthSession {
    /// Create a session driver.
    #[must_use]
    pub fn new(client: AuthClient, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            store,
            key_policy: KeyPolicy::default(),
            state: SessionState::NoSession,
        }
    }

    /// Set the key policy used when a refresh fails.
    #[must_use]
    pub fn with_key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The protocol client.
    #[must_use]
    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    fn transition(&mut self, to: SessionState) {
        if self.state != to {
            info!(from = %self.state, to = %to, "Session state changed");
            self.state = to;
        }
    }

    fn login(
        &mut self,
        user_id: &UserId,
        join_code: Option<&JoinCode>,
        keypair: &KeyPair,
    ) -> AuthResult<TokenPair> {
        self.transition(SessionState::Authenticating);
        self.client
            .login(user_id, join_code, keypair)
            .inspect_err(|_| self.transition(SessionState::NoSession))
    }

    fn persist(&mut self, record: &SessionRecord) -> AuthResult<()> {
        self.store.write(record).map_err(|e| {
            self.transition(SessionState::NoSession);
            AuthError::SessionPersistence(e)
        })
    }

    fn finish(&mut self, record: SessionRecord, outcome: BootstrapOutcome) -> ActiveSession {
        self.transition(SessionState::Authenticated);
        info!(user_id = %record.user_id, outcome = %outcome, "Session ready");
        ActiveSession { record, outcome }
    }

    /// Resolve a usable session.
    ///
    /// - Explicit credentials: log in, then write.
    /// - No stored record: generate a key pair, log in, then write.
    /// - Stored record with a valid access token: reuse it, no write.
    /// - Otherwise refresh and write the new tokens with the same keys; if
    ///   refresh fails, log in again per the key policy and write.
    ///
    /// # Errors
    ///
    /// - [`AuthError::SessionStore`] if the stored record cannot be read
    /// - [`AuthError::MissingJoinCode`] when enrolling a new key (first login,
    ///   or re-login under [`KeyPolicy::Regenerate`]) without a join code
    /// - [`AuthError::KeyGeneration`] if a key pair cannot be generated
    /// - [`AuthError::Endpoint`] if a login step fails
    /// - [`AuthError::SessionPersistence`] if issued tokens cannot be written
    pub fn bootstrap(&mut self, credentials: Credentials) -> AuthResult<ActiveSession> {
        match credentials {
            Credentials::Explicit {
                user_id,
                join_code,
                keypair,
            } => {
                debug!(user_id = %user_id, "Bootstrapping with explicit credentials");
                let tokens = self.login(&user_id, join_code.as_ref(), &keypair)?;
                let record = SessionRecord::new(user_id, tokens, keypair);
                self.persist(&record)?;
                Ok(self.finish(record, BootstrapOutcome::ExplicitLogin))
            },
            Credentials::Stored { user_id, join_code } => {
                let stored = self.store.read(&user_id).map_err(AuthError::SessionStore)?;
                match stored {
                    None => self.enroll(user_id, join_code),
                    Some(record) => self.resume(record, join_code),
                }
            },
        }
    }

    fn enroll(
        &mut self,
        user_id: UserId,
        join_code: Option<JoinCode>,
    ) -> AuthResult<ActiveSession> {
        debug!(user_id = %user_id, "No stored session; enrolling new key");
        let Some(join_code) = join_code else {
            return Err(AuthError::MissingJoinCode {
                user_id: user_id.to_string(),
            });
        };
        let keypair = KeyPair::generate().map_err(AuthError::KeyGeneration)?;

        let tokens = self.login(&user_id, Some(&join_code), &keypair)?;
        let record = SessionRecord::new(user_id, tokens, keypair);
        self.persist(&record)?;
        Ok(self.finish(record, BootstrapOutcome::NewLogin))
    }

    fn resume(
        &mut self,
        record: SessionRecord,
        join_code: Option<JoinCode>,
    ) -> AuthResult<ActiveSession> {
        if record.tokens.access_expired() {
            debug!(user_id = %record.user_id, "Access token past its expiry; skipping validation");
        } else if self.client.validate(&record.tokens.access_token) {
            return Ok(self.finish(record, BootstrapOutcome::Reused));
        }

        self.transition(SessionState::Refreshing);
        if let Some(tokens) = self.client.refresh(&record.tokens.refresh_token) {
            let record = record.with_tokens(tokens);
            self.persist(&record)?;
            return Ok(self.finish(record, BootstrapOutcome::Refreshed));
        }

        self.transition(SessionState::Expired);
        let keypair = match self.key_policy {
            KeyPolicy::Reuse => record.keypair,
            KeyPolicy::Regenerate => {
                // A fresh key is a new enrollment.
                if join_code.is_none() {
                    return Err(AuthError::MissingJoinCode {
                        user_id: record.user_id.to_string(),
                    });
                }
                KeyPair::generate().map_err(AuthError::KeyGeneration)?
            },
        };

        let tokens = self.login(&record.user_id, join_code.as_ref(), &keypair)?;
        let record = SessionRecord::new(record.user_id, tokens, keypair);
        self.persist(&record)?;
        Ok(self.finish(record, BootstrapOutcome::ReLogin))
    }

    /// Revoke the session and remove its stored record.
    ///
    /// Revocation is best-effort; only a failure to clear the store is reported.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SessionStore`] if the record cannot be deleted.
    pub fn logout(&mut self, session: ActiveSession) -> AuthResult<()> {
        self.client.logout(session.access_token());
        self.store
            .delete(session.user_id())
            .map_err(AuthError::SessionStore)?;
        self.transition(SessionState::LoggedOut);
        Ok(())
    }

    /// Log out whatever session is stored for `user_id`.
    ///
    /// Returns whether a stored session existed.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SessionStore`] if the store cannot be read or cleared.
    pub fn logout_stored(&mut self, user_id: &UserId) -> AuthResult<bool> {
        let Some(record) = self.store.read(user_id).map_err(AuthError::SessionStore)? else {
            warn!(user_id = %user_id, "No stored session to log out");
            self.transition(SessionState::LoggedOut);
            return Ok(false);
        };

        self.logout(ActiveSession {
            record,
            outcome: BootstrapOutcome::Reused,
        })?;
        Ok(true)
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("client", &self.client)
            .field("key_policy", &self.key_policy)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use serde_json::json;
    use sxt_core::AuthRoute;
    use sxt_test::{MockTransport, RecordingSessionStore, test_token_pair, test_user_id, token_response};

    fn session(transport: &Arc<MockTransport>, store: &Arc<RecordingSessionStore>) -> AuthSession {
        AuthSession::new(AuthClient::new(transport.clone()), store.clone())
    }

    fn login_responses(transport: MockTransport, access: &str, refresh: &str) -> MockTransport {
        transport
            .with_json(AuthRoute::Code, 200, &json!({ "authCode": "code" }))
            .with_json(AuthRoute::Token, 200, &token_response(access, refresh))
    }

    #[test]
    fn test_enroll_requires_join_code() {
        let transport = Arc::new(MockTransport::new());
        let store = Arc::new(RecordingSessionStore::new());
        let mut auth = session(&transport, &store);

        let err = auth
            .bootstrap(Credentials::stored(test_user_id(), None))
            .unwrap_err();

        assert!(matches!(err, AuthError::MissingJoinCode { .. }));
        assert!(transport.requests().is_empty());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_failed_login_leaves_no_session() {
        let transport =
            Arc::new(MockTransport::new().with_response(AuthRoute::Code, 500, "down"));
        let store = Arc::new(RecordingSessionStore::new());
        let mut auth = session(&transport, &store);

        let result = auth.bootstrap(Credentials::stored(
            test_user_id(),
            Some(JoinCode::new("join").unwrap()),
        ));

        assert!(result.is_err());
        assert_eq!(auth.state(), SessionState::NoSession);
        assert_eq!(store.write_count(), 0);
        assert_eq!(transport.request_count(AuthRoute::Token), 0);
    }

    #[test]
    fn test_regenerate_policy_replaces_keys() {
        let stored_keys = KeyPair::generate().unwrap();
        let store = Arc::new(RecordingSessionStore::new().with_record(SessionRecord::new(
            test_user_id(),
            test_token_pair(),
            stored_keys.clone(),
        )));
        let transport = Arc::new(login_responses(
            MockTransport::new()
                .with_response(AuthRoute::ValidToken, 200, "")
                .with_response(AuthRoute::Refresh, 401, ""),
            "a2",
            "r2",
        ));
        let mut auth = session(&transport, &store).with_key_policy(KeyPolicy::Regenerate);

        let active = auth
            .bootstrap(Credentials::stored(
                test_user_id(),
                Some(JoinCode::new("join").unwrap()),
            ))
            .unwrap();

        assert_eq!(active.outcome(), BootstrapOutcome::ReLogin);
        assert_ne!(active.keypair(), &stored_keys);

        let token_body = transport.requests_for(AuthRoute::Token)[0].body.clone().unwrap();
        assert_eq!(token_body["key"], active.keypair().export_public_key().to_base64());
    }

    #[test]
    fn test_regenerate_without_join_code_does_not_log_in() {
        let store = Arc::new(RecordingSessionStore::new().with_record(SessionRecord::new(
            test_user_id(),
            test_token_pair(),
            KeyPair::generate().unwrap(),
        )));
        let transport = Arc::new(login_responses(
            MockTransport::new()
                .with_response(AuthRoute::ValidToken, 200, "")
                .with_response(AuthRoute::Refresh, 401, ""),
            "a2",
            "r2",
        ));
        let mut auth = session(&transport, &store).with_key_policy(KeyPolicy::Regenerate);

        let err = auth
            .bootstrap(Credentials::stored(test_user_id(), None))
            .unwrap_err();

        assert!(matches!(err, AuthError::MissingJoinCode { .. }));
        assert_eq!(transport.request_count(AuthRoute::Code), 0);
        assert_eq!(transport.request_count(AuthRoute::Token), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_expired_access_token_skips_validation() {
        let store = Arc::new(RecordingSessionStore::new().with_record(SessionRecord::new(
            test_user_id(),
            TokenPair::new("old-a", "old-r").with_expiries(1_000, 2_000),
            KeyPair::generate().unwrap(),
        )));
        let transport = Arc::new(
            MockTransport::new().with_json(AuthRoute::Refresh, 200, &token_response("a2", "r2")),
        );
        let mut auth = session(&transport, &store);

        let active = auth
            .bootstrap(Credentials::stored(test_user_id(), None))
            .unwrap();

        assert_eq!(active.outcome(), BootstrapOutcome::Refreshed);
        assert_eq!(transport.request_count(AuthRoute::ValidToken), 0);
        assert_eq!(active.tokens().access_token, "a2");
    }

    #[test]
    fn test_explicit_credentials_from_parts() {
        let keypair = KeyPair::generate().unwrap();
        let public = keypair.export_public_key().to_base64();
        let private = base64::engine::general_purpose::STANDARD.encode(*keypair.keypair_bytes());

        let creds =
            Credentials::from_parts(test_user_id(), None, Some(&public), Some(&private)).unwrap();
        assert!(matches!(&creds, Credentials::Explicit { keypair: k, .. } if *k == keypair));

        let creds = Credentials::from_parts(test_user_id(), None, None, None).unwrap();
        assert!(matches!(creds, Credentials::Stored { .. }));

        assert!(matches!(
            Credentials::from_parts(test_user_id(), None, Some(&public), None),
            Err(AuthError::IncompleteCredentials(_))
        ));
        assert!(matches!(
            Credentials::from_parts(test_user_id(), None, Some(&public), Some("AAAA")),
            Err(AuthError::Signing(_))
        ));
    }

    #[test]
    fn test_logout_deletes_record() {
        let store = Arc::new(RecordingSessionStore::new().with_record(SessionRecord::new(
            test_user_id(),
            test_token_pair(),
            KeyPair::generate().unwrap(),
        )));
        let transport =
            Arc::new(MockTransport::new().with_response(AuthRoute::ValidToken, 200, "ok"));
        let mut auth = session(&transport, &store);

        let active = auth
            .bootstrap(Credentials::stored(test_user_id(), None))
            .unwrap();
        assert_eq!(active.outcome(), BootstrapOutcome::Reused);

        // No logout response queued: revocation fails silently.
        auth.logout(active).unwrap();

        assert_eq!(auth.state(), SessionState::LoggedOut);
        assert!(store.read(&test_user_id()).unwrap().is_none());
        assert_eq!(transport.request_count(AuthRoute::Logout), 1);
    }

    #[test]
    fn test_logout_stored_without_session() {
        let transport = Arc::new(MockTransport::new());
        let store = Arc::new(RecordingSessionStore::new());
        let mut auth = session(&transport, &store);

        assert!(!auth.logout_stored(&test_user_id()).unwrap());
        assert!(transport.requests().is_empty());
    }
}
