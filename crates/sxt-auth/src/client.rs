//! Challenge-response protocol primitives.
//!
//! Each method is one blocking round trip through an [`AuthTransport`], with
//! no retries. [`AuthClient::login`] chains challenge, signature and token
//! exchange; [`AuthClient::validate`] and [`AuthClient::refresh`] collapse
//! every failure into a negative answer; [`AuthClient::logout`] never fails.

use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use sxt_core::{
    AuthRoute, AuthTransport, JoinCode, TokenPair, TransportRequest, TransportResponse, UserId,
};
use sxt_crypto::KeyPair;
use tracing::debug;

use crate::error::{AuthError, AuthResult, AuthStep, EndpointCause};

/// The only signature scheme the platform accepts from this client.
pub const DEFAULT_SCHEME: &str = "ed25519";

/// Single-use login challenge. Never persisted.
pub struct AuthChallenge {
    auth_code: String,
}

impl AuthChallenge {
    /// The opaque code to sign.
    #[must_use]
    pub fn auth_code(&self) -> &str {
        &self.auth_code
    }
}

impl fmt::Debug for AuthChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthChallenge(<redacted>)")
    }
}

/// A signed challenge in wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeSignature {
    /// Lowercase hex of the 64-byte Ed25519 signature.
    pub signature_hex: String,
    /// Standard padded base64 of the 32-byte public key.
    pub public_key_b64: String,
}

impl ChallengeSignature {
    /// Sign `auth_code` with raw key material.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if the key material is not a recognized
    /// Ed25519 layout or the halves do not match.
    pub fn from_key_material(
        auth_code: &str,
        private_key: &[u8],
        public_key: Option<&[u8]>,
    ) -> AuthResult<Self> {
        let keypair =
            KeyPair::from_key_material(private_key, public_key).map_err(AuthError::Signing)?;
        Ok(AuthClient::sign_challenge(auth_code, &keypair))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthCodeResponse {
    auth_code: String,
}

/// Client for the auth routes.
#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<dyn AuthTransport>,
    scheme: String,
}

impl AuthClient {
    /// Create a client over `transport` using the default scheme.
    #[must_use]
    pub fn new(transport: Arc<dyn AuthTransport>) -> Self {
        Self {
            transport,
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }

    /// Override the scheme sent with the token exchange.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Scheme sent with the token exchange.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Sign the UTF-8 bytes of `auth_code` (pure Ed25519, no pre-hash).
    #[must_use]
    pub fn sign_challenge(auth_code: &str, keypair: &KeyPair) -> ChallengeSignature {
        let signature = keypair.sign(auth_code.as_bytes());
        ChallengeSignature {
            signature_hex: signature.to_hex(),
            public_key_b64: keypair.export_public_key().to_base64(),
        }
    }

    fn call(&self, step: AuthStep, request: &TransportRequest) -> AuthResult<TransportResponse> {
        debug!(route = %request.route, "Calling auth endpoint");
        let response = self
            .transport
            .send(request)
            .map_err(|e| AuthError::endpoint(step, e))?;

        if !response.is_success() {
            return Err(AuthError::endpoint(
                step,
                EndpointCause::status(response.status, &response.body),
            ));
        }
        Ok(response)
    }

    /// Request a login challenge for `user_id`.
    ///
    /// The body always carries `joinCode`; it is empty when none is given.
    /// The platform only checks it the first time a key is enrolled.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Endpoint`] on transport failure, a non-2xx status,
    /// or a body without a non-empty `authCode`.
    pub fn request_challenge(
        &self,
        user_id: &UserId,
        join_code: Option<&JoinCode>,
    ) -> AuthResult<AuthChallenge> {
        let body = json!({
            "userId": user_id.as_str(),
            "joinCode": join_code.map_or("", JoinCode::expose),
        });

        let step = AuthStep::RequestChallenge;
        let response = self.call(step, &TransportRequest::new(AuthRoute::Code).with_body(body))?;

        let parsed: AuthCodeResponse = serde_json::from_slice(&response.body).map_err(|e| {
            AuthError::endpoint(step, EndpointCause::malformed(e.to_string(), &response.body))
        })?;
        if parsed.auth_code.is_empty() {
            return Err(AuthError::endpoint(
                step,
                EndpointCause::malformed("empty authCode", &response.body),
            ));
        }

        Ok(AuthChallenge {
            auth_code: parsed.auth_code,
        })
    }

    /// Exchange a signed challenge for a token pair. Consumes the challenge.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Endpoint`] on transport failure, a non-2xx status,
    /// or an unparseable token body.
    pub fn exchange_token(
        &self,
        user_id: &UserId,
        challenge: AuthChallenge,
        signature: &ChallengeSignature,
    ) -> AuthResult<TokenPair> {
        let body = json!({
            "userId": user_id.as_str(),
            "authCode": challenge.auth_code,
            "key": signature.public_key_b64,
            "signature": signature.signature_hex,
            "scheme": self.scheme,
        });

        let step = AuthStep::ExchangeToken;
        let response = self.call(step, &TransportRequest::new(AuthRoute::Token).with_body(body))?;
        parse_tokens(step, &response)
    }

    /// Full challenge-response login.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Endpoint`] naming the failed step. No further
    /// calls are made after a failure.
    pub fn login(
        &self,
        user_id: &UserId,
        join_code: Option<&JoinCode>,
        keypair: &KeyPair,
    ) -> AuthResult<TokenPair> {
        let challenge = self.request_challenge(user_id, join_code)?;
        let signature = Self::sign_challenge(challenge.auth_code(), keypair);
        let tokens = self.exchange_token(user_id, challenge, &signature)?;

        debug!(user_id = %user_id, key_id = %keypair.key_id_hex(), "Login succeeded");
        Ok(tokens)
    }

    /// Whether the platform still accepts `access_token`.
    ///
    /// True iff the call completes with a 2xx status and a non-empty body.
    /// The body's content is not inspected.
    #[must_use]
    pub fn validate(&self, access_token: &str) -> bool {
        let request = TransportRequest::new(AuthRoute::ValidToken).with_bearer(access_token);
        match self.transport.send(&request) {
            Ok(response) => {
                let valid = response.is_success() && !response.body.is_empty();
                debug!(status = response.status, valid, "Access token checked");
                valid
            },
            Err(e) => {
                debug!(error = %e, "Access token check failed");
                false
            },
        }
    }

    /// Exchange `refresh_token` for a new pair.
    ///
    /// Returns `None` on transport failure, a non-2xx status, or an
    /// unparseable body.
    #[must_use]
    pub fn refresh(&self, refresh_token: &str) -> Option<TokenPair> {
        let step = AuthStep::Refresh;
        let request = TransportRequest::new(AuthRoute::Refresh).with_bearer(refresh_token);

        match self
            .call(step, &request)
            .and_then(|response| parse_tokens(step, &response))
        {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                debug!(error = %e, "Refresh rejected");
                None
            },
        }
    }

    /// Revoke `access_token`.
    ///
    /// Fails silently by contract: the outcome is logged at debug level and
    /// otherwise discarded.
    pub fn logout(&self, access_token: &str) {
        let request = TransportRequest::new(AuthRoute::Logout).with_bearer(access_token);
        match self.transport.send(&request) {
            Ok(response) => debug!(status = response.status, "Logout sent"),
            Err(e) => debug!(error = %e, "Logout not delivered"),
        }
    }
}

impl fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClient")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

fn parse_tokens(step: AuthStep, response: &TransportResponse) -> AuthResult<TokenPair> {
    serde_json::from_slice(&response.body).map_err(|e| {
        AuthError::endpoint(step, EndpointCause::malformed(e.to_string(), &response.body))
    })
}
