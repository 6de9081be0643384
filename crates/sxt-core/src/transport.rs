//! The seam between the auth protocol and HTTP.
//!
//! The protocol logic in `sxt-auth` only ever talks to an [`AuthTransport`].
//! The production implementation wraps a blocking HTTP client; tests queue
//! canned responses instead.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Routes under `{base_url}/auth/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthRoute {
    /// Request a login challenge.
    Code,
    /// Exchange a signed challenge for tokens.
    Token,
    /// Exchange a refresh token for a new pair.
    Refresh,
    /// Introspect an access token.
    ValidToken,
    /// Revoke an access token.
    Logout,
}

impl AuthRoute {
    /// Every route, in protocol order.
    pub const ALL: [Self; 5] = [
        Self::Code,
        Self::Token,
        Self::Refresh,
        Self::ValidToken,
        Self::Logout,
    ];

    /// Path segment below `auth/`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Token => "token",
            Self::Refresh => "refresh",
            Self::ValidToken => "validtoken",
            Self::Logout => "logout",
        }
    }

    /// HTTP method the route expects.
    #[must_use]
    pub const fn method(self) -> HttpMethod {
        match self {
            Self::ValidToken => HttpMethod::Get,
            Self::Code | Self::Token | Self::Refresh | Self::Logout => HttpMethod::Post,
        }
    }
}

impl fmt::Display for AuthRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "auth/{}", self.path())
    }
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
}

/// One request to an auth route.
#[derive(Clone, PartialEq)]
pub struct TransportRequest {
    /// Target route.
    pub route: AuthRoute,
    /// Method to use.
    pub method: HttpMethod,
    /// Bearer token for the `Authorization` header.
    pub bearer: Option<String>,
    /// JSON body.
    pub body: Option<Value>,
}

impl TransportRequest {
    /// A request to `route` with its default method and nothing attached.
    #[must_use]
    pub fn new(route: AuthRoute) -> Self {
        Self {
            route,
            method: route.method(),
            bearer: None,
            body: None,
        }
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportRequest")
            .field("route", &self.route)
            .field("method", &self.method)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Raw response: status plus the full body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Create a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as text, lossily decoded.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failure to complete a round trip at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be built (bad URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Connection, TLS or DNS failure.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The transport's timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Performs one blocking round trip to an auth route.
///
/// Implementations impose their own timeout and never retry.
pub trait AuthTransport: Send + Sync {
    /// Send the request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response was obtained. Non-2xx
    /// responses are not errors at this layer.
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_and_methods() {
        let paths: Vec<_> = AuthRoute::ALL.iter().map(|r| r.path()).collect();
        assert_eq!(paths, ["code", "token", "refresh", "validtoken", "logout"]);

        assert_eq!(AuthRoute::ValidToken.method(), HttpMethod::Get);
        assert_eq!(AuthRoute::Refresh.method(), HttpMethod::Post);
        assert_eq!(AuthRoute::Logout.to_string(), "auth/logout");
    }

    #[test]
    fn test_response_success_range() {
        assert!(TransportResponse::new(200, "x").is_success());
        assert!(TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(302, "").is_success());
        assert!(!TransportResponse::new(401, "denied").is_success());
    }

    #[test]
    fn test_request_debug_hides_bearer() {
        let req = TransportRequest::new(AuthRoute::Refresh).with_bearer("refresh-secret");
        assert!(!format!("{req:?}").contains("refresh-secret"));
        assert_eq!(req.bearer.as_deref(), Some("refresh-secret"));
    }
}
