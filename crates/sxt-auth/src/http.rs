//! Blocking HTTP transport for the auth routes.

use reqwest::blocking::Client;
use std::time::Duration;
use sxt_core::{
    AuthRoute, AuthTransport, HttpMethod, TransportError, TransportRequest, TransportResponse,
};
use tracing::debug;
use url::Url;

use crate::error::{AuthError, AuthResult};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`AuthTransport`] over a blocking `reqwest` client.
///
/// Routes resolve to `{base_url}/auth/{route}`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Create a transport for `base_url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the URL is not an absolute
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> AuthResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AuthError::Configuration(format!("invalid base URL {base_url:?}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(AuthError::Configuration(format!(
                "base URL must be http(s), got {}",
                base_url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("sxt-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuthError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Full URL for `route`.
    #[must_use]
    pub fn endpoint(&self, route: AuthRoute) -> String {
        format!(
            "{}/auth/{}",
            self.base_url.as_str().trim_end_matches('/'),
            route.path()
        )
    }
}

fn classify(e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_builder() {
        TransportError::InvalidRequest(e.to_string())
    } else if e.is_body() || e.is_decode() {
        TransportError::Body(e.to_string())
    } else {
        TransportError::Connection(e.to_string())
    }
}

impl AuthTransport for ReqwestTransport {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = self.endpoint(request.route);
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| classify(&e))?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| classify(&e))?;

        debug!(url = %url, status, bytes = body.len(), "Auth endpoint responded");
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_layout() {
        let transport =
            ReqwestTransport::new("https://api.spaceandtime.app/v1", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            transport.endpoint(AuthRoute::Code),
            "https://api.spaceandtime.app/v1/auth/code"
        );
        assert_eq!(
            transport.endpoint(AuthRoute::ValidToken),
            "https://api.spaceandtime.app/v1/auth/validtoken"
        );

        let trailing =
            ReqwestTransport::new("https://api.spaceandtime.app/v1/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            trailing.endpoint(AuthRoute::Logout),
            "https://api.spaceandtime.app/v1/auth/logout"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            ReqwestTransport::new("not a url", DEFAULT_TIMEOUT),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            ReqwestTransport::new("ftp://example.com", DEFAULT_TIMEOUT),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let transport =
            ReqwestTransport::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let result = transport.send(&TransportRequest::new(AuthRoute::ValidToken));
        assert!(result.is_err());
    }
}
