//! # Relying Party Transport
//!
//! How ceremonies reach the server. The [`RelyingPartyTransport`] trait is
//! the seam; [`HttpTransport`] is the real implementation over `reqwest`.
//!
//! ## Session header
//! The server binds Begin and Finish together with an `X-Session-ID`
//! header: it sets the header on the Begin response and expects it back on
//! the Finish request.

use crate::config::ClientConfig;
use crate::webauthn::types::SessionHandle;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Header carrying the [`SessionHandle`] in both directions
pub const SESSION_HEADER: &str = "X-Session-ID";

/// The request never got an HTTP response
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connect, DNS, TLS, timeout or body I/O failure inside reqwest
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An endpoint path could not be resolved against the base URL
    #[error("invalid endpoint `{path}`: {reason}")]
    InvalidEndpoint { path: String, reason: String },

    /// Any other reason the server could not be reached
    #[error("relying party unreachable: {0}")]
    Unreachable(String),
}

/// An HTTP response, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelyingPartyResponse {
    pub status: u16,
    /// Value of the `X-Session-ID` response header, if the server set one
    pub session: Option<SessionHandle>,
    pub body: String,
}

impl RelyingPartyResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// POST-JSON access to the relying party
///
/// Implementations must not interpret the status code: non-2xx responses
/// are returned as `Ok` and classified by the ceremony.
#[async_trait]
pub trait RelyingPartyTransport: Send + Sync {
    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        session: Option<&SessionHandle>,
    ) -> Result<RelyingPartyResponse, TransportError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Transport with a default `reqwest` client and no timeout
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: with_trailing_slash(base_url),
        }
    }

    /// Build the client from [`ClientConfig`] (applies the HTTP timeout)
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: with_trailing_slash(config.server_url.clone()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL
    ///
    /// Leading slashes are ignored so a base path prefix survives:
    /// `https://rp/auth/` + `/login/begin` = `https://rp/auth/login/begin`.
    pub fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidEndpoint {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl RelyingPartyTransport for HttpTransport {
    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        session: Option<&SessionHandle>,
    ) -> Result<RelyingPartyResponse, TransportError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, has_session = session.is_some(), "POST to relying party");

        let mut request = self.client.post(url).json(body);
        if let Some(session) = session {
            request = request.header(SESSION_HEADER, session.as_str());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let session = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(SessionHandle::new);
        let body = response.text().await?;

        tracing::debug!(status, has_session = session.is_some(), body_len = body.len(), "Relying party responded");

        Ok(RelyingPartyResponse {
            status,
            session,
            body,
        })
    }
}
