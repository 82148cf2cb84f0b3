//! # Configuration Management
//!
//! Client settings come from the environment, 12-factor style.
//!
//! ## Environment Variables
//! - `PASSKEY_SERVER_URL`: Base URL of the relying party (default: http://localhost:8080)
//! - `PASSKEY_HTTP_TIMEOUT_SECS`: Per-request HTTP timeout in seconds (default: none)
//!
//! The HTTP timeout only bounds the Begin and Finish requests. The platform
//! authenticator call is never timed out by the client.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Relying party base URL
    ///
    /// Endpoint paths (`/register/begin`, ...) are resolved against it, so a
    /// prefix such as `https://example.com/auth/` is kept.
    pub server_url: Url,

    /// Timeout applied to each HTTP request, if any
    pub http_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(server_url: Url) -> Self {
        Self {
            server_url,
            http_timeout: None,
        }
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Load configuration from environment variables
    ///
    /// Loads `.env` first if present (dotenvy doesn't error if file missing).
    ///
    /// ## Example .env file
    /// ```text
    /// PASSKEY_SERVER_URL=http://localhost:8080
    /// PASSKEY_HTTP_TIMEOUT_SECS=30
    /// ```
    ///
    /// # Errors
    /// Returns an error if the URL or the timeout cannot be parsed.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server_url = env::var("PASSKEY_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let http_timeout = env::var("PASSKEY_HTTP_TIMEOUT_SECS").ok();

        Self::from_parts(&server_url, http_timeout.as_deref())
    }

    fn from_parts(server_url: &str, http_timeout_secs: Option<&str>) -> Result<Self> {
        let server_url = Url::parse(server_url)
            .with_context(|| format!("invalid PASSKEY_SERVER_URL: {}", server_url))?;

        let http_timeout = http_timeout_secs
            .map(|secs| {
                secs.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("invalid PASSKEY_HTTP_TIMEOUT_SECS: {}", secs))
            })
            .transpose()?;

        Ok(Self {
            server_url,
            http_timeout,
        })
    }
}
