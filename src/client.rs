//! # Passkey Client
//!
//! The entry points a UI calls: [`PasskeyClient::perform_registration`] and
//! [`PasskeyClient::perform_authentication`].
//!
//! ## One ceremony at a time
//! Both methods take `&mut self`, so the borrow checker rules out two
//! overlapping ceremonies on the same client (and therefore two concurrent
//! calls into the same platform authenticator). A UI that wants to start a
//! new ceremony while one is pending must drop the pending future first,
//! which cancels it.

use crate::config::ClientConfig;
use crate::error::CeremonyResult;
use crate::platform::PlatformAuthenticator;
use crate::transport::{HttpTransport, RelyingPartyTransport, TransportError};
use crate::webauthn::types::VerificationOutcome;
use crate::webauthn::{authentication, registration};

/// Owns the two collaborators a ceremony needs
///
/// - `T`: how to reach the relying party ([`HttpTransport`] in production)
/// - `P`: the platform authenticator
///
/// No ceremony state lives here; every call starts from scratch.
#[derive(Debug)]
pub struct PasskeyClient<T, P> {
    transport: T,
    platform: P,
}

impl<P> PasskeyClient<HttpTransport, P>
where
    P: PlatformAuthenticator,
{
    /// Client talking HTTP to `config.server_url`
    ///
    /// # Errors
    /// Fails if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig, platform: P) -> Result<Self, TransportError> {
        Ok(Self::new(HttpTransport::from_config(config)?, platform))
    }
}

impl<T, P> PasskeyClient<T, P>
where
    T: RelyingPartyTransport,
    P: PlatformAuthenticator,
{
    pub fn new(transport: T, platform: P) -> Self {
        Self {
            transport,
            platform,
        }
    }

    /// Register a new passkey for `username`
    ///
    /// See [`registration::perform_registration`].
    pub async fn perform_registration(
        &mut self,
        username: &str,
    ) -> CeremonyResult<VerificationOutcome> {
        registration::perform_registration(&self.transport, &mut self.platform, username).await
    }

    /// Log in as `username` with an existing passkey
    ///
    /// See [`authentication::perform_authentication`].
    pub async fn perform_authentication(
        &mut self,
        username: &str,
    ) -> CeremonyResult<VerificationOutcome> {
        authentication::perform_authentication(&self.transport, &mut self.platform, username)
            .await
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn into_parts(self) -> (T, P) {
        (self.transport, self.platform)
    }
}
