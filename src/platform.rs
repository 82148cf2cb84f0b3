//! # Platform Authenticator Boundary
//!
//! The platform security capability (the part that talks to Touch ID,
//! Windows Hello, a security key, ...) is not implemented here. Callers plug
//! one in by implementing [`PlatformAuthenticator`].

use crate::webauthn::options::{CreationOptions, RequestOptions};
use crate::webauthn::types::{AssertionCredential, RegistrationCredential};
use async_trait::async_trait;
use thiserror::Error;

/// Why the platform did not produce a credential
///
/// Mirrors the failure classes a WebAuthn platform reports. Every one of
/// them is terminal for the ceremony.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    /// The user dismissed the prompt, or the platform refused (`NotAllowedError`)
    #[error("cancelled or not allowed: {0}")]
    Cancelled(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("not supported: {0}")]
    NotSupported(String),
    /// Origin / RP ID mismatch (`SecurityError`)
    #[error("security error: {0}")]
    Security(String),
    /// E.g. an excluded credential already lives on this authenticator
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("{0}")]
    Other(String),
}

impl CapabilityError {
    /// `true` when the user backed out; the UI should offer to start over
    pub fn is_cancellation(&self) -> bool {
        matches!(self, CapabilityError::Cancelled(_))
    }
}

/// The two WebAuthn primitives a ceremony needs
///
/// Both calls may stay pending for as long as the user takes to respond.
/// The ceremony never wraps them in its own timeout and never calls them
/// twice for one ceremony.
#[async_trait]
pub trait PlatformAuthenticator: Send {
    /// `navigator.credentials.create()` equivalent
    async fn create_credential(
        &mut self,
        options: &CreationOptions,
    ) -> Result<RegistrationCredential, CapabilityError>;

    /// `navigator.credentials.get()` equivalent
    async fn get_assertion(
        &mut self,
        options: &RequestOptions,
    ) -> Result<AssertionCredential, CapabilityError>;
}
