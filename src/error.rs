//! # Error Handling
//!
//! Every way a ceremony can end badly, as a single error type.
//!
//! ## Taxonomy
//! The variants are split so the caller can tell apart the cases that need
//! different remediation:
//! - the user typed something wrong (`Validation`)
//! - the server said no (`Server`)
//! - the server could not be reached (`Network`)
//! - the user or platform cancelled / refused (`Capability`)
//! - the server sent data the client cannot use (`InvalidResponse`,
//!   `InvalidOptions`, `Decode`)
//!
//! Nothing is retried internally. A failed ceremony is terminal; retrying
//! means starting a new one.

use crate::encoding::DecodeError;
use crate::platform::CapabilityError;
use crate::transport::TransportError;
use crate::webauthn::ceremony::CeremonyState;
use thiserror::Error;

/// Ceremony-wide error type
///
/// The `#[from]` attributes let the ceremony code use `?` directly on
/// transport, platform and serialization results.
#[derive(Error, Debug)]
pub enum CeremonyError {
    /// Bad caller input; raised before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Non-2xx response from Begin or Finish
    ///
    /// `body` is the raw response text, kept for diagnostics.
    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    /// The relying party could not be reached (DNS, connect, timeout, I/O)
    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    /// A 2xx Begin response that cannot drive the ceremony
    /// (unparsable body, missing session header)
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    /// The options bundle does not have the expected shape
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The platform authenticator refused, was cancelled, or timed out
    #[error("Platform error: {0}")]
    Capability(#[from] CapabilityError),

    /// A binary field held malformed base64url text
    #[error("Decode error in `{field}`: {source}")]
    Decode {
        field: String,
        #[source]
        source: DecodeError,
    },

    /// JSON encoding of a request body failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The ceremony state machine was driven out of order
    #[error("Invalid ceremony transition: {from:?} -> {to:?}")]
    InvalidTransition { from: CeremonyState, to: CeremonyState },
}

/// Coarse classification of [`CeremonyError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Server,
    Network,
    InvalidResponse,
    InvalidOptions,
    Capability,
    Decode,
    Internal,
}

impl CeremonyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CeremonyError::Validation(_) => ErrorKind::Validation,
            CeremonyError::Server { .. } => ErrorKind::Server,
            CeremonyError::Network(_) => ErrorKind::Network,
            CeremonyError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            CeremonyError::InvalidOptions(_) => ErrorKind::InvalidOptions,
            CeremonyError::Capability(_) => ErrorKind::Capability,
            CeremonyError::Decode { .. } => ErrorKind::Decode,
            CeremonyError::Serialization(_) | CeremonyError::InvalidTransition { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// Attach the name of the field being decoded to a [`DecodeError`]
    pub(crate) fn decode(field: impl Into<String>, source: DecodeError) -> Self {
        CeremonyError::Decode {
            field: field.into(),
            source,
        }
    }
}

/// Convenience alias used by every ceremony function
pub type CeremonyResult<T> = Result<T, CeremonyError>;
