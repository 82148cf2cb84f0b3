//! # WebAuthn Wire Types
//!
//! Request/response types exchanged with the relying party, and the
//! credentials returned by the platform authenticator.
//!
//! ## Two representations
//! The platform hands back credentials with raw byte buffers
//! ([`RegistrationCredential`], [`AssertionCredential`]). The relying party
//! expects the same structure with every buffer base64url-encoded
//! ([`RegistrationCredentialJson`], [`AssertionCredentialJson`]). The
//! `to_json()` conversions are the only way to produce the wire form, so no
//! buffer can be forgotten.

use crate::encoding;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Request body for both `/register/begin` and `/login/begin`
///
/// ## Example JSON
/// ```json
/// {
///   "username": "alice"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BeginRequest {
    pub username: String,
}

/// Opaque session identifier issued by the relying party at Begin
///
/// Travels in the `X-Session-ID` header: received on the Begin response,
/// echoed on the Finish request. The client never stores it beyond a single
/// ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionHandle(String);

impl SessionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Credential created by the platform during registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCredential {
    /// Credential id as base64url text (the platform's `id`)
    pub id: String,
    pub raw_id: Vec<u8>,
    /// Always `"public-key"` for WebAuthn credentials
    pub credential_type: String,
    /// `"platform"` or `"cross-platform"`, when the platform reports it
    pub authenticator_attachment: Option<String>,
    pub response: AttestationResponse,
}

/// Attestation produced by `create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationResponse {
    /// CBOR attestation object (contains `authData`)
    pub attestation_object: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub transports: Option<Vec<String>>,
}

/// Assertion produced by the platform during authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionCredential {
    pub id: String,
    pub raw_id: Vec<u8>,
    pub credential_type: String,
    pub authenticator_attachment: Option<String>,
    pub response: AssertionResponse,
}

/// Signed assertion produced by `get`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResponse {
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub signature: Vec<u8>,
    /// Only discoverable credentials return a user handle
    pub user_handle: Option<Vec<u8>>,
}

/// Registration credential as sent to `/register/finish`
///
/// ## Example JSON
/// ```json
/// {
///   "id": "Y3JlZC0x",
///   "rawId": "Y3JlZC0x",
///   "type": "public-key",
///   "response": {
///     "attestationObject": "o2NmbXRk...",
///     "clientDataJSON": "eyJ0eXBlIjoid2ViYXV0aG4uY3JlYXRlIi..."
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCredentialJson {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub authenticator_attachment: Option<String>,
    pub response: AttestationResponseJson,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResponseJson {
    pub attestation_object: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transports: Option<Vec<String>>,
}

/// Assertion as sent to `/login/finish`
///
/// `response.userHandle` is always present on the wire: `null` when the
/// authenticator returned none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssertionCredentialJson {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub authenticator_attachment: Option<String>,
    pub response: AssertionResponseJson,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResponseJson {
    pub authenticator_data: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub signature: String,
    pub user_handle: Option<String>,
}

impl RegistrationCredential {
    pub fn to_json(&self) -> RegistrationCredentialJson {
        RegistrationCredentialJson {
            id: self.id.clone(),
            raw_id: encoding::encode(&self.raw_id),
            credential_type: self.credential_type.clone(),
            authenticator_attachment: self.authenticator_attachment.clone(),
            response: AttestationResponseJson {
                attestation_object: encoding::encode(&self.response.attestation_object),
                client_data_json: encoding::encode(&self.response.client_data_json),
                transports: self.response.transports.clone(),
            },
        }
    }
}

impl AssertionCredential {
    pub fn to_json(&self) -> AssertionCredentialJson {
        AssertionCredentialJson {
            id: self.id.clone(),
            raw_id: encoding::encode(&self.raw_id),
            credential_type: self.credential_type.clone(),
            authenticator_attachment: self.authenticator_attachment.clone(),
            response: AssertionResponseJson {
                authenticator_data: encoding::encode(&self.response.authenticator_data),
                client_data_json: encoding::encode(&self.response.client_data_json),
                signature: encoding::encode(&self.response.signature),
                user_handle: self.response.user_handle.as_deref().map(encoding::encode),
            },
        }
    }
}

/// Result of a successful Finish call, surfaced to the caller verbatim
///
/// ## Body handling
/// - JSON body: parsed as-is (e.g. `{"status":"ok"}` or `"Login Success"`)
/// - empty body: `null`
/// - anything else: the raw text as a JSON string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub status: u16,
    pub body: Value,
}

impl VerificationOutcome {
    pub fn from_response(status: u16, body: &str) -> Self {
        let body = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
        };

        Self { status, body }
    }
}
