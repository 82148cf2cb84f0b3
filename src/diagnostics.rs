//! # Ceremony Diagnostics
//!
//! Human-oriented tracing of what the platform returned: buffer sizes, the
//! decoded client data, and the authenticator data flags and counter.
//!
//! Everything here is best-effort. A parse failure is logged at `warn` and
//! swallowed; no function in this module can fail a ceremony.

use crate::authenticator_data::AuthenticatorData;
use crate::webauthn::types::{AssertionCredential, RegistrationCredential};
use serde::Deserialize;
use serde_cbor::Value as CborValue;
use thiserror::Error;
use tracing::{debug, warn};

/// `CollectedClientData`, as serialized by the platform into `clientDataJSON`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientData {
    /// `webauthn.create` or `webauthn.get`
    #[serde(rename = "type")]
    pub ceremony_type: String,
    /// Base64url challenge, as the platform saw it
    pub challenge: String,
    pub origin: String,
    #[serde(default)]
    pub cross_origin: Option<bool>,
}

impl ClientData {
    pub fn parse(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Why `authData` could not be pulled out of an attestation object
#[derive(Debug, Error)]
pub enum AttestationObjectError {
    #[error("attestation object is not valid CBOR: {0}")]
    Cbor(#[from] serde_cbor::Error),
    #[error("attestation object is not a CBOR map")]
    NotAMap,
    #[error("attestation object has no `authData` byte string")]
    MissingAuthData,
}

/// Extract the `authData` byte string from a CBOR attestation object
///
/// The attestation object is a map `{fmt, attStmt, authData}`; only
/// `authData` is of interest here.
pub fn attestation_auth_data(attestation_object: &[u8]) -> Result<Vec<u8>, AttestationObjectError> {
    let value: CborValue = serde_cbor::from_slice(attestation_object)?;
    let map = match value {
        CborValue::Map(map) => map,
        _ => return Err(AttestationObjectError::NotAMap),
    };

    match map.get(&CborValue::Text("authData".to_string())) {
        Some(CborValue::Bytes(bytes)) => Ok(bytes.clone()),
        _ => Err(AttestationObjectError::MissingAuthData),
    }
}

/// Log a freshly created credential
pub fn log_registration(credential: &RegistrationCredential) {
    debug!(
        id = %credential.id,
        credential_type = %credential.credential_type,
        raw_id_len = credential.raw_id.len(),
        attestation_object_len = credential.response.attestation_object.len(),
        client_data_len = credential.response.client_data_json.len(),
        "Platform created credential"
    );

    log_client_data(&credential.response.client_data_json);

    match attestation_auth_data(&credential.response.attestation_object) {
        Ok(auth_data) => log_authenticator_data(&auth_data),
        Err(e) => warn!(error = %e, "Could not read authenticator data from attestation object"),
    }
}

/// Log an assertion returned by the platform
pub fn log_assertion(assertion: &AssertionCredential) {
    debug!(
        id = %assertion.id,
        credential_type = %assertion.credential_type,
        raw_id_len = assertion.raw_id.len(),
        authenticator_data_len = assertion.response.authenticator_data.len(),
        client_data_len = assertion.response.client_data_json.len(),
        signature_len = assertion.response.signature.len(),
        user_handle_len = assertion.response.user_handle.as_ref().map(Vec::len),
        "Platform returned assertion"
    );

    log_client_data(&assertion.response.client_data_json);
    log_authenticator_data(&assertion.response.authenticator_data);
}

fn log_client_data(bytes: &[u8]) {
    match ClientData::parse(bytes) {
        Ok(client_data) => debug!(
            ceremony_type = %client_data.ceremony_type,
            challenge = %client_data.challenge,
            origin = %client_data.origin,
            cross_origin = client_data.cross_origin,
            "Client data"
        ),
        Err(e) => warn!(error = %e, "Could not parse clientDataJSON"),
    }
}

fn log_authenticator_data(bytes: &[u8]) {
    match AuthenticatorData::parse(bytes) {
        Ok(data) => {
            let aaguid = data
                .attested_credential
                .as_ref()
                .map(|credential| hex::encode(credential.aaguid));
            debug!(
                rp_id_hash = %data.rp_id_hash_hex(),
                user_present = data.flags.user_present,
                user_verified = data.flags.user_verified,
                attested_credential_data = data.flags.attested_credential_data_included,
                extension_data = data.flags.extension_data_included,
                flags = %format!("0x{:02x}", data.flags.raw),
                signature_counter = data.signature_counter,
                total_length = data.total_length,
                aaguid = aaguid.as_deref(),
                "Authenticator data"
            );
        }
        Err(e) => warn!(error = %e, "Could not decode authenticator data"),
    }
}
