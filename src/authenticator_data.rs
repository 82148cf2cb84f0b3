//! # Authenticator Data Decoding
//!
//! Every platform response embeds an *authenticator data* structure. The
//! relying party verifies it; the client only decodes it so the ceremony can
//! log what the authenticator claimed (user presence, verification, counter).
//!
//! ## Layout
//! ```text
//! offset  size  field
//! 0       32    SHA-256 hash of the RP ID
//! 32      1     flags
//! 33      4     signature counter (big-endian u32)
//! 37      ..    attested credential data (if AT flag), extensions (if ED flag)
//! ```
//!
//! Nothing in a ceremony depends on the result: decode failures are reported
//! and otherwise ignored by the caller.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use thiserror::Error;

/// Size of the fixed header: rpIdHash + flags + signCount
pub const MIN_LENGTH: usize = 32 + 1 + 4;

const FLAG_USER_PRESENT: u8 = 0x01;
const FLAG_USER_VERIFIED: u8 = 0x04;
const FLAG_ATTESTED_CREDENTIAL_DATA: u8 = 0x40;
const FLAG_EXTENSION_DATA: u8 = 0x80;

/// The buffer is too short to hold the fixed header
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("malformed authenticator data: {length} bytes, need at least {}", MIN_LENGTH)]
pub struct MalformedAuthenticatorDataError {
    pub length: usize,
}

/// Decoded flags byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatorFlags {
    /// UP (bit 0)
    pub user_present: bool,
    /// UV (bit 2)
    pub user_verified: bool,
    /// AT (bit 6)
    pub attested_credential_data_included: bool,
    /// ED (bit 7)
    pub extension_data_included: bool,
    pub raw: u8,
}

impl From<u8> for AuthenticatorFlags {
    fn from(raw: u8) -> Self {
        Self {
            user_present: raw & FLAG_USER_PRESENT != 0,
            user_verified: raw & FLAG_USER_VERIFIED != 0,
            attested_credential_data_included: raw & FLAG_ATTESTED_CREDENTIAL_DATA != 0,
            extension_data_included: raw & FLAG_EXTENSION_DATA != 0,
            raw,
        }
    }
}

/// Header of the attested credential data block (registration only)
///
/// The COSE public key that follows the credential id is left undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestedCredentialData {
    pub aaguid: [u8; 16],
    pub credential_id: Vec<u8>,
}

/// Decoded authenticator data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatorData {
    pub rp_id_hash: [u8; 32],
    pub flags: AuthenticatorFlags,
    pub signature_counter: u32,
    pub total_length: usize,
    /// Present only when the AT flag is set and the block is complete
    pub attested_credential: Option<AttestedCredentialData>,
}

impl AuthenticatorData {
    /// Decode the fixed header, and the attested credential header if present
    ///
    /// # Errors
    /// [`MalformedAuthenticatorDataError`] when `bytes` is shorter than
    /// [`MIN_LENGTH`]. A truncated attested credential block is not an error;
    /// `attested_credential` is simply `None`.
    pub fn parse(bytes: &[u8]) -> Result<Self, MalformedAuthenticatorDataError> {
        let malformed = MalformedAuthenticatorDataError {
            length: bytes.len(),
        };
        if bytes.len() < MIN_LENGTH {
            return Err(malformed);
        }

        let mut cursor = Cursor::new(bytes);

        let mut rp_id_hash = [0u8; 32];
        cursor.read_exact(&mut rp_id_hash).map_err(|_| malformed)?;
        let flags = AuthenticatorFlags::from(cursor.read_u8().map_err(|_| malformed)?);
        let signature_counter = cursor.read_u32::<BigEndian>().map_err(|_| malformed)?;

        let attested_credential = if flags.attested_credential_data_included {
            read_attested_credential(&mut cursor)
        } else {
            None
        };

        Ok(Self {
            rp_id_hash,
            flags,
            signature_counter,
            total_length: bytes.len(),
            attested_credential,
        })
    }

    /// RP ID hash as lowercase hex, for display
    pub fn rp_id_hash_hex(&self) -> String {
        hex::encode(self.rp_id_hash)
    }
}

fn read_attested_credential(cursor: &mut Cursor<&[u8]>) -> Option<AttestedCredentialData> {
    let mut aaguid = [0u8; 16];
    cursor.read_exact(&mut aaguid).ok()?;
    let len = cursor.read_u16::<BigEndian>().ok()? as usize;
    let mut credential_id = vec![0u8; len];
    cursor.read_exact(&mut credential_id).ok()?;

    Some(AttestedCredentialData {
        aaguid,
        credential_id,
    })
}
