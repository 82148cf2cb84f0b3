//! # Base64url Transcoding
//!
//! The relying party sends every binary WebAuthn field (challenge, user id,
//! credential ids) as base64url text, while the platform authenticator works
//! with raw bytes. This module converts between the two.
//!
//! ## Format
//! - Alphabet: URL-safe (`-` instead of `+`, `_` instead of `/`)
//! - Padding: never emitted by [`encode`], tolerated by [`decode`]
//! - Non-zero trailing bits in the last symbol are ignored on decode, the way
//!   browsers' forgiving base64 decoding does

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::prelude::*;
use thiserror::Error;

const URL_SAFE_FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Malformed base64url text
///
/// Carries the length of the rejected input (the text itself may be
/// sensitive, e.g. a challenge) and the reason reported by the decoder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid base64url text ({length} chars): {reason}")]
pub struct DecodeError {
    pub length: usize,
    pub reason: String,
}

/// Encode raw bytes as unpadded base64url text
///
/// ## Example
/// ```
/// assert_eq!(passkey_client::encoding::encode(b"challenge"), "Y2hhbGxlbmdl");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url text into raw bytes
///
/// Both padded and unpadded input are accepted. Characters outside the
/// URL-safe alphabet, and impossible lengths, are rejected.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_FORGIVING
        .decode(text.as_bytes())
        .map_err(|e| DecodeError {
            length: text.len(),
            reason: e.to_string(),
        })
}
