//! # Options Normalization
//!
//! Turns the server's JSON options bundle into the binary form the platform
//! authenticator takes.
//!
//! ## Two shapes
//! Server libraries disagree on how they return options. Some wrap them:
//! ```json
//! { "publicKey": { "challenge": "Y2hhbGxlbmdl", "user": { "id": "dXNlcjE" } } }
//! ```
//! others send the inner object directly:
//! ```json
//! { "challenge": "Y2hhbGxlbmdl", "user": { "id": "dXNlcjE" } }
//! ```
//! [`ServerOptions`] decides once which shape arrived; nothing downstream
//! looks at the wrapper again.
//!
//! ## What gets decoded
//! - Registration: `challenge`, `user.id`, `excludeCredentials[].id`
//! - Authentication: `challenge`, `allowCredentials[].id`
//!
//! Everything else (`rp`, `pubKeyCredParams`, `timeout`, ...) is kept as-is
//! in `extra`. A missing credential list stays `None`: it means "no
//! restriction", not "empty list".

use crate::encoding;
use crate::error::{CeremonyError, CeremonyResult};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Key under which wrapped options live
pub const WRAPPER_KEY: &str = "publicKey";

/// The options bundle as received, shape resolved
#[derive(Debug, Clone, PartialEq)]
pub enum ServerOptions {
    /// `{ "publicKey": { ... } }`
    Wrapped(Map<String, Value>),
    /// `{ "challenge": ..., ... }`
    Bare(Map<String, Value>),
}

impl ServerOptions {
    /// Classify a bundle
    ///
    /// Wrapped when the top level holds an object under `publicKey`; bare
    /// otherwise.
    ///
    /// # Errors
    /// `InvalidOptions` if the bundle is not a JSON object.
    pub fn from_value(value: Value) -> CeremonyResult<Self> {
        match value {
            Value::Object(mut map) => match map.remove(WRAPPER_KEY) {
                Some(Value::Object(inner)) => Ok(ServerOptions::Wrapped(inner)),
                Some(other) => {
                    map.insert(WRAPPER_KEY.to_string(), other);
                    Ok(ServerOptions::Bare(map))
                }
                None => Ok(ServerOptions::Bare(map)),
            },
            other => Err(CeremonyError::InvalidOptions(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, ServerOptions::Wrapped(_))
    }

    /// The options object itself, wrapper removed
    pub fn into_payload(self) -> Map<String, Value> {
        match self {
            ServerOptions::Wrapped(map) | ServerOptions::Bare(map) => map,
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Registration options, binary fields decoded
#[derive(Debug, Clone, PartialEq)]
pub struct CreationOptions {
    pub challenge: Vec<u8>,
    pub user: Option<UserEntity>,
    pub exclude_credentials: Option<Vec<CredentialDescriptor>>,
    /// `rp`, `pubKeyCredParams`, `timeout`, `authenticatorSelection`, ...
    pub extra: Map<String, Value>,
}

/// Authentication options, binary fields decoded
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub challenge: Vec<u8>,
    pub allow_credentials: Option<Vec<CredentialDescriptor>>,
    /// `rpId`, `timeout`, `userVerification`, ...
    pub extra: Map<String, Value>,
}

/// `PublicKeyCredentialUserEntity`
#[derive(Debug, Clone, PartialEq)]
pub struct UserEntity {
    pub id: Option<Vec<u8>>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub extra: Map<String, Value>,
}

/// `PublicKeyCredentialDescriptor`
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialDescriptor {
    pub id: Option<Vec<u8>>,
    pub credential_type: Option<String>,
    pub transports: Option<Vec<String>>,
    pub extra: Map<String, Value>,
}

// JSON mirrors of the above, binary fields still base64url text

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreationOptionsJson {
    challenge: String,
    #[serde(default)]
    user: Option<UserEntityJson>,
    #[serde(default)]
    exclude_credentials: Option<Vec<CredentialDescriptorJson>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestOptionsJson {
    challenge: String,
    #[serde(default)]
    allow_credentials: Option<Vec<CredentialDescriptorJson>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserEntityJson {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct CredentialDescriptorJson {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type", default)]
    credential_type: Option<String>,
    #[serde(default)]
    transports: Option<Vec<String>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Normalize a `/register/begin` response body
///
/// # Errors
/// - `InvalidOptions`: not an object, no `challenge`, or a field of the wrong type
/// - `Decode`: a binary field is not valid base64url
pub fn normalize_creation_options(value: Value) -> CeremonyResult<CreationOptions> {
    let payload = payload_of(value)?;
    let json: CreationOptionsJson = serde_json::from_value(Value::Object(payload))
        .map_err(|e| CeremonyError::InvalidOptions(e.to_string()))?;

    Ok(CreationOptions {
        challenge: decode_field("challenge", &json.challenge)?,
        user: json.user.map(decode_user).transpose()?,
        exclude_credentials: json
            .exclude_credentials
            .map(|list| decode_descriptors("excludeCredentials", list))
            .transpose()?,
        extra: json.extra,
    })
}

/// Normalize a `/login/begin` response body
///
/// # Errors
/// Same as [`normalize_creation_options`].
pub fn normalize_request_options(value: Value) -> CeremonyResult<RequestOptions> {
    let payload = payload_of(value)?;
    let json: RequestOptionsJson = serde_json::from_value(Value::Object(payload))
        .map_err(|e| CeremonyError::InvalidOptions(e.to_string()))?;

    Ok(RequestOptions {
        challenge: decode_field("challenge", &json.challenge)?,
        allow_credentials: json
            .allow_credentials
            .map(|list| decode_descriptors("allowCredentials", list))
            .transpose()?,
        extra: json.extra,
    })
}

fn payload_of(value: Value) -> CeremonyResult<Map<String, Value>> {
    let options = ServerOptions::from_value(value)?;
    tracing::debug!(wrapped = options.is_wrapped(), "Resolved server options shape");
    Ok(options.into_payload())
}

fn decode_field(field: &str, text: &str) -> CeremonyResult<Vec<u8>> {
    encoding::decode(text).map_err(|e| CeremonyError::decode(field, e))
}

fn decode_user(user: UserEntityJson) -> CeremonyResult<UserEntity> {
    Ok(UserEntity {
        id: user
            .id
            .as_deref()
            .map(|id| decode_field("user.id", id))
            .transpose()?,
        name: user.name,
        display_name: user.display_name,
        extra: user.extra,
    })
}

fn decode_descriptors(
    list_name: &str,
    list: Vec<CredentialDescriptorJson>,
) -> CeremonyResult<Vec<CredentialDescriptor>> {
    list.into_iter()
        .enumerate()
        .map(|(index, descriptor)| -> CeremonyResult<CredentialDescriptor> {
            let id = descriptor
                .id
                .as_deref()
                .map(|id| decode_field(&format!("{}[{}].id", list_name, index), id))
                .transpose()?;

            Ok(CredentialDescriptor {
                id,
                credential_type: descriptor.credential_type,
                transports: descriptor.transports,
                extra: descriptor.extra,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn detects_wrapped_shape() {
        let options = ServerOptions::from_value(json!({
            "publicKey": { "challenge": "AAA", "user": { "id": "BBB" } }
        }))
        .unwrap();
        assert!(options.is_wrapped());

        let normalized = normalize_creation_options(json!({
            "publicKey": { "challenge": "AAA", "user": { "id": "BBB" } }
        }))
        .unwrap();
        assert_eq!(normalized.challenge, vec![0x00, 0x00]);
        assert_eq!(normalized.user.unwrap().id, Some(vec![0x04, 0x10]));
    }

    #[test]
    fn detects_bare_shape() {
        let options = ServerOptions::from_value(json!({ "challenge": "AAA" })).unwrap();
        assert!(!options.is_wrapped());

        let normalized = normalize_request_options(json!({ "challenge": "AAA" })).unwrap();
        assert_eq!(normalized.challenge, vec![0x00, 0x00]);
        assert!(normalized.allow_credentials.is_none());
    }

    #[test]
    fn non_object_wrapper_is_treated_as_bare() {
        let options =
            ServerOptions::from_value(json!({ "publicKey": true, "challenge": "AAA" })).unwrap();
        assert!(!options.is_wrapped());
        assert_eq!(options.into_payload()["publicKey"], json!(true));
    }

    #[test]
    fn registration_decodes_every_binary_field() {
        let normalized = normalize_creation_options(json!({
            "publicKey": {
                "rp": { "name": "Go WebAuthn Example", "id": "localhost" },
                "user": { "id": "dXNlcjE", "name": "alice", "displayName": "alice" },
                "challenge": "Y2hhbGxlbmdl",
                "pubKeyCredParams": [{ "type": "public-key", "alg": -7 }],
                "timeout": 300000,
                "excludeCredentials": [
                    { "type": "public-key", "id": "Y3JlZC0x", "transports": ["internal"] },
                    { "type": "public-key", "id": "Y3JlZC0y" }
                ],
                "authenticatorSelection": { "residentKey": "required" }
            }
        }))
        .unwrap();

        assert_eq!(normalized.challenge, b"challenge");
        let user = normalized.user.unwrap();
        assert_eq!(user.id.as_deref(), Some(&b"user1"[..]));
        assert_eq!(user.name.as_deref(), Some("alice"));
        assert_eq!(user.display_name.as_deref(), Some("alice"));

        let excluded = normalized.exclude_credentials.unwrap();
        assert_eq!(excluded.len(), 2);
        assert_eq!(excluded[0].id.as_deref(), Some(&b"cred-1"[..]));
        assert_eq!(excluded[0].transports, Some(vec!["internal".to_string()]));
        assert_eq!(excluded[1].id.as_deref(), Some(&b"cred-2"[..]));
        assert_eq!(excluded[1].credential_type.as_deref(), Some("public-key"));

        assert_eq!(normalized.extra["timeout"], json!(300000));
        assert_eq!(normalized.extra["rp"]["id"], json!("localhost"));
        assert!(normalized.extra.contains_key("authenticatorSelection"));
        assert!(!normalized.extra.contains_key("challenge"));
    }

    #[test]
    fn authentication_decodes_allow_list() {
        let normalized = normalize_request_options(json!({
            "publicKey": {
                "challenge": "Y2hhbGxlbmdl",
                "rpId": "localhost",
                "allowCredentials": [{ "type": "public-key", "id": "Y3JlZC0x" }],
                "userVerification": "required"
            }
        }))
        .unwrap();

        let allowed = normalized.allow_credentials.unwrap();
        assert_eq!(allowed[0].id.as_deref(), Some(&b"cred-1"[..]));
        assert_eq!(normalized.extra["rpId"], json!("localhost"));
    }

    #[test]
    fn absent_lists_stay_absent_and_empty_lists_stay_empty() {
        let absent = normalize_creation_options(json!({ "challenge": "AAA" })).unwrap();
        assert!(absent.exclude_credentials.is_none());
        assert!(absent.user.is_none());

        let empty =
            normalize_creation_options(json!({ "challenge": "AAA", "excludeCredentials": [] }))
                .unwrap();
        assert_eq!(empty.exclude_credentials, Some(vec![]));
    }

    #[test]
    fn descriptor_without_id_is_kept() {
        let normalized = normalize_request_options(json!({
            "challenge": "AAA",
            "allowCredentials": [{ "type": "public-key" }]
        }))
        .unwrap();
        assert_eq!(normalized.allow_credentials.unwrap()[0].id, None);
    }

    #[test]
    fn malformed_binary_field_names_its_location() {
        let err = normalize_request_options(json!({
            "challenge": "AAA",
            "allowCredentials": [{ "id": "Y3JlZC0x" }, { "id": "!!" }]
        }))
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        match err {
            CeremonyError::Decode { field, .. } => assert_eq!(field, "allowCredentials[1].id"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn shape_errors_are_invalid_options() {
        let not_object = normalize_creation_options(json!(["challenge"])).unwrap_err();
        assert_eq!(not_object.kind(), ErrorKind::InvalidOptions);

        let no_challenge = normalize_creation_options(json!({ "publicKey": {} })).unwrap_err();
        assert_eq!(no_challenge.kind(), ErrorKind::InvalidOptions);

        let wrong_type = normalize_request_options(json!({ "challenge": 42 })).unwrap_err();
        assert_eq!(wrong_type.kind(), ErrorKind::InvalidOptions);
    }
}
