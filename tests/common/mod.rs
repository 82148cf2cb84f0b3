//! Shared mocks and fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use passkey_client::platform::{CapabilityError, PlatformAuthenticator};
use passkey_client::transport::{RelyingPartyResponse, RelyingPartyTransport, TransportError};
use passkey_client::webauthn::options::{CreationOptions, RequestOptions};
use passkey_client::webauthn::types::{
    AssertionCredential, AssertionResponse, AttestationResponse, RegistrationCredential,
};
use passkey_client::SessionHandle;
use serde_cbor::Value as CborValue;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("passkey_client=debug")
        .with_test_writer()
        .try_init();
}

// Transport

/// One request seen by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub path: String,
    pub body: Value,
    pub session: Option<String>,
}

/// Scripted relying party: answers each path from a queue and records calls
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, VecDeque<Result<RelyingPartyResponse, String>>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, path: &str, status: u16, session: Option<&str>, body: &str) -> Self {
        self.push(
            path,
            Ok(RelyingPartyResponse {
                status,
                session: session.map(SessionHandle::new),
                body: body.to_string(),
            }),
        )
    }

    pub fn respond_json(self, path: &str, status: u16, session: Option<&str>, body: Value) -> Self {
        let text = body.to_string();
        self.respond(path, status, session, &text)
    }

    pub fn fail(self, path: &str, reason: &str) -> Self {
        self.push(path, Err(reason.to_string()))
    }

    fn push(self, path: &str, response: Result<RelyingPartyResponse, String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls().iter().filter(|call| call.path == path).count()
    }
}

#[async_trait]
impl RelyingPartyTransport for MockTransport {
    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        session: Option<&SessionHandle>,
    ) -> Result<RelyingPartyResponse, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            body: body.clone(),
            session: session.map(|s| s.as_str().to_string()),
        });

        let scripted = self
            .responses
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front);

        match scripted {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(TransportError::Unreachable(reason)),
            None => Ok(RelyingPartyResponse {
                status: 404,
                session: None,
                body: format!("no scripted response for {}", path),
            }),
        }
    }
}

// Platform

/// Scripted platform authenticator that remembers what it was asked
#[derive(Debug)]
pub struct MockPlatform {
    pub registration: Result<RegistrationCredential, CapabilityError>,
    pub assertion: Result<AssertionCredential, CapabilityError>,
    pub create_calls: usize,
    pub get_calls: usize,
    pub last_creation_options: Option<CreationOptions>,
    pub last_request_options: Option<RequestOptions>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            registration: Ok(registration_credential()),
            assertion: Ok(assertion_credential(None)),
            create_calls: 0,
            get_calls: 0,
            last_creation_options: None,
            last_request_options: None,
        }
    }

    pub fn rejecting(error: CapabilityError) -> Self {
        Self {
            registration: Err(error.clone()),
            assertion: Err(error),
            ..Self::new()
        }
    }

    pub fn with_assertion(mut self, assertion: AssertionCredential) -> Self {
        self.assertion = Ok(assertion);
        self
    }
}

#[async_trait]
impl PlatformAuthenticator for MockPlatform {
    async fn create_credential(
        &mut self,
        options: &CreationOptions,
    ) -> Result<RegistrationCredential, CapabilityError> {
        self.create_calls += 1;
        self.last_creation_options = Some(options.clone());
        self.registration.clone()
    }

    async fn get_assertion(
        &mut self,
        options: &RequestOptions,
    ) -> Result<AssertionCredential, CapabilityError> {
        self.get_calls += 1;
        self.last_request_options = Some(options.clone());
        self.assertion.clone()
    }
}

// Fixtures

/// Wrapped creation options, as a go-webauthn server returns them
pub fn creation_options_json() -> Value {
    json!({
        "publicKey": {
            "rp": { "name": "Go WebAuthn Example", "id": "localhost" },
            "user": { "id": "dXNlcjE", "name": "alice", "displayName": "alice" },
            "challenge": "Y2hhbGxlbmdl",
            "pubKeyCredParams": [{ "type": "public-key", "alg": -7 }],
            "timeout": 300000,
            "authenticatorSelection": {
                "authenticatorAttachment": "platform",
                "residentKey": "required",
                "userVerification": "required"
            }
        }
    })
}

/// Wrapped request options with one allowed credential
pub fn request_options_json() -> Value {
    json!({
        "publicKey": {
            "challenge": "Y2hhbGxlbmdl",
            "timeout": 300000,
            "rpId": "localhost",
            "allowCredentials": [{ "type": "public-key", "id": "Y3JlZC0x" }],
            "userVerification": "required"
        }
    })
}

/// Authenticator data: rpIdHash of 0x49 bytes, the given flags and counter
pub fn authenticator_data(flags: u8, counter: u32) -> Vec<u8> {
    let mut bytes = vec![0x49; 32];
    bytes.push(flags);
    bytes.extend_from_slice(&counter.to_be_bytes());
    bytes
}

pub fn attestation_object(auth_data: Vec<u8>) -> Vec<u8> {
    let mut map = BTreeMap::new();
    map.insert(CborValue::Text("fmt".into()), CborValue::Text("none".into()));
    map.insert(CborValue::Text("attStmt".into()), CborValue::Map(BTreeMap::new()));
    map.insert(CborValue::Text("authData".into()), CborValue::Bytes(auth_data));
    serde_cbor::to_vec(&CborValue::Map(map)).unwrap()
}

pub fn client_data(ceremony_type: &str) -> Vec<u8> {
    json!({
        "type": ceremony_type,
        "challenge": "Y2hhbGxlbmdl",
        "origin": "http://localhost:8080",
        "crossOrigin": false
    })
    .to_string()
    .into_bytes()
}

pub fn registration_credential() -> RegistrationCredential {
    RegistrationCredential {
        id: "cred-1".to_string(),
        raw_id: b"cred-1".to_vec(),
        credential_type: "public-key".to_string(),
        authenticator_attachment: Some("platform".to_string()),
        response: AttestationResponse {
            attestation_object: attestation_object(authenticator_data(0x45, 0)),
            client_data_json: client_data("webauthn.create"),
            transports: Some(vec!["internal".to_string()]),
        },
    }
}

pub fn assertion_credential(user_handle: Option<Vec<u8>>) -> AssertionCredential {
    AssertionCredential {
        id: "cred-1".to_string(),
        raw_id: b"cred-1".to_vec(),
        credential_type: "public-key".to_string(),
        authenticator_attachment: None,
        response: AssertionResponse {
            authenticator_data: authenticator_data(0x05, 42),
            client_data_json: client_data("webauthn.get"),
            signature: vec![0x30, 0x45, 0x02, 0x20],
            user_handle,
        },
    }
}
