//! # WebAuthn Module
//!
//! The client half of the passkey ceremonies.
//!
//! ## Submodules
//! - `types`: request/response and credential types, and their wire forms
//! - `options`: server options bundle -> platform options
//! - `ceremony`: the shared state machine and the Begin/Finish round-trips
//! - `registration`: creating a new passkey
//! - `authentication`: logging in with an existing passkey
//!
//! ## WebAuthn Flow Overview
//!
//! ### Registration (Creating a Passkey)
//! 1. Client requests registration → POST `/register/begin`
//! 2. Server returns creation options (challenge, user, rp) and a session id
//! 3. Client decodes the options → `navigator.credentials.create()` equivalent
//! 4. Client encodes the credential → POST `/register/finish` with the session id
//!
//! ### Authentication (Logging In)
//! 1. Client requests authentication → POST `/login/begin`
//! 2. Server returns request options (challenge, allowed credentials) and a session id
//! 3. Client decodes the options → `navigator.credentials.get()` equivalent
//! 4. Client encodes the assertion → POST `/login/finish` with the session id

pub mod authentication;
pub mod ceremony;
pub mod options;
pub mod registration;
pub mod types;
