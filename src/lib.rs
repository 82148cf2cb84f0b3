//! # Passkey Client
//!
//! Drives passkey (WebAuthn) registration and login from the client side:
//! asks a relying-party server for a challenge, has a platform authenticator
//! sign it, and sends the result back for verification.
//!
//! ## Key Concepts
//! - **Ceremony**: one complete registration or login exchange
//! - **Relying party**: the server that issues challenges and verifies results
//! - **Platform authenticator**: whatever creates and uses the credential
//!   (plugged in through [`platform::PlatformAuthenticator`])
//!
//! ## Example
//! ```no_run
//! # async fn demo<P: passkey_client::platform::PlatformAuthenticator>(platform: P) -> anyhow::Result<()> {
//! use passkey_client::{ClientConfig, PasskeyClient};
//!
//! let config = ClientConfig::from_env()?;
//! let mut client = PasskeyClient::from_config(&config, platform)?;
//!
//! let outcome = client.perform_registration("alice").await?;
//! println!("server said: {}", outcome.body);
//! # Ok(())
//! # }
//! ```

pub mod authenticator_data; // Fixed-layout authenticator data decoding
pub mod client;             // Entry points
pub mod config;             // Environment configuration
pub mod diagnostics;        // Best-effort logging of platform results
pub mod encoding;           // base64url <-> bytes
pub mod error;              // Error taxonomy
pub mod platform;           // Platform authenticator seam
pub mod telemetry;          // tracing subscriber setup
pub mod transport;          // Relying party HTTP seam
pub mod webauthn;           // Options, wire types, ceremonies

pub use crate::client::PasskeyClient;
pub use crate::config::ClientConfig;
pub use crate::error::{CeremonyError, CeremonyResult, ErrorKind};
pub use crate::webauthn::types::{SessionHandle, VerificationOutcome};
