//! # Passkey Registration
//!
//! Client side of creating a new passkey. Three steps, strictly in order:
//!
//! 1. **Begin**: POST `/register/begin` with the username; the server answers
//!    with creation options and an `X-Session-ID` header
//! 2. **Perform**: decode the options and ask the platform to create a
//!    credential (the user approves on their authenticator)
//! 3. **Finish**: base64url-encode the credential and POST it to
//!    `/register/finish` with the same session id
//!
//! ## Security Concepts
//! - **Challenge**: passed to the platform byte-for-byte as the server
//!   generated it; the server rejects the credential otherwise
//! - **Attestation**: the platform's signed statement about the new key,
//!   forwarded untouched inside `attestationObject`

use crate::diagnostics;
use crate::error::CeremonyResult;
use crate::platform::PlatformAuthenticator;
use crate::transport::RelyingPartyTransport;
use crate::webauthn::ceremony::{Ceremony, CeremonyKind, CeremonyState};
use crate::webauthn::options::normalize_creation_options;
use crate::webauthn::types::VerificationOutcome;
use tracing::{debug, info};

/// Run a complete registration ceremony for `username`
///
/// ## Side effects
/// At most one Begin request, one `create_credential` call and one Finish
/// request, in that order. A failure at any step ends the ceremony; later
/// steps are not attempted.
///
/// ## Returns
/// The server's verification outcome, verbatim.
///
/// ## Errors
/// - Validation: empty username (nothing is sent)
/// - Server: Begin or Finish answered non-2xx
/// - Network: the server could not be reached
/// - InvalidResponse / InvalidOptions / Decode: unusable Begin response
/// - Capability: the platform refused or the user cancelled (Finish is not called)
pub async fn perform_registration<T, P>(
    transport: &T,
    platform: &mut P,
    username: &str,
) -> CeremonyResult<VerificationOutcome>
where
    T: RelyingPartyTransport + ?Sized,
    P: PlatformAuthenticator + ?Sized,
{
    let mut ceremony = Ceremony::new(CeremonyKind::Registration);
    let result = run(&mut ceremony, transport, platform, username).await;
    ceremony.conclude(result)
}

async fn run<T, P>(
    ceremony: &mut Ceremony,
    transport: &T,
    platform: &mut P,
    username: &str,
) -> CeremonyResult<VerificationOutcome>
where
    T: RelyingPartyTransport + ?Sized,
    P: PlatformAuthenticator + ?Sized,
{
    let (options, session) = ceremony.begin(transport, username).await?;

    let options = normalize_creation_options(options)?;
    debug!(
        challenge_len = options.challenge.len(),
        excluded = options.exclude_credentials.as_ref().map(Vec::len),
        "Creation options normalized"
    );

    info!("Asking platform to create a credential");
    let credential = platform.create_credential(&options).await?;
    diagnostics::log_registration(&credential);

    ceremony.advance(CeremonyState::AwaitingServerVerification)?;
    let body = serde_json::to_value(credential.to_json())?;
    ceremony.finish(transport, &body, &session).await
}
