use crate::diagnostics;
use crate::error::CeremonyResult;
use crate::platform::PlatformAuthenticator;
use crate::transport::RelyingPartyTransport;
use crate::webauthn::ceremony::{Ceremony, CeremonyKind, CeremonyState};
use crate::webauthn::options::normalize_request_options;
use crate::webauthn::types::VerificationOutcome;
use tracing::{debug, info};

/// Run a complete authentication ceremony for `username`
///
/// Same three steps as registration, against `/login/begin` and
/// `/login/finish`, using the platform's `get_assertion`.
pub async fn perform_authentication<T, P>(
    transport: &T,
    platform: &mut P,
    username: &str,
) -> CeremonyResult<VerificationOutcome>
where
    T: RelyingPartyTransport + ?Sized,
    P: PlatformAuthenticator + ?Sized,
{
    let mut ceremony = Ceremony::new(CeremonyKind::Authentication);
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

    let options = normalize_request_options(options)?;
    debug!(
        challenge_len = options.challenge.len(),
        allowed = options.allow_credentials.as_ref().map(Vec::len),
        "Request options normalized"
    );

    info!("Asking platform for an assertion");
    let assertion = platform.get_assertion(&options).await?;
    diagnostics::log_assertion(&assertion);

    ceremony.advance(CeremonyState::AwaitingServerVerification)?;
    let body = serde_json::to_value(assertion.to_json())?;
    ceremony.finish(transport, &body, &session).await
}
