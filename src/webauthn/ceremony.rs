//! # Ceremony State Machine
//!
//! Registration and authentication walk the same chain of states:
//!
//! ```text
//! Idle -> AwaitingChallenge -> AwaitingPlatformResult -> AwaitingServerVerification -> Completed
//!   \            \                      \                          \
//!    `------------`----------------------`--------------------------`--> Failed
//! ```
//!
//! [`Ceremony`] tracks where one run is, refuses out-of-order moves, and
//! owns the two server round-trips (Begin and Finish) that both ceremonies
//! share. The platform step in between is ceremony-specific and lives in
//! `registration` / `authentication`.

use crate::error::{CeremonyError, CeremonyResult};
use crate::transport::{RelyingPartyTransport, SESSION_HEADER};
use crate::webauthn::types::{BeginRequest, SessionHandle, VerificationOutcome};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

/// Which ceremony is running; decides the endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CeremonyKind {
    Registration,
    Authentication,
}

impl CeremonyKind {
    pub fn begin_path(self) -> &'static str {
        match self {
            CeremonyKind::Registration => "/register/begin",
            CeremonyKind::Authentication => "/login/begin",
        }
    }

    pub fn finish_path(self) -> &'static str {
        match self {
            CeremonyKind::Registration => "/register/finish",
            CeremonyKind::Authentication => "/login/finish",
        }
    }
}

impl fmt::Display for CeremonyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CeremonyKind::Registration => f.write_str("registration"),
            CeremonyKind::Authentication => f.write_str("authentication"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CeremonyState {
    Idle,
    AwaitingChallenge,
    AwaitingPlatformResult,
    AwaitingServerVerification,
    Completed,
    Failed,
}

impl CeremonyState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CeremonyState::Completed | CeremonyState::Failed)
    }

    /// Whether `next` directly follows `self`
    ///
    /// Each state has exactly one successor, and any non-terminal state may
    /// fail. Nothing leaves a terminal state.
    pub fn can_advance_to(self, next: CeremonyState) -> bool {
        use CeremonyState::*;

        match (self, next) {
            (Idle, AwaitingChallenge)
            | (AwaitingChallenge, AwaitingPlatformResult)
            | (AwaitingPlatformResult, AwaitingServerVerification)
            | (AwaitingServerVerification, Completed) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// One run of a ceremony
///
/// Created per call, dropped when the call returns. Never shared.
#[derive(Debug)]
pub struct Ceremony {
    kind: CeremonyKind,
    state: CeremonyState,
}

impl Ceremony {
    pub fn new(kind: CeremonyKind) -> Self {
        Self {
            kind,
            state: CeremonyState::Idle,
        }
    }

    pub fn kind(&self) -> CeremonyKind {
        self.kind
    }

    pub fn state(&self) -> CeremonyState {
        self.state
    }

    /// Move to `next`, or refuse with `InvalidTransition`
    pub fn advance(&mut self, next: CeremonyState) -> CeremonyResult<()> {
        if !self.state.can_advance_to(next) {
            return Err(CeremonyError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        debug!(ceremony = %self.kind, from = ?self.state, to = ?next, "Ceremony transition");
        self.state = next;
        Ok(())
    }

    /// Begin round-trip: `Idle -> AwaitingChallenge -> AwaitingPlatformResult`
    ///
    /// Returns the raw options bundle and the session handle to echo on
    /// Finish. An empty username fails here, before anything is sent.
    pub async fn begin<T>(
        &mut self,
        transport: &T,
        username: &str,
    ) -> CeremonyResult<(Value, SessionHandle)>
    where
        T: RelyingPartyTransport + ?Sized,
    {
        if username.trim().is_empty() {
            return Err(CeremonyError::Validation(
                "username must not be empty".to_string(),
            ));
        }
        self.advance(CeremonyState::AwaitingChallenge)?;

        info!(ceremony = %self.kind, %username, "Requesting challenge");
        let body = serde_json::to_value(BeginRequest {
            username: username.to_string(),
        })?;
        let response = transport
            .post_json(self.kind.begin_path(), &body, None)
            .await?;

        if !response.is_success() {
            return Err(CeremonyError::Server {
                status: response.status,
                body: response.body,
            });
        }

        let session = response.session.ok_or_else(|| {
            CeremonyError::InvalidResponse(format!("missing {} header", SESSION_HEADER))
        })?;
        let options: Value = serde_json::from_str(&response.body).map_err(|e| {
            CeremonyError::InvalidResponse(format!("options body is not JSON: {}", e))
        })?;
        debug!(ceremony = %self.kind, %session, "Received challenge options");

        self.advance(CeremonyState::AwaitingPlatformResult)?;
        Ok((options, session))
    }

    /// Finish round-trip, from `AwaitingServerVerification`
    ///
    /// `credential` is the already-transcoded wire form of the platform
    /// result. The state is left for [`Ceremony::conclude`] to settle.
    pub async fn finish<T>(
        &mut self,
        transport: &T,
        credential: &Value,
        session: &SessionHandle,
    ) -> CeremonyResult<VerificationOutcome>
    where
        T: RelyingPartyTransport + ?Sized,
    {
        if self.state != CeremonyState::AwaitingServerVerification {
            return Err(CeremonyError::InvalidTransition {
                from: self.state,
                to: CeremonyState::Completed,
            });
        }

        debug!(ceremony = %self.kind, %session, "Submitting credential for verification");
        let response = transport
            .post_json(self.kind.finish_path(), credential, Some(session))
            .await?;

        if !response.is_success() {
            return Err(CeremonyError::Server {
                status: response.status,
                body: response.body,
            });
        }

        Ok(VerificationOutcome::from_response(
            response.status,
            &response.body,
        ))
    }

    /// Settle the run into `Completed` or `Failed`
    pub fn conclude<O>(&mut self, result: CeremonyResult<O>) -> CeremonyResult<O> {
        let result = result.and_then(|outcome| {
            self.advance(CeremonyState::Completed)?;
            Ok(outcome)
        });

        match result {
            Ok(outcome) => {
                info!(ceremony = %self.kind, "Ceremony completed");
                Ok(outcome)
            }
            Err(error) => {
                warn!(
                    ceremony = %self.kind,
                    state = ?self.state,
                    kind = ?error.kind(),
                    %error,
                    "Ceremony failed"
                );
                self.state = CeremonyState::Failed;
                Err(error)
            }
        }
    }
}
