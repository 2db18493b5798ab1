//! Session phase machine.
//!
//! ```text
//! Anonymous --Login--> Authenticating --Granted--> Authenticated
//!     ^                    |                           |
//!     +------Rejected------+                           |
//!     +------------------Logout------------------------+
//! Anonymous --Rehydrate--> Revalidating --Granted--> Authenticated
//!                              |
//!                           Rejected
//!                              v
//!                           Invalid --Clear--> Anonymous
//! ```
//!
//! `Logout` and `Clear` are resets and are accepted from any phase.

use serde::{Deserialize, Serialize};
use std::fmt;

use civichub_core::AppError;

/// Where a session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No identity.
    #[default]
    Anonymous,
    /// Credentials submitted, waiting for the server.
    Authenticating,
    /// Identity confirmed.
    Authenticated,
    /// A persisted identity is being confirmed after a restart.
    Revalidating,
    /// Revalidation failed; state must be cleared.
    Invalid,
}

/// Inputs that drive [`SessionPhase`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// User submitted credentials.
    Login,
    /// The server accepted the credentials or the persisted token.
    Granted,
    /// The server refused.
    Rejected,
    /// User logged out.
    Logout,
    /// A persisted identity was found on startup.
    Rehydrate,
    /// Local state was wiped.
    Clear,
}

impl SessionPhase {
    /// Apply `event`, returning the next phase.
    ///
    /// Pairs not in the transition table are rejected with a validation
    /// error; the caller keeps its current phase.
    pub fn transition(self, event: SessionEvent) -> Result<Self, AppError> {
        use SessionEvent as E;
        use SessionPhase as P;

        let next = match (self, event) {
            (_, E::Logout | E::Clear) => P::Anonymous,
            (P::Anonymous, E::Login) => P::Authenticating,
            (P::Anonymous, E::Rehydrate) => P::Revalidating,
            (P::Authenticating, E::Granted) => P::Authenticated,
            (P::Authenticating, E::Rejected) => P::Anonymous,
            (P::Revalidating, E::Granted) => P::Authenticated,
            (P::Revalidating, E::Rejected) => P::Invalid,
            (phase, event) => {
                return Err(AppError::validation(format!(
                    "Session event {event:?} is not valid in phase {phase}"
                )));
            }
        };
        Ok(next)
    }

    /// Whether the phase carries a confirmed identity.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// Whether a server round-trip is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Authenticating | Self::Revalidating)
    }

    /// Return the phase as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::Revalidating => "revalidating",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civichub_core::error::ErrorKind;

    #[test]
    fn test_login_flow() {
        let phase = SessionPhase::Anonymous
            .transition(SessionEvent::Login)
            .unwrap();
        assert_eq!(phase, SessionPhase::Authenticating);
        assert!(phase.is_pending());
        let phase = phase.transition(SessionEvent::Granted).unwrap();
        assert!(phase.is_authenticated());
        let phase = phase.transition(SessionEvent::Logout).unwrap();
        assert_eq!(phase, SessionPhase::Anonymous);
    }

    #[test]
    fn test_rejected_login_returns_to_anonymous() {
        let phase = SessionPhase::Authenticating
            .transition(SessionEvent::Rejected)
            .unwrap();
        assert_eq!(phase, SessionPhase::Anonymous);
    }

    #[test]
    fn test_rehydrate_failure_goes_through_invalid() {
        let phase = SessionPhase::Anonymous
            .transition(SessionEvent::Rehydrate)
            .unwrap();
        assert_eq!(phase, SessionPhase::Revalidating);
        let phase = phase.transition(SessionEvent::Rejected).unwrap();
        assert_eq!(phase, SessionPhase::Invalid);
        let phase = phase.transition(SessionEvent::Clear).unwrap();
        assert_eq!(phase, SessionPhase::Anonymous);
    }

    #[test]
    fn test_rehydrate_success() {
        let phase = SessionPhase::Revalidating
            .transition(SessionEvent::Granted)
            .unwrap();
        assert_eq!(phase, SessionPhase::Authenticated);
    }

    #[test]
    fn test_invalid_pairs_are_rejected() {
        let err = SessionPhase::Anonymous
            .transition(SessionEvent::Granted)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(SessionPhase::Authenticated
            .transition(SessionEvent::Login)
            .is_err());
        assert!(SessionPhase::Invalid
            .transition(SessionEvent::Granted)
            .is_err());
        assert!(SessionPhase::Authenticating
            .transition(SessionEvent::Rehydrate)
            .is_err());
    }

    #[test]
    fn test_resets_from_any_phase() {
        for phase in [
            SessionPhase::Anonymous,
            SessionPhase::Authenticating,
            SessionPhase::Authenticated,
            SessionPhase::Revalidating,
            SessionPhase::Invalid,
        ] {
            assert_eq!(
                phase.transition(SessionEvent::Clear).unwrap(),
                SessionPhase::Anonymous
            );
            assert_eq!(
                phase.transition(SessionEvent::Logout).unwrap(),
                SessionPhase::Anonymous
            );
        }
    }
}
