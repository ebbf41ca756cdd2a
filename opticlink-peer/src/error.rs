use opticlink_core::{ConnectionState, PeerRole, ProtocolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("'{op}' is not valid in state {state}")]
    InvalidState {
        op: &'static str,
        state: ConnectionState,
    },

    #[error("'{op}' is not available to the {role} role")]
    RoleMismatch { op: &'static str, role: PeerRole },

    #[error("Protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Received an answer without a pending local offer")]
    UnexpectedAnswer,

    #[error("Remote session description rejected: {0:#}")]
    RejectedDescription(#[source] anyhow::Error),

    #[error("Transport error: {0:#}")]
    Transport(#[source] anyhow::Error),

    #[error("Orchestrator is closed")]
    Closed,
}

impl OrchestratorError {
    /// True for errors caused by bad or out-of-order remote input. These are
    /// rejected without changing state; everything else ends the attempt.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            OrchestratorError::Protocol(_)
                | OrchestratorError::UnexpectedAnswer
                | OrchestratorError::RejectedDescription(_)
        )
    }
}
