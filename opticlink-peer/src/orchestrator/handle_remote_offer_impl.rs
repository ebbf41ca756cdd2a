use crate::error::OrchestratorError;
use crate::orchestrator::Orchestrator;
use opticlink_core::{ConnectionState, PeerRole, SessionDescription, SignalingMessage};
use std::sync::Arc;
use tracing::info;

impl Orchestrator {
    /// Consumer side of the handshake: apply the offer, answer it, go live.
    ///
    /// The offer is applied to a fresh transport before anything else is
    /// touched, so a malformed one leaves the current session running.
    pub(super) async fn handle_remote_offer(&mut self, sdp: String) -> Result<(), OrchestratorError> {
        let replacing = match self.state {
            ConnectionState::SignalingOpen | ConnectionState::Disconnected => false,
            ConnectionState::Negotiating | ConnectionState::Live => true,
            state => {
                return Err(OrchestratorError::InvalidState { op: "offer", state });
            }
        };

        let active = match self.create_transport().await {
            Ok(active) => active,
            Err(e) => {
                self.fail_attempt("Creating the transport", &e).await;
                return Ok(());
            }
        };

        if let Err(e) = active
            .transport
            .set_remote_description(SessionDescription::offer(sdp))
            .await
        {
            let _ = active.transport.close().await;
            return Err(OrchestratorError::RejectedDescription(e));
        }

        if replacing {
            info!("[{}] New offer replaces the current session", self.role());
            self.teardown_transport().await;
            self.set_state(ConnectionState::SignalingOpen).await;
        } else if self.state == ConnectionState::Disconnected {
            self.set_state(ConnectionState::Idle).await;
            self.set_state(ConnectionState::SignalingOpen).await;
        }

        let transport = Arc::clone(&active.transport);
        self.transport = Some(active);
        self.set_state(ConnectionState::Negotiating).await;
        self.apply_buffered_candidates().await;

        let answer = match transport.create_answer().await {
            Ok(answer) => answer,
            Err(e) => {
                self.fail_attempt("Creating the answer", &e).await;
                return Ok(());
            }
        };

        self.set_state(ConnectionState::Live).await;

        info!("[{}] Sending answer", self.role());
        self.signaling
            .send(SignalingMessage::Answer {
                sdp: answer,
                target: PeerRole::Producer,
            })
            .await;
        Ok(())
    }
}
