use crate::error::OrchestratorError;
use crate::orchestrator::{ActiveTransport, Orchestrator};
use opticlink_core::{ConnectionState, PeerRole, SignalingMessage};
use tracing::info;

impl Orchestrator {
    pub(super) async fn begin_offer(&mut self) -> Result<(), OrchestratorError> {
        if self.role() != PeerRole::Producer {
            return Err(OrchestratorError::RoleMismatch {
                op: "begin_offer",
                role: self.role(),
            });
        }
        if self.state != ConnectionState::SignalingOpen {
            return Err(OrchestratorError::InvalidState {
                op: "begin_offer",
                state: self.state,
            });
        }

        // Anything queued belongs to an earlier handshake.
        self.candidates.reset();

        let active = match self.create_transport().await {
            Ok(active) => active,
            Err(e) => {
                self.fail_attempt("Creating the transport", &e).await;
                return Err(OrchestratorError::Transport(e));
            }
        };

        let sdp = match active.transport.create_offer().await {
            Ok(sdp) => sdp,
            Err(e) => {
                let _ = active.transport.close().await;
                self.fail_attempt("Creating the offer", &e).await;
                return Err(OrchestratorError::Transport(e));
            }
        };

        self.transport = Some(active);
        self.awaiting_answer = true;
        self.set_state(ConnectionState::Negotiating).await;

        info!("[{}] Sending offer", self.role());
        self.signaling
            .send(SignalingMessage::Offer {
                sdp,
                target: PeerRole::Consumer,
            })
            .await;
        Ok(())
    }

    pub(super) async fn restart(&mut self) -> Result<(), OrchestratorError> {
        if self.state != ConnectionState::Disconnected {
            return Err(OrchestratorError::InvalidState {
                op: "restart",
                state: self.state,
            });
        }

        self.set_state(ConnectionState::Idle).await;
        if self.signaling_open {
            self.set_state(ConnectionState::SignalingOpen).await;
            self.auto_offer().await;
        } else {
            self.set_state(ConnectionState::SignalingConnecting).await;
        }
        Ok(())
    }

    pub(super) async fn create_transport(&mut self) -> anyhow::Result<ActiveTransport> {
        self.next_generation += 1;
        let generation = self.next_generation;

        let transport = self
            .factory
            .create(self.role(), generation, self.transport_tx.clone())
            .await?;
        info!("[{}] Transport {} created", self.role(), generation);

        Ok(ActiveTransport {
            generation,
            transport,
        })
    }
}
