use crate::orchestrator::{Orchestrator, OrchestratorEvent};
use crate::transport::TransportEvent;
use opticlink_core::{ConnectionState, SignalingMessage};
use tracing::{debug, info, warn};

impl Orchestrator {
    pub(super) async fn handle_transport_event(&mut self, event: TransportEvent) {
        let current = self.transport.as_ref().map(|active| active.generation);
        if current != Some(event.generation()) {
            debug!(
                "[{}] Ignoring event from stale transport {}",
                self.role(),
                event.generation()
            );
            return;
        }

        match event {
            TransportEvent::CandidateGenerated(_, candidate) => {
                // Pushed as discovered, before or after Live.
                self.signaling
                    .send(SignalingMessage::ice_candidate(candidate, self.role().opposite()))
                    .await;
            }

            TransportEvent::Connected(generation) => {
                info!("[{}] Media path of transport {} is up", self.role(), generation);
            }

            TransportEvent::ConnectionLost(generation) => {
                warn!("[{}] Transport {} lost", self.role(), generation);
                self.teardown_transport().await;
                self.set_state(ConnectionState::Disconnected).await;
            }
        }
    }

    pub(super) async fn negotiation_timed_out(&mut self) {
        if self.state != ConnectionState::Negotiating {
            self.negotiation_deadline = None;
            return;
        }

        warn!("[{}] No answer in time, giving up on this handshake", self.role());
        self.teardown_transport().await;
        self.set_state(ConnectionState::Disconnected).await;
        self.emit(OrchestratorEvent::NegotiationTimedOut);
    }
}
