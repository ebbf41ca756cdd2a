use crate::error::OrchestratorError;
use crate::ice_buffer::Push;
use crate::orchestrator::{Orchestrator, OrchestratorEvent};
use crate::signaling::SignalingEvent;
use opticlink_core::{
    ConnectionState, IceCandidate, PeerRole, ProtocolError, SessionDescription, SignalingMessage,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

impl Orchestrator {
    pub(super) async fn handle_signal(&mut self, event: SignalingEvent) {
        match event {
            SignalingEvent::Connecting => self.on_signaling_connecting().await,
            SignalingEvent::Connected => self.on_signaling_connected().await,
            SignalingEvent::Disconnected => self.on_signaling_lost().await,
            SignalingEvent::Message(message) => {
                let kind = message.kind();
                if let Err(e) = self.handle_message(message).await {
                    warn!("[{}] Rejected '{}': {}", self.role(), kind, e);
                    self.emit(OrchestratorEvent::MessageRejected(e.to_string()));
                }
            }
        }
    }

    async fn on_signaling_connecting(&mut self) {
        match self.state {
            ConnectionState::Idle => self.set_state(ConnectionState::SignalingConnecting).await,
            ConnectionState::Disconnected => {
                self.set_state(ConnectionState::Idle).await;
                self.set_state(ConnectionState::SignalingConnecting).await;
            }
            ConnectionState::SignalingOpen | ConnectionState::Negotiating => {
                // The previous connection ended without a Disconnected event.
                self.teardown_transport().await;
                self.set_state(ConnectionState::SignalingConnecting).await;
            }
            ConnectionState::SignalingConnecting
            | ConnectionState::Live
            | ConnectionState::Closed => {}
        }
    }

    async fn on_signaling_connected(&mut self) {
        self.signaling_open = true;

        match self.state {
            ConnectionState::Idle | ConnectionState::SignalingConnecting => {
                self.set_state(ConnectionState::SignalingOpen).await;
                self.auto_offer().await;
            }
            ConnectionState::Disconnected => {
                self.set_state(ConnectionState::Idle).await;
                self.set_state(ConnectionState::SignalingOpen).await;
                self.auto_offer().await;
            }
            ConnectionState::Live => info!("[{}] Signaling back while live", self.role()),
            ConnectionState::SignalingOpen
            | ConnectionState::Negotiating
            | ConnectionState::Closed => {}
        }
    }

    async fn on_signaling_lost(&mut self) {
        self.signaling_open = false;

        match self.state {
            ConnectionState::SignalingOpen | ConnectionState::Negotiating => {
                info!("[{}] Signaling lost mid-handshake, starting over", self.role());
                self.teardown_transport().await;
                self.set_state(ConnectionState::SignalingConnecting).await;
            }
            // The media path does not depend on the relay.
            ConnectionState::Live => info!("[{}] Signaling lost, media stays up", self.role()),
            ConnectionState::Idle
            | ConnectionState::SignalingConnecting
            | ConnectionState::Disconnected
            | ConnectionState::Closed => {}
        }
    }

    pub(super) async fn auto_offer(&mut self) {
        if self.role() != PeerRole::Producer || !self.config.auto_offer {
            return;
        }
        if let Err(e) = self.begin_offer().await {
            warn!("Automatic offer failed: {}", e);
        }
    }

    /// `Err` means the message was refused and nothing changed.
    async fn handle_message(&mut self, message: SignalingMessage) -> Result<(), OrchestratorError> {
        if let Some(target) = message.target() {
            if target != self.role() {
                return Err(ProtocolError::WrongTarget {
                    kind: message.kind().to_owned(),
                    target,
                }
                .into());
            }
        }

        match message {
            SignalingMessage::Offer { sdp, .. } => {
                if self.role() != PeerRole::Consumer {
                    return Err(self.unexpected("offer"));
                }
                self.handle_remote_offer(sdp).await
            }
            SignalingMessage::Answer { sdp, .. } => self.handle_answer(sdp).await,
            SignalingMessage::IceCandidate {
                candidate,
                sdp_mid,
                sdp_m_line_index,
                ..
            } => {
                self.handle_remote_candidate(IceCandidate {
                    candidate,
                    sdp_mid,
                    sdp_m_line_index,
                })
                .await;
                Ok(())
            }
            SignalingMessage::Join { .. } => Err(self.unexpected("join")),
        }
    }

    fn unexpected(&self, kind: &str) -> OrchestratorError {
        ProtocolError::UnexpectedMessage {
            kind: kind.to_owned(),
            role: self.role(),
        }
        .into()
    }

    async fn handle_answer(&mut self, sdp: String) -> Result<(), OrchestratorError> {
        if self.role() != PeerRole::Producer
            || self.state != ConnectionState::Negotiating
            || !self.awaiting_answer
        {
            return Err(OrchestratorError::UnexpectedAnswer);
        }
        let Some(active) = self.transport.as_ref() else {
            return Err(OrchestratorError::UnexpectedAnswer);
        };
        let transport = Arc::clone(&active.transport);

        transport
            .set_remote_description(SessionDescription::answer(sdp))
            .await
            .map_err(OrchestratorError::RejectedDescription)?;
        self.awaiting_answer = false;

        self.apply_buffered_candidates().await;
        self.set_state(ConnectionState::Live).await;
        Ok(())
    }

    async fn handle_remote_candidate(&mut self, candidate: IceCandidate) {
        match self.candidates.push(candidate) {
            Push::Queued => debug!(
                "[{}] Remote candidate buffered ({} pending)",
                self.role(),
                self.candidates.len()
            ),
            Push::Apply(candidate) => self.apply_candidate(candidate).await,
        }
    }

    /// Call right after a remote description was applied.
    pub(super) async fn apply_buffered_candidates(&mut self) {
        let buffered = self.candidates.drain_after_remote_description_applied();
        if !buffered.is_empty() {
            debug!("[{}] Applying {} buffered candidates", self.role(), buffered.len());
        }
        for candidate in buffered {
            self.apply_candidate(candidate).await;
        }
    }

    async fn apply_candidate(&mut self, candidate: IceCandidate) {
        let Some(active) = self.transport.as_ref() else {
            warn!("[{}] No transport for remote candidate", self.role());
            return;
        };

        if let Err(e) = active.transport.add_ice_candidate(candidate).await {
            warn!("[{}] Remote candidate rejected: {:#}", self.role(), e);
            self.emit(OrchestratorEvent::MessageRejected(format!(
                "ice-candidate: {:#}",
                e
            )));
        }
    }
}
