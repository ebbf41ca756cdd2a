use crate::error::OrchestratorError;
use crate::orchestrator::{OrchestratorCommand, OrchestratorEvent};
use opticlink_core::{ConnectionState, MetricsSnapshot, PeerRole};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Cloneable front end of a running [`Orchestrator`](super::Orchestrator).
#[derive(Clone)]
pub struct OrchestratorHandle {
    pub(super) role: PeerRole,
    pub(super) command_tx: mpsc::Sender<OrchestratorCommand>,
    pub(super) state_rx: watch::Receiver<ConnectionState>,
    pub(super) metrics_rx: watch::Receiver<MetricsSnapshot>,
    pub(super) events_tx: broadcast::Sender<OrchestratorEvent>,
}

impl OrchestratorHandle {
    pub fn role(&self) -> PeerRole {
        self.role
    }

    /// Producer only, from `SignalingOpen`: create the transport, attach the
    /// local video and send an offer to the consumer.
    pub async fn begin_offer(&self) -> Result<(), OrchestratorError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(OrchestratorCommand::BeginOffer { reply })
            .await
            .map_err(|_| OrchestratorError::Closed)?;
        rx.await.map_err(|_| OrchestratorError::Closed)?
    }

    /// From `Disconnected`: start over at `Idle` and rejoin the handshake.
    pub async fn restart(&self) -> Result<(), OrchestratorError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(OrchestratorCommand::Restart { reply })
            .await
            .map_err(|_| OrchestratorError::Closed)?;
        rx.await.map_err(|_| OrchestratorError::Closed)?
    }

    /// Tears everything down and ends the loop. Closing twice is a no-op.
    pub async fn close(&self) {
        let (reply, rx) = oneshot::channel();
        if self
            .command_tx
            .send(OrchestratorCommand::Close { reply })
            .await
            .is_ok()
        {
            let _ = rx.await;
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        *self.metrics_rx.borrow()
    }

    pub fn subscribe_metrics(&self) -> watch::Receiver<MetricsSnapshot> {
        self.metrics_rx.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.events_tx.subscribe()
    }
}
