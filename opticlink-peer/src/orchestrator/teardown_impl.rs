use crate::orchestrator::{Orchestrator, OrchestratorEvent};
use opticlink_core::{ConnectionState, PeerRole};
use tracing::{debug, error, info, warn};

impl Orchestrator {
    pub(super) async fn enter_live(&mut self) {
        self.sampler.start();

        if self.role() != PeerRole::Consumer {
            return;
        }
        self.emit(OrchestratorEvent::VirtualCameraReady);

        let Some(camera) = self.camera.clone() else {
            return;
        };
        if !self.config.auto_start_virtual_camera || self.camera_started {
            return;
        }
        match camera.start().await {
            Ok(()) => {
                info!("Virtual camera started for the live session");
                self.camera_started = true;
            }
            Err(e) => error!("Failed to start virtual camera: {:#}", e),
        }
    }

    pub(super) async fn leave_live(&mut self) {
        self.sampler.stop();

        if !self.camera_started {
            return;
        }
        self.camera_started = false;
        if let Some(camera) = self.camera.clone() {
            if let Err(e) = camera.stop().await {
                error!("Failed to stop virtual camera: {:#}", e);
            }
        }
    }

    /// Drops the current transport and everything tied to its handshake.
    pub(super) async fn teardown_transport(&mut self) {
        self.sampler.stop();
        self.candidates.reset();
        self.awaiting_answer = false;

        let Some(active) = self.transport.take() else {
            return;
        };
        debug!("[{}] Closing transport {}", self.role(), active.generation);
        if let Err(e) = active.transport.close().await {
            warn!(
                "[{}] Failed to close transport {}: {:#}",
                self.role(),
                active.generation,
                e
            );
        }
    }

    /// Transport setup failed: this attempt is over.
    pub(super) async fn fail_attempt(&mut self, step: &str, err: &anyhow::Error) {
        error!("[{}] {} failed: {:#}", self.role(), step, err);
        self.teardown_transport().await;
        self.set_state(ConnectionState::Disconnected).await;
        self.emit(OrchestratorEvent::SetupFailed(format!("{}: {:#}", step, err)));
    }

    /// Releases the sampler, the transport and the signaling channel, then
    /// enters `Closed`.
    pub(super) async fn shutdown(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        self.teardown_transport().await;
        self.signaling.close().await;
        self.signaling_open = false;
        self.set_state(ConnectionState::Closed).await;
    }
}
