use crate::camera::VirtualCamera;
use anyhow::Result;
use opticlink_core::VirtualCameraStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Polls the camera backend at a fixed rate and publishes what it reports.
pub struct StatusPoller {
    status_rx: watch::Receiver<VirtualCameraStatus>,
    task: JoinHandle<()>,
}

impl StatusPoller {
    pub fn spawn(camera: Arc<dyn VirtualCamera>, period: Duration) -> Self {
        let (status_tx, status_rx) = watch::channel(VirtualCameraStatus::default());

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                match camera.status().await {
                    Ok(status) => {
                        status_tx.send_if_modified(|current| {
                            let changed = *current != status;
                            *current = status;
                            changed
                        });
                    }
                    Err(e) => warn!("Virtual camera status unavailable: {:#}", e),
                }
            }
        });

        Self { status_rx, task }
    }

    pub fn status(&self) -> VirtualCameraStatus {
        *self.status_rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<VirtualCameraStatus> {
        self.status_rx.clone()
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The user-facing on/off switch for the virtual camera. The cached flag
/// follows the backend whenever a polled status disagrees with it.
pub struct VirtualCameraToggle {
    camera: Arc<dyn VirtualCamera>,
    enabled: bool,
}

impl VirtualCameraToggle {
    pub fn new(camera: Arc<dyn VirtualCamera>) -> Self {
        Self {
            camera,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn set(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            self.camera.start().await?;
        } else {
            self.camera.stop().await?;
        }
        self.enabled = enabled;
        Ok(())
    }

    /// Adopts the backend's view. Returns `true` if the cached flag changed.
    pub fn reconcile(&mut self, status: &VirtualCameraStatus) -> bool {
        if self.enabled == status.active {
            return false;
        }
        info!(
            "Virtual camera is {} outside this toggle, following the backend",
            if status.active { "running" } else { "stopped" }
        );
        self.enabled = status.active;
        true
    }
}
