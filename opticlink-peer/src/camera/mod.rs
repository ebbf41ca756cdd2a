mod loopback_camera;
mod status_poller;

pub use loopback_camera::LoopbackCamera;
pub use status_poller::{StatusPoller, VirtualCameraToggle};

use crate::transport::VideoFrame;
use anyhow::Result;
use async_trait::async_trait;
use opticlink_core::VirtualCameraStatus;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// The OS-level virtual camera device that received video is handed to.
///
/// The backend can be started and stopped by other parties too, so
/// `status` is the source of truth, not whatever a caller last requested.
#[async_trait]
pub trait VirtualCamera: Send + Sync {
    async fn start(&self) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    async fn status(&self) -> Result<VirtualCameraStatus>;

    /// Offers one received frame. Returns `false` when the camera is not
    /// active and the frame was discarded.
    fn submit_frame(&self, frame: VideoFrame) -> bool;
}

/// Moves frames from a transport's frame sink into `camera` until the
/// sending side goes away.
pub fn spawn_frame_pump(
    mut frames: mpsc::Receiver<VideoFrame>,
    camera: Arc<dyn VirtualCamera>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            camera.submit_frame(frame);
        }
        debug!("Frame pump stopped");
    })
}
