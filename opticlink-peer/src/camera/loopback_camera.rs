use crate::camera::VirtualCamera;
use crate::transport::VideoFrame;
use anyhow::Result;
use async_trait::async_trait;
use opticlink_core::VirtualCameraStatus;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::info;

pub const DEFAULT_DEVICE_NAME: &str = "OpticLink Virtual Camera";

const OUTPUT_BUFFER: usize = 64;

/// An in-process virtual camera: while active, accepted frames are counted
/// and republished to subscribers (a recorder, a preview, an OS bridge).
pub struct LoopbackCamera {
    name: String,
    active: AtomicBool,
    frames: AtomicU64,
    output: broadcast::Sender<VideoFrame>,
}

impl Default for LoopbackCamera {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_NAME)
    }
}

impl LoopbackCamera {
    pub fn new(name: impl Into<String>) -> Self {
        let (output, _) = broadcast::channel(OUTPUT_BUFFER);
        Self {
            name: name.into(),
            active: AtomicBool::new(false),
            frames: AtomicU64::new(0),
            output,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VideoFrame> {
        self.output.subscribe()
    }
}

#[async_trait]
impl VirtualCamera for LoopbackCamera {
    async fn start(&self) -> Result<()> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.frames.store(0, Ordering::SeqCst);
        info!("Virtual camera '{}' started", self.name);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        if self.active.swap(false, Ordering::SeqCst) {
            info!(
                "Virtual camera '{}' stopped after {} frames",
                self.name,
                self.frames.load(Ordering::SeqCst)
            );
        }
        Ok(())
    }

    async fn status(&self) -> Result<VirtualCameraStatus> {
        Ok(VirtualCameraStatus {
            active: self.active.load(Ordering::SeqCst),
            frames: self.frames.load(Ordering::SeqCst),
        })
    }

    fn submit_frame(&self, frame: VideoFrame) -> bool {
        if !self.active.load(Ordering::SeqCst) {
            return false;
        }
        self.frames.fetch_add(1, Ordering::SeqCst);
        let _ = self.output.send(frame);
        true
    }
}
