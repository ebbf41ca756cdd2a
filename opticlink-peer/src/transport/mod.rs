mod frame_rate;
mod transport_config;
mod transport_event;
mod video_frame;
mod webrtc_transport;

pub use frame_rate::FrameRateMeter;
pub use transport_config::TransportConfig;
pub use transport_event::TransportEvent;
pub use video_frame::VideoFrame;
pub use webrtc_transport::{WebRtcTransport, WebRtcTransportFactory};

use anyhow::Result;
use async_trait::async_trait;
use opticlink_core::{IceCandidate, PeerRole, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Counters read from a transport at one sampling tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransportStats {
    /// Total inbound video payload bytes since the transport was created.
    pub bytes_received: u64,
    /// Round-trip time of the active network path, in seconds.
    pub round_trip_time: Option<f64>,
    pub frames_per_second: Option<f64>,
    pub frame_width: Option<u32>,
    pub frame_height: Option<u32>,
}

/// One peer-to-peer media connection, as the orchestrator drives it.
///
/// Implementations report asynchronous happenings (local candidates,
/// connectivity changes) through the `TransportEvent` channel handed to
/// their factory, tagged with the generation they were created for.
#[async_trait]
pub trait MediaTransport: Send + Sync {
    /// Creates an offer and installs it as the local description.
    async fn create_offer(&self) -> Result<String>;

    /// Creates an answer to the installed remote offer and installs it as
    /// the local description.
    async fn create_answer(&self) -> Result<String>;

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn stats(&self) -> Result<TransportStats>;

    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait TransportFactory: Send + Sync {
    /// Builds a transport for `role`. Producers come out with their local
    /// media attached.
    async fn create(
        &self,
        role: PeerRole,
        generation: u64,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn MediaTransport>>;
}
