pub mod camera;
pub mod config;
pub mod error;
pub mod ice_buffer;
pub mod net;
pub mod orchestrator;
pub mod signaling;
pub mod stats;
pub mod transport;

pub use camera::{LoopbackCamera, StatusPoller, VirtualCamera, VirtualCameraToggle, spawn_frame_pump};
pub use config::{BitrateMode, OrchestratorConfig, SignalingConfig};
pub use error::OrchestratorError;
pub use ice_buffer::{IceCandidateBuffer, Push};
pub use net::{local_network_address, phone_client_url};
pub use orchestrator::{Orchestrator, OrchestratorEvent, OrchestratorHandle, spawn_restart_supervisor};
pub use signaling::{SignalingChannel, SignalingEvent, SignalingOutput};
pub use stats::{MetricsCalculator, StatsSampler};
pub use transport::{
    MediaTransport, TransportConfig, TransportEvent, TransportFactory, TransportStats, VideoFrame,
    WebRtcTransport, WebRtcTransportFactory,
};
