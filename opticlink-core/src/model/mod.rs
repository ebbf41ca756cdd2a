mod camera;
mod channel;
mod metrics;
mod role;
mod signaling;
mod state;

pub use camera::VirtualCameraStatus;
pub use channel::ChannelId;
pub use metrics::{MetricsSnapshot, Resolution};
pub use role::PeerRole;
pub use signaling::{IceCandidate, SdpKind, SessionDescription, SignalingMessage};
pub use state::{ConnectionState, LinkStatus};
