use opticlink_core::PeerRole;
use opticlink_core::utils::{DEFAULT_RECONNECT_DELAY, DEFAULT_SAMPLE_INTERVAL, default_signaling_url};
use std::time::Duration;

/// Where and as whom a peer connects to the relay.
#[derive(Debug, Clone)]
pub struct SignalingConfig {
    pub url: String,
    pub role: PeerRole,
    /// Fixed pause between reconnect attempts. Never grows.
    pub reconnect_delay: Duration,
}

impl SignalingConfig {
    pub fn new(role: PeerRole) -> Self {
        Self {
            url: default_signaling_url(),
            role,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self::new(PeerRole::Consumer)
    }
}

/// How the bitrate figure is derived from the received-bytes counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BitrateMode {
    /// `bytes_received_total * 8 / 1000`: kilobits received so far, as the
    /// desktop status bar has always shown it.
    #[default]
    Cumulative,
    /// Kilobits per second over the last sampling interval.
    Windowed,
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub role: PeerRole,
    /// Producer only: send an offer as soon as signaling opens.
    pub auto_offer: bool,
    /// Consumer only: start the virtual camera when the session goes live.
    pub auto_start_virtual_camera: bool,
    /// Give up on a handshake stuck in `Negotiating` after this long.
    pub negotiation_timeout: Option<Duration>,
    pub stats_interval: Duration,
    pub bitrate_mode: BitrateMode,
}

impl OrchestratorConfig {
    pub fn new(role: PeerRole) -> Self {
        Self {
            role,
            auto_offer: false,
            auto_start_virtual_camera: false,
            negotiation_timeout: None,
            stats_interval: DEFAULT_SAMPLE_INTERVAL,
            bitrate_mode: BitrateMode::default(),
        }
    }

    pub fn producer() -> Self {
        Self::new(PeerRole::Producer)
    }

    pub fn consumer() -> Self {
        Self::new(PeerRole::Consumer)
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::consumer()
    }
}
