pub mod address;
pub mod consumer;
pub mod producer;
pub mod relay;

use clap::Args;
use opticlink_core::PeerRole;
use opticlink_core::utils::DEFAULT_RECONNECT_DELAY;
use opticlink_peer::{BitrateMode, SignalingConfig, TransportConfig};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

pub use address::AddressArgs;
pub use consumer::ConsumerArgs;
pub use producer::ProducerArgs;
pub use relay::RelayArgs;

/// Relay and WebRTC options shared by both peer commands.
#[derive(Args, Debug, Clone)]
pub struct PeerArgs {
    /// Signaling relay WebSocket URL.
    #[arg(long, env = "OPTICLINK_SIGNALING_URL", default_value = "ws://127.0.0.1:3001/ws")]
    pub signaling_url: String,

    /// Pause between relay reconnect attempts, in milliseconds.
    #[arg(long, env = "OPTICLINK_RECONNECT_MS", default_value_t = DEFAULT_RECONNECT_DELAY.as_millis() as u64)]
    pub reconnect_ms: u64,

    /// STUN/TURN server URL. Repeatable.
    #[arg(long = "ice-server", env = "OPTICLINK_ICE_SERVERS", value_delimiter = ',')]
    pub ice_servers: Vec<String>,

    /// Gather host candidates only.
    #[arg(long, conflicts_with = "ice_servers")]
    pub local_only: bool,

    /// Abandon a handshake stuck negotiating after this many seconds.
    #[arg(long, env = "OPTICLINK_NEGOTIATION_TIMEOUT")]
    pub negotiation_timeout: Option<u64>,

    /// Report bitrate per sampling interval instead of the running total.
    #[arg(long)]
    pub windowed_bitrate: bool,
}

impl PeerArgs {
    pub fn signaling(&self, role: PeerRole) -> SignalingConfig {
        SignalingConfig {
            url: self.signaling_url.clone(),
            role,
            reconnect_delay: Duration::from_millis(self.reconnect_ms),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        if self.local_only {
            TransportConfig::local_only()
        } else if self.ice_servers.is_empty() {
            TransportConfig::default()
        } else {
            TransportConfig {
                ice_servers: self.ice_servers.clone(),
            }
        }
    }

    /// Pause before a peer stuck in `Disconnected` starts over. Reuses the
    /// relay reconnect delay.
    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_ms)
    }

    pub fn negotiation_timeout(&self) -> Option<Duration> {
        self.negotiation_timeout.map(Duration::from_secs)
    }

    pub fn bitrate_mode(&self) -> BitrateMode {
        if self.windowed_bitrate {
            BitrateMode::Windowed
        } else {
            BitrateMode::Cumulative
        }
    }
}

/// Waits for a background task, logging rather than dropping a panic.
pub async fn join_task(name: &str, task: JoinHandle<()>) {
    if let Err(e) = task.await {
        warn!("{} task failed: {}", name, e);
    }
}
