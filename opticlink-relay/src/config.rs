use opticlink_core::utils::DEFAULT_SIGNALING_PORT;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Relay listener configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    /// Directory with the phone web client, served next to `/ws` when set.
    pub static_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_SIGNALING_PORT)),
            static_dir: None,
        }
    }
}
