use opticlink_core::utils::DEFAULT_STUN_ADDR;

/// WebRTC settings (STUN/TURN).
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub ice_servers: Vec<String>,
}

impl TransportConfig {
    /// No STUN: only host candidates are gathered.
    pub fn local_only() -> Self {
        Self {
            ice_servers: Vec::new(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![DEFAULT_STUN_ADDR.to_owned()],
        }
    }
}
