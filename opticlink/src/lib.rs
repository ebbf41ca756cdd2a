pub use opticlink_core::{ConnectionState, MetricsSnapshot, PeerRole, SignalingMessage};

pub mod model {
    pub use opticlink_core::model::*;
}

pub mod utils {
    pub use opticlink_core::utils::*;
}

#[cfg(feature = "relay")]
pub mod relay {
    pub use opticlink_relay::*;
}

#[cfg(feature = "peer")]
pub mod peer {
    pub use opticlink_peer::*;
}
