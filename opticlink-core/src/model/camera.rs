use serde::{Deserialize, Serialize};

/// Authoritative state of the OS-level virtual camera backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualCameraStatus {
    pub active: bool,
    #[serde(default)]
    pub frames: u64,
}
