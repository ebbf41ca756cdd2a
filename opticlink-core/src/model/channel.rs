use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of one WebSocket connection at the relay.
///
/// Roles are reassigned between connections, so the relay needs a stable
/// handle to tell "the channel currently holding a role" from "a channel
/// that used to hold it".
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
pub struct ChannelId(pub Uuid);

impl ChannelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
