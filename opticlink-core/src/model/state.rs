use serde::{Deserialize, Serialize};
use std::fmt;

/// Handshake progress of one orchestrator.
///
/// `Idle -> SignalingConnecting -> SignalingOpen -> Negotiating -> Live -> Disconnected`,
/// back to `Idle` on a new handshake. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionState {
    Idle,
    SignalingConnecting,
    SignalingOpen,
    Negotiating,
    Live,
    Disconnected,
    Closed,
}

impl ConnectionState {
    pub fn is_terminal(self) -> bool {
        self == ConnectionState::Closed
    }

    /// Handshake in flight or established; a transport exists.
    pub fn has_transport(self) -> bool {
        matches!(self, ConnectionState::Negotiating | ConnectionState::Live)
    }

    pub fn status(self) -> LinkStatus {
        match self {
            ConnectionState::Idle | ConnectionState::Disconnected | ConnectionState::Closed => {
                LinkStatus::Disconnected
            }
            ConnectionState::SignalingConnecting => LinkStatus::Connecting,
            ConnectionState::SignalingOpen | ConnectionState::Negotiating => LinkStatus::Connected,
            ConnectionState::Live => LinkStatus::Live,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Idle => "Idle",
            ConnectionState::SignalingConnecting => "SignalingConnecting",
            ConnectionState::SignalingOpen => "SignalingOpen",
            ConnectionState::Negotiating => "Negotiating",
            ConnectionState::Live => "Live",
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Closed => "Closed",
        };
        f.write_str(name)
    }
}

/// The coarse status shown by the desktop status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Disconnected,
    Connecting,
    Connected,
    Live,
}

impl LinkStatus {
    pub fn label(self) -> &'static str {
        match self {
            LinkStatus::Live => "Streaming",
            LinkStatus::Connected => "Connected (waiting for video)",
            LinkStatus::Connecting => "Connecting...",
            LinkStatus::Disconnected => "Disconnected",
        }
    }
}
