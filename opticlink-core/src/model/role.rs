use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// One side of a session. Exactly one of each participates at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerRole {
    /// Media source (the handheld camera).
    Producer,
    /// Media sink (the desktop host).
    Consumer,
}

impl PeerRole {
    pub fn opposite(self) -> Self {
        match self {
            PeerRole::Producer => PeerRole::Consumer,
            PeerRole::Consumer => PeerRole::Producer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PeerRole::Producer => "producer",
            PeerRole::Consumer => "consumer",
        }
    }
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeerRole {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "producer" => Ok(PeerRole::Producer),
            "consumer" => Ok(PeerRole::Consumer),
            other => Err(ProtocolError::UnknownRole(other.to_owned())),
        }
    }
}
