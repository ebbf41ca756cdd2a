use crate::model::state::ConnectionState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Frame dimensions, rendered as `WxH`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<Resolution> for String {
    fn from(r: Resolution) -> Self {
        r.to_string()
    }
}

impl TryFrom<String> for Resolution {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let (w, h) = s
            .split_once('x')
            .ok_or_else(|| format!("resolution `{}` is not WxH", s))?;
        let width = w.parse().map_err(|_| format!("bad width in `{}`", s))?;
        let height = h.parse().map_err(|_| format!("bad height in `{}`", s))?;
        Ok(Self { width, height })
    }
}

/// Transport quality as of the latest sampling tick. Replaced, never
/// accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub latency_ms: u32,
    pub bitrate_kbps: u64,
    pub resolution: Resolution,
    pub fps: u32,
    pub state: ConnectionState,
}

impl MetricsSnapshot {
    /// A zeroed snapshot, published before the first sample.
    pub fn empty(state: ConnectionState) -> Self {
        Self {
            latency_ms: 0,
            bitrate_kbps: 0,
            resolution: Resolution::default(),
            fps: 0,
            state,
        }
    }
}
