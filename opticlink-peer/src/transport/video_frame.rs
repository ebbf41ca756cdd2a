use bytes::Bytes;
use std::time::Duration;

/// One H.264 access unit in Annex-B form (start-code delimited NAL units).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub data: Bytes,
    /// How long the frame is shown.
    pub duration: Duration,
}

impl VideoFrame {
    pub fn new(data: impl Into<Bytes>, duration: Duration) -> Self {
        Self {
            data: data.into(),
            duration,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
