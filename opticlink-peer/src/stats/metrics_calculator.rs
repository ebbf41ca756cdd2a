use crate::config::BitrateMode;
use crate::transport::TransportStats;
use opticlink_core::{ConnectionState, MetricsSnapshot, Resolution};
use tokio::time::Instant;

/// Turns raw transport counters into the numbers shown to the user.
///
/// Latency survives across samples: a sample without a usable round-trip
/// time keeps the previous figure instead of dropping to zero.
#[derive(Debug)]
pub struct MetricsCalculator {
    mode: BitrateMode,
    latency_ms: u32,
    window_start: (Instant, u64),
}

impl MetricsCalculator {
    pub fn new(mode: BitrateMode) -> Self {
        Self {
            mode,
            latency_ms: 0,
            window_start: (Instant::now(), 0),
        }
    }

    pub fn mode(&self) -> BitrateMode {
        self.mode
    }

    /// Starts over for a new live session.
    pub fn reset(&mut self) {
        self.latency_ms = 0;
        self.window_start = (Instant::now(), 0);
    }

    pub fn compute(&mut self, stats: &TransportStats, state: ConnectionState) -> MetricsSnapshot {
        if let Some(rtt) = stats.round_trip_time {
            let ms = (rtt * 1000.0).round();
            if ms.is_finite() && ms >= 1.0 {
                self.latency_ms = ms as u32;
            }
        }

        let bitrate_kbps = match self.mode {
            BitrateMode::Cumulative => kilobits(stats.bytes_received),
            BitrateMode::Windowed => self.windowed_kbps(stats.bytes_received),
        };

        let fps = stats
            .frames_per_second
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .map(|fps| fps.round() as u32)
            .unwrap_or(0);

        MetricsSnapshot {
            latency_ms: self.latency_ms,
            bitrate_kbps,
            resolution: Resolution::new(
                stats.frame_width.unwrap_or(0),
                stats.frame_height.unwrap_or(0),
            ),
            fps,
            state,
        }
    }

    fn windowed_kbps(&mut self, bytes_received: u64) -> u64 {
        let now = Instant::now();
        let (since, bytes_then) = self.window_start;
        self.window_start = (now, bytes_received);

        let elapsed = now.duration_since(since).as_secs_f64();
        if elapsed <= 0.0 {
            return 0;
        }
        let bits = bytes_received.saturating_sub(bytes_then) as f64 * 8.0;
        (bits / 1000.0 / elapsed).round() as u64
    }
}

/// `round(bytes * 8 / 1000)`.
fn kilobits(bytes: u64) -> u64 {
    (bytes.saturating_mul(8) + 500) / 1000
}
