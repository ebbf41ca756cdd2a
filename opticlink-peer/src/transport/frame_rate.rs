use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Counts decoded frames and turns the count into a rate on demand.
///
/// Each `sample` reports the rate since the previous `sample` (or since
/// creation), so reading it once per stats tick yields frames per second
/// over that tick.
#[derive(Debug)]
pub struct FrameRateMeter {
    frames: AtomicU64,
    last: Mutex<(Instant, u64)>,
}

impl Default for FrameRateMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRateMeter {
    pub fn new() -> Self {
        Self {
            frames: AtomicU64::new(0),
            last: Mutex::new((Instant::now(), 0)),
        }
    }

    pub fn record(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// `None` until some time has passed since the previous sample.
    pub async fn sample(&self) -> Option<f64> {
        let now = Instant::now();
        let total = self.total();
        let mut last = self.last.lock().await;

        let elapsed = now.duration_since(last.0).as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }
        let rate = (total - last.1) as f64 / elapsed;
        *last = (now, total);
        Some(rate)
    }
}
