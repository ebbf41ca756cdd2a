use std::time::Duration;

/// Port the relay listens on for signaling WebSockets.
pub const DEFAULT_SIGNALING_PORT: u16 = 3001;

/// Port the phone web client is served from.
pub const DEFAULT_APP_PORT: u16 = 3000;

/// Path of the signaling WebSocket route.
pub const SIGNALING_PATH: &str = "/ws";

pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

/// Fixed delay between signaling reconnect attempts.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Stats sampling period and virtual camera status polling period.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(1000);

pub fn default_signaling_url() -> String {
    format!("ws://127.0.0.1:{}{}", DEFAULT_SIGNALING_PORT, SIGNALING_PATH)
}
