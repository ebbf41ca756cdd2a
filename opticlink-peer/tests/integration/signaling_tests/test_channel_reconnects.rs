use opticlink_core::PeerRole;
use opticlink_peer::{SignalingChannel, SignalingConfig, SignalingEvent, SignalingOutput};
use std::time::{Duration, Instant};

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::{FAST_RECONNECT_MS, fast_signaling, wait_for_signal};

#[tokio::test]
async fn test_channel_reconnects_after_displacement() {
    init_tracing();

    let relay = spawn_relay().await;
    let url = relay.url();

    let (first, mut first_events) =
        SignalingChannel::open(fast_signaling(&url, PeerRole::Consumer));
    wait_for_signal(&mut first_events, |e| *e == SignalingEvent::Connected)
        .await
        .expect("first connected");

    // A second consumer takes the role; it is slow to come back so the two
    // do not keep displacing each other.
    let (second, mut second_events) = SignalingChannel::open(SignalingConfig {
        reconnect_delay: Duration::from_secs(60),
        ..fast_signaling(&url, PeerRole::Consumer)
    });
    wait_for_signal(&mut second_events, |e| *e == SignalingEvent::Connected)
        .await
        .expect("second connected");

    wait_for_signal(&mut first_events, |e| *e == SignalingEvent::Disconnected)
        .await
        .expect("first displaced");
    let displaced_at = Instant::now();

    wait_for_signal(&mut first_events, |e| *e == SignalingEvent::Connecting)
        .await
        .expect("first retries");
    assert!(displaced_at.elapsed() >= Duration::from_millis(FAST_RECONNECT_MS - 10));

    wait_for_signal(&mut first_events, |e| *e == SignalingEvent::Connected)
        .await
        .expect("first back");
    assert!(first.is_open().await);

    wait_for_signal(&mut second_events, |e| *e == SignalingEvent::Disconnected)
        .await
        .expect("second displaced in turn");
    assert!(!second.is_open().await);

    first.close().await;
    second.close().await;
    relay.shutdown();
}

#[tokio::test]
async fn test_close_stops_reconnecting() {
    init_tracing();

    let relay = spawn_relay().await;
    let (channel, mut events) =
        SignalingChannel::open(fast_signaling(&relay.url(), PeerRole::Producer));
    wait_for_signal(&mut events, |e| *e == SignalingEvent::Connected)
        .await
        .expect("connected");

    channel.close().await;
    assert!(!channel.is_open().await);

    // The loop is gone: the event stream ends without another attempt.
    let rest = tokio::time::timeout(Duration::from_secs(2), async {
        let mut seen = Vec::new();
        while let Some(event) = events.recv().await {
            seen.push(event);
        }
        seen
    })
    .await
    .expect("event stream ends");
    assert!(!rest.contains(&SignalingEvent::Connecting), "{rest:?}");

    relay.shutdown();
}
