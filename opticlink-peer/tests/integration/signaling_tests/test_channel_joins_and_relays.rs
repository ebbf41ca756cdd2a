use opticlink_core::{PeerRole, SignalingMessage};
use opticlink_peer::{SignalingChannel, SignalingEvent, SignalingOutput};

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::{fast_signaling, next_signal, wait_for_signal};

#[tokio::test]
async fn test_channel_joins_and_relays() {
    init_tracing();

    let relay = spawn_relay().await;
    let url = relay.url();

    let (consumer, mut consumer_events) =
        SignalingChannel::open(fast_signaling(&url, PeerRole::Consumer));
    assert_eq!(
        next_signal(&mut consumer_events).await.expect("connecting"),
        SignalingEvent::Connecting
    );
    assert_eq!(
        next_signal(&mut consumer_events).await.expect("connected"),
        SignalingEvent::Connected
    );

    let (producer, mut producer_events) =
        SignalingChannel::open(fast_signaling(&url, PeerRole::Producer));
    wait_for_signal(&mut producer_events, |e| *e == SignalingEvent::Connected)
        .await
        .expect("producer connected");
    assert!(producer.is_open().await);

    // The join goes out before Connected, so the relay knows both roles by
    // the time the offer is routed.
    let offer = SignalingMessage::Offer {
        sdp: "v=0 offer".into(),
        target: PeerRole::Consumer,
    };
    producer.send(offer.clone()).await;

    let received = wait_for_signal(&mut consumer_events, |e| {
        matches!(e, SignalingEvent::Message(_))
    })
    .await
    .expect("offer relayed");
    assert_eq!(received, SignalingEvent::Message(offer));

    consumer
        .send(SignalingMessage::Answer {
            sdp: "v=0 answer".into(),
            target: PeerRole::Producer,
        })
        .await;
    let received = wait_for_signal(&mut producer_events, |e| {
        matches!(e, SignalingEvent::Message(_))
    })
    .await
    .expect("answer relayed");
    assert!(matches!(
        received,
        SignalingEvent::Message(SignalingMessage::Answer { ref sdp, .. }) if sdp == "v=0 answer"
    ));

    consumer.close().await;
    producer.close().await;
    relay.shutdown();
}

#[tokio::test]
async fn test_send_without_connection_is_dropped() {
    init_tracing();

    // Reserve a port and free it again so nothing listens there.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let url = format!("ws://{}/ws", addr);
    let (channel, mut events) = SignalingChannel::open(fast_signaling(&url, PeerRole::Producer));

    assert_eq!(
        next_signal(&mut events).await.expect("connecting"),
        SignalingEvent::Connecting
    );
    assert_eq!(
        next_signal(&mut events).await.expect("disconnected"),
        SignalingEvent::Disconnected
    );
    assert!(!channel.is_open().await);

    channel
        .send(SignalingMessage::Offer {
            sdp: "lost".into(),
            target: PeerRole::Consumer,
        })
        .await;

    // Keeps retrying at the fixed delay.
    assert_eq!(
        next_signal(&mut events).await.expect("retry"),
        SignalingEvent::Connecting
    );

    channel.close().await;
}
