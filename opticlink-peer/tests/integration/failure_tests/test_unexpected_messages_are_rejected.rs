use opticlink_core::{ConnectionState, PeerRole, SignalingMessage};
use opticlink_peer::{OrchestratorConfig, OrchestratorEvent};

use crate::integration::{init_tracing, manual_producer};
use crate::utils::PeerHarness;

async fn expect_rejected(peer: &mut PeerHarness, message: SignalingMessage) -> String {
    peer.deliver(message).await;
    match peer
        .wait_for_event(|e| matches!(e, OrchestratorEvent::MessageRejected(_)))
        .await
        .expect("rejection reported")
    {
        OrchestratorEvent::MessageRejected(reason) => reason,
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_consumer_rejects_answers_and_foreign_frames() {
    init_tracing();

    let mut consumer = PeerHarness::spawn(OrchestratorConfig::consumer());
    consumer.open_signaling().await.expect("signaling open");

    let reason = expect_rejected(
        &mut consumer,
        SignalingMessage::Answer {
            sdp: "a".into(),
            target: PeerRole::Consumer,
        },
    )
    .await;
    assert!(reason.contains("answer"), "{reason}");

    expect_rejected(
        &mut consumer,
        SignalingMessage::Offer {
            sdp: "o".into(),
            target: PeerRole::Producer,
        },
    )
    .await;

    expect_rejected(&mut consumer, SignalingMessage::Join { role: PeerRole::Producer }).await;

    assert_eq!(consumer.handle.state(), ConnectionState::SignalingOpen);
    assert_eq!(consumer.factory.created_count().await, 0);

    consumer.handle.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_producer_rejects_offers_and_stray_answers() {
    init_tracing();

    let mut producer = PeerHarness::spawn(manual_producer());
    producer.open_signaling().await.expect("signaling open");

    // No offer outstanding yet.
    expect_rejected(
        &mut producer,
        SignalingMessage::Answer {
            sdp: "a".into(),
            target: PeerRole::Producer,
        },
    )
    .await;

    expect_rejected(
        &mut producer,
        SignalingMessage::Offer {
            sdp: "o".into(),
            target: PeerRole::Producer,
        },
    )
    .await;

    assert_eq!(producer.handle.state(), ConnectionState::SignalingOpen);
    assert_eq!(producer.factory.created_count().await, 0);

    producer.handle.close().await;
}
