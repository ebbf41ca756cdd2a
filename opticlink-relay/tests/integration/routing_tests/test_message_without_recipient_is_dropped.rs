use opticlink_core::PeerRole;
use serde_json::json;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::{RECV_TIMEOUT_MS, SILENCE_MS, TestPeer, wait_for_holder};

#[tokio::test]
async fn test_message_without_recipient_is_dropped() {
    init_tracing();

    let relay = spawn_relay().await;
    let url = relay.url();

    let mut producer = TestPeer::join(&url, "producer").await.expect("producer join");
    wait_for_holder(&relay.service, PeerRole::Producer, None)
        .await
        .expect("producer registered");

    // No consumer yet: dropped without any error frame to the sender.
    producer
        .send_json(json!({"type": "offer", "sdp": "early", "target": "consumer"}))
        .await
        .expect("send");
    assert!(producer.expect_silence(SILENCE_MS).await);

    let mut consumer = TestPeer::join(&url, "consumer").await.expect("consumer join");
    wait_for_holder(&relay.service, PeerRole::Consumer, None)
        .await
        .expect("consumer registered");

    producer
        .send_json(json!({"type": "offer", "sdp": "late", "target": "consumer"}))
        .await
        .expect("send");

    // Only the offer sent after the consumer arrived is delivered.
    let offer = consumer.recv_json(RECV_TIMEOUT_MS).await.expect("offer");
    assert_eq!(offer["sdp"], "late");
    assert!(consumer.expect_silence(SILENCE_MS).await);

    relay.shutdown();
}
