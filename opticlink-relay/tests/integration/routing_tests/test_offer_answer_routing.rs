use opticlink_core::PeerRole;
use serde_json::json;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::{RECV_TIMEOUT_MS, SILENCE_MS, TestPeer, wait_for_holder};

#[tokio::test]
async fn test_offer_answer_routing() {
    init_tracing();

    let relay = spawn_relay().await;
    let url = relay.url();

    let mut producer = TestPeer::join(&url, "producer").await.expect("producer join");
    wait_for_holder(&relay.service, PeerRole::Producer, None)
        .await
        .expect("producer registered");

    let mut consumer = TestPeer::join(&url, "consumer").await.expect("consumer join");
    wait_for_holder(&relay.service, PeerRole::Consumer, None)
        .await
        .expect("consumer registered");

    assert!(relay.service.session().is_some(), "both roles form a session");

    producer
        .send_json(json!({"type": "offer", "sdp": "O1", "target": "consumer"}))
        .await
        .expect("send offer");

    let offer = consumer.recv_json(RECV_TIMEOUT_MS).await.expect("offer forwarded");
    assert_eq!(offer, json!({"type": "offer", "sdp": "O1", "target": "consumer"}));
    assert!(
        producer.expect_silence(SILENCE_MS).await,
        "offer must not echo back to the producer"
    );

    consumer
        .send_json(json!({"type": "answer", "sdp": "A1", "target": "producer"}))
        .await
        .expect("send answer");

    let answer = producer.recv_json(RECV_TIMEOUT_MS).await.expect("answer forwarded");
    assert_eq!(answer, json!({"type": "answer", "sdp": "A1", "target": "producer"}));
    assert!(consumer.expect_silence(SILENCE_MS).await);

    relay.shutdown();
}
