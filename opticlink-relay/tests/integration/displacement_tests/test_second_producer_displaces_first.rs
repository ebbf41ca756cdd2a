use opticlink_core::PeerRole;
use opticlink_relay::DISPLACED_CLOSE_CODE;
use serde_json::json;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::{RECV_TIMEOUT_MS, SILENCE_MS, TestPeer, wait_for_holder};

#[tokio::test]
async fn test_second_producer_displaces_first() {
    init_tracing();

    let relay = spawn_relay().await;
    let url = relay.url();

    let mut consumer = TestPeer::join(&url, "consumer").await.expect("consumer join");
    wait_for_holder(&relay.service, PeerRole::Consumer, None)
        .await
        .expect("consumer registered");

    let mut old_producer = TestPeer::join(&url, "producer").await.expect("first producer");
    let old_id = wait_for_holder(&relay.service, PeerRole::Producer, None)
        .await
        .expect("first producer registered");

    let mut new_producer = TestPeer::join(&url, "producer").await.expect("second producer");
    let new_id = wait_for_holder(&relay.service, PeerRole::Producer, Some(old_id))
        .await
        .expect("second producer registered");
    assert_ne!(old_id, new_id);

    let code = old_producer
        .wait_for_close(RECV_TIMEOUT_MS)
        .await
        .expect("old producer closed");
    assert_eq!(code, Some(DISPLACED_CLOSE_CODE));

    // The consumer's channel is untouched by the displacement.
    consumer
        .send_json(json!({"type": "answer", "sdp": "A2", "target": "producer"}))
        .await
        .expect("consumer still connected");
    let answer = new_producer.recv_json(RECV_TIMEOUT_MS).await.expect("answer");
    assert_eq!(answer["sdp"], "A2");

    new_producer
        .send_json(json!({"type": "offer", "sdp": "O2", "target": "consumer"}))
        .await
        .expect("send");
    let offer = consumer.recv_json(RECV_TIMEOUT_MS).await.expect("offer");
    assert_eq!(offer["sdp"], "O2");

    // The old producer's late cleanup must not release the new registration.
    tokio::time::sleep(std::time::Duration::from_millis(SILENCE_MS)).await;
    assert_eq!(relay.service.holder(PeerRole::Producer), Some(new_id));
    assert_eq!(relay.service.registered_roles(), 2);

    relay.shutdown();
}
