use opticlink_core::PeerRole;
use serde_json::json;

use crate::integration::{init_tracing, spawn_relay};
use crate::utils::{SILENCE_MS, TestPeer, wait_for_holder, wait_for_vacancy};

#[tokio::test]
async fn test_disconnect_releases_role() {
    init_tracing();

    let relay = spawn_relay().await;
    let url = relay.url();

    let mut producer = TestPeer::join(&url, "producer").await.expect("producer join");
    let consumer = TestPeer::join(&url, "consumer").await.expect("consumer join");
    wait_for_holder(&relay.service, PeerRole::Producer, None)
        .await
        .expect("producer registered");
    wait_for_holder(&relay.service, PeerRole::Consumer, None)
        .await
        .expect("consumer registered");

    consumer.close().await.expect("close consumer");
    wait_for_vacancy(&relay.service, PeerRole::Consumer)
        .await
        .expect("consumer released");

    assert!(relay.service.session().is_none());
    // The relay does not close the remaining peer.
    assert!(relay.service.holder(PeerRole::Producer).is_some());
    producer
        .send_json(json!({"type": "offer", "sdp": "O1", "target": "consumer"}))
        .await
        .expect("producer still connected");
    assert!(producer.expect_silence(SILENCE_MS).await);

    relay.shutdown();
}
