use opticlink_core::ConnectionState;
use opticlink_peer::OrchestratorError;

use crate::integration::{auto_producer, init_tracing};
use crate::utils::PeerHarness;

#[tokio::test(start_paused = true)]
async fn test_close_releases_everything() {
    init_tracing();

    let mut producer = PeerHarness::spawn(auto_producer());
    producer.open_signaling().await.expect("signaling open");
    producer
        .wait_for_state(ConnectionState::Negotiating)
        .await
        .expect("negotiating");

    producer.handle.close().await;

    assert_eq!(producer.handle.state(), ConnectionState::Closed);
    assert!(producer.signaling.is_closed());
    assert!(producer.factory.latest().await.expect("transport").is_closed().await);

    // The loop is gone; further calls report it instead of hanging.
    producer.handle.close().await;
    let err = producer.handle.begin_offer().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Closed));

    (&mut producer.task).await.expect("loop exits cleanly");
}

#[tokio::test(start_paused = true)]
async fn test_dropping_every_handle_closes() {
    init_tracing();

    let producer = PeerHarness::spawn(auto_producer());
    let signaling = producer.signaling.clone();
    let PeerHarness { handle, task, .. } = producer;

    drop(handle);
    task.await.expect("loop exits cleanly");
    assert!(signaling.is_closed());
}
