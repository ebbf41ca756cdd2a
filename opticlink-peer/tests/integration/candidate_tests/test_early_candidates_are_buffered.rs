use opticlink_core::{ConnectionState, PeerRole, SessionDescription, SignalingMessage};
use opticlink_peer::{OrchestratorConfig, OrchestratorEvent};

use crate::integration::{init_tracing, manual_producer};
use crate::utils::{PeerHarness, TransportCall};

#[tokio::test(start_paused = true)]
async fn test_candidates_before_offer_apply_after_it() {
    init_tracing();

    let mut consumer = PeerHarness::spawn(OrchestratorConfig::consumer());
    consumer.open_signaling().await.expect("signaling open");

    consumer.deliver_candidate("c1", PeerRole::Consumer).await;
    consumer.deliver_candidate("c2", PeerRole::Consumer).await;
    consumer
        .deliver(SignalingMessage::Offer {
            sdp: "offer".into(),
            target: PeerRole::Consumer,
        })
        .await;
    consumer.wait_for_state(ConnectionState::Live).await.expect("live");

    consumer.deliver_candidate("c3", PeerRole::Consumer).await;
    // Candidates are applied in the loop; a rejection would surface as an
    // event, so wait for the third one to land instead.
    let transport = consumer.factory.latest().await.expect("transport");
    tokio::time::timeout(std::time::Duration::from_secs(5), async {
        while transport.applied_candidates().await.len() < 3 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("third candidate applied");

    let calls = transport.calls().await;
    assert_eq!(
        calls[0],
        TransportCall::SetRemoteDescription(SessionDescription::offer("offer"))
    );
    assert_eq!(
        transport.applied_candidates().await,
        vec!["c1".to_string(), "c2".to_string(), "c3".to_string()]
    );

    // Buffered candidates go in before the answer is created.
    let answer_at = calls
        .iter()
        .position(|c| *c == TransportCall::CreateAnswer)
        .expect("answer created");
    assert_eq!(answer_at, 3);

    consumer.handle.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_candidates_during_negotiation_wait_for_answer() {
    init_tracing();

    let mut producer = PeerHarness::spawn(manual_producer());
    producer.open_signaling().await.expect("signaling open");
    producer.handle.begin_offer().await.expect("offer");

    producer.deliver_candidate("early", PeerRole::Producer).await;
    producer
        .deliver(SignalingMessage::Answer {
            sdp: "answer".into(),
            target: PeerRole::Producer,
        })
        .await;
    producer.wait_for_state(ConnectionState::Live).await.expect("live");

    let transport = producer.factory.latest().await.expect("transport");
    let calls = transport.calls().await;
    let answer_at = calls
        .iter()
        .position(|c| matches!(c, TransportCall::SetRemoteDescription(_)))
        .expect("answer applied");
    let candidate_at = calls
        .iter()
        .position(|c| matches!(c, TransportCall::AddIceCandidate(_)))
        .expect("candidate applied");
    assert!(answer_at < candidate_at);

    assert!(
        producer
            .wait_for_event(|e| matches!(e, OrchestratorEvent::MessageRejected(_)))
            .await
            .is_err(),
        "nothing was rejected"
    );

    producer.handle.close().await;
}
