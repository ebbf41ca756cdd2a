use opticlink_core::{ConnectionState, IceCandidate, PeerRole, SignalingMessage};
use opticlink_peer::TransportEvent;

use crate::integration::{init_tracing, manual_producer};
use crate::utils::PeerHarness;

#[tokio::test(start_paused = true)]
async fn test_local_candidates_are_forwarded() {
    init_tracing();

    let mut producer = PeerHarness::spawn(manual_producer());
    producer.open_signaling().await.expect("signaling open");
    producer.handle.begin_offer().await.expect("offer");
    producer.next_sent_of("offer").await.expect("offer sent");

    producer
        .factory
        .emit(TransportEvent::CandidateGenerated(
            1,
            IceCandidate {
                candidate: "candidate:1 1 udp 2122260223 192.168.1.20 50000 typ host".into(),
                sdp_mid: Some("0".into()),
                sdp_m_line_index: Some(0),
            },
        ))
        .await;

    let sent = producer.next_sent().await.expect("candidate sent");
    assert_eq!(
        sent,
        SignalingMessage::IceCandidate {
            candidate: "candidate:1 1 udp 2122260223 192.168.1.20 50000 typ host".into(),
            sdp_mid: Some("0".into()),
            sdp_m_line_index: Some(0),
            target: PeerRole::Consumer,
        }
    );

    producer.handle.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_events_from_replaced_transport_are_ignored() {
    init_tracing();

    let mut producer = PeerHarness::spawn(manual_producer());
    producer.open_signaling().await.expect("signaling open");
    producer.handle.begin_offer().await.expect("first offer");

    // Fail the first attempt, start over with a fresh transport.
    producer.factory.emit(TransportEvent::ConnectionLost(1)).await;
    producer
        .wait_for_state(ConnectionState::Disconnected)
        .await
        .expect("disconnected");
    producer.handle.restart().await.expect("restart");
    producer.handle.begin_offer().await.expect("second offer");
    assert_eq!(producer.factory.created_count().await, 2);

    // Late events from generation 1 must not touch the new attempt.
    producer.factory.emit(TransportEvent::ConnectionLost(1)).await;
    producer
        .factory
        .emit(TransportEvent::CandidateGenerated(1, IceCandidate::new("stale")))
        .await;
    producer
        .factory
        .emit(TransportEvent::CandidateGenerated(2, IceCandidate::new("fresh")))
        .await;

    let candidate = producer.next_sent_of("ice-candidate").await.expect("candidate");
    assert!(matches!(
        candidate,
        SignalingMessage::IceCandidate { ref candidate, .. } if candidate == "fresh"
    ));
    assert_eq!(producer.handle.state(), ConnectionState::Negotiating);

    producer.handle.close().await;
}
