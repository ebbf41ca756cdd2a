use opticlink_core::IceCandidate;

/// Events a transport raises for the orchestrator loop. Each carries the
/// generation of the transport that raised it, so events from a transport
/// that has since been replaced can be told apart and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A local network path candidate was found; it goes to the other peer.
    CandidateGenerated(u64, IceCandidate),

    /// Media connectivity is established.
    Connected(u64),

    /// Media connectivity failed or was closed.
    ConnectionLost(u64),
}

impl TransportEvent {
    pub fn generation(&self) -> u64 {
        match self {
            TransportEvent::CandidateGenerated(generation, _)
            | TransportEvent::Connected(generation)
            | TransportEvent::ConnectionLost(generation) => *generation,
        }
    }
}
