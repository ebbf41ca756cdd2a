use opticlink_core::ConnectionState;

/// Notifications for the presentation layer and the virtual camera bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorEvent {
    StateChanged {
        from: ConnectionState,
        to: ConnectionState,
    },

    /// Consumer only: the session is live and received video is flowing to
    /// the frame sink.
    VirtualCameraReady,

    /// The attempt ended in `Disconnected` because the local transport could
    /// not be set up.
    SetupFailed(String),

    /// A signaling message was refused; state is unchanged.
    MessageRejected(String),

    /// `Negotiating` lasted longer than the configured limit.
    NegotiationTimedOut,
}
