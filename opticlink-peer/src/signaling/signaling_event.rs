use opticlink_core::SignalingMessage;

/// What the signaling channel reports to its owner, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingEvent {
    /// A connection attempt is starting.
    Connecting,
    /// The relay connection is open and `join` has been sent.
    Connected,
    /// The relay connection closed or could not be opened. A new attempt
    /// follows after the reconnect delay.
    Disconnected,
    Message(SignalingMessage),
}
