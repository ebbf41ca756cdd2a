use async_trait::async_trait;
use opticlink_core::SignalingMessage;

/// Outbound half of a signaling channel, as the orchestrator sees it.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Sends `message` to the relay. Silently dropped when the channel is
    /// not open; nothing is queued across reconnects.
    async fn send(&self, message: SignalingMessage);

    /// Stops the channel for good, including pending reconnects.
    async fn close(&self);
}
