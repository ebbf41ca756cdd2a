use anyhow::Result;
use opticlink_core::{ChannelId, PeerRole};
use opticlink_relay::RelayService;

/// Timeout for the relay to process a join or a disconnect (ms).
pub const REGISTRY_TIMEOUT_MS: u64 = 2000;

/// Polls until `role` is held by a channel other than `previous`.
pub async fn wait_for_holder(
    service: &RelayService,
    role: PeerRole,
    previous: Option<ChannelId>,
) -> Result<ChannelId> {
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(REGISTRY_TIMEOUT_MS);

    loop {
        if let Some(id) = service.holder(role) {
            if Some(id) != previous {
                return Ok(id);
            }
        }
        if start.elapsed() > timeout {
            anyhow::bail!("Timeout waiting for a {} registration", role);
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}

/// Polls until nobody holds `role`.
pub async fn wait_for_vacancy(service: &RelayService, role: PeerRole) -> Result<()> {
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(REGISTRY_TIMEOUT_MS);

    while service.holder(role).is_some() {
        if start.elapsed() > timeout {
            anyhow::bail!("Timeout waiting for {} to be released", role);
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    Ok(())
}
