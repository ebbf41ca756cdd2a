use crate::error::OrchestratorError;
use crate::orchestrator::OrchestratorHandle;
use opticlink_core::ConnectionState;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Brings a peer back from `Disconnected` after `delay`.
///
/// The orchestrator never leaves `Disconnected` on its own while the relay
/// connection stays up, so a lost media path needs someone to call
/// [`OrchestratorHandle::restart`]. A producer with `auto_offer` then offers
/// again as soon as it is back in `SignalingOpen`. Ends when the
/// orchestrator closes. The task keeps a handle alive, so close the
/// orchestrator explicitly rather than by dropping handles.
pub fn spawn_restart_supervisor(handle: OrchestratorHandle, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut state_rx = handle.subscribe_state();

        loop {
            let state = *state_rx.borrow_and_update();
            match state {
                ConnectionState::Closed => break,
                ConnectionState::Disconnected => {
                    tokio::time::sleep(delay).await;
                    if handle.state() != ConnectionState::Disconnected {
                        continue;
                    }
                    info!("[{}] Restarting after lost connection", handle.role());
                    match handle.restart().await {
                        Ok(()) => {}
                        Err(OrchestratorError::Closed) => break,
                        // Someone else moved it on in the meantime.
                        Err(e) => debug!("[{}] Restart skipped: {}", handle.role(), e),
                    }
                    continue;
                }
                _ => {}
            }

            if state_rx.changed().await.is_err() {
                break;
            }
        }
        debug!("[{}] Restart supervisor stopped", handle.role());
    })
}

