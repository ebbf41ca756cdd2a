use colored::*;
use opticlink_core::{ConnectionState, LinkStatus, MetricsSnapshot, VirtualCameraStatus};
use opticlink_peer::{OrchestratorEvent, OrchestratorHandle};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

pub fn status_line(state: ConnectionState) -> ColoredString {
    let label = state.status().label();
    match state.status() {
        LinkStatus::Live => label.green().bold(),
        LinkStatus::Connected => label.cyan(),
        LinkStatus::Connecting => label.yellow(),
        LinkStatus::Disconnected => label.red(),
    }
}

pub fn metrics_line(m: &MetricsSnapshot) -> String {
    format!(
        "{} {:>4} ms  {:>7} kbps  {:>9}  {:>3} fps",
        "●".green(),
        m.latency_ms,
        m.bitrate_kbps,
        m.resolution.to_string(),
        m.fps
    )
}

pub fn camera_line(status: &VirtualCameraStatus) -> String {
    if status.active {
        format!("{} ({} frames)", "Virtual camera on".green(), status.frames)
    } else {
        format!("{}", "Virtual camera off".dimmed())
    }
}

/// Prints state changes, notable events and each metrics sample until the
/// orchestrator closes.
pub fn spawn_reporter(handle: &OrchestratorHandle) -> JoinHandle<()> {
    let mut states = handle.subscribe_state();
    let mut metrics = handle.subscribe_metrics();
    let mut events = handle.subscribe_events();
    let role = handle.role();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = *states.borrow_and_update();
                    println!("[{}] {} ({})", role, status_line(state), state);
                    if state.is_terminal() {
                        break;
                    }
                }

                changed = metrics.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = *metrics.borrow_and_update();
                    if snapshot.state == ConnectionState::Live {
                        println!("{}", metrics_line(&snapshot));
                    }
                }

                event = events.recv() => match event {
                    Ok(OrchestratorEvent::SetupFailed(reason)) => {
                        println!("{} {}", "Setup failed:".red().bold(), reason);
                    }
                    Ok(OrchestratorEvent::NegotiationTimedOut) => {
                        println!("{}", "Negotiation timed out".red());
                    }
                    Ok(OrchestratorEvent::VirtualCameraReady) => {
                        println!("{}", "Video is flowing".green());
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    })
}
