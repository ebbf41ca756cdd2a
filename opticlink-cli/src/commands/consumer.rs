use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use opticlink_core::PeerRole;
use opticlink_core::utils::DEFAULT_SAMPLE_INTERVAL;
use opticlink_peer::{
    LoopbackCamera, Orchestrator, OrchestratorConfig, StatusPoller, VideoFrame,
    VirtualCameraToggle, WebRtcTransportFactory, spawn_frame_pump, spawn_restart_supervisor,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

use crate::commands::{PeerArgs, join_task};
use crate::output::{camera_line, spawn_reporter};

const FRAME_SINK_BUFFER: usize = 64;

#[derive(Args, Debug)]
pub struct ConsumerArgs {
    #[command(flatten)]
    pub peer: PeerArgs,

    /// Name of the virtual camera device.
    #[arg(long, env = "OPTICLINK_CAMERA_NAME", default_value = "OpticLink Virtual Camera")]
    pub camera_name: String,

    /// Leave the virtual camera off until it is started by hand.
    #[arg(long)]
    pub no_auto_start: bool,

    /// Append received H.264 (Annex-B) to this file.
    #[arg(long, env = "OPTICLINK_RECORD")]
    pub record: Option<PathBuf>,
}

pub async fn run(args: ConsumerArgs) -> Result<()> {
    let camera = Arc::new(LoopbackCamera::new(args.camera_name.clone()));

    let (sink_tx, sink_rx) = mpsc::channel(FRAME_SINK_BUFFER);
    let factory = WebRtcTransportFactory::new(args.peer.transport()).with_frame_sink(sink_tx);
    let pump = spawn_frame_pump(sink_rx, camera.clone());

    let recorder = match &args.record {
        Some(path) => Some(spawn_recorder(path.clone(), camera.subscribe()).await?),
        None => None,
    };

    let config = OrchestratorConfig {
        auto_start_virtual_camera: !args.no_auto_start,
        negotiation_timeout: args.peer.negotiation_timeout(),
        bitrate_mode: args.peer.bitrate_mode(),
        ..OrchestratorConfig::consumer()
    };
    let (orchestrator, handle) = Orchestrator::connect(
        config,
        args.peer.signaling(PeerRole::Consumer),
        Arc::new(factory),
    );
    let task = orchestrator.with_virtual_camera(camera.clone()).spawn();
    let reporter = spawn_reporter(&handle);
    let supervisor = spawn_restart_supervisor(handle.clone(), args.peer.restart_delay());

    let poller = StatusPoller::spawn(camera.clone(), DEFAULT_SAMPLE_INTERVAL);
    let mut camera_status = poller.subscribe();
    // Started by the orchestrator on Live, so the backend is the authority.
    let mut toggle = VirtualCameraToggle::new(camera.clone());

    println!(
        "{} {}",
        "Waiting for the phone on".cyan(),
        args.peer.signaling_url
    );

    loop {
        tokio::select! {
            changed = camera_status.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = *camera_status.borrow_and_update();
                if toggle.reconcile(&status) {
                    println!("{}", camera_line(&status));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, closing");
                break;
            }
        }
    }

    handle.close().await;
    if let Err(e) = toggle.set(false).await {
        warn!("Failed to stop virtual camera: {:#}", e);
    }
    join_task("Orchestrator", task).await;
    join_task("Restart supervisor", supervisor).await;
    join_task("Reporter", reporter).await;
    pump.abort();
    if let Some(recorder) = recorder {
        recorder.abort();
    }
    Ok(())
}

async fn spawn_recorder(
    path: PathBuf,
    mut frames: broadcast::Receiver<VideoFrame>,
) -> Result<tokio::task::JoinHandle<()>> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    info!("Recording received video to {}", path.display());

    Ok(tokio::spawn(async move {
        loop {
            match frames.recv().await {
                Ok(frame) => {
                    if let Err(e) = file.write_all(&frame.data).await {
                        warn!("Recording stopped: {}", e);
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Recorder skipped {} frames", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        let _ = file.flush().await;
    }))
}
