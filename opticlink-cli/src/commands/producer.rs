use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use opticlink_core::PeerRole;
use opticlink_peer::{
    Orchestrator, OrchestratorConfig, VideoFrame, WebRtcTransportFactory, spawn_restart_supervisor,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use webrtc::media::io::h264_reader::H264Reader;

use crate::commands::{PeerArgs, join_task};
use crate::output::spawn_reporter;

const VIDEO_SOURCE_BUFFER: usize = 64;
const READER_CAPACITY: usize = 1_048_576;

#[derive(Args, Debug)]
pub struct ProducerArgs {
    #[command(flatten)]
    pub peer: PeerArgs,

    /// Annex-B H.264 file to stream.
    #[arg(long, env = "OPTICLINK_VIDEO")]
    pub video: PathBuf,

    /// Frames per second the file is paced at.
    #[arg(long, env = "OPTICLINK_FPS", default_value_t = 30)]
    pub fps: u32,

    /// Start over at the end of the file.
    #[arg(long = "loop")]
    pub looped: bool,
}

pub async fn run(args: ProducerArgs) -> Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }
    // Fail early on a missing file rather than inside the feeder task.
    File::open(&args.video).with_context(|| format!("Failed to open {}", args.video.display()))?;

    let (source_tx, _) = broadcast::channel(VIDEO_SOURCE_BUFFER);
    let factory = WebRtcTransportFactory::new(args.peer.transport()).with_video_source(source_tx.clone());

    let config = OrchestratorConfig {
        auto_offer: true,
        negotiation_timeout: args.peer.negotiation_timeout(),
        bitrate_mode: args.peer.bitrate_mode(),
        ..OrchestratorConfig::producer()
    };
    let (orchestrator, handle) = Orchestrator::connect(
        config,
        args.peer.signaling(PeerRole::Producer),
        Arc::new(factory),
    );
    let task = orchestrator.spawn();
    let reporter = spawn_reporter(&handle);
    // A lost media path leaves the relay up; re-offer from here.
    let supervisor = spawn_restart_supervisor(handle.clone(), args.peer.restart_delay());

    let frame_duration = Duration::from_secs(1) / args.fps;
    let feeder = spawn_feeder(args.video.clone(), frame_duration, args.looped, source_tx);

    println!(
        "{} {} {} {}",
        "Streaming".green().bold(),
        args.video.display(),
        "via".cyan(),
        args.peer.signaling_url
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Interrupted, closing");

    feeder.abort();
    handle.close().await;
    join_task("Orchestrator", task).await;
    join_task("Restart supervisor", supervisor).await;
    join_task("Reporter", reporter).await;
    Ok(())
}

/// Publishes one NAL unit per tick. Frames sent while no transport is
/// subscribed are simply not delivered.
fn spawn_feeder(
    path: PathBuf,
    frame_duration: Duration,
    looped: bool,
    source: broadcast::Sender<VideoFrame>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(frame_duration);

        loop {
            let mut reader = match open_reader(&path) {
                Ok(reader) => reader,
                Err(e) => {
                    warn!("{:#}", e);
                    return;
                }
            };

            let mut sent = 0u64;
            loop {
                let nal = match reader.next_nal() {
                    Ok(nal) => nal,
                    Err(e) => {
                        debug!("End of {} after {} units: {}", path.display(), sent, e);
                        break;
                    }
                };
                let _ = source.send(VideoFrame::new(nal.data.freeze(), frame_duration));
                sent += 1;
                ticker.tick().await;
            }

            if !looped {
                info!("Finished streaming {}", path.display());
                return;
            }
        }
    })
}

fn open_reader(path: &Path) -> Result<H264Reader<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(H264Reader::new(BufReader::new(file), READER_CAPACITY))
}
