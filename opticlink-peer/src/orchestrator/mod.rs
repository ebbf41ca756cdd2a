mod begin_offer_impl;
mod handle_remote_offer_impl;
mod handle_signal_impl;
mod orchestrator_command;
mod orchestrator_event;
mod orchestrator_handle;
mod restart_supervisor;
mod teardown_impl;
mod transport_event_impl;

pub use orchestrator_command::OrchestratorCommand;
pub use orchestrator_event::OrchestratorEvent;
pub use orchestrator_handle::OrchestratorHandle;
pub use restart_supervisor::spawn_restart_supervisor;

use crate::camera::VirtualCamera;
use crate::config::{OrchestratorConfig, SignalingConfig};
use crate::ice_buffer::IceCandidateBuffer;
use crate::signaling::{SignalingChannel, SignalingEvent, SignalingOutput};
use crate::stats::StatsSampler;
use crate::transport::{MediaTransport, TransportEvent, TransportFactory};
use opticlink_core::{ConnectionState, MetricsSnapshot, PeerRole};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

const COMMAND_BUFFER: usize = 32;
const TRANSPORT_EVENT_BUFFER: usize = 256;
const EVENT_BUFFER: usize = 64;

/// The transport of the current handshake, tagged with the generation its
/// events carry.
struct ActiveTransport {
    generation: u64,
    transport: Arc<dyn MediaTransport>,
}

/// Per-peer handshake state machine.
///
/// One task owns all state and processes commands, signaling events,
/// transport events, stats ticks and the negotiation deadline strictly one
/// at a time. Nothing else mutates `state`.
pub struct Orchestrator {
    config: OrchestratorConfig,
    state: ConnectionState,
    signaling_open: bool,
    signaling_ended: bool,

    signaling: Arc<dyn SignalingOutput>,
    factory: Arc<dyn TransportFactory>,
    camera: Option<Arc<dyn VirtualCamera>>,
    camera_started: bool,

    transport: Option<ActiveTransport>,
    next_generation: u64,
    candidates: IceCandidateBuffer,
    awaiting_answer: bool,
    negotiation_deadline: Option<Instant>,
    sampler: StatsSampler,

    command_rx: mpsc::Receiver<OrchestratorCommand>,
    signal_rx: mpsc::Receiver<SignalingEvent>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    transport_tx: mpsc::Sender<TransportEvent>,

    state_tx: watch::Sender<ConnectionState>,
    metrics_tx: watch::Sender<MetricsSnapshot>,
    events_tx: broadcast::Sender<OrchestratorEvent>,
}

impl Orchestrator {
    pub fn new(
        config: OrchestratorConfig,
        signaling: Arc<dyn SignalingOutput>,
        signal_rx: mpsc::Receiver<SignalingEvent>,
        factory: Arc<dyn TransportFactory>,
    ) -> (Self, OrchestratorHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (transport_tx, transport_rx) = mpsc::channel(TRANSPORT_EVENT_BUFFER);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);
        let (metrics_tx, metrics_rx) =
            watch::channel(MetricsSnapshot::empty(ConnectionState::Idle));
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);

        let handle = OrchestratorHandle {
            role: config.role,
            command_tx,
            state_rx,
            metrics_rx,
            events_tx: events_tx.clone(),
        };

        let sampler = StatsSampler::new(config.stats_interval, config.bitrate_mode);

        let orchestrator = Self {
            config,
            state: ConnectionState::Idle,
            signaling_open: false,
            signaling_ended: false,
            signaling,
            factory,
            camera: None,
            camera_started: false,
            transport: None,
            next_generation: 0,
            candidates: IceCandidateBuffer::new(),
            awaiting_answer: false,
            negotiation_deadline: None,
            sampler,
            command_rx,
            signal_rx,
            transport_rx,
            transport_tx,
            state_tx,
            metrics_tx,
            events_tx,
        };

        (orchestrator, handle)
    }

    /// Opens a [`SignalingChannel`] for `signaling` and wires it in. The
    /// channel announces the orchestrator's role.
    pub fn connect(
        config: OrchestratorConfig,
        mut signaling: SignalingConfig,
        factory: Arc<dyn TransportFactory>,
    ) -> (Self, OrchestratorHandle) {
        signaling.role = config.role;
        let (channel, signal_rx) = SignalingChannel::open(signaling);
        Self::new(config, Arc::new(channel), signal_rx, factory)
    }

    /// Received video and the `Live` transition go to this camera.
    pub fn with_virtual_camera(mut self, camera: Arc<dyn VirtualCamera>) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    fn role(&self) -> PeerRole {
        self.config.role
    }

    /// Main event loop. Returns once closed.
    pub async fn run(mut self) {
        info!("{} orchestrator started", self.role());

        loop {
            let deadline = self.negotiation_deadline;

            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(OrchestratorCommand::Close { reply }) => {
                            self.shutdown().await;
                            let _ = reply.send(());
                            break;
                        }
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("All handles dropped, closing {} orchestrator", self.role());
                            self.shutdown().await;
                            break;
                        }
                    }
                }

                evt = self.signal_rx.recv(), if !self.signaling_ended => {
                    match evt {
                        Some(e) => self.handle_signal(e).await,
                        None => {
                            warn!("Signaling event stream ended");
                            self.signaling_ended = true;
                        }
                    }
                }

                evt = self.transport_rx.recv() => {
                    if let Some(e) = evt {
                        self.handle_transport_event(e).await;
                    }
                }

                _ = self.sampler.tick() => self.sample_metrics().await,

                _ = wait_until(deadline) => self.negotiation_timed_out().await,
            }
        }

        info!("{} orchestrator finished", self.role());
    }

    async fn handle_command(&mut self, cmd: OrchestratorCommand) {
        match cmd {
            OrchestratorCommand::BeginOffer { reply } => {
                let result = self.begin_offer().await;
                let _ = reply.send(result);
            }
            OrchestratorCommand::Restart { reply } => {
                let result = self.restart().await;
                let _ = reply.send(result);
            }
            OrchestratorCommand::Close { reply } => {
                self.shutdown().await;
                let _ = reply.send(());
            }
        }
    }

    /// The only place `state` changes. Runs the side effects of leaving and
    /// entering `Live` and publishes the new state.
    async fn set_state(&mut self, next: ConnectionState) {
        let previous = self.state;
        if previous == next {
            return;
        }
        info!("[{}] {} -> {}", self.role(), previous, next);

        if previous == ConnectionState::Live {
            self.leave_live().await;
        }

        self.state = next;
        self.negotiation_deadline = match (next, self.config.negotiation_timeout) {
            (ConnectionState::Negotiating, Some(limit)) => Some(Instant::now() + limit),
            _ => None,
        };

        self.state_tx.send_replace(next);
        self.metrics_tx.send_modify(|m| m.state = next);
        self.emit(OrchestratorEvent::StateChanged {
            from: previous,
            to: next,
        });

        if next == ConnectionState::Live {
            self.enter_live().await;
        }
    }

    fn emit(&self, event: OrchestratorEvent) {
        let _ = self.events_tx.send(event);
    }

    async fn sample_metrics(&mut self) {
        let Some(active) = self.transport.as_ref() else {
            self.sampler.stop();
            return;
        };
        let transport = Arc::clone(&active.transport);

        match self.sampler.sample(transport.as_ref()).await {
            Ok(snapshot) => {
                self.metrics_tx.send_replace(snapshot);
            }
            Err(e) => warn!("Transport stats unavailable: {:#}", e),
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
