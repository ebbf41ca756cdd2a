use crate::transport::{
    FrameRateMeter, MediaTransport, TransportConfig, TransportEvent, TransportFactory,
    TransportStats, VideoFrame,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use opticlink_core::{IceCandidate, PeerRole, SdpKind, SessionDescription};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_H264, MediaEngine};
use webrtc::ice::candidate::CandidatePairState;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::media::Sample;
use webrtc::media::io::sample_builder::SampleBuilder;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp::codecs::h264::H264Packet;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::stats::StatsReportType;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

/// How many packets the depacketizer waits for a missing one before
/// dropping the frame it belongs to.
const MAX_LATE_PACKETS: u16 = 512;

const VIDEO_CLOCK_RATE: u32 = 90_000;

/// A webrtc-rs peer connection carrying one H.264 video track from the
/// producer to the consumer.
pub struct WebRtcTransport {
    role: PeerRole,
    generation: u64,
    peer_connection: Arc<RTCPeerConnection>,
    frame_rate: Arc<FrameRateMeter>,
    feed_task: Option<JoinHandle<()>>,
}

impl WebRtcTransport {
    /// Builds the peer connection and wires its callbacks into `event_tx`.
    ///
    /// A producer gets an outbound H.264 track fed from `video_source`; a
    /// consumer depacketizes the inbound track into `frame_sink`.
    pub async fn new(
        role: PeerRole,
        generation: u64,
        config: &TransportConfig,
        video_source: Option<broadcast::Receiver<VideoFrame>>,
        frame_sink: Option<mpsc::Sender<VideoFrame>>,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        // No servers means host candidates only, which is enough on one LAN.
        let ice_servers = if config.ice_servers.is_empty() {
            Vec::new()
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers.clone(),
                credential: String::new(),
                username: String::new(),
            }]
        };
        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Transport {} ({}) connection state: {}", generation, role, s);
                    let event = match s {
                        RTCPeerConnectionState::Connected => TransportEvent::Connected(generation),
                        RTCPeerConnectionState::Failed
                        | RTCPeerConnectionState::Disconnected
                        | RTCPeerConnectionState::Closed => {
                            TransportEvent::ConnectionLost(generation)
                        }
                        _ => return,
                    };
                    let _ = tx.send(event).await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(generation, candidate))
                    .await;
            })
        }));

        let frame_rate = Arc::new(FrameRateMeter::new());

        let feed_task = match role {
            PeerRole::Producer => {
                let track = Arc::new(TrackLocalStaticSample::new(
                    RTCRtpCodecCapability {
                        mime_type: MIME_TYPE_H264.to_owned(),
                        clock_rate: VIDEO_CLOCK_RATE,
                        ..Default::default()
                    },
                    "video".to_owned(),
                    "opticlink".to_owned(),
                ));

                let rtp_sender = peer_connection
                    .add_track(Arc::clone(&track) as Arc<dyn TrackLocal + Send + Sync>)
                    .await
                    .context("Failed to attach the video track")?;

                // RTCP has to be read for the interceptors (NACK, reports) to run.
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 1500];
                    while rtp_sender.read(&mut buf).await.is_ok() {}
                });

                video_source.map(|source| tokio::spawn(feed_track(track, source, generation)))
            }
            PeerRole::Consumer => {
                let meter = Arc::clone(&frame_rate);
                peer_connection.on_track(Box::new(move |track, _receiver, _transceiver| {
                    let sink = frame_sink.clone();
                    let meter = Arc::clone(&meter);

                    Box::pin(async move {
                        if track.kind() != RTPCodecType::Video {
                            return;
                        }
                        info!(
                            "Transport {} receiving video ({})",
                            generation,
                            track.codec().capability.mime_type
                        );
                        tokio::spawn(read_video_track(track, meter, sink, generation));
                    })
                }));
                None
            }
        };

        Ok(Self {
            role,
            generation,
            peer_connection,
            frame_rate,
            feed_task,
        })
    }

    pub fn role(&self) -> PeerRole {
        self.role
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[async_trait]
impl MediaTransport for WebRtcTransport {
    async fn create_offer(&self) -> Result<String> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .context("Failed to create offer")?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await
            .context("Failed to install local offer")?;
        Ok(offer.sdp)
    }

    async fn create_answer(&self) -> Result<String> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .context("Failed to create answer")?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await
            .context("Failed to install local answer")?;
        Ok(answer.sdp)
    }

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()> {
        let desc = match description.kind {
            SdpKind::Offer => RTCSessionDescription::offer(description.sdp),
            SdpKind::Answer => RTCSessionDescription::answer(description.sdp),
        }
        .context("Malformed session description")?;

        self.peer_connection
            .set_remote_description(desc)
            .await
            .context("Failed to apply remote description")?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: None,
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    async fn stats(&self) -> Result<TransportStats> {
        let report = self.peer_connection.get_stats().await;
        let mut stats = TransportStats::default();

        for entry in report.reports.values() {
            match entry {
                StatsReportType::InboundRTP(inbound) if inbound.kind == "video" => {
                    stats.bytes_received += inbound.bytes_received;
                }
                StatsReportType::CandidatePair(pair)
                    if matches!(pair.state, CandidatePairState::Succeeded) =>
                {
                    stats.round_trip_time = Some(pair.current_round_trip_time);
                }
                _ => {}
            }
        }

        if self.role == PeerRole::Consumer {
            stats.frames_per_second = self.frame_rate.sample().await;
        }
        Ok(stats)
    }

    async fn close(&self) -> Result<()> {
        if let Some(task) = &self.feed_task {
            task.abort();
        }
        self.peer_connection
            .close()
            .await
            .context("Failed to close peer connection")?;
        Ok(())
    }
}

async fn feed_track(
    track: Arc<TrackLocalStaticSample>,
    mut source: broadcast::Receiver<VideoFrame>,
    generation: u64,
) {
    loop {
        match source.recv().await {
            Ok(frame) => {
                let sample = Sample {
                    data: frame.data,
                    duration: frame.duration,
                    ..Default::default()
                };
                if let Err(e) = track.write_sample(&sample).await {
                    debug!("Transport {} failed to write sample: {}", generation, e);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Transport {} skipped {} frames", generation, skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    debug!("Video feed of transport {} stopped", generation);
}

async fn read_video_track(
    track: Arc<TrackRemote>,
    meter: Arc<FrameRateMeter>,
    sink: Option<mpsc::Sender<VideoFrame>>,
    generation: u64,
) {
    let mut builder = SampleBuilder::new(MAX_LATE_PACKETS, H264Packet::default(), VIDEO_CLOCK_RATE);

    loop {
        let packet = match track.read_rtp().await {
            Ok((packet, _)) => packet,
            Err(e) => {
                debug!("Video track of transport {} ended: {}", generation, e);
                break;
            }
        };

        builder.push(packet);
        while let Some(sample) = builder.pop() {
            meter.record();

            let Some(sink) = &sink else { continue };
            let frame = VideoFrame::new(sample.data, sample.duration);
            if let Err(mpsc::error::TrySendError::Closed(_)) = sink.try_send(frame) {
                debug!("Frame sink of transport {} closed", generation);
            }
        }
    }
}

/// Creates [`WebRtcTransport`]s sharing one configuration.
#[derive(Clone, Default)]
pub struct WebRtcTransportFactory {
    config: TransportConfig,
    video_source: Option<broadcast::Sender<VideoFrame>>,
    frame_sink: Option<mpsc::Sender<VideoFrame>>,
}

impl WebRtcTransportFactory {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            video_source: None,
            frame_sink: None,
        }
    }

    /// Frames published here are sent by every producer transport.
    pub fn with_video_source(mut self, source: broadcast::Sender<VideoFrame>) -> Self {
        self.video_source = Some(source);
        self
    }

    /// Frames received by consumer transports are pushed here. Frames are
    /// dropped while the sink is full.
    pub fn with_frame_sink(mut self, sink: mpsc::Sender<VideoFrame>) -> Self {
        self.frame_sink = Some(sink);
        self
    }
}

#[async_trait]
impl TransportFactory for WebRtcTransportFactory {
    async fn create(
        &self,
        role: PeerRole,
        generation: u64,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn MediaTransport>> {
        let transport = WebRtcTransport::new(
            role,
            generation,
            &self.config,
            self.video_source.as_ref().map(|source| source.subscribe()),
            self.frame_sink.clone(),
            events,
        )
        .await?;
        Ok(Arc::new(transport))
    }
}
