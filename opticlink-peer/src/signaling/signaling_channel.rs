use crate::config::SignalingConfig;
use crate::signaling::{SignalingEvent, SignalingOutput};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use opticlink_core::{PeerRole, SignalingMessage};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const EVENT_BUFFER: usize = 256;

struct ChannelInner {
    config: SignalingConfig,
    /// Writer of the current connection; `None` while not open.
    outbound: Mutex<Option<mpsc::UnboundedSender<Message>>>,
}

/// A relay connection that keeps coming back.
///
/// Every attempt is announced with `Connecting`; once the socket is up the
/// peer's `join` is sent first and `Connected` follows. Whenever the socket
/// closes (or never opens) `Disconnected` is emitted and the next attempt
/// starts after the fixed reconnect delay, forever, until [`close`] or drop.
///
/// [`close`]: SignalingOutput::close
pub struct SignalingChannel {
    inner: Arc<ChannelInner>,
    task: JoinHandle<()>,
}

impl SignalingChannel {
    pub fn open(config: SignalingConfig) -> (Self, mpsc::Receiver<SignalingEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let inner = Arc::new(ChannelInner {
            config,
            outbound: Mutex::new(None),
        });

        let task = tokio::spawn(run(Arc::clone(&inner), event_tx));
        (Self { inner, task }, event_rx)
    }

    pub fn role(&self) -> PeerRole {
        self.inner.config.role
    }

    pub async fn is_open(&self) -> bool {
        self.inner.outbound.lock().await.is_some()
    }
}

impl Drop for SignalingChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[async_trait]
impl SignalingOutput for SignalingChannel {
    async fn send(&self, message: SignalingMessage) {
        let text = match message.encode() {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to encode '{}' message: {}", message.kind(), e);
                return;
            }
        };

        let outbound = self.inner.outbound.lock().await;
        match outbound.as_ref() {
            Some(tx) => {
                let _ = tx.send(Message::Text(text.into()));
            }
            None => debug!("Signaling not open, dropping '{}'", message.kind()),
        }
    }

    async fn close(&self) {
        self.task.abort();
        *self.inner.outbound.lock().await = None;
        info!("Signaling channel for {} closed", self.inner.config.role);
    }
}

async fn run(inner: Arc<ChannelInner>, events: mpsc::Sender<SignalingEvent>) {
    let url = inner.config.url.clone();
    let delay = inner.config.reconnect_delay;

    loop {
        if events.send(SignalingEvent::Connecting).await.is_err() {
            break;
        }

        let owner_alive = match connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                info!("Connected to relay at {}", url);
                serve_connection(&inner, stream, &events).await
            }
            Err(e) => {
                warn!("Relay at {} unreachable: {}", url, e);
                true
            }
        };

        *inner.outbound.lock().await = None;
        if !owner_alive || events.send(SignalingEvent::Disconnected).await.is_err() {
            break;
        }

        info!("Reconnecting to relay in {:?}", delay);
        tokio::time::sleep(delay).await;
    }

    debug!("Signaling loop for {} stopped", inner.config.role);
}

/// Runs one connection until it closes. Returns `false` once nobody listens
/// to the events any more.
async fn serve_connection(
    inner: &ChannelInner,
    stream: WsStream,
    events: &mpsc::Sender<SignalingEvent>,
) -> bool {
    let role = inner.config.role;
    let (mut write, mut read) = stream.split();

    let join = match (SignalingMessage::Join { role }).encode() {
        Ok(join) => join,
        Err(e) => {
            warn!("Failed to encode join: {}", e);
            return true;
        }
    };
    if let Err(e) = write.send(Message::Text(join.into())).await {
        warn!("Failed to announce role {}: {}", role, e);
        return true;
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    *inner.outbound.lock().await = Some(tx);

    if events.send(SignalingEvent::Connected).await.is_err() {
        return false;
    }

    loop {
        tokio::select! {
            Some(frame) = rx.recv() => {
                if let Err(e) = write.send(frame).await {
                    warn!("Failed to send signaling frame: {}", e);
                    break;
                }
            }

            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => match SignalingMessage::decode(text.as_str()) {
                    Ok(message) => {
                        if events.send(SignalingEvent::Message(message)).await.is_err() {
                            return false;
                        }
                    }
                    Err(e) => warn!("Ignoring signaling frame: {}", e),
                },
                Some(Ok(Message::Close(frame))) => {
                    match frame {
                        Some(frame) => info!(
                            "Relay closed the connection ({}: {})",
                            u16::from(frame.code),
                            frame.reason
                        ),
                        None => info!("Relay closed the connection"),
                    }
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Signaling connection error: {}", e);
                    break;
                }
                None => break,
            }
        }
    }

    true
}
