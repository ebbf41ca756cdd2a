use crate::registry::{ChannelHandle, Outbound};
use crate::signaling::{Envelope, RelayService};
use axum::extract::State;
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use opticlink_core::{ChannelId, PeerRole};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Close code sent to a channel whose role was taken by a newer peer.
pub const DISPLACED_CLOSE_CODE: u16 = 4001;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<RelayService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: RelayService) {
    let channel_id = ChannelId::new();
    info!("New signaling connection: {}", channel_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();
    let (role_tx, role_rx) = watch::channel::<Option<PeerRole>>(None);

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                Outbound::Text(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = sender
                        .send(Message::Close(Some(CloseFrame {
                            code: DISPLACED_CLOSE_CODE,
                            reason: "role taken by a newer peer".into(),
                        })))
                        .await;
                    break;
                }
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let handle = ChannelHandle::new(channel_id, tx);

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        let text = text.as_str().to_owned();
                        let envelope = match Envelope::parse(&text) {
                            Ok(envelope) => envelope,
                            Err(e) => {
                                warn!("Invalid signaling frame from {}: {}", channel_id, e);
                                continue;
                            }
                        };

                        if envelope.is_join() {
                            let Some(new_role) = envelope.role else {
                                warn!("Join without role from {}", channel_id);
                                continue;
                            };
                            let old_role = role_tx.send_replace(Some(new_role));
                            if let Some(old_role) = old_role.filter(|r| *r != new_role) {
                                service.leave(old_role, channel_id);
                            }
                            service.join(new_role, handle.clone());
                            continue;
                        }

                        let Some(target) = envelope.target else {
                            warn!(
                                "'{}' frame without target from {}, dropping",
                                envelope.kind, channel_id
                            );
                            continue;
                        };
                        debug!("Relaying '{}' from {} to {}", envelope.kind, channel_id, target);
                        service.forward(channel_id, target, text);
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    let role = *role_rx.borrow();
    if let Some(role) = role {
        service.leave(role, channel_id);
    }
    info!("Signaling connection closed: {}", channel_id);
}
