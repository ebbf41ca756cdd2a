use dashmap::DashMap;
use opticlink_core::{ChannelId, PeerRole};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Frames queued for a connected channel's socket writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text(String),
    /// Ask the writer to close the socket (role displaced).
    Close,
}

/// Handle to the writer half of one relay connection.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    pub id: ChannelId,
    tx: mpsc::UnboundedSender<Outbound>,
}

impl ChannelHandle {
    pub fn new(id: ChannelId, tx: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { id, tx }
    }

    fn send(&self, frame: Outbound) -> bool {
        self.tx.send(frame).is_ok()
    }
}

/// The pairing of the current producer and consumer channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub producer: ChannelId,
    pub consumer: ChannelId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered(ChannelId),
    /// Nobody holds the target role; the frame is dropped.
    NoRecipient,
    /// The target holder's writer is already gone.
    RecipientGone(ChannelId),
}

/// Role -> current channel. Registration is last-writer-wins per role.
#[derive(Default)]
pub struct RoleRegistry {
    channels: DashMap<PeerRole, ChannelHandle>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `channel` the holder of `role`. A previous holder on a different
    /// connection is told to close and its id is returned.
    pub fn register(&self, role: PeerRole, channel: ChannelHandle) -> Option<ChannelId> {
        let id = channel.id;
        let previous = self.channels.insert(role, channel)?;

        if previous.id == id {
            debug!("Channel {} re-announced role {}", id, role);
            return None;
        }

        info!(
            "Role {} moved from channel {} to {}, closing the old channel",
            role, previous.id, id
        );
        if !previous.send(Outbound::Close) {
            debug!("Displaced channel {} was already closed", previous.id);
        }
        Some(previous.id)
    }

    /// Drops the registration of `role` only if `id` still holds it.
    pub fn unregister(&self, role: PeerRole, id: ChannelId) -> bool {
        self.channels
            .remove_if(&role, |_, holder| holder.id == id)
            .is_some()
    }

    pub fn forward(&self, target: PeerRole, text: String) -> Delivery {
        let Some(holder) = self.channels.get(&target) else {
            return Delivery::NoRecipient;
        };

        if holder.send(Outbound::Text(text)) {
            Delivery::Delivered(holder.id)
        } else {
            warn!("Channel {} holding {} is gone", holder.id, target);
            Delivery::RecipientGone(holder.id)
        }
    }

    pub fn holder(&self, role: PeerRole) -> Option<ChannelId> {
        self.channels.get(&role).map(|h| h.id)
    }

    pub fn session(&self) -> Option<Session> {
        Some(Session {
            producer: self.holder(PeerRole::Producer)?,
            consumer: self.holder(PeerRole::Consumer)?,
        })
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
