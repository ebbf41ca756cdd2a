use crate::registry::{ChannelHandle, Delivery, RoleRegistry, Session};
use opticlink_core::{ChannelId, PeerRole};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct RelayInner {
    registry: RoleRegistry,
}

/// Shared relay state handed to every socket task.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<RelayInner>,
}

impl Default for RelayService {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RelayInner {
                registry: RoleRegistry::new(),
            }),
        }
    }

    /// Registers `channel` under `role`; returns the displaced channel, if any.
    pub fn join(&self, role: PeerRole, channel: ChannelHandle) -> Option<ChannelId> {
        let id = channel.id;
        let displaced = self.inner.registry.register(role, channel);
        info!("Channel {} joined as {}", id, role);

        if let Some(session) = self.inner.registry.session() {
            info!(
                "Session ready: producer {} <-> consumer {}",
                session.producer, session.consumer
            );
        }
        displaced
    }

    pub fn leave(&self, role: PeerRole, id: ChannelId) {
        if self.inner.registry.unregister(role, id) {
            info!("Channel {} released role {}", id, role);
        } else {
            debug!("Channel {} no longer held role {}", id, role);
        }
    }

    /// Forwards `text` unchanged to the holder of `target`. Frames addressed
    /// back to the sending channel are dropped.
    pub fn forward(&self, from: ChannelId, target: PeerRole, text: String) -> Delivery {
        if self.inner.registry.holder(target) == Some(from) {
            warn!("Channel {} addressed its own role {}, dropping", from, target);
            return Delivery::NoRecipient;
        }

        let delivery = self.inner.registry.forward(target, text);
        if delivery == Delivery::NoRecipient {
            debug!("No {} registered, dropping frame from {}", target, from);
        }
        delivery
    }

    pub fn holder(&self, role: PeerRole) -> Option<ChannelId> {
        self.inner.registry.holder(role)
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.registry.session()
    }

    pub fn registered_roles(&self) -> usize {
        self.inner.registry.len()
    }
}
