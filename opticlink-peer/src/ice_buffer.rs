use opticlink_core::IceCandidate;
use std::collections::VecDeque;

/// Outcome of [`IceCandidateBuffer::push`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Push {
    /// A remote description is installed; apply this candidate now.
    Apply(IceCandidate),
    /// Held until the remote description is applied.
    Queued,
}

/// Holds remote candidates that arrive before the remote description.
///
/// The buffer never touches the transport. The owner applies whatever
/// `push` and `drain_after_remote_description_applied` hand back, in the
/// order handed back, so buffered candidates always precede later ones.
/// Candidates are neither reordered nor deduplicated.
#[derive(Debug, Default)]
pub struct IceCandidateBuffer {
    pending: VecDeque<IceCandidate>,
    remote_description_applied: bool,
}

impl IceCandidateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: IceCandidate) -> Push {
        if self.remote_description_applied {
            Push::Apply(candidate)
        } else {
            self.pending.push_back(candidate);
            Push::Queued
        }
    }

    /// Marks the remote description as installed and returns everything
    /// queued so far, oldest first. Later pushes apply immediately.
    pub fn drain_after_remote_description_applied(&mut self) -> Vec<IceCandidate> {
        self.remote_description_applied = true;
        self.pending.drain(..).collect()
    }

    /// Forgets queued candidates and the remote description, for a new
    /// handshake.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.remote_description_applied = false;
    }

    pub fn has_remote_description(&self) -> bool {
        self.remote_description_applied
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
