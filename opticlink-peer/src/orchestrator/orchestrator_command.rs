use crate::error::OrchestratorError;
use tokio::sync::oneshot;

/// Requests from an [`OrchestratorHandle`](super::OrchestratorHandle) to the loop.
#[derive(Debug)]
pub enum OrchestratorCommand {
    BeginOffer {
        reply: oneshot::Sender<Result<(), OrchestratorError>>,
    },
    Restart {
        reply: oneshot::Sender<Result<(), OrchestratorError>>,
    },
    Close {
        reply: oneshot::Sender<()>,
    },
}
