use crate::model::PeerRole;
use thiserror::Error;

/// Reasons an inbound signaling frame is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("signaling frame is not a JSON object")]
    NotAnObject,

    #[error("missing `type` discriminator")]
    MissingType,

    #[error("unknown message type `{0}`")]
    UnknownType(String),

    #[error("invalid `{kind}` message: {reason}")]
    InvalidFields { kind: String, reason: String },

    #[error("unknown role `{0}`")]
    UnknownRole(String),

    #[error("`{kind}` message addressed to {target}")]
    WrongTarget { kind: String, target: PeerRole },

    #[error("`{kind}` is not expected by the {role} role")]
    UnexpectedMessage { kind: String, role: PeerRole },
}
