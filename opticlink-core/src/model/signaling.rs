use crate::error::ProtocolError;
use crate::model::role::PeerRole;
use serde::{Deserialize, Serialize};

const KNOWN_TYPES: [&str; 4] = ["join", "offer", "answer", "ice-candidate"];

/// One frame of the relay protocol. Field names and casing are part of the
/// wire format shared with independently built peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SignalingMessage {
    #[serde(rename = "join")]
    Join { role: PeerRole },

    #[serde(rename = "offer")]
    Offer { sdp: String, target: PeerRole },

    #[serde(rename = "answer")]
    Answer { sdp: String, target: PeerRole },

    #[serde(rename = "ice-candidate")]
    IceCandidate {
        candidate: String,
        sdp_mid: Option<String>,
        sdp_m_line_index: Option<u16>,
        target: PeerRole,
    },
}

impl SignalingMessage {
    /// Parses one text frame, classifying what is wrong with it when it
    /// cannot be accepted.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ProtocolError::MalformedJson(e.to_string()))?;

        let object = value.as_object().ok_or(ProtocolError::NotAnObject)?;
        let kind = object
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or(ProtocolError::MissingType)?
            .to_owned();

        if !KNOWN_TYPES.contains(&kind.as_str()) {
            return Err(ProtocolError::UnknownType(kind));
        }

        serde_json::from_value(value).map_err(|e| ProtocolError::InvalidFields {
            kind,
            reason: e.to_string(),
        })
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SignalingMessage::Join { .. } => "join",
            SignalingMessage::Offer { .. } => "offer",
            SignalingMessage::Answer { .. } => "answer",
            SignalingMessage::IceCandidate { .. } => "ice-candidate",
        }
    }

    /// Routing target. `None` only for `join`.
    pub fn target(&self) -> Option<PeerRole> {
        match self {
            SignalingMessage::Join { .. } => None,
            SignalingMessage::Offer { target, .. }
            | SignalingMessage::Answer { target, .. }
            | SignalingMessage::IceCandidate { target, .. } => Some(*target),
        }
    }

    pub fn ice_candidate(candidate: IceCandidate, target: PeerRole) -> Self {
        SignalingMessage::IceCandidate {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_m_line_index: candidate.sdp_m_line_index,
            target,
        }
    }
}

/// A single network path candidate as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceCandidate {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u16>,
}

impl IceCandidate {
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: None,
            sdp_m_line_index: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

/// A session description together with the role it plays in the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}
