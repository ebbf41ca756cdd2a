use opticlink_core::PeerRole;
use serde::Deserialize;

/// The routing fields of a signaling frame. The relay reads nothing else,
/// so session descriptions and candidates pass through untouched.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub role: Option<PeerRole>,
    pub target: Option<PeerRole>,
}

impl Envelope {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn is_join(&self) -> bool {
        self.kind == "join"
    }
}
