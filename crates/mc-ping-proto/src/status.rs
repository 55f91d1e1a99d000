//! The server-list status document and chat component helpers.

use serde::Serialize;
use serde_json::{json, Value};

/// The JSON document returned to a status query.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub version: StatusVersion,
    pub players: StatusPlayers,
    pub description: Value,
    /// PNG data URI. Omitted from the JSON entirely when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusVersion {
    pub name: String,
    pub protocol: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusPlayers {
    pub max: u32,
    pub online: u32,
    pub sample: Vec<PlayerSample>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSample {
    pub name: String,
    pub id: String,
}

/// Turn operator-supplied text into a chat component. Text that already
/// looks like a JSON object is passed through verbatim so operators can use
/// full component syntax; anything else becomes `{"text": ...}`.
pub fn chat_component(text: &str) -> Value {
    if text.starts_with('{') {
        if let Ok(value) = serde_json::from_str(text) {
            return value;
        }
    }
    json!({ "text": text })
}
