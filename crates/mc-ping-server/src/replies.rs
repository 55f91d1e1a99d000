//! Precomputed reply packets.
//!
//! Both replies are pure functions of the configuration, so they are encoded
//! once at startup and the same bytes are written to every connection.

use base64::Engine;
use bytes::Bytes;
use tracing::warn;

use mc_ping_proto::packets::{string_packet, STRING_PACKET_ID};
use mc_ping_proto::status::{chat_component, StatusPlayers, StatusResponse, StatusVersion};

use crate::config::ServerConfig;

#[derive(Debug)]
pub struct Replies {
    /// Status response packet, sent to state=1 handshakes (followed by pong).
    pub status: Bytes,
    /// Kick packet, sent to state=2 handshakes instead of a login flow.
    pub kick: Bytes,
}

impl Replies {
    pub fn build(config: &ServerConfig) -> Self {
        let status_doc = StatusResponse {
            version: StatusVersion {
                name: config.status.protocol_name.clone(),
                protocol: config.status.protocol_version,
            },
            players: StatusPlayers {
                max: config.status.max_players,
                online: config.status.online_players,
                sample: Vec::new(),
            },
            description: chat_component(&config.status.motd),
            favicon: config.status.favicon.as_deref().and_then(load_favicon),
        };
        let status_json =
            serde_json::to_string(&status_doc).expect("status document serializes to JSON");
        let kick_json = serde_json::to_string(&chat_component(&config.kick.message))
            .expect("kick message serializes to JSON");

        Self {
            status: string_packet(STRING_PACKET_ID, &status_json),
            kick: string_packet(STRING_PACKET_ID, &kick_json),
        }
    }
}

/// Resolve the configured favicon to a data URI. Pre-formed `data:` values
/// pass through; anything else is read from disk as raw PNG bytes. An
/// unreadable file costs the favicon, not the server.
fn load_favicon(source: &str) -> Option<String> {
    if source.starts_with("data:") {
        return Some(source.to_owned());
    }
    match std::fs::read(source) {
        Ok(bytes) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            Some(format!("data:image/png;base64,{encoded}"))
        }
        Err(e) => {
            warn!("Cannot read favicon {source}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_ping_proto::buffer::ByteBuf;

    /// Unframe a string packet and parse its JSON payload.
    fn unwrap_string_packet(packet: &Bytes) -> serde_json::Value {
        let mut buf = ByteBuf::new();
        buf.append(packet);
        let packet_len = buf.read_varint(5, false).unwrap();
        assert_eq!(packet_len as usize, buf.remaining());
        assert_eq!(buf.read_varint(5, false).unwrap(), STRING_PACKET_ID);
        let json = buf.read_string(5, packet.len()).unwrap();
        assert_eq!(buf.remaining(), 0);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn kick_packet_matches_direct_encoding() {
        let config = ServerConfig::default();
        let replies = Replies::build(&config);
        let expected = string_packet(0, r#"{"text":"§cNot available"}"#);
        assert_eq!(replies.kick, expected);
    }

    #[test]
    fn status_packet_carries_the_motd() {
        let config = ServerConfig::default();
        let replies = Replies::build(&config);
        let doc = unwrap_string_packet(&replies.status);
        assert_eq!(doc["description"]["text"], "§eHello World!");
        assert_eq!(doc["players"]["max"], 0);
        assert!(doc.get("favicon").is_none());
    }

    #[test]
    fn data_uri_favicon_passes_through() {
        let mut config = ServerConfig::default();
        config.status.favicon = Some("data:image/png;base64,AA==".into());
        let replies = Replies::build(&config);
        let doc = unwrap_string_packet(&replies.status);
        assert_eq!(doc["favicon"], "data:image/png;base64,AA==");
    }

    #[test]
    fn missing_favicon_file_is_dropped() {
        assert_eq!(load_favicon("/nonexistent/favicon.png"), None);
    }
}
