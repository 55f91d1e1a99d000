//! Handshake packet decoder.
//!
//! The handshake is the first packet a Java Edition client sends: declared
//! protocol version, the hostname/port it connected to, and whether it wants
//! a status query or a full login. Decoding works on the connection's
//! persistent [`ByteBuf`]: on every new chunk the cursor is reset to 0 and
//! the whole packet is re-parsed from scratch. That costs a bounded re-scan
//! per chunk and buys a trivially simple retry path, capped by
//! [`MAX_HANDSHAKE_LEN`] so hostile input cannot force unbounded buffering.

use crate::buffer::ByteBuf;
use crate::error::{HandshakeError, VarIntError};

/// Largest legal handshake: 2-byte length prefix + 1-byte packet id + 4-byte
/// protocol version + 2-byte hostname length prefix + 255-byte hostname +
/// 2-byte port + 1-byte state.
pub const MAX_HANDSHAKE_LEN: i32 = 267;

/// Maximum UTF-8 bytes of the hostname field.
pub const MAX_HOSTNAME_LEN: usize = 255;

/// What the client intends to do after the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextState {
    Status = 1,
    Login = 2,
}

/// A fully decoded and validated handshake. Partially valid data never
/// escapes as one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub protocol_version: i32,
    pub hostname: String,
    pub port: u16,
    pub next_state: NextState,
}

/// Outcome of a decode attempt. `Incomplete` is not an error: the caller
/// appends the next chunk and tries again from offset 0.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeResult {
    Ready(Handshake),
    Incomplete,
    Invalid(HandshakeError),
}

impl Handshake {
    /// Attempt to parse one complete handshake from the start of `buf`.
    /// The caller must have reset the cursor to 0.
    pub fn try_decode(buf: &mut ByteBuf) -> DecodeResult {
        // Packet length prefix. Clients never legitimately need more than
        // 2 bytes here given the 267-byte cap.
        let packet_len = match buf.read_varint(2, true) {
            Ok(len) => len,
            Err(VarIntError::Incomplete) => return DecodeResult::Incomplete,
            Err(VarIntError::Malformed) => {
                return DecodeResult::Invalid(HandshakeError::BadLengthPrefix)
            }
        };
        if packet_len > MAX_HANDSHAKE_LEN {
            return DecodeResult::Invalid(HandshakeError::OversizedLength(packet_len));
        }

        // Deliberately loose framing check: the declared length only has to
        // fit in what is buffered after the prefix, so trailing bytes
        // pipelined after the handshake are tolerated rather than rejected.
        if packet_len as usize > buf.remaining() {
            return DecodeResult::Incomplete;
        }

        let packet_id = buf.read_varint(1, false);
        if packet_id != Ok(0) {
            return DecodeResult::Invalid(HandshakeError::BadPacketId);
        }

        let protocol_version = match buf.read_varint(4, false) {
            Ok(v) if v > 0 => v,
            _ => return DecodeResult::Invalid(HandshakeError::BadProtocolVersion),
        };

        let mut hostname = match buf.read_string(2, MAX_HOSTNAME_LEN) {
            Ok(s) => s,
            Err(e) => return DecodeResult::Invalid(HandshakeError::BadHostname(e)),
        };

        let port = match buf.read_u16_be() {
            Ok(p) if p > 0 => p,
            _ => return DecodeResult::Invalid(HandshakeError::BadPort),
        };

        let next_state = match buf.read_varint(1, false) {
            Ok(1) => NextState::Status,
            Ok(2) => NextState::Login,
            _ => return DecodeResult::Invalid(HandshakeError::BadNextState),
        };

        // Forge and some proxies smuggle extra data after a NUL in the
        // hostname; keep only the real host.
        if let Some(end) = hostname.find('\0') {
            hostname.truncate(end);
        }

        DecodeResult::Ready(Handshake {
            protocol_version,
            hostname,
            port,
            next_state,
        })
    }
}
