//! Protocol-level errors.

use thiserror::Error;

/// Failure modes of the VarInt decoder.
///
/// `Incomplete` is not a protocol violation: the caller is expected to append
/// more bytes and re-attempt the parse from offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VarIntError {
    #[error("VarInt ends before its terminating byte")]
    Incomplete,

    #[error("malformed VarInt")]
    Malformed,
}

/// Errors returned by the typed read primitives of [`crate::buffer::ByteBuf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("buffer too short")]
    BufferTooShort,

    #[error(transparent)]
    VarInt(#[from] VarIntError),

    #[error("string length out of range: {0}")]
    StringLength(i32),

    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
}

/// Reasons a handshake packet is rejected. All variants are equally fatal to
/// the connection; they exist so the rejection can be logged meaningfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandshakeError {
    #[error("malformed packet length prefix")]
    BadLengthPrefix,

    #[error("declared packet length {0} exceeds the handshake maximum")]
    OversizedLength(i32),

    #[error("not a handshake packet")]
    BadPacketId,

    #[error("illegal protocol version")]
    BadProtocolVersion,

    #[error("illegal hostname: {0}")]
    BadHostname(ReadError),

    #[error("illegal port")]
    BadPort,

    #[error("illegal next state")]
    BadNextState,
}
