//! Minecraft Java Edition server-list-ping protocol: packet framing, the
//! handshake decoder, and the status/kick/pong reply encoders.

pub mod buffer;
pub mod error;
pub mod handshake;
pub mod packets;
pub mod status;
pub mod varint;
