//! Outbound packet encoders.
//!
//! Every reply this server ever sends is either a "string packet"
//! (`VarInt length | VarInt id | VarInt strlen | UTF-8 bytes`) carrying a
//! JSON document, or the fixed pong packet. The status and kick replies are
//! pure functions of static configuration, so callers encode them once at
//! startup and reuse the bytes for every connection.

use bytes::Bytes;

use crate::buffer::ByteBuf;
use crate::varint;

/// Packet id shared by the status response and the login kick.
pub const STRING_PACKET_ID: i32 = 0;

/// Fixed pong reply: VarInt length (9), VarInt id (1), 8 payload bytes
/// standing in for the client's echoed timestamp.
pub const PONG_PACKET: [u8; 10] = [0x09, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0x32];

/// Encode a length-framed string packet. The buffer is preallocated to the
/// exact wire size, so the cursor-walking writes below fill it completely.
pub fn string_packet(packet_id: i32, payload: &str) -> Bytes {
    let str_len = payload.len() as i32;
    let packet_len = varint::size_of(packet_id) as i32 + varint::size_of(str_len) as i32 + str_len;

    let mut buf = ByteBuf::zeroed(varint::size_of(packet_len) + packet_len as usize);
    buf.write_varint(packet_len);
    buf.write_varint(packet_id);
    buf.write_varint(str_len);
    buf.write_raw(payload.as_bytes());
    buf.into_bytes()
}
