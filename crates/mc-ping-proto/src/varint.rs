//! VarInt codec (Java Edition: plain LEB128 over the two's-complement bit
//! pattern, NO ZigZag). 1 to 5 bytes, 7 data bits per byte, bit 7 set on
//! every byte but the last, low-order group first.

use crate::buffer::ByteBuf;
use crate::error::VarIntError;

/// Maximum bytes a VarInt can occupy.
pub const MAX_BYTES: usize = 5;

/// Number of bytes needed to encode `value`. Negative values keep their high
/// bits set and always take the full 5 bytes.
pub fn size_of(value: i32) -> usize {
    if value < 0 {
        return MAX_BYTES;
    }
    if value < 0x80 {
        1
    } else if value < 0x4000 {
        2
    } else if value < 0x20_0000 {
        3
    } else if value < 0x1000_0000 {
        4
    } else {
        5
    }
}

/// Decode a VarInt from the buffer cursor, consuming one byte per 7-bit
/// group until a byte without the continuation bit terminates the value.
///
/// Running out of buffer mid-value yields [`VarIntError::Incomplete`] when
/// `allow_incomplete` is set, [`VarIntError::Malformed`] otherwise. Consuming
/// `max_bytes` groups without finding a terminator is always malformed; a
/// value that terminates exactly on the `max_bytes`-th group is fine.
///
/// On failure the cursor is left wherever reads stopped; callers retry by
/// resetting it to 0 after appending more data, never by resuming mid-value.
pub fn decode(buf: &mut ByteBuf, max_bytes: usize, allow_incomplete: bool) -> Result<i32, VarIntError> {
    debug_assert!(max_bytes <= MAX_BYTES);

    let mut result: u32 = 0;
    let mut bytes_read = 0;
    loop {
        let byte = match buf.read_u8() {
            Ok(b) => b,
            Err(_) => {
                return Err(if allow_incomplete {
                    VarIntError::Incomplete
                } else {
                    VarIntError::Malformed
                });
            }
        };

        result |= ((byte & 0x7F) as u32) << (bytes_read * 7);
        bytes_read += 1;

        if byte & 0x80 == 0 {
            return Ok(result as i32);
        }
        if bytes_read >= max_bytes {
            return Err(VarIntError::Malformed);
        }
    }
}

/// Encode `value` at the buffer cursor, advancing it by [`size_of`] bytes.
/// The destination must already be sized to hold them; growth happens only
/// through [`ByteBuf::append`].
pub fn encode(value: i32, buf: &mut ByteBuf) {
    let mut value = value as u32;
    loop {
        let group = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.write_u8(group);
            return;
        }
        buf.write_u8(group | 0x80);
    }
}
