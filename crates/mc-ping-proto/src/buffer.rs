//! Growable byte accumulator with an explicit read cursor.
//!
//! One `ByteBuf` lives for the duration of a connection: every chunk the
//! transport delivers is appended, the cursor is reset to 0, and the
//! handshake decoder re-attempts a full parse. The buffer is never truncated
//! from the front, so a partial parse can always be retried from scratch.

use bytes::{Bytes, BytesMut};

use crate::error::{ReadError, VarIntError};
use crate::varint;

#[derive(Debug, Default)]
pub struct ByteBuf {
    data: BytesMut,
    cursor: usize,
}

impl ByteBuf {
    /// An empty buffer, ready to accumulate appended chunks.
    pub fn new() -> Self {
        Self::default()
    }

    /// A zero-filled buffer of exactly `len` bytes, for the cursor-walking
    /// write primitives. Encoders size this with [`varint::size_of`] before
    /// writing.
    pub fn zeroed(len: usize) -> Self {
        Self {
            data: BytesMut::zeroed(len),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Bytes between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// Append a chunk to the end of the buffer. No-op on an empty chunk.
    pub fn append(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        self.data.extend_from_slice(chunk);
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        if self.cursor + 1 > self.data.len() {
            return Err(ReadError::BufferTooShort);
        }
        let byte = self.data[self.cursor];
        self.cursor += 1;
        Ok(byte)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, ReadError> {
        if self.cursor + 2 > self.data.len() {
            return Err(ReadError::BufferTooShort);
        }
        let value = u16::from_be_bytes([self.data[self.cursor], self.data[self.cursor + 1]]);
        self.cursor += 2;
        Ok(value)
    }

    pub fn read_varint(&mut self, max_bytes: usize, allow_incomplete: bool) -> Result<i32, VarIntError> {
        varint::decode(self, max_bytes, allow_incomplete)
    }

    /// Read a VarInt-length-prefixed UTF-8 string.
    ///
    /// A truncated prefix or payload is a hard failure here, never
    /// "incomplete": the caller retries by re-parsing the whole persistent
    /// buffer from offset 0 once more data has arrived.
    pub fn read_string(&mut self, max_prefix_bytes: usize, max_payload_bytes: usize) -> Result<String, ReadError> {
        let len = self.read_varint(max_prefix_bytes, false)?;
        if len < 0 || len as usize > max_payload_bytes || self.cursor + len as usize > self.data.len() {
            return Err(ReadError::StringLength(len));
        }
        let end = self.cursor + len as usize;
        let s = std::str::from_utf8(&self.data[self.cursor..end])
            .map_err(|_| ReadError::InvalidUtf8)?
            .to_owned();
        self.cursor = end;
        Ok(s)
    }

    /// Write a VarInt at the cursor. The buffer must already hold
    /// [`varint::size_of`] bytes there; see [`ByteBuf::zeroed`].
    pub fn write_varint(&mut self, value: i32) {
        varint::encode(value, self);
    }

    /// Copy raw bytes in at the cursor and advance it.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data[self.cursor..self.cursor + bytes.len()].copy_from_slice(bytes);
        self.cursor += bytes.len();
    }

    pub(crate) fn write_u8(&mut self, byte: u8) {
        self.data[self.cursor] = byte;
        self.cursor += 1;
    }

    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_len() {
        let mut buf = ByteBuf::new();
        assert!(buf.is_empty());
        buf.append(&[1, 2, 3]);
        assert_eq!(buf.len(), 3);
        buf.append(&[]);
        assert_eq!(buf.len(), 3);
        buf.append(&[4]);
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn read_u8_advances() {
        let mut buf = ByteBuf::new();
        buf.append(&[0xAB, 0xCD]);
        assert_eq!(buf.read_u8(), Ok(0xAB));
        assert_eq!(buf.cursor(), 1);
        assert_eq!(buf.read_u8(), Ok(0xCD));
        assert_eq!(buf.read_u8(), Err(ReadError::BufferTooShort));
        // failed read leaves the cursor in place
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn read_u16_be_short() {
        let mut buf = ByteBuf::new();
        buf.append(&[0x63]);
        assert_eq!(buf.read_u16_be(), Err(ReadError::BufferTooShort));
        assert_eq!(buf.cursor(), 0);
        buf.append(&[0xDD]);
        assert_eq!(buf.read_u16_be(), Ok(25565));
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn reset_cursor_rereads() {
        let mut buf = ByteBuf::new();
        buf.append(&[7, 8]);
        assert_eq!(buf.read_u8(), Ok(7));
        buf.reset_cursor();
        assert_eq!(buf.read_u8(), Ok(7));
        assert_eq!(buf.remaining(), 1);
    }

    #[test]
    fn read_string_ok() {
        let mut buf = ByteBuf::new();
        buf.append(&[5]);
        buf.append(b"hello");
        assert_eq!(buf.read_string(2, 255).unwrap(), "hello");
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn read_string_keeps_nul_bytes() {
        // NUL stripping is the handshake decoder's job, not the buffer's.
        let mut buf = ByteBuf::new();
        buf.append(&[4]);
        buf.append(b"a\0bc");
        assert_eq!(buf.read_string(2, 255).unwrap(), "a\0bc");
    }

    #[test]
    fn read_string_over_payload_cap() {
        let mut buf = ByteBuf::new();
        buf.append(&[6]);
        buf.append(b"toolong");
        assert_eq!(buf.read_string(2, 5), Err(ReadError::StringLength(6)));
    }

    #[test]
    fn read_string_overruns_buffer() {
        let mut buf = ByteBuf::new();
        buf.append(&[10]);
        buf.append(b"short");
        assert_eq!(buf.read_string(2, 255), Err(ReadError::StringLength(10)));
    }

    #[test]
    fn read_string_invalid_utf8() {
        let mut buf = ByteBuf::new();
        buf.append(&[2, 0xFF, 0xFE]);
        assert_eq!(buf.read_string(2, 255), Err(ReadError::InvalidUtf8));
    }

    #[test]
    fn read_string_bad_prefix() {
        // Length prefix needs 3 groups but only 2 are allowed.
        let mut buf = ByteBuf::new();
        buf.append(&[0x80, 0x80, 0x01]);
        assert_eq!(
            buf.read_string(2, 255),
            Err(ReadError::VarInt(VarIntError::Malformed))
        );
    }

    #[test]
    fn write_then_read_back() {
        let mut buf = ByteBuf::zeroed(varint::size_of(300) + 3);
        buf.write_varint(300);
        buf.write_raw(b"abc");
        assert_eq!(buf.cursor(), 5);
        buf.reset_cursor();
        assert_eq!(buf.read_varint(5, false), Ok(300));
        assert_eq!(buf.read_u8(), Ok(b'a'));
    }
}
