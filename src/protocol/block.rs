//! Block codec.
//!
//! A block is a byte string prefixed by its length. Lengths below 254 take a
//! single byte; longer payloads use the escape byte `0xFE` followed by a
//! big-endian 32-bit length. `0xFF` never starts a block: it is the NULL
//! marker in row data.

use bytes::{BufMut, BytesMut};

use super::reader::{FrameReader, ProtocolError};

/// Largest payload encoded with the one-byte length form.
pub const SHORT_BLOCK_MAX: usize = 253;

/// Escape byte introducing a 32-bit length.
pub const LONG_BLOCK_ESCAPE: u8 = 0xFE;

/// Row-data marker for a NULL column value.
pub const NULL_MARKER: u8 = 0xFF;

/// Append `data` as a block.
pub fn put_block(buf: &mut BytesMut, data: &[u8]) {
    if data.len() <= SHORT_BLOCK_MAX {
        buf.reserve(1 + data.len());
        buf.put_u8(data.len() as u8);
    } else {
        debug_assert!(u32::try_from(data.len()).is_ok(), "block payload exceeds u32::MAX bytes");
        buf.reserve(5 + data.len());
        buf.put_u8(LONG_BLOCK_ESCAPE);
        buf.put_u32(data.len() as u32);
    }
    buf.put_slice(data);
}

/// Encode `data` as a standalone block.
pub fn encode_block(data: &[u8]) -> BytesMut {
    let mut buf = BytesMut::new();
    put_block(&mut buf, data);
    buf
}

/// Decode the block starting at `offset`.
///
/// Returns the payload and the offset of the first byte after it.
pub fn decode_block(buf: &[u8], offset: usize) -> Result<(&[u8], usize), ProtocolError> {
    let mut reader = FrameReader::at(buf, offset);
    let payload = reader.read_block()?;
    Ok((payload, reader.position()))
}

/// Number of bytes `put_block` emits for a payload of `len` bytes.
pub fn encoded_len(len: usize) -> usize {
    if len <= SHORT_BLOCK_MAX {
        1 + len
    } else {
        5 + len
    }
}
