//! Fixed-width scalar encoding used by frame headers.
//!
//! Integers are written unsigned big-endian through `BufMut`. Callers narrow
//! wider counts with [`saturating_u32`] before framing.

use bytes::{BufMut, BytesMut};

/// Append `count` zero bytes.
#[inline]
pub fn put_zero_pad(buf: &mut BytesMut, count: usize) {
    buf.put_bytes(0, count);
}

/// Narrow a driver-reported count or id to the 32-bit wire width.
#[inline]
pub fn saturating_u32(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
