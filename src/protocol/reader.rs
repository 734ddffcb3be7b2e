//! Decoding of response primitives.
//!
//! Mirrors the client's fixed-offset parsing: integers are big-endian, a
//! block length byte below `0xFE` is the length itself, `0xFE` escapes a
//! 32-bit length, and `0xFF` is only legal where a row value is expected.

use thiserror::Error;

use super::block::{LONG_BLOCK_ESCAPE, NULL_MARKER};

/// Errors raised while decoding a response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("truncated input at offset {offset}: need {needed} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("NULL marker at offset {offset} where a block was expected")]
    UnexpectedNull { offset: usize },
}

/// Cursor over an encoded response.
#[derive(Debug, Clone)]
pub struct FrameReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::at(buf, 0)
    }

    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        if self.remaining() < n {
            return Err(ProtocolError::Truncated {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ProtocolError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, ProtocolError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Skip `count` padding bytes.
    pub fn skip(&mut self, count: usize) -> Result<(), ProtocolError> {
        self.take(count).map(|_| ())
    }

    pub fn read_block(&mut self) -> Result<&'a [u8], ProtocolError> {
        let start = self.pos;
        let len = match self.read_u8()? {
            NULL_MARKER => return Err(ProtocolError::UnexpectedNull { offset: start }),
            LONG_BLOCK_ESCAPE => self.read_u32()? as usize,
            short => short as usize,
        };
        self.take(len)
    }

    /// Read a block as text, replacing invalid UTF-8.
    pub fn read_block_string(&mut self) -> Result<String, ProtocolError> {
        self.read_block()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Read one row value: `None` for the NULL marker, else a block.
    pub fn read_value(&mut self) -> Result<Option<&'a [u8]>, ProtocolError> {
        if self.buf.get(self.pos) == Some(&NULL_MARKER) {
            self.pos += 1;
            return Ok(None);
        }
        self.read_block().map(Some)
    }
}
