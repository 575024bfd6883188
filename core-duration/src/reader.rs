//! Bounded byte-buffer reader
//!
//! Every parser in this crate works over a whole-file byte slice through
//! this cursor. All reads are range-checked: running off the end of the
//! buffer is a [`DurationError::MalformedContainer`] naming the offset, so
//! corrupt size fields can never cause a panic or an out-of-bounds access.

use crate::error::{DurationError, Result};

/// Sequential/random-access cursor over an in-memory byte buffer.
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Total buffer length, independent of the cursor.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Move the cursor to an absolute offset. Seeking exactly to the end is
    /// allowed (a subsequent read fails); seeking past it is not.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(DurationError::MalformedContainer(format!(
                "seek to offset {} beyond buffer of {} bytes",
                pos,
                self.buf.len()
            )));
        }
        self.pos = pos;
        Ok(())
    }

    /// Advance the cursor by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        let target = self.pos.checked_add(n).ok_or_else(|| {
            DurationError::MalformedContainer(format!("skip of {} bytes overflows offset", n))
        })?;
        self.seek(target)
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(DurationError::MalformedContainer(format!(
                "unexpected end of data: need {} bytes at offset {}, {} available",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a 4-byte ASCII identifier (RIFF chunk id, VBR tag, ...).
    pub fn read_tag4(&mut self) -> Result<[u8; 4]> {
        let b = self.read_bytes(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }
}
