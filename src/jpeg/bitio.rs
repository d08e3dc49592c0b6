// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Byte- and bit-level input for JPEG decoding.
//!
//! [`ByteReader`] is a forward-only cursor used by the marker parser.
//! [`BitReader`] borrows it for the entropy-coded scan and removes JPEG
//! byte-stuffing (0xFF 0x00 -> 0xFF), MSB first.

use super::error::{JpegError, Result};

/// Sequential cursor over the JPEG byte stream. Never seeks backwards.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(JpegError::UnexpectedEndOfStream)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read a big-endian 16-bit value.
    pub fn read_u16(&mut self) -> Result<u16> {
        let hi = self.read_u8()?;
        let lo = self.read_u8()?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(JpegError::UnexpectedEndOfStream)?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }
}

/// Bit-level reader for JPEG entropy-coded data.
///
/// Holds at most one byte. After a 0xFF byte has been loaded, the byte that
/// follows is a stuffed 0x00 and is discarded before the next load.
pub struct BitReader<'r, 'a> {
    bytes: &'r mut ByteReader<'a>,
    buf: u8,
    bits_left: u8,
    /// The byte in `buf` was 0xFF; its stuffed 0x00 has not been skipped yet.
    stuffed_pending: bool,
}

impl<'r, 'a> BitReader<'r, 'a> {
    /// Start reading bits at the current position of `bytes`
    /// (the first byte after the SOS header).
    pub fn new(bytes: &'r mut ByteReader<'a>) -> Self {
        Self {
            bytes,
            buf: 0,
            bits_left: 0,
            stuffed_pending: false,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bits_left == 0 {
            if self.stuffed_pending {
                self.bytes.read_u8()?;
                self.stuffed_pending = false;
            }
            self.buf = self.bytes.read_u8()?;
            self.stuffed_pending = self.buf == 0xFF;
            self.bits_left = 8;
        }
        self.bits_left -= 1;
        Ok((self.buf >> self.bits_left) & 1 == 1)
    }

    /// Read `count` bits (0–16) and return them right-aligned.
    pub fn read_bits(&mut self, count: u8) -> Result<u16> {
        debug_assert!(count <= 16);
        let mut val = 0u16;
        for _ in 0..count {
            val = (val << 1) | u16::from(self.read_bit()?);
        }
        Ok(val)
    }

    /// End of the entropy-coded segment: the padding bits of the current byte
    /// are dropped, and so is the stuffed 0x00 after a final 0xFF byte.
    pub fn finish(self) {
        if self.stuffed_pending && self.bytes.peek_u8() == Some(0x00) {
            self.bytes.pos += 1;
        }
    }
}
