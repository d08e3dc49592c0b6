// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Huffman decoding for JPEG entropy-coded data.
//!
//! The decode table is a binary tree stored as an arena of nodes. It is built
//! by a depth-first walk over the DHT code counts, which yields exactly the
//! canonical code assignment of ITU-T T.81 Annex C, and is then walked one
//! bit at a time during scan decoding.

use super::error::{JpegError, Result};

/// Maximum Huffman code length in JPEG.
pub const MAX_CODE_LENGTH: usize = 16;

#[derive(Debug, Clone, Default)]
struct Node {
    /// Child for bit 0 and bit 1, as arena indices.
    children: [Option<u32>; 2],
    /// Set on leaves.
    symbol: Option<u8>,
}

/// Bit-serial Huffman decoder.
///
/// The cursor points at the current internal node and returns to the root
/// after every decoded symbol.
#[derive(Debug, Clone, Default)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    cursor: usize,
}

struct Builder<'v> {
    nodes: Vec<Node>,
    counts: [u8; MAX_CODE_LENGTH],
    remaining: usize,
    values: &'v [u8],
    next_value: usize,
}

impl Builder<'_> {
    /// Attach both children of `parent`, whose children sit at `depth`.
    fn grow(&mut self, parent: usize, depth: usize) -> Result<()> {
        for bit in 0..2 {
            if self.remaining == 0 {
                return Ok(());
            }
            let child = self.nodes.len();
            self.nodes.push(Node::default());
            self.nodes[parent].children[bit] = Some(child as u32);

            if self.counts[depth - 1] > 0 {
                self.counts[depth - 1] -= 1;
                self.remaining -= 1;
                let symbol = *self
                    .values
                    .get(self.next_value)
                    .ok_or(JpegError::TableExhausted)?;
                self.next_value += 1;
                self.nodes[child].symbol = Some(symbol);
            } else if depth < MAX_CODE_LENGTH {
                self.grow(child, depth + 1)?;
            }
        }
        Ok(())
    }
}

impl HuffmanTree {
    /// Build a tree from JPEG-style counts and symbols.
    ///
    /// `bits[i]` is the number of codes of length `i + 1`; `values` lists the
    /// symbols in order of increasing code length. All-zero counts give an
    /// empty tree.
    pub fn build(bits: &[u8; MAX_CODE_LENGTH], values: &[u8]) -> Result<Self> {
        let remaining: usize = bits.iter().map(|&b| b as usize).sum();
        let mut builder = Builder {
            nodes: Vec::new(),
            counts: *bits,
            remaining,
            values,
            next_value: 0,
        };
        if remaining > 0 {
            builder.nodes.push(Node::default());
            builder.grow(0, 1)?;
        }
        if builder.next_value != values.len() {
            return Err(JpegError::TableSizeMismatch);
        }
        Ok(Self {
            nodes: builder.nodes,
            cursor: 0,
        })
    }

    /// True when the table defines no codes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Advance by one bit. Returns the symbol when a leaf is reached, `None`
    /// when more bits are needed.
    pub fn decode(&mut self, bit: bool) -> Result<Option<u8>> {
        let node = self.nodes.get(self.cursor).ok_or(JpegError::EmptyTree)?;
        let next = node.children[usize::from(bit)].ok_or(JpegError::InvalidCode)? as usize;
        match self.nodes[next].symbol {
            Some(symbol) => {
                self.cursor = 0;
                Ok(Some(symbol))
            }
            None => {
                self.cursor = next;
                Ok(None)
            }
        }
    }

    /// Return the cursor to the root.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// Extend a signed value from its JPEG "additional bits" representation.
///
/// Per ITU-T T.81 Table F.1: if the high bit is 0, the value is negative and
/// its magnitude is the one's complement of the bits.
pub fn extend_sign(value: u16, bits: u8) -> i16 {
    if bits == 0 {
        return 0;
    }
    let half = 1i32 << (bits - 1);
    if (value as i32) < half {
        (value as i32 - (1i32 << bits) + 1) as i16
    } else {
        value as i16
    }
}
