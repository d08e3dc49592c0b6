// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Decoding of a single 8×8 block of one channel: entropy decode,
//! dequantization, zig-zag reorder, inverse DCT and level shift.

use super::bitio::BitReader;
use super::error::{JpegError, Result};
use super::huffman::{extend_sign, HuffmanTree, MAX_CODE_LENGTH};
use super::idct::{prescale, InverseDct};
use super::tables::QuantTable;
use super::zigzag;

/// Largest DC difference category for 8-bit samples.
const MAX_DC_SIZE: u8 = 11;

/// Huffman trees used for one scan channel.
pub struct BlockTables {
    pub dc: HuffmanTree,
    pub ac: HuffmanTree,
}

/// Read bits until `tree` yields a symbol.
pub fn decode_symbol(reader: &mut BitReader, tree: &mut HuffmanTree) -> Result<u8> {
    for _ in 0..MAX_CODE_LENGTH {
        if let Some(symbol) = tree.decode(reader.read_bit()?)? {
            return Ok(symbol);
        }
    }
    Err(JpegError::HuffmanOverrun)
}

/// Read `size` additional bits and sign-extend them.
fn receive_extend(reader: &mut BitReader, size: u8) -> Result<i16> {
    let bits = reader.read_bits(size)?;
    Ok(extend_sign(bits, size))
}

/// Entropy-decode one block into zig-zag order.
///
/// `predictor` is the channel's running DC value; it is updated in place.
pub fn decode_coefficients(
    reader: &mut BitReader,
    tables: &mut BlockTables,
    predictor: &mut i16,
) -> Result<[i16; 64]> {
    let mut zz = [0i16; 64];

    let dc_size = decode_symbol(reader, &mut tables.dc)?;
    if dc_size > MAX_DC_SIZE {
        return Err(JpegError::InvalidCode);
    }
    let diff = receive_extend(reader, dc_size)?;
    *predictor = predictor.wrapping_add(diff);
    zz[0] = *predictor;

    let mut k = 1usize;
    while k < 64 {
        let rs = decode_symbol(reader, &mut tables.ac)?;
        if rs == 0x00 {
            // EOB
            break;
        }
        let run = (rs >> 4) as usize;
        let size = rs & 0x0F;
        k += run;
        if k > 63 {
            return Err(JpegError::BlockOverrun(k));
        }
        zz[k] = receive_extend(reader, size)?;
        k += 1;
    }

    Ok(zz)
}

/// Multiply each zig-zag coefficient by the table entry at the same position,
/// in wrapping 16-bit arithmetic.
pub fn dequantize(zz: &[i16; 64], qt: &QuantTable) -> [i16; 64] {
    let mut out = [0i16; 64];
    for (o, (&c, &q)) in out.iter_mut().zip(zz.iter().zip(qt.values.iter())) {
        *o = c.wrapping_mul(q as i16);
    }
    out
}

/// Dequantized zig-zag block → level-shifted 8-bit samples, row-major.
pub fn reconstruct<I: InverseDct + ?Sized>(dequantized: &[i16; 64], idct: &I) -> [u8; 64] {
    let natural = zigzag::to_natural(dequantized);
    let coeffs: [f64; 64] = natural.map(f64::from);
    let spatial = idct.inverse(&prescale(&coeffs));
    spatial.map(|v| (v + 128.0).round().clamp(0.0, 255.0) as u8)
}

/// Decode one complete block of a channel.
pub fn decode_block<I: InverseDct + ?Sized>(
    reader: &mut BitReader,
    tables: &mut BlockTables,
    qt: &QuantTable,
    predictor: &mut i16,
    idct: &I,
) -> Result<[u8; 64]> {
    let zz = decode_coefficients(reader, tables, predictor)?;
    Ok(reconstruct(&dequantize(&zz, qt), idct))
}
