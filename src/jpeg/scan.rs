// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Baseline scan decoding.
//!
//! Parses the SOS header, then walks the interleaved MCUs: `h * v` luma
//! blocks followed by one Cb and one Cr block, each MCU converted to RGB and
//! written into the image sink. DC prediction runs per scan channel for the
//! whole scan.

use log::debug;

use super::bitio::{BitReader, ByteReader};
use super::block::{decode_block, BlockTables};
use super::color::{ycbcr_to_rgb, NEUTRAL_CHROMA};
use super::error::{JpegError, Result};
use super::frame::{FrameInfo, MAX_CHANNELS};
use super::idct::InverseDct;
use super::image::ImageSink;
use super::marker::read_length;
use super::tables::{HuffmanTables, QuantTable, TableClass, TABLE_SLOTS};

/// Spectral selection and successive approximation bytes of a baseline scan
/// (Ss, Se, Ah/Al).
const BASELINE_SCAN_PARAMS: [u8; 3] = [0x00, 0x3F, 0x00];

/// Component selector for one scan channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanComponent {
    /// Index into `FrameInfo::channels`.
    pub channel: usize,
    /// DC Huffman table ID.
    pub dc_table: usize,
    /// AC Huffman table ID.
    pub ac_table: usize,
}

/// Parse an SOS header (positioned at its length field).
///
/// Every referenced channel must exist in the frame and every referenced
/// Huffman table must be defined and non-empty.
pub fn parse_sos(
    r: &mut ByteReader,
    frame: &FrameInfo,
    huffman: &HuffmanTables,
) -> Result<Vec<ScanComponent>> {
    let body_len = read_length(r, "SOS")?;
    let count = r.read_u8()?;
    if count == 0 || count as usize > MAX_CHANNELS {
        return Err(JpegError::UnsupportedChannelCount(count));
    }
    if body_len != 4 + 2 * count as usize {
        return Err(JpegError::MalformedSectionLength("SOS"));
    }

    let mut components = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let channel_id = r.read_u8()?;
        let td_ta = r.read_u8()?;
        let (channel, _) = frame
            .channel(channel_id)
            .ok_or(JpegError::MissingPrecondition("scan channel not declared in SOF"))?;
        let dc_table = (td_ta >> 4) as usize;
        let ac_table = (td_ta & 0x0F) as usize;
        huffman.require(TableClass::Dc, dc_table)?;
        huffman.require(TableClass::Ac, ac_table)?;
        components.push(ScanComponent {
            channel,
            dc_table,
            ac_table,
        });
    }

    let mut params = [0u8; 3];
    for p in params.iter_mut() {
        *p = r.read_u8()?;
    }
    if params != BASELINE_SCAN_PARAMS {
        return Err(JpegError::InvalidProgressiveParameters);
    }

    Ok(components)
}

/// MCU grid size in MCUs: `(columns, rows)`, from the first scan channel's
/// sampling factors.
pub fn mcu_grid(width: usize, height: usize, h: usize, v: usize) -> (usize, usize) {
    (width.div_ceil(8 * h), height.div_ceil(8 * v))
}

/// Decode the entropy-coded data that follows an SOS header and write the
/// pixels into `sink`.
///
/// On return `r` is positioned after the last scan byte.
#[allow(clippy::too_many_arguments)]
pub fn decode_scan<S, I>(
    r: &mut ByteReader,
    frame: &FrameInfo,
    components: &[ScanComponent],
    quant_tables: &[Option<QuantTable>; TABLE_SLOTS],
    huffman: &HuffmanTables,
    sink: &mut S,
    idct: &I,
) -> Result<()>
where
    S: ImageSink + ?Sized,
    I: InverseDct + ?Sized,
{
    // Per scan slot: Huffman trees and quantization table.
    let mut slots: Vec<(BlockTables, &QuantTable)> = Vec::with_capacity(components.len());
    for sc in components {
        let tables = BlockTables {
            dc: huffman.require(TableClass::Dc, sc.dc_table)?.build_tree()?,
            ac: huffman.require(TableClass::Ac, sc.ac_table)?.build_tree()?,
        };
        let qt_id = frame.channels[sc.channel].quant_table_id as usize;
        let qt = quant_tables[qt_id]
            .as_ref()
            .ok_or(JpegError::MissingPrecondition("quantization table for channel"))?;
        slots.push((tables, qt));
    }
    let (luma, chroma) = slots
        .split_first_mut()
        .ok_or(JpegError::UnsupportedChannelCount(0))?;

    let luma_channel = &frame.channels[components[0].channel];
    let h = luma_channel.h_sampling as usize;
    let v = luma_channel.v_sampling as usize;
    let (width, height) = (sink.width(), sink.height());
    let (mcu_cols, mcu_rows) = mcu_grid(width, height, h, v);
    debug!(
        "SOS: {} channel(s), luma sampling {h}x{v}, {mcu_cols}x{mcu_rows} MCUs",
        components.len()
    );

    let mut predictors = [0i16; MAX_CHANNELS];
    let mut luma_blocks = vec![[0u8; 64]; h * v];
    let mut chroma_blocks = [[NEUTRAL_CHROMA; 64]; MAX_CHANNELS - 1];
    let mut reader = BitReader::new(r);

    for mcu_row in 0..mcu_rows {
        for mcu_col in 0..mcu_cols {
            for block in luma_blocks.iter_mut() {
                *block = decode_block(&mut reader, &mut luma.0, luma.1, &mut predictors[0], idct)?;
            }
            for (i, (tables, qt)) in chroma.iter_mut().enumerate() {
                chroma_blocks[i] =
                    decode_block(&mut reader, tables, *qt, &mut predictors[i + 1], idct)?;
            }

            for i in 0..8 * v {
                let row = mcu_row * 8 * v + i;
                if row >= height {
                    break;
                }
                for j in 0..8 * h {
                    let col = mcu_col * 8 * h + j;
                    if col >= width {
                        break;
                    }
                    let y = luma_blocks[(i / 8) * h + j / 8][(i % 8) * 8 + j % 8];
                    let c = (i / v) * 8 + j / h;
                    let cb = chroma_blocks[0][c];
                    let cr = chroma_blocks[1][c];
                    sink.set_pixel(row, col, ycbcr_to_rgb(y, cb, cr));
                }
            }
        }
    }

    reader.finish();
    Ok(())
}
