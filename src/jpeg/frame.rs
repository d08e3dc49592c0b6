// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! JPEG frame header (SOF0) parsing.
//!
//! Extracts image dimensions and the channel descriptors (sampling factors
//! and quantization table references) from the Start of Frame segment.

use log::debug;

use super::bitio::ByteReader;
use super::error::{JpegError, Result};
use super::marker::read_length;
use super::tables::{QuantTable, TABLE_SLOTS};

/// Largest accepted `width * height`.
pub const MAX_PIXELS: u64 = 80_000_000;

/// Most colour channels a frame or scan may carry (Y, Cb, Cr).
pub const MAX_CHANNELS: usize = 3;

/// One image channel (component) from SOF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Channel ID (typically 1=Y, 2=Cb, 3=Cr).
    pub id: u8,
    /// Horizontal sampling factor (1–4), high nibble of the thinning byte.
    pub h_sampling: u8,
    /// Vertical sampling factor (1–4), low nibble of the thinning byte.
    pub v_sampling: u8,
    /// Quantization table ID (0–3).
    pub quant_table_id: u8,
}

/// Frame information parsed from SOF0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    /// Sample precision in bits (always 8).
    pub precision: u8,
    pub height: u16,
    pub width: u16,
    pub channels: Vec<Channel>,
}

impl FrameInfo {
    /// Index and descriptor of the channel with the given ID.
    pub fn channel(&self, id: u8) -> Option<(usize, &Channel)> {
        self.channels.iter().enumerate().find(|(_, c)| c.id == id)
    }
}

/// Parse a SOF0 segment (positioned at its length field).
///
/// Every channel's quantization table must already be defined.
pub fn parse_sof(
    r: &mut ByteReader,
    quant_tables: &[Option<QuantTable>; TABLE_SLOTS],
) -> Result<FrameInfo> {
    let body_len = read_length(r, "SOF")?;

    let precision = r.read_u8()?;
    if precision != 8 {
        return Err(JpegError::UnsupportedPrecision(precision));
    }

    let height = r.read_u16()?;
    let width = r.read_u16()?;
    if u64::from(width) * u64::from(height) > MAX_PIXELS {
        return Err(JpegError::ImageTooLarge { width, height });
    }
    if width == 0 || height == 0 {
        return Err(JpegError::InvalidDimensions);
    }

    let count = r.read_u8()?;
    if count == 0 || count as usize > MAX_CHANNELS {
        return Err(JpegError::UnsupportedChannelCount(count));
    }
    if body_len != 6 + 3 * count as usize {
        return Err(JpegError::MalformedSectionLength("SOF"));
    }

    let mut channels: Vec<Channel> = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let id = r.read_u8()?;
        let thinning = r.read_u8()?;
        let quant_table_id = r.read_u8()?;

        if channels.iter().any(|c| c.id == id) {
            return Err(JpegError::DuplicateChannel(id));
        }
        let h_sampling = thinning >> 4;
        let v_sampling = thinning & 0x0F;
        if !(1..=4).contains(&h_sampling) || !(1..=4).contains(&v_sampling) {
            return Err(JpegError::InvalidDimensions);
        }
        let declared = quant_tables
            .get(quant_table_id as usize)
            .is_some_and(|t| t.is_some());
        if !declared {
            return Err(JpegError::MissingPrecondition("quantization table for channel"));
        }

        channels.push(Channel {
            id,
            h_sampling,
            v_sampling,
            quant_table_id,
        });
    }

    debug!(
        "SOF0: {width}x{height}, {} channel(s), sampling {:?}",
        channels.len(),
        channels
            .iter()
            .map(|c| (c.h_sampling, c.v_sampling))
            .collect::<Vec<_>>()
    );

    Ok(FrameInfo {
        precision,
        height,
        width,
        channels,
    })
}
