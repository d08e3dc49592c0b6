// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! JPEG marker reading and the sections that carry no decode state
//! (COM, APPn).

use log::{trace, warn};

use super::bitio::ByteReader;
use super::error::{JpegError, Result};

/// JPEG marker constants (the byte after 0xFF).
pub const SOI: u8 = 0xD8;
pub const EOI: u8 = 0xD9;
pub const SOF0: u8 = 0xC0;
pub const DHT: u8 = 0xC4;
pub const DQT: u8 = 0xDB;
pub const SOS: u8 = 0xDA;
pub const COM: u8 = 0xFE;
pub const APP0: u8 = 0xE0;
pub const APP15: u8 = 0xEF;

/// Read the next marker and return its type byte.
///
/// Extra 0xFF fill bytes before the type byte are skipped. Running out of
/// input here means the stream never reached EOI.
pub fn read_marker(r: &mut ByteReader) -> Result<u8> {
    let eoi_missing = |_| JpegError::MissingEoi;
    let first = r.read_u8().map_err(eoi_missing)?;
    if first != 0xFF {
        return Err(JpegError::UnknownMarker(first));
    }
    let mut kind = r.read_u8().map_err(eoi_missing)?;
    while kind == 0xFF {
        warn!("skipping fill byte before marker at offset {}", r.position());
        kind = r.read_u8().map_err(eoi_missing)?;
    }
    trace!("marker 0xFF{kind:02X} at offset {}", r.position() - 2);
    Ok(kind)
}

/// Read a segment length field and return the number of body bytes that
/// follow it (the field counts its own two bytes).
pub fn read_length(r: &mut ByteReader, section: &'static str) -> Result<usize> {
    let length = r.read_u16()? as usize;
    length
        .checked_sub(2)
        .ok_or(JpegError::MalformedSectionLength(section))
}

/// Parse a COM segment. A NUL byte right after the text is consumed if
/// present.
pub fn read_comment(r: &mut ByteReader) -> Result<String> {
    let len = read_length(r, "COM")?;
    let text = r.read_bytes(len)?;
    if r.peek_u8() == Some(0) {
        r.skip(1)?;
    }
    let comment = String::from_utf8_lossy(text).into_owned();
    if std::str::from_utf8(text).is_err() {
        warn!("COM segment is not valid UTF-8; replaced invalid sequences");
    }
    Ok(comment)
}

/// Skip an APPn segment; application data is not retained.
pub fn skip_app(r: &mut ByteReader) -> Result<()> {
    let len = read_length(r, "APPn")?;
    r.skip(len)
}

pub fn is_app(marker: u8) -> bool {
    (APP0..=APP15).contains(&marker)
}
