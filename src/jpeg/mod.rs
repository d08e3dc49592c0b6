// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Pure-Rust baseline JPEG decoder.
//!
//! Reads a JFIF byte stream section by section, builds the quantization and
//! Huffman tables it declares, and decodes its single baseline scan into RGB
//! pixels.
//!
//! Supports:
//! - Baseline sequential DCT (SOF0), 8-bit precision
//! - Grayscale, YCbCr with or without chroma
//! - Luma sampling factors 1–4 in each direction, one chroma block per MCU
//! - COM text (kept), APPn segments (skipped)
//!
//! Does NOT support:
//! - Progressive, lossless, hierarchical or arithmetic-coded JPEG
//! - 12-bit precision
//! - Restart intervals (DRI), multiple scans
//! - Encoding

pub mod bitio;
pub mod block;
pub mod color;
pub mod error;
pub mod frame;
pub mod huffman;
pub mod idct;
pub mod image;
pub mod marker;
pub mod scan;
pub mod tables;
pub mod zigzag;

use std::io::Read;

use log::{debug, trace};

use bitio::ByteReader;
use error::{JpegError, Result};
use frame::{parse_sof, FrameInfo};
use idct::{CosineIdct, InverseDct};
use self::image::{Image, ImageSink};
use scan::{decode_scan, parse_sos};
use tables::{parse_dht, parse_dqt, HuffmanTables, QuantTable, TABLE_SLOTS};

/// State accumulated while walking the marker segments of one image.
#[derive(Debug, Default)]
struct Session {
    quant_tables: [Option<QuantTable>; TABLE_SLOTS],
    huffman: HuffmanTables,
    frame: Option<FrameInfo>,
    seen_dqt: bool,
    seen_dht: bool,
    scan_done: bool,
}

/// Baseline JPEG decoder over an in-memory byte stream.
///
/// The inverse DCT is pluggable through [`InverseDct`]; [`Decoder::new`]
/// uses [`CosineIdct`].
pub struct Decoder<'a, I: InverseDct = CosineIdct> {
    data: &'a [u8],
    idct: I,
}

impl<'a> Decoder<'a> {
    /// Decoder for `data` using the default [`CosineIdct`].
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_idct(data, CosineIdct::new())
    }
}

impl<'a, I: InverseDct> Decoder<'a, I> {
    /// Decoder for `data` using a caller-supplied inverse DCT.
    pub fn with_idct(data: &'a [u8], idct: I) -> Self {
        Self { data, idct }
    }

    /// Decode into a fresh [`Image`].
    pub fn decode(&self) -> Result<Image> {
        let mut image = Image::new();
        self.decode_into(&mut image)?;
        Ok(image)
    }

    /// Decode into a caller-provided sink.
    ///
    /// On error the sink may hold a partially decoded image.
    pub fn decode_into<S: ImageSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let mut r = ByteReader::new(self.data);
        let soi = r.read_u16().map_err(|_| JpegError::MissingStartMarker)?;
        if soi != u16::from_be_bytes([0xFF, marker::SOI]) {
            return Err(JpegError::MissingStartMarker);
        }

        let mut session = Session::default();
        loop {
            let m = marker::read_marker(&mut r)?;
            if m == marker::EOI {
                if !r.is_empty() {
                    return Err(JpegError::TrailingData);
                }
                trace!("EOI at offset {}", r.position() - 2);
                return Ok(());
            }
            if session.scan_done {
                return Err(JpegError::UnexpectedMarker(m));
            }
            self.dispatch(m, &mut r, &mut session, sink)?;
        }
    }

    fn dispatch<S: ImageSink + ?Sized>(
        &self,
        m: u8,
        r: &mut ByteReader,
        session: &mut Session,
        sink: &mut S,
    ) -> Result<()> {
        match m {
            marker::COM => {
                let comment = marker::read_comment(r)?;
                debug!("COM: {} byte(s)", comment.len());
                sink.set_comment(comment);
            }
            m if marker::is_app(m) => marker::skip_app(r)?,
            marker::DQT => {
                parse_dqt(r, &mut session.quant_tables)?;
                session.seen_dqt = true;
            }
            marker::SOF0 => {
                if session.frame.is_some() {
                    return Err(JpegError::UnexpectedMarker(m));
                }
                let frame = parse_sof(r, &session.quant_tables)?;
                sink.set_size(frame.width as usize, frame.height as usize);
                session.frame = Some(frame);
            }
            marker::DHT => {
                parse_dht(r, &mut session.huffman)?;
                session.seen_dht = true;
            }
            marker::SOS => {
                let frame = session
                    .frame
                    .as_ref()
                    .filter(|_| session.seen_dqt && session.seen_dht)
                    .ok_or(JpegError::MissingPrecondition("SOS before SOF, DQT and DHT"))?;
                let components = parse_sos(r, frame, &session.huffman)?;
                decode_scan(
                    r,
                    frame,
                    &components,
                    &session.quant_tables,
                    &session.huffman,
                    sink,
                    &self.idct,
                )?;
                session.scan_done = true;
            }
            other => return Err(JpegError::UnknownMarker(other)),
        }
        Ok(())
    }
}

/// Decode a complete JPEG file held in memory.
pub fn decode(data: &[u8]) -> Result<Image> {
    Decoder::new(data).decode()
}

/// Read a JPEG file from `reader` to its end and decode it.
pub fn decode_reader<R: Read>(mut reader: R) -> Result<Image> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decode(&data)
}
