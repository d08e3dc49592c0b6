// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for JPEG decoding.

use std::fmt;

/// Errors that can occur while decoding a baseline JPEG stream.
///
/// Every variant is fatal: a malformed section desynchronizes the rest of the
/// stream, so decoding stops at the first error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JpegError {
    /// Input ended where more bytes were required.
    UnexpectedEndOfStream,
    /// The stream does not begin with SOI (0xFFD8).
    MissingStartMarker,
    /// The stream ended before EOI (0xFFD9).
    MissingEoi,
    /// Bytes follow the EOI marker.
    TrailingData,
    /// Marker type byte not recognized by a baseline decoder.
    UnknownMarker(u8),
    /// A known marker in a position where it is not allowed (second SOF,
    /// anything but EOI after the scan).
    UnexpectedMarker(u8),
    /// A quantization or Huffman table id defined twice.
    DuplicateTableId(u8),
    /// Table id byte with an out-of-range precision/class or id nibble.
    InvalidTableId(u8),
    /// A section's content does not agree with its declared length.
    MalformedSectionLength(&'static str),
    /// A section references state that has not been declared yet.
    MissingPrecondition(&'static str),
    /// Sample precision other than 8 bits.
    UnsupportedPrecision(u8),
    /// Pixel count above [`MAX_PIXELS`](super::frame::MAX_PIXELS).
    ImageTooLarge { width: u16, height: u16 },
    /// Zero width/height or an invalid sampling factor.
    InvalidDimensions,
    /// Frame or scan channel count outside 1–3.
    UnsupportedChannelCount(u8),
    /// Channel id declared twice in SOF.
    DuplicateChannel(u8),
    /// No Huffman symbol after 16 bits.
    HuffmanOverrun,
    /// Bit sequence that is not a code of the active Huffman table.
    InvalidCode,
    /// AC run pushed the coefficient position past 63.
    BlockOverrun(usize),
    /// SOS spectral-selection bytes are not those of a baseline scan.
    InvalidProgressiveParameters,
    /// DHT code counts require more symbols than were supplied.
    TableExhausted,
    /// DHT supplied more symbols than its code counts describe.
    TableSizeMismatch,
    /// Decode attempted on a Huffman table without codes.
    EmptyTree,
    /// Reading the input failed.
    Io(String),
}

impl fmt::Display for JpegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEndOfStream => write!(f, "unexpected end of JPEG data"),
            Self::MissingStartMarker => write!(f, "missing SOI marker (not a JPEG)"),
            Self::MissingEoi => write!(f, "stream ended before EOI marker"),
            Self::TrailingData => write!(f, "data after EOI marker"),
            Self::UnknownMarker(m) => write!(f, "unknown JPEG marker: 0xFF{m:02X}"),
            Self::UnexpectedMarker(m) => write!(f, "unexpected JPEG marker: 0xFF{m:02X}"),
            Self::DuplicateTableId(id) => write!(f, "table ID {id} defined twice"),
            Self::InvalidTableId(b) => write!(f, "invalid table ID byte: 0x{b:02X}"),
            Self::MalformedSectionLength(what) => write!(f, "malformed {what} section length"),
            Self::MissingPrecondition(what) => write!(f, "missing precondition: {what}"),
            Self::UnsupportedPrecision(p) => write!(f, "unsupported sample precision: {p}-bit"),
            Self::ImageTooLarge { width, height } => {
                write!(f, "image too large: {width}x{height}")
            }
            Self::InvalidDimensions => write!(f, "invalid image dimensions or sampling factors"),
            Self::UnsupportedChannelCount(n) => write!(f, "unsupported channel count: {n}"),
            Self::DuplicateChannel(id) => write!(f, "channel ID {id} declared twice"),
            Self::HuffmanOverrun => write!(f, "Huffman code longer than 16 bits"),
            Self::InvalidCode => write!(f, "invalid Huffman code in scan data"),
            Self::BlockOverrun(pos) => write!(f, "AC run overruns block (position {pos})"),
            Self::InvalidProgressiveParameters => {
                write!(f, "scan parameters are not baseline (expected 0, 63, 0)")
            }
            Self::TableExhausted => write!(f, "Huffman table has fewer symbols than codes"),
            Self::TableSizeMismatch => write!(f, "Huffman table has more symbols than codes"),
            Self::EmptyTree => write!(f, "Huffman table is empty"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for JpegError {}

impl From<std::io::Error> for JpegError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JpegError>;
