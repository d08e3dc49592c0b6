// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # jfif-decoder
//!
//! Pure-Rust decoder for baseline (sequential, Huffman-coded, 8-bit) JPEG
//! files. Produces an RGB bitmap plus the file's COM text.
//!
//! The decoder walks the marker segments in stream order, collects the
//! quantization and Huffman tables, and decodes the single scan block by
//! block: entropy decode, dequantize, inverse DCT, YCbCr to RGB. Output goes
//! through the [`ImageSink`] trait; [`Image`] is the built-in sink. The
//! inverse DCT is pluggable through [`InverseDct`].
//!
//! Logging uses the `log` facade; no logger is installed by the library.
//!
//! # Quick start
//!
//! ```rust,ignore
//! let data = std::fs::read("photo.jpg").unwrap();
//! let image = jfif_decoder::decode(&data).unwrap();
//! println!("{}x{}", image.width(), image.height());
//! ```

pub mod jpeg;

pub use jpeg::error::{JpegError, Result};
pub use jpeg::idct::{CosineIdct, InverseDct};
pub use jpeg::image::{Image, ImageSink, Rgb};
pub use jpeg::{decode, decode_reader, Decoder};
