// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! JFIF YCbCr → RGB conversion.

use super::image::Rgb;

/// Chroma value used when a scan carries no Cb/Cr channel.
pub const NEUTRAL_CHROMA: u8 = 128;

fn clamp_round(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert one full-range JFIF YCbCr sample to RGB.
pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> Rgb {
    let y = f64::from(y);
    let cb = f64::from(cb) - 128.0;
    let cr = f64::from(cr) - 128.0;
    Rgb {
        r: clamp_round(y + 1.402 * cr),
        g: clamp_round(y - 0.344136 * cb - 0.714136 * cr),
        b: clamp_round(y + 1.772 * cb),
    }
}
