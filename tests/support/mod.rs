// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Synthetic JPEG stream assembly for the integration tests.
//!
//! [`JpegBuilder`] writes marker segments; [`ScanEncoder`] produces the
//! entropy-coded data of a baseline scan from per-block coefficients.

#![allow(dead_code)]

use std::collections::HashMap;

pub const SOF0: u8 = 0xC0;
pub const DHT: u8 = 0xC4;
pub const DQT: u8 = 0xDB;
pub const SOS: u8 = 0xDA;
pub const COM: u8 = 0xFE;

/// DC table: categories 0..=11, each a 4-bit code equal to the category.
pub fn dc_table() -> ([u8; 16], Vec<u8>) {
    let mut bits = [0u8; 16];
    bits[3] = 12;
    (bits, (0..12).collect())
}

/// AC table: EOB as "00", then every (run, size) symbol plus ZRL as
/// 8-bit codes.
pub fn ac_table() -> ([u8; 16], Vec<u8>) {
    let mut values = vec![0x00];
    for run in 0..16u8 {
        for size in 1..=10u8 {
            values.push(run << 4 | size);
        }
    }
    values.push(0xF0);
    let mut bits = [0u8; 16];
    bits[1] = 1;
    bits[7] = (values.len() - 1) as u8;
    (bits, values)
}

/// Bit-level writer with JPEG byte-stuffing (0xFF -> 0xFF 0x00), MSB first.
pub struct BitWriter {
    output: Vec<u8>,
    buf: u8,
    bits_used: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            buf: 0,
            bits_used: 0,
        }
    }

    /// Write the low `count` bits (0–16) of `value`.
    pub fn write_bits(&mut self, value: u16, count: u8) {
        for i in (0..count).rev() {
            let bit = (value >> i) & 1;
            self.buf = (self.buf << 1) | bit as u8;
            self.bits_used += 1;
            if self.bits_used == 8 {
                self.emit_byte(self.buf);
                self.buf = 0;
                self.bits_used = 0;
            }
        }
    }

    /// Pad the last byte with 1-bits and return the stream.
    pub fn flush(mut self) -> Vec<u8> {
        if self.bits_used > 0 {
            let remaining = 8 - self.bits_used;
            self.buf = (self.buf << remaining) | ((1u8 << remaining) - 1);
            self.emit_byte(self.buf);
        }
        self.output
    }

    fn emit_byte(&mut self, byte: u8) {
        self.output.push(byte);
        if byte == 0xFF {
            self.output.push(0x00);
        }
    }
}

/// Canonical Huffman code assignment (ITU-T T.81 Annex C).
pub struct HuffmanEncoder {
    codes: HashMap<u8, (u16, u8)>,
}

impl HuffmanEncoder {
    pub fn new(bits: &[u8; 16], values: &[u8]) -> Self {
        let mut codes = HashMap::new();
        let mut code = 0u16;
        let mut k = 0;
        for (i, &count) in bits.iter().enumerate() {
            for _ in 0..count {
                codes.insert(values[k], (code, i as u8 + 1));
                code += 1;
                k += 1;
            }
            code <<= 1;
        }
        Self { codes }
    }

    pub fn encode(&self, w: &mut BitWriter, symbol: u8) {
        let (code, len) = self.codes[&symbol];
        w.write_bits(code, len);
    }
}

/// Magnitude category and additional bits of a coefficient value.
pub fn encode_value(value: i32) -> (u8, u16) {
    if value == 0 {
        return (0, 0);
    }
    let size = (32 - value.unsigned_abs().leading_zeros()) as u8;
    let bits = if value > 0 {
        value as u16
    } else {
        (value + (1 << size) - 1) as u16
    };
    (size, bits)
}

/// Entropy coder for a baseline scan; all channels use DC/AC table 0.
pub struct ScanEncoder {
    writer: BitWriter,
    dc: HuffmanEncoder,
    ac: HuffmanEncoder,
    predictors: [i32; 3],
}

impl ScanEncoder {
    pub fn new() -> Self {
        let (dc_bits, dc_values) = dc_table();
        let (ac_bits, ac_values) = ac_table();
        Self {
            writer: BitWriter::new(),
            dc: HuffmanEncoder::new(&dc_bits, &dc_values),
            ac: HuffmanEncoder::new(&ac_bits, &ac_values),
            predictors: [0; 3],
        }
    }

    /// Encode one block of scan slot `slot`: absolute quantized DC value and
    /// `(zig-zag index, value)` AC pairs in increasing index order.
    pub fn block(&mut self, slot: usize, dc: i32, ac: &[(usize, i32)]) {
        let diff = dc - self.predictors[slot];
        self.predictors[slot] = dc;
        let (size, bits) = encode_value(diff);
        self.dc.encode(&mut self.writer, size);
        self.writer.write_bits(bits, size);

        let mut last = 0usize;
        for &(k, value) in ac {
            let mut run = k - last - 1;
            while run >= 16 {
                self.ac.encode(&mut self.writer, 0xF0);
                run -= 16;
            }
            let (size, bits) = encode_value(value);
            self.ac.encode(&mut self.writer, (run as u8) << 4 | size);
            self.writer.write_bits(bits, size);
            last = k;
        }
        if last < 63 {
            self.ac.encode(&mut self.writer, 0x00);
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.flush()
    }
}

/// Marker-level JPEG stream builder. Starts with SOI.
pub struct JpegBuilder {
    out: Vec<u8>,
}

impl JpegBuilder {
    pub fn new() -> Self {
        Self {
            out: vec![0xFF, 0xD8],
        }
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.out.extend_from_slice(bytes);
        self
    }

    pub fn segment(mut self, marker: u8, body: &[u8]) -> Self {
        self.out.extend_from_slice(&[0xFF, marker]);
        self.out
            .extend_from_slice(&((body.len() + 2) as u16).to_be_bytes());
        self.out.extend_from_slice(body);
        self
    }

    /// 8-bit quantization table with every entry equal to `value`.
    pub fn dqt(self, id: u8, value: u8) -> Self {
        let mut body = vec![id];
        body.extend_from_slice(&[value; 64]);
        self.segment(DQT, &body)
    }

    /// DC and AC table 0 from [`dc_table`] and [`ac_table`], one segment.
    pub fn dht(self) -> Self {
        let mut body = Vec::new();
        for (tc_th, (bits, values)) in [(0x00u8, dc_table()), (0x10, ac_table())] {
            body.push(tc_th);
            body.extend_from_slice(&bits);
            body.extend_from_slice(&values);
        }
        self.segment(DHT, &body)
    }

    /// SOF0 with `(id, sampling byte, quant table)` per channel.
    pub fn sof(self, width: u16, height: u16, channels: &[(u8, u8, u8)]) -> Self {
        let mut body = vec![8];
        body.extend_from_slice(&height.to_be_bytes());
        body.extend_from_slice(&width.to_be_bytes());
        body.push(channels.len() as u8);
        for &(id, sampling, tq) in channels {
            body.extend_from_slice(&[id, sampling, tq]);
        }
        self.segment(SOF0, &body)
    }

    /// SOS header with explicit spectral/approximation bytes, then `data`.
    pub fn sos_with_params(self, ids: &[u8], params: [u8; 3], data: &[u8]) -> Self {
        let mut body = vec![ids.len() as u8];
        for &id in ids {
            body.extend_from_slice(&[id, 0x00]);
        }
        body.extend_from_slice(&params);
        self.segment(SOS, &body).raw(data)
    }

    /// Baseline SOS header for channels `ids` (tables 0/0), then `data`.
    pub fn sos(self, ids: &[u8], data: &[u8]) -> Self {
        self.sos_with_params(ids, [0x00, 0x3F, 0x00], data)
    }

    pub fn comment(self, text: &str) -> Self {
        self.segment(COM, text.as_bytes())
    }

    /// Append EOI and return the stream.
    pub fn eoi(self) -> Vec<u8> {
        self.raw(&[0xFF, 0xD9]).out
    }

    /// Return the stream without EOI.
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}

/// Grayscale stream of DC-only blocks with quant table value `q`, blocks in
/// raster order.
pub fn gray_dc_only(width: u16, height: u16, q: u8, dcs: &[i32]) -> Vec<u8> {
    let mut scan = ScanEncoder::new();
    for &dc in dcs {
        scan.block(0, dc, &[]);
    }
    JpegBuilder::new()
        .dqt(0, q)
        .dht()
        .sof(width, height, &[(1, 0x11, 0)])
        .sos(&[1], &scan.finish())
        .eoi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_categories() {
        assert_eq!(encode_value(0), (0, 0));
        assert_eq!(encode_value(1), (1, 1));
        assert_eq!(encode_value(-1), (1, 0));
        assert_eq!(encode_value(5), (3, 0b101));
        assert_eq!(encode_value(-5), (3, 0b010));
        assert_eq!(encode_value(255), (8, 255));
    }
}
