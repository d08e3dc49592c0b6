// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Zig-zag scan order of 8×8 coefficient blocks.
//!
//! The order is generated by walking the anti-diagonals from (0,0),
//! reversing direction at every edge of the block.

/// Maps zig-zag index (0–63) to natural row-major index (row * 8 + col).
pub const ZIGZAG_TO_NATURAL: [usize; 64] = build_zigzag();

/// Maps natural row-major index to zig-zag index. Inverse of
/// [`ZIGZAG_TO_NATURAL`].
pub const NATURAL_TO_ZIGZAG: [usize; 64] = {
    let mut table = [0usize; 64];
    let mut i = 0;
    while i < 64 {
        table[ZIGZAG_TO_NATURAL[i]] = i;
        i += 1;
    }
    table
};

const fn build_zigzag() -> [usize; 64] {
    let mut table = [0usize; 64];
    let mut row = 0usize;
    let mut col = 0usize;
    let mut i = 0;
    while i < 64 {
        table[i] = row * 8 + col;
        i += 1;
        // Even diagonals run up-right, odd ones down-left.
        if (row + col) % 2 == 0 {
            if col == 7 {
                row += 1;
            } else if row == 0 {
                col += 1;
            } else {
                row -= 1;
                col += 1;
            }
        } else if row == 7 {
            col += 1;
        } else if col == 0 {
            row += 1;
        } else {
            row += 1;
            col -= 1;
        }
    }
    table
}

/// Reorder a block from zig-zag order into natural row-major order.
pub fn to_natural<T: Copy + Default>(zigzag: &[T; 64]) -> [T; 64] {
    let mut out = [T::default(); 64];
    for (zi, &v) in zigzag.iter().enumerate() {
        out[ZIGZAG_TO_NATURAL[zi]] = v;
    }
    out
}

/// Reorder a block from natural row-major order into zig-zag order.
pub fn to_zigzag<T: Copy + Default>(natural: &[T; 64]) -> [T; 64] {
    let mut out = [T::default(); 64];
    for (zi, o) in out.iter_mut().enumerate() {
        *o = natural[ZIGZAG_TO_NATURAL[zi]];
    }
    out
}
