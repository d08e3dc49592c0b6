// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! 8×8 inverse DCT.
//!
//! The decoder talks to the transform through [`InverseDct`]. Input is a
//! pre-scaled coefficient block in natural row-major order (see
//! [`prescale`]); output is spatial-domain samples before the +128 level
//! shift.

use std::f64::consts::{PI, SQRT_2};

/// Block edge length.
pub const BLOCK_SIZE: usize = 8;

/// The inverse transform collaborator.
pub trait InverseDct {
    /// Transform one pre-scaled 8×8 block. Must be deterministic and free of
    /// side effects.
    fn inverse(&self, coeffs: &[f64; 64]) -> [f64; 64];
}

/// Scale dequantized coefficients for [`InverseDct::inverse`].
///
/// Every element is divided by `2 * BLOCK_SIZE`; row 0 and column 0 are
/// additionally multiplied by √2 (the DC term twice). Combined with the
/// unnormalised DCT-III of [`CosineIdct`] this is the orthonormal IDCT of
/// ITU-T T.81 A.3.3.
pub fn prescale(coeffs: &[f64; 64]) -> [f64; 64] {
    let mut out = *coeffs;
    for (i, v) in out.iter_mut().enumerate() {
        *v /= (2 * BLOCK_SIZE) as f64;
        if i < BLOCK_SIZE {
            *v *= SQRT_2;
        }
        if i % BLOCK_SIZE == 0 {
            *v *= SQRT_2;
        }
    }
    out
}

/// Separable 2-D DCT-III without normalisation:
/// `y[k] = x[0] + 2 * sum_{n=1..7} x[n] * cos(pi * n * (2k + 1) / 16)`
/// along rows, then columns.
///
/// The cosine plan is computed once per instance.
#[derive(Debug, Clone)]
pub struct CosineIdct {
    /// `plan[n][k]` is the weight of frequency `n` in sample `k`.
    plan: [[f64; BLOCK_SIZE]; BLOCK_SIZE],
}

impl CosineIdct {
    pub fn new() -> Self {
        let mut plan = [[0.0f64; BLOCK_SIZE]; BLOCK_SIZE];
        for (n, row) in plan.iter_mut().enumerate() {
            for (k, w) in row.iter_mut().enumerate() {
                *w = if n == 0 {
                    1.0
                } else {
                    2.0 * ((2 * k + 1) as f64 * n as f64 * PI / (2 * BLOCK_SIZE) as f64).cos()
                };
            }
        }
        Self { plan }
    }
}

impl Default for CosineIdct {
    fn default() -> Self {
        Self::new()
    }
}

impl InverseDct for CosineIdct {
    fn inverse(&self, coeffs: &[f64; 64]) -> [f64; 64] {
        let w = &self.plan;

        // Step 1: along each row (horizontal frequencies).
        let mut temp = [0.0f64; 64];
        for row in 0..BLOCK_SIZE {
            for x in 0..BLOCK_SIZE {
                let mut sum = 0.0;
                for u in 0..BLOCK_SIZE {
                    sum += coeffs[row * BLOCK_SIZE + u] * w[u][x];
                }
                temp[row * BLOCK_SIZE + x] = sum;
            }
        }

        // Step 2: along each column (vertical frequencies).
        let mut out = [0.0f64; 64];
        for col in 0..BLOCK_SIZE {
            for y in 0..BLOCK_SIZE {
                let mut sum = 0.0;
                for v in 0..BLOCK_SIZE {
                    sum += temp[v * BLOCK_SIZE + col] * w[v][y];
                }
                out[y * BLOCK_SIZE + col] = sum;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Textbook orthonormal IDCT, T.81 A.3.3.
    fn reference_idct(f: &[f64; 64]) -> [f64; 64] {
        let c = |u: usize| if u == 0 { 1.0 / SQRT_2 } else { 1.0 };
        let mut out = [0.0; 64];
        for y in 0..8 {
            for x in 0..8 {
                let mut sum = 0.0;
                for v in 0..8 {
                    for u in 0..8 {
                        sum += c(u)
                            * c(v)
                            * f[v * 8 + u]
                            * (((2 * x + 1) * u) as f64 * PI / 16.0).cos()
                            * (((2 * y + 1) * v) as f64 * PI / 16.0).cos();
                    }
                }
                out[y * 8 + x] = sum / 4.0;
            }
        }
        out
    }

    #[test]
    fn dc_only_block_is_flat() {
        let mut f = [0.0; 64];
        f[0] = 80.0;
        let out = CosineIdct::new().inverse(&prescale(&f));
        for v in out {
            assert!((v - 10.0).abs() < 1e-9, "got {v}");
        }
    }

    #[test]
    fn matches_textbook_idct() {
        let mut f = [0.0; 64];
        f[0] = 320.0;
        f[1] = -44.0;
        f[8] = 27.0;
        f[9] = 5.5;
        f[18] = -13.0;
        f[63] = 7.0;
        let ours = CosineIdct::new().inverse(&prescale(&f));
        let reference = reference_idct(&f);
        for i in 0..64 {
            assert!(
                (ours[i] - reference[i]).abs() < 1e-9,
                "sample {i}: {} vs {}",
                ours[i],
                reference[i]
            );
        }
    }

    #[test]
    fn horizontal_frequency_varies_along_rows() {
        let mut f = [0.0; 64];
        f[1] = 100.0;
        let out = CosineIdct::new().inverse(&prescale(&f));
        // Every row identical, columns differ.
        for y in 1..8 {
            for x in 0..8 {
                assert!((out[y * 8 + x] - out[x]).abs() < 1e-9);
            }
        }
        assert!(out[0] > 0.0 && out[7] < 0.0);
    }
}
