// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `dct` module implements the Discrete Cosine Transforms (DCT-II and
//! DCT-IV) underlying the inverse MDCT.

use std::f64::consts;

/// Recursive DCT-II.
///
/// Based on the recursive splitting of Zhijin & Huisheng, "Recursive
/// Algorithms for Discrete Cosine Transform". The length must be a power of
/// two because the transform is subdivided into halves at each step; the
/// base case is the trivial two-point DCT.
pub fn dct_ii(input: &[f64], output: &mut [f64]) {
    let n = input.len();

    debug_assert!(n >= 2 && n.is_power_of_two());
    debug_assert_eq!(n, output.len());

    if n == 2 {
        output[0] = input[0] + input[1];
        output[1] = consts::FRAC_1_SQRT_2 * (input[0] - input[1]);
        return;
    }

    let half = n >> 1;

    // Butterfly the input into a sum half and a difference half.
    let mut g = vec![0.0; half];
    let mut h = vec![0.0; half];

    for i in 0..half {
        g[i] = input[i] + input[n - 1 - i];
        h[i] = input[i] - input[n - 1 - i];
    }

    // The transform of the sum half yields the even output indices.
    let mut even = vec![0.0; half];
    dct_ii(&g, &mut even);

    for k in 0..half {
        output[k * 2] = even[k];
    }

    // Pre-weight the difference half, transform, and unwind the recurrence
    // to obtain the odd output indices.
    let weight = consts::PI / ((2 * n) as f64);

    for (i, h) in h.iter_mut().enumerate() {
        *h *= 2.0 * (weight * ((2 * i + 1) as f64)).cos();
    }

    let mut odd = vec![0.0; half];
    dct_ii(&h, &mut odd);

    output[1] = 0.5 * odd[0];
    for k in 1..half {
        output[k * 2 + 1] = odd[k] - output[k * 2 - 1];
    }
}

/// DCT-IV computed through a DCT-II of the same length.
///
/// The pre- and post-processing steps follow Li et al., "A unified computing
/// kernel for MDCT/IMDCT in modern audio coding standards".
pub fn dct_iv(input: &[f64], output: &mut [f64]) {
    let n = input.len();

    debug_assert!(n >= 2 && n.is_power_of_two());
    debug_assert_eq!(n, output.len());

    let weight = consts::PI / ((4 * n) as f64);

    let shaped: Vec<f64> = input
        .iter()
        .enumerate()
        .map(|(i, &x)| 2.0 * (weight * ((2 * i + 1) as f64)).cos() * x)
        .collect();

    let mut transformed = vec![0.0; n];
    dct_ii(&shaped, &mut transformed);

    output[0] = 0.5 * transformed[0];
    for i in 1..n {
        output[i] = transformed[i] - output[i - 1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts;

    fn dct_ii_analytical(input: &[f64], output: &mut [f64]) {
        let n = input.len();
        let f = consts::PI / (n as f64);

        for k in 0..n {
            output[k] = input
                .iter()
                .enumerate()
                .map(|(i, &x)| x * (f * ((i as f64) + 0.5) * (k as f64)).cos())
                .sum();
        }
    }

    fn dct_iv_analytical(input: &[f64], output: &mut [f64]) {
        let n = input.len();
        let f = consts::PI / (n as f64);

        for k in 0..n {
            output[k] = input
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    x * (f * ((i as f64) + 0.5) * ((k as f64) + 0.5)).cos()
                })
                .sum();
        }
    }

    /// Deterministic values in [-1, 1) for transform comparisons.
    fn test_signal(len: usize) -> Vec<f64> {
        let mut state = 0x2F6E_2A1Du32;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                (f64::from(state as i32)) / (f64::from(i32::MAX) + 1.0)
            })
            .collect()
    }

    #[test]
    fn dct_ii_matches_analytical() {
        for n in [2usize, 8, 64, 128] {
            let input = test_signal(n);

            let mut expected = vec![0.0; n];
            dct_ii_analytical(&input, &mut expected);

            let mut actual = vec![0.0; n];
            dct_ii(&input, &mut actual);

            for (a, e) in actual.iter().zip(&expected) {
                assert!((a - e).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn dct_iv_matches_analytical() {
        for n in [2usize, 8, 64, 128] {
            let input = test_signal(n);

            let mut expected = vec![0.0; n];
            dct_iv_analytical(&input, &mut expected);

            let mut actual = vec![0.0; n];
            dct_iv(&input, &mut actual);

            for (a, e) in actual.iter().zip(&expected) {
                assert!((a - e).abs() < 1e-9);
            }
        }
    }
}
