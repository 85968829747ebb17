// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `imdct` module implements the Inverse Modified Discrete Cosine
//! Transform (IMDCT).
//!
//! The IMDCT of N spectral coefficients produces 2N time-domain samples,
//! but the output carries redundancy: it is fully determined by a DCT-IV of
//! length N, with the remaining halves derived by mirroring and negation.
//! The DCT-IV itself runs through a recursive DCT-II (see [`super::dct`]).

use super::dct;

/// Performs the N-point IMDCT, writing 2N output samples.
///
/// The transform computed is
/// `x[n] = (2/N) * sum X[k] * cos((2*pi / 2N) * (n + n0) * (k + 0.5))`
/// with `n0 = (N + 1) / 2`.
pub fn imdct(input: &[f64], output: &mut [f64]) {
    let n = input.len();

    debug_assert!(n >= 2 && n.is_power_of_two());
    debug_assert_eq!(2 * n, output.len());

    // Quarter boundaries of the output.
    let q1 = n >> 1;
    let q2 = n;
    let q3 = q1 + q2;

    let mut transformed = vec![0.0; n];
    dct::dct_iv(input, &mut transformed);

    // The first half of the DCT-IV supplies the final output quarter,
    // negated.
    for i in 0..q1 {
        output[q3 + i] = -transformed[i];
    }

    // The second half of the DCT-IV supplies the first output quarter.
    for i in q1..q2 {
        output[i - q1] = transformed[i];
    }

    // Second quarter: first quarter mirrored and negated.
    for i in 0..q1 {
        output[q1 + i] = -output[q1 - 1 - i];
    }

    // Third quarter: fourth quarter mirrored.
    for i in 0..q1 {
        output[q3 - 1 - i] = output[q3 + i];
    }

    let scale = 2.0 / (n as f64);
    for sample in output.iter_mut() {
        *sample *= scale;
    }
}

#[cfg(test)]
mod tests {
    use super::imdct;
    use std::f64::consts;

    fn imdct_analytical(input: &[f64], output: &mut [f64]) {
        let n = input.len();
        let out_len = 2 * n;
        let n0 = ((n as f64) + 1.0) / 2.0;
        let f = consts::PI * 2.0 / (out_len as f64);

        for s in 0..out_len {
            let sum: f64 = input
                .iter()
                .enumerate()
                .map(|(k, &x)| x * (f * ((s as f64) + n0) * ((k as f64) + 0.5)).cos())
                .sum();

            output[s] = (2.0 / (n as f64)) * sum;
        }
    }

    fn test_signal(len: usize) -> Vec<f64> {
        let mut state = 0x51F1_5EEDu32;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                (f64::from(state as i32)) / (f64::from(i32::MAX) + 1.0)
            })
            .collect()
    }

    #[test]
    fn imdct_matches_analytical() {
        for n in [128usize, 1024] {
            let input = test_signal(n);

            let mut expected = vec![0.0; 2 * n];
            imdct_analytical(&input, &mut expected);

            let mut actual = vec![0.0; 2 * n];
            imdct(&input, &mut actual);

            for (a, e) in actual.iter().zip(&expected) {
                assert!((a - e).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn imdct_of_a_single_impulse() {
        // A lone X[3] = 1 must reproduce the transform kernel itself.
        let mut input = vec![0.0; 1024];
        input[3] = 1.0;

        let mut actual = vec![0.0; 2048];
        imdct(&input, &mut actual);

        let n0 = (1024.0 + 1.0) / 2.0;
        let f = consts::PI * 2.0 / 2048.0;

        for (s, &a) in actual.iter().enumerate() {
            let expected = (2.0 / 1024.0) * (f * ((s as f64) + n0) * 3.5).cos();
            assert!((a - expected).abs() < 1e-10);
        }
    }
}
