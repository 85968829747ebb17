// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transform window shapes (§ 15.3.2).
//!
//! Only ascending (left) halves are materialized; a descending half is the
//! ascending half indexed in reverse. The start and stop sequences
//! additionally get composite 1024-sample halves built from a short half
//! plus fixed 448-sample zero and one pad regions.

use std::f64::consts;

use lazy_static::lazy_static;

use super::common::{WindowShape, SPECTRUM_SIZE_LONG, SPECTRUM_SIZE_SHORT};

/// Samples of flat padding on either side of the short-window region
/// inside a composite half: (1024 - 128) / 2.
const COMPOSITE_PAD: usize = (SPECTRUM_SIZE_LONG - SPECTRUM_SIZE_SHORT) / 2;

/// Kernel selector for [`generate_window`].
#[derive(Clone, Copy)]
enum WindowKernel {
    Sine,
    /// Kaiser-Bessel derived, with the given alpha.
    KaiserBessel(f64),
}

/// Writes the ascending half of a window of total length `2 * dst.len()`.
fn generate_window(kernel: WindowKernel, dst: &mut [f64]) {
    let size = dst.len();

    match kernel {
        WindowKernel::Sine => {
            let step = consts::PI / ((2 * size) as f64);
            for (n, dst) in dst.iter_mut().enumerate() {
                *dst = (((n as f64) + 0.5) * step).sin();
            }
        }
        WindowKernel::KaiserBessel(alpha) => {
            // Cumulative sum of the Kaiser-Bessel kernel, square-rooted
            // and normalized.
            let alpha2 = (alpha * consts::PI / (size as f64)).powi(2);

            let mut kernel: Vec<f64> = Vec::with_capacity(size);
            let mut sum = 0.0;

            for n in 0..size {
                sum += bessel_i0(((n * (size - n)) as f64) * alpha2);
                kernel.push(sum);
            }

            sum += 1.0;

            for (dst, cumulative) in dst.iter_mut().zip(&kernel) {
                *dst = (cumulative / sum).sqrt();
            }
        }
    }
}

/// Zeroth-order modified Bessel function of `2 * sqrt(x)`, by truncated
/// series.
fn bessel_i0(x: f64) -> f64 {
    let mut value = 1.0;
    for n in (1..64).rev() {
        value *= x / f64::from(n * n);
        value += 1.0;
    }
    value
}

struct WindowTables {
    long_left: [[f64; SPECTRUM_SIZE_LONG]; 2],
    short_left: [[f64; SPECTRUM_SIZE_SHORT]; 2],
    stop_left: [[f64; SPECTRUM_SIZE_LONG]; 2],
    start_right: [[f64; SPECTRUM_SIZE_LONG]; 2],
}

impl WindowTables {
    fn generate() -> WindowTables {
        let mut tables = WindowTables {
            long_left: [[0.0; SPECTRUM_SIZE_LONG]; 2],
            short_left: [[0.0; SPECTRUM_SIZE_SHORT]; 2],
            stop_left: [[0.0; SPECTRUM_SIZE_LONG]; 2],
            start_right: [[0.0; SPECTRUM_SIZE_LONG]; 2],
        };

        let kernels = [
            (WindowShape::Sine, WindowKernel::Sine, WindowKernel::Sine),
            (
                WindowShape::KaiserBessel,
                WindowKernel::KaiserBessel(4.0),
                WindowKernel::KaiserBessel(6.0),
            ),
        ];

        for (shape, long_kernel, short_kernel) in kernels {
            let i = shape as usize;

            generate_window(long_kernel, &mut tables.long_left[i]);
            generate_window(short_kernel, &mut tables.short_left[i]);

            // Stop left: flat zeros, a short ascent, then flat ones.
            for n in 0..COMPOSITE_PAD {
                tables.stop_left[i][n] = 0.0;
            }
            for n in 0..SPECTRUM_SIZE_SHORT {
                tables.stop_left[i][COMPOSITE_PAD + n] = tables.short_left[i][n];
            }
            for n in COMPOSITE_PAD + SPECTRUM_SIZE_SHORT..SPECTRUM_SIZE_LONG {
                tables.stop_left[i][n] = 1.0;
            }

            // Start right: flat ones, a short descent, then flat zeros.
            for n in 0..COMPOSITE_PAD {
                tables.start_right[i][n] = 1.0;
            }
            for n in 0..SPECTRUM_SIZE_SHORT {
                tables.start_right[i][COMPOSITE_PAD + n] =
                    tables.short_left[i][SPECTRUM_SIZE_SHORT - 1 - n];
            }
            for n in COMPOSITE_PAD + SPECTRUM_SIZE_SHORT..SPECTRUM_SIZE_LONG {
                tables.start_right[i][n] = 0.0;
            }
        }

        tables
    }
}

lazy_static! {
    static ref WINDOWS: WindowTables = WindowTables::generate();
}

/// Ascending long half-window.
pub fn long_left(shape: WindowShape) -> &'static [f64; SPECTRUM_SIZE_LONG] {
    &WINDOWS.long_left[shape as usize]
}

/// Ascending short half-window.
pub fn short_left(shape: WindowShape) -> &'static [f64; SPECTRUM_SIZE_SHORT] {
    &WINDOWS.short_left[shape as usize]
}

/// Left half of a long-stop window: zeros, a short ascent, ones.
pub fn stop_left(shape: WindowShape) -> &'static [f64; SPECTRUM_SIZE_LONG] {
    &WINDOWS.stop_left[shape as usize]
}

/// Right half of a long-start window: ones, a short descent, zeros.
pub fn start_right(shape: WindowShape) -> &'static [f64; SPECTRUM_SIZE_LONG] {
    &WINDOWS.start_right[shape as usize]
}
