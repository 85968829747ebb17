// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temporal noise shaping: per-window all-pole filters applied in place
//! over ranges of spectral coefficients.

use std::f64::consts;

use cantata_core::errors::{tns_order_error, Result};
use cantata_core::io::BitReader;

use crate::aac::common::*;

use super::IcsInfo;

/// Per-sample-rate-index upper limits on the bands a filter may cover.
const TNS_MAX_LONG_BANDS: [usize; 12] = [31, 31, 34, 40, 42, 51, 46, 46, 42, 42, 42, 39];
const TNS_MAX_SHORT_BANDS: [usize; 12] = [9, 9, 10, 14, 14, 14, 14, 14, 14, 14, 14, 14];

#[derive(Clone, Copy)]
pub struct TnsFilter {
    /// Bands covered, counting downward from the running top band.
    pub sfb_count: usize,
    /// A zero order marks a placeholder filter with no coefficients.
    pub order: usize,
    pub downward: bool,
    pub coefficients: [i8; MAX_TNS_ORDER_LONG_LC],
}

impl TnsFilter {
    fn none() -> TnsFilter {
        TnsFilter {
            sfb_count: 0,
            order: 0,
            downward: false,
            coefficients: [0; MAX_TNS_ORDER_LONG_LC],
        }
    }

    // § 14.3: inverse-quantize the transmitted reflection coefficients and
    // convert them to direct-form predictor coefficients. `lpc[0]` is one
    // and is never applied by the filter loops.
    fn lpc(&self, coefficient_bits: u32) -> [f64; MAX_TNS_ORDER_LONG_LC + 1] {
        let base = f64::from(1u32 << (coefficient_bits - 1));
        let iqfac = (base - 0.5) / consts::FRAC_PI_2;
        let iqfac_m = (base + 0.5) / consts::FRAC_PI_2;

        let mut dq = [0.0; MAX_TNS_ORDER_LONG_LC];

        for (dq, &c) in dq.iter_mut().zip(&self.coefficients[..self.order]) {
            let c = f64::from(c);
            *dq = (c / if c >= 0.0 { iqfac } else { iqfac_m }).sin();
        }

        let mut lpc = [0.0; MAX_TNS_ORDER_LONG_LC + 1];
        lpc[0] = 1.0;

        let mut b = [0.0; MAX_TNS_ORDER_LONG_LC + 1];

        for o in 1..=self.order {
            for i in 1..o {
                b[i] = lpc[i] + dq[o - 1] * lpc[o - i];
            }
            lpc[1..o].copy_from_slice(&b[1..o]);
            lpc[o] = dq[o - 1];
        }

        lpc
    }
}

pub struct TnsInfo {
    pub enabled: bool,
    pub filter_counts: [usize; MAX_WINDOW_COUNT],
    /// Transmitted coefficient resolution per window, 3 or 4 bits.
    pub coefficient_bits: [u32; MAX_WINDOW_COUNT],
    pub filters: [[TnsFilter; MAX_TNS_FILTER_COUNT]; MAX_WINDOW_COUNT],
}

impl TnsInfo {
    pub fn disabled() -> TnsInfo {
        TnsInfo {
            enabled: false,
            filter_counts: [0; MAX_WINDOW_COUNT],
            coefficient_bits: [0; MAX_WINDOW_COUNT],
            filters: [[TnsFilter::none(); MAX_TNS_FILTER_COUNT]; MAX_WINDOW_COUNT],
        }
    }

    // tns_data, § 14.2
    pub fn decode(bs: &mut BitReader<'_>, ics: &IcsInfo) -> Result<TnsInfo> {
        if !bs.read_bool() {
            return Ok(TnsInfo::disabled());
        }

        let mut info = TnsInfo::disabled();
        info.enabled = true;

        // Field widths and the order limit depend on the window class.
        let (filter_count_bits, length_bits, order_bits, max_order) = if ics.is_long_window {
            (2, 6, 5, MAX_TNS_ORDER_LONG_LC)
        }
        else {
            (1, 4, 3, MAX_TNS_ORDER_SHORT)
        };

        for w in 0..ics.window_count {
            let filter_count = bs.read_uint(filter_count_bits) as usize;
            info.filter_counts[w] = filter_count;

            if filter_count > 0 {
                info.coefficient_bits[w] = bs.read_uint(1) + 3;
            }

            for f in 0..filter_count {
                let filter = &mut info.filters[w][f];

                filter.sfb_count = bs.read_uint(length_bits) as usize;
                filter.order = bs.read_uint(order_bits) as usize;

                if filter.order > max_order {
                    return tns_order_error("aac: filter order exceeds the profile limit");
                }

                if filter.order > 0 {
                    filter.downward = bs.read_bool();

                    // Compression drops the most significant transmitted
                    // bit; the resolution itself is unchanged.
                    let compress = bs.read_bool();
                    let bits = info.coefficient_bits[w] - u32::from(compress);

                    let sign_bit = 1u32 << (bits - 1);

                    for c in filter.coefficients[..filter.order].iter_mut() {
                        let raw = bs.read_uint(bits);

                        *c = if raw & sign_bit != 0 {
                            (raw as i32 - (1 << bits)) as i8
                        }
                        else {
                            raw as i8
                        };
                    }
                }
            }
        }

        Ok(info)
    }

    // § 14.4: apply each filter over its band range, in place.
    pub fn synth(
        &self,
        ics: &IcsInfo,
        band_info: &'static SfbBandInfo,
        sample_rate_index: usize,
        spec: &mut [f64; SPECTRUM_SIZE_LONG],
    ) {
        if !self.enabled {
            return;
        }

        let offsets = band_info.offsets(ics.is_long_window).offsets;

        let max_band = if ics.is_long_window {
            TNS_MAX_LONG_BANDS[sample_rate_index]
        }
        else {
            TNS_MAX_SHORT_BANDS[sample_rate_index]
        }
        .min(ics.sfb_count);

        for w in 0..ics.window_count {
            // Filters stack downward from the top band of the window.
            let mut top = offsets.len() - 1;

            for filter in &self.filters[w][..self.filter_counts[w]] {
                let bottom = top.saturating_sub(filter.sfb_count);

                if filter.order > 0 {
                    let lpc = filter.lpc(self.coefficient_bits[w]);

                    let start = w * SPECTRUM_SIZE_SHORT + offsets[bottom.min(max_band)];
                    let end = w * SPECTRUM_SIZE_SHORT + offsets[top.min(max_band)];

                    if start < end {
                        if !filter.downward {
                            filter_upward(&mut spec[start..end], filter.order, &lpc);
                        }
                        else {
                            filter_downward(&mut spec[start..end], filter.order, &lpc);
                        }
                    }
                }

                top = bottom;
            }
        }
    }
}

/// All-pole filter walking from low to high indices with zero initial
/// state: `y[n] = x[n] - sum(lpc[i] * y[n - i])` for `i >= 1`.
fn filter_upward(spec: &mut [f64], order: usize, lpc: &[f64]) {
    for n in 0..spec.len() {
        let mut acc = spec[n];
        for i in 1..=order.min(n) {
            acc -= lpc[i] * spec[n - i];
        }
        spec[n] = acc;
    }
}

/// The same filter walking from high to low indices.
fn filter_downward(spec: &mut [f64], order: usize, lpc: &[f64]) {
    let len = spec.len();

    for m in 0..len {
        let n = len - 1 - m;

        let mut acc = spec[n];
        for i in 1..=order.min(m) {
            acc -= lpc[i] * spec[n + i];
        }
        spec[n] = acc;
    }
}
