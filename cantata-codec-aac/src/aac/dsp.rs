// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-channel reconstruction: dequantization, rescaling, noise shaping,
//! the inverse transform, windowing, overlap-add, and PCM conversion.

use cantata_core::dsp::imdct;

use crate::aac::common::*;
use crate::aac::ics::DecodeInfo;
use crate::aac::window;

/// The dequantization exponent of § 10.3.
const DEQUANT_EXPONENT: f64 = 4.0 / 3.0;

/// Dequantizes the coded spectrum: `sign(q) * |q|^(4/3)` (§ 10.3).
pub fn dequantize(quant: &[i16; SPECTRUM_SIZE_LONG]) -> [f64; SPECTRUM_SIZE_LONG] {
    let mut spec = [0.0; SPECTRUM_SIZE_LONG];

    for (out, &q) in spec.iter_mut().zip(quant) {
        let magnitude = f64::from(q.unsigned_abs()).powf(DEQUANT_EXPONENT);
        *out = if q < 0 { -magnitude } else { magnitude };
    }

    spec
}

/// Applies the per-band gain `2^(0.25 * (sf - 100))` to every active band
/// (§ 11.3.3). Zero, intensity, and noise-substituted bands carry no
/// spectrum of their own and are left alone.
pub fn rescale(
    spec: &mut [f64; SPECTRUM_SIZE_LONG],
    info: &DecodeInfo,
    band_info: &'static SfbBandInfo,
) {
    let ics = &info.ics;
    let offsets = band_info.offsets(ics.is_long_window).offsets;

    for g in 0..ics.window_group_count {
        let group = ics.window_groups[g];

        for sfb in 0..ics.sfb_count {
            let codebook = info.section.sfb_codebooks[g][sfb];

            if codebook == ZERO_HCB
                || codebook == NOISE_HCB
                || codebook == INTENSITY_HCB
                || codebook == INTENSITY_HCB2
            {
                continue;
            }

            let sf = info.sf.scalefactors[g][sfb];
            let gain = 2.0f64.powf(0.25 * (f64::from(sf) - 100.0));

            for w in 0..group.win_length {
                let base = if ics.is_long_window {
                    0
                }
                else {
                    (group.win_start + w) * SPECTRUM_SIZE_SHORT
                };

                for sample in spec[base + offsets[sfb]..base + offsets[sfb + 1]].iter_mut() {
                    *sample *= gain;
                }
            }
        }
    }
}

/// Converts one reconstructed sample to PCM: saturate, then round away
/// from zero before truncation.
#[inline(always)]
fn quantize_sample(sample: f64) -> i16 {
    let rounded = if sample > 0.0 { sample + 0.5 } else { sample - 0.5 };
    rounded.clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

/// The persistent half of one decoded channel.
///
/// The overlap buffer and the previous block's window shape are the only
/// state that crosses blocks: every block blends its first half with the
/// saved second half of its predecessor, and applies its left half-window
/// using the predecessor's shape.
pub struct ChannelDecoder {
    sample_rate_index: usize,
    previous_window_shape: WindowShape,
    old_samples: [f64; SPECTRUM_SIZE_LONG],
    block_count: u64,
}

impl ChannelDecoder {
    pub fn new(sample_rate_index: usize) -> ChannelDecoder {
        ChannelDecoder {
            sample_rate_index,
            previous_window_shape: WindowShape::Sine,
            old_samples: [0.0; SPECTRUM_SIZE_LONG],
            block_count: 0,
        }
    }

    pub fn reset(&mut self) {
        self.old_samples = [0.0; SPECTRUM_SIZE_LONG];
        self.block_count = 0;
    }

    /// Runs the back half of the pipeline for one channel: TNS, the
    /// inverse transform, windowing, overlap-add, and PCM output written
    /// at the given interleave stride.
    pub fn synthesize(
        &mut self,
        info: &DecodeInfo,
        spec: &mut [f64; SPECTRUM_SIZE_LONG],
        band_info: &'static SfbBandInfo,
        out: &mut [i16],
        stride: usize,
    ) {
        info.tns.synth(&info.ics, band_info, self.sample_rate_index, spec);

        // A channel's first block overlaps with silence and uses its own
        // shape on the left.
        if self.block_count == 0 {
            self.previous_window_shape = info.ics.window_shape;
        }

        let mut samples = [0.0; XFORM_SIZE_LONG];

        if info.ics.is_long_window {
            self.synthesize_long(info, spec, &mut samples);
        }
        else {
            self.synthesize_short(info, spec, &mut samples);
        }

        // Overlap-add (§ 15.3.3): blend with the previous block's tail,
        // then bank this block's tail before it is touched.
        for (sample, old) in samples[..SPECTRUM_SIZE_LONG].iter_mut().zip(&self.old_samples) {
            *sample += old;
        }

        self.old_samples.copy_from_slice(&samples[SPECTRUM_SIZE_LONG..]);

        for (n, &sample) in samples[..SPECTRUM_SIZE_LONG].iter().enumerate() {
            out[n * stride] = quantize_sample(sample);
        }

        self.previous_window_shape = info.ics.window_shape;
        self.block_count += 1;
    }

    // § 15.3.2: one long transform; the left half-window follows the
    // previous block's shape, the right half the current one.
    fn synthesize_long(
        &self,
        info: &DecodeInfo,
        spec: &[f64; SPECTRUM_SIZE_LONG],
        samples: &mut [f64; XFORM_SIZE_LONG],
    ) {
        imdct::imdct(spec, samples);

        let previous = self.previous_window_shape;
        let current = info.ics.window_shape;

        match info.ics.window_sequence {
            WindowSequence::Long | WindowSequence::LongStart => {
                let left = window::long_left(previous);
                for (sample, w) in samples[..SPECTRUM_SIZE_LONG].iter_mut().zip(left) {
                    *sample *= w;
                }
            }
            WindowSequence::LongStop => {
                let left = window::stop_left(previous);
                for (sample, w) in samples[..SPECTRUM_SIZE_LONG].iter_mut().zip(left) {
                    *sample *= w;
                }
            }
            WindowSequence::EightShort => unreachable!(),
        }

        match info.ics.window_sequence {
            WindowSequence::Long | WindowSequence::LongStop => {
                let right = window::long_left(current);
                for (n, sample) in samples[SPECTRUM_SIZE_LONG..].iter_mut().enumerate() {
                    *sample *= right[SPECTRUM_SIZE_LONG - 1 - n];
                }
            }
            WindowSequence::LongStart => {
                let right = window::start_right(current);
                for (sample, w) in samples[SPECTRUM_SIZE_LONG..].iter_mut().zip(right) {
                    *sample *= w;
                }
            }
            WindowSequence::EightShort => unreachable!(),
        }
    }

    // § 15.3.2: eight short transforms, windowed individually and overlap-
    // added into the middle of the output, leaving 448 flat samples on
    // each side. Only the first window's left half uses the previous
    // block's shape.
    fn synthesize_short(
        &self,
        info: &DecodeInfo,
        spec: &[f64; SPECTRUM_SIZE_LONG],
        samples: &mut [f64; XFORM_SIZE_LONG],
    ) {
        let previous = self.previous_window_shape;
        let current = info.ics.window_shape;

        let mut win_out = [0.0; XFORM_SIZE_SHORT];

        for w in 0..8 {
            let coeffs = &spec[w * SPECTRUM_SIZE_SHORT..(w + 1) * SPECTRUM_SIZE_SHORT];
            imdct::imdct(coeffs, &mut win_out);

            let left =
                if w == 0 { window::short_left(previous) } else { window::short_left(current) };
            let right = window::short_left(current);

            let base = (SPECTRUM_SIZE_LONG - SPECTRUM_SIZE_SHORT) / 2 + w * SPECTRUM_SIZE_SHORT;

            for i in 0..SPECTRUM_SIZE_SHORT {
                samples[base + i] += win_out[i] * left[i];
                samples[base + SPECTRUM_SIZE_SHORT + i] +=
                    win_out[SPECTRUM_SIZE_SHORT + i] * right[SPECTRUM_SIZE_SHORT - 1 - i];
            }
        }
    }
}
