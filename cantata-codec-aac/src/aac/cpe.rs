// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel-pair joint stereo: the mid/side mask and the M/S and intensity
//! reconstruction over a pair of dequantized spectra.

use cantata_core::errors::{decode_error, Result};
use cantata_core::io::BitReader;

use crate::aac::common::*;
use crate::aac::ics::{DecodeInfo, IcsInfo};

/// How mid/side coding applies across the pair's bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MsMaskType {
    /// Mid/side is never used.
    Off,
    /// One transmitted bit per (group, sfb).
    Subband,
    /// Mid/side applies to every band.
    All,
}

/// The mid/side mask of one channel pair.
pub struct MsMaskInfo {
    pub mask_type: MsMaskType,
    /// Per sfb, one bit per group: group zero in the low bit.
    pub sfb_mask: [u8; MAX_SFB_COUNT],
}

impl MsMaskInfo {
    pub fn off() -> MsMaskInfo {
        MsMaskInfo { mask_type: MsMaskType::Off, sfb_mask: [0; MAX_SFB_COUNT] }
    }

    pub fn decode(bs: &mut BitReader<'_>, ics: &IcsInfo) -> Result<MsMaskInfo> {
        let mask_type = match bs.read_uint(2) {
            0 => MsMaskType::Off,
            1 => MsMaskType::Subband,
            2 => MsMaskType::All,
            3 => return decode_error("aac: reserved mid-side mask type"),
            _ => unreachable!(),
        };

        let mut sfb_mask = [0u8; MAX_SFB_COUNT];

        if mask_type == MsMaskType::Subband {
            for g in 0..ics.window_group_count {
                for sfb in 0..ics.sfb_count {
                    if bs.read_bool() {
                        sfb_mask[sfb] |= 1 << g;
                    }
                }
            }
        }

        Ok(MsMaskInfo { mask_type, sfb_mask })
    }

    #[inline(always)]
    fn is_set(&self, g: usize, sfb: usize) -> bool {
        self.sfb_mask[sfb] & (1 << g) != 0
    }
}

/// Applies mid/side and intensity-stereo reconstruction to a common-window
/// pair of dequantized, rescaled spectra.
///
/// Intensity bands (flagged on the second channel) reproduce the left
/// spectrum scaled by `0.5^(0.25 * stereoPosition)`, with the polarity set
/// by the codebook and inverted where a subband mid/side bit is set. All
/// other masked bands fold `(l, r)` into `(l + r, l - r)`. Noise-
/// substituted bands stay untouched on both sides.
pub fn apply_joint_stereo(
    left: &mut [f64; SPECTRUM_SIZE_LONG],
    right: &mut [f64; SPECTRUM_SIZE_LONG],
    left_info: &DecodeInfo,
    right_info: &DecodeInfo,
    mask: &MsMaskInfo,
    band_info: &'static SfbBandInfo,
) {
    let ics = &right_info.ics;
    let offsets = band_info.offsets(ics.is_long_window).offsets;

    for g in 0..ics.window_group_count {
        let group = ics.window_groups[g];

        for sfb in 0..ics.sfb_count {
            for w in 0..group.win_length {
                let base = if ics.is_long_window {
                    0
                }
                else {
                    (group.win_start + w) * SPECTRUM_SIZE_SHORT
                };

                let start = base + offsets[sfb];
                let end = base + offsets[sfb + 1];

                if right_info.section.is_intensity(g, sfb) {
                    let position =
                        i32::from(right_info.sf.scalefactors[g][sfb]) - 128;

                    let polarity = if right_info.section.sfb_codebooks[g][sfb] == INTENSITY_HCB {
                        1.0
                    }
                    else {
                        -1.0
                    };

                    let invert = mask.mask_type == MsMaskType::Subband && mask.is_set(g, sfb);
                    let direction = if invert { -polarity } else { polarity };

                    let scale = direction * 0.5f64.powf(0.25 * f64::from(position));

                    for (l, r) in left[start..end].iter().zip(&mut right[start..end]) {
                        *r = *l * scale;
                    }
                }
                else if left_info.section.is_noise(g, sfb)
                    || right_info.section.is_noise(g, sfb)
                {
                    // Substituted noise takes no part in joint stereo.
                }
                else if mask.mask_type == MsMaskType::All
                    || (mask.mask_type == MsMaskType::Subband && mask.is_set(g, sfb))
                {
                    for (l, r) in left[start..end].iter_mut().zip(&mut right[start..end]) {
                        let side = *l - *r;
                        *l += *r;
                        *r = side;
                    }
                }
            }
        }
    }
}
