// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pulse data: isolated corrections added to the quantized spectrum.

use cantata_core::errors::{decode_error, Result};
use cantata_core::io::BitReader;

use crate::aac::common::{SfbBandInfo, SPECTRUM_SIZE_LONG, MAX_PULSE_COUNT};

use super::IcsInfo;

#[derive(Clone, Copy, Default)]
pub struct Pulse {
    pub offset: u8,
    pub amplitude: u8,
}

#[derive(Clone, Copy, Default)]
pub struct PulseInfo {
    pub pulse_count: usize,
    pub start_sfb: usize,
    pub pulses: [Pulse; MAX_PULSE_COUNT],
}

impl PulseInfo {
    pub fn none() -> PulseInfo {
        Default::default()
    }

    // pulse_data
    pub fn decode(bs: &mut BitReader<'_>, ics: &IcsInfo) -> Result<PulseInfo> {
        if !bs.read_bool() {
            return Ok(PulseInfo::none());
        }

        if !ics.is_long_window {
            return decode_error("aac: pulses cannot combine with short windows");
        }

        let pulse_count = bs.read_uint(2) as usize + 1;
        let start_sfb = bs.read_uint(6) as usize;

        let mut pulses = [Pulse::default(); MAX_PULSE_COUNT];

        for pulse in pulses[..pulse_count].iter_mut() {
            pulse.offset = bs.read_uint(5) as u8;
            pulse.amplitude = bs.read_uint(4) as u8;
        }

        Ok(PulseInfo { pulse_count, start_sfb, pulses })
    }

    /// Adds the pulse amplitudes to the magnitudes of the quantized
    /// coefficients. Offsets accumulate from the start of `start_sfb`.
    pub fn apply(
        &self,
        quant: &mut [i16; SPECTRUM_SIZE_LONG],
        band_info: &SfbBandInfo,
    ) -> Result<()> {
        if self.pulse_count == 0 {
            return Ok(());
        }

        let offsets = band_info.long_window.offsets;

        if self.start_sfb >= offsets.len() {
            return decode_error("aac: pulse start band beyond the band table");
        }

        let mut k = offsets[self.start_sfb];

        for pulse in &self.pulses[..self.pulse_count] {
            k += usize::from(pulse.offset);

            if k >= SPECTRUM_SIZE_LONG {
                return decode_error("aac: pulse beyond the spectrum");
            }

            let amplitude = i16::from(pulse.amplitude);

            if quant[k] < 0 {
                quant[k] -= amplitude;
            }
            else {
                quant[k] += amplitude;
            }
        }

        Ok(())
    }
}
