// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsing of one individual channel stream: ICS info, section data,
//! scalefactor data, pulse data, TNS data, and spectral data.

use cantata_core::errors::{
    codebook_error, decode_error, scalefactor_error, section_layout_error, unsupported_error,
    Result,
};
use cantata_core::io::BitReader;

use log::{debug, warn};

use crate::aac::common::*;
use crate::aac::huffman;

pub mod pulse;
pub mod tns;

/// One run of consecutive short windows sharing scalefactors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowGroup {
    pub win_start: usize,
    pub win_length: usize,
}

/// Individual-channel-stream info: the window classification of the block
/// and the derived band and group geometry.
#[derive(Clone)]
pub struct IcsInfo {
    pub window_sequence: WindowSequence,
    pub window_shape: WindowShape,
    pub is_long_window: bool,
    /// Scalefactor bands in use; never exceeds the band table's count.
    pub sfb_count: usize,
    /// Band-table offset at `sfb_count`: the coded width of each window.
    pub samples_per_window: usize,
    /// One for long windows, eight for short windows.
    pub window_count: usize,
    pub window_group_count: usize,
    pub window_groups: [WindowGroup; MAX_WINDOW_GROUPS],
}

impl IcsInfo {
    // ics_info
    pub fn decode(bs: &mut BitReader<'_>, band_info: &SfbBandInfo) -> Result<IcsInfo> {
        if bs.read_bool() {
            return decode_error("aac: ics reserved bit set");
        }

        let window_sequence = WindowSequence::from_bits(bs.read_uint(2));
        let window_shape = WindowShape::from_bits(bs.read_bit());

        let is_long_window = window_sequence.is_long();

        let mut window_groups = [WindowGroup::default(); MAX_WINDOW_GROUPS];
        window_groups[0] = WindowGroup { win_start: 0, win_length: 1 };

        let sfb_count;
        let window_count;
        let mut window_group_count = 1;

        if !is_long_window {
            sfb_count = bs.read_uint(4) as usize;
            window_count = 8;

            // Each clear bit in the grouping mask starts a new group; each
            // set bit extends the current group by one window.
            let grouping = bs.read_uint(7);

            for i in (0..7usize).rev() {
                if (grouping >> i) & 0x1 == 0 {
                    window_groups[window_group_count] =
                        WindowGroup { win_start: 7 - i, win_length: 1 };
                    window_group_count += 1;
                }
                else {
                    window_groups[window_group_count - 1].win_length += 1;
                }
            }
        }
        else {
            sfb_count = bs.read_uint(6) as usize;
            window_count = 1;

            // Prediction is not allowed in the low-complexity profile.
            if bs.read_bool() {
                return unsupported_error("aac: predictor data");
            }
        }

        let offsets = band_info.offsets(is_long_window);

        if sfb_count > offsets.swb_count {
            return section_layout_error("aac: sfb count exceeds the band table");
        }

        let samples_per_window = offsets.offsets[sfb_count];

        Ok(IcsInfo {
            window_sequence,
            window_shape,
            is_long_window,
            sfb_count,
            samples_per_window,
            window_count,
            window_group_count,
            window_groups,
        })
    }
}

/// One section: a run of scalefactor bands sharing a Huffman codebook.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Section {
    pub sfb_start: usize,
    pub sfb_length: usize,
    /// Start of the section's samples in interleaved (bitstream) order.
    pub sample_start: usize,
    /// Interleaved sample count; spans every window of the group.
    pub sample_count: usize,
    pub codebook: u8,
}

/// Section data for every window group.
pub struct SectionInfo {
    /// The codebook governing each (group, sfb).
    pub sfb_codebooks: [[u8; MAX_SFB_COUNT]; MAX_WINDOW_GROUPS],
    pub section_counts: [usize; MAX_WINDOW_GROUPS],
    pub sections: [[Section; MAX_SFB_COUNT]; MAX_WINDOW_GROUPS],
}

impl SectionInfo {
    pub fn new() -> SectionInfo {
        const EMPTY: Section =
            Section { sfb_start: 0, sfb_length: 0, sample_start: 0, sample_count: 0, codebook: 0 };

        SectionInfo {
            sfb_codebooks: [[0; MAX_SFB_COUNT]; MAX_WINDOW_GROUPS],
            section_counts: [0; MAX_WINDOW_GROUPS],
            sections: [[EMPTY; MAX_SFB_COUNT]; MAX_WINDOW_GROUPS],
        }
    }

    // section_data
    pub fn decode(
        bs: &mut BitReader<'_>,
        ics: &IcsInfo,
        band_info: &SfbBandInfo,
    ) -> Result<SectionInfo> {
        let mut info = SectionInfo::new();

        let section_length_bits: u32 = if ics.is_long_window { 5 } else { 3 };
        let esc = (1usize << section_length_bits) - 1;

        let offsets = band_info.offsets(ics.is_long_window).offsets;

        // Running start of each section in interleaved sample order.
        let mut sample_start = 0;

        for g in 0..ics.window_group_count {
            let mut k = 0;
            let mut sec = 0;

            while k < ics.sfb_count {
                let codebook = bs.read_uint(4) as u8;

                if codebook == RESERVED_HCB {
                    return codebook_error("aac: reserved codebook in section data");
                }

                // A run of all-ones length values extends the section; a
                // zero length is legal.
                let mut sfb_length = 0;

                loop {
                    let l = bs.read_uint(section_length_bits) as usize;
                    sfb_length += l;

                    if l != esc {
                        break;
                    }
                }

                if k + sfb_length > ics.sfb_count {
                    return section_layout_error("aac: section overruns the scalefactor bands");
                }

                if sec >= MAX_SFB_COUNT {
                    return section_layout_error("aac: too many sections");
                }

                // A section's samples cover the band range once per window
                // of the group.
                let sample_count = (offsets[k + sfb_length] - offsets[k])
                    * ics.window_groups[g].win_length;

                for sfb in k..k + sfb_length {
                    info.sfb_codebooks[g][sfb] = codebook;
                }

                info.sections[g][sec] = Section {
                    sfb_start: k,
                    sfb_length,
                    sample_start,
                    sample_count,
                    codebook,
                };

                k += sfb_length;
                sec += 1;

                sample_start += sample_count;
                if sample_start > SPECTRUM_SIZE_LONG {
                    return section_layout_error("aac: sections exceed the spectrum");
                }
            }

            info.section_counts[g] = sec;
        }

        Ok(info)
    }

    #[inline(always)]
    pub fn is_intensity(&self, g: usize, sfb: usize) -> bool {
        let cb = self.sfb_codebooks[g][sfb];
        cb == INTENSITY_HCB || cb == INTENSITY_HCB2
    }

    #[inline(always)]
    pub fn is_noise(&self, g: usize, sfb: usize) -> bool {
        self.sfb_codebooks[g][sfb] == NOISE_HCB
    }
}

impl Default for SectionInfo {
    fn default() -> SectionInfo {
        SectionInfo::new()
    }
}

/// A scalefactor per (group, sfb). Intensity-stereo bands hold the stereo
/// position biased by +128; noise bands are left unused.
pub struct ScalefactorInfo {
    pub scalefactors: [[u8; MAX_SFB_COUNT]; MAX_WINDOW_GROUPS],
}

impl ScalefactorInfo {
    pub fn new() -> ScalefactorInfo {
        ScalefactorInfo { scalefactors: [[0; MAX_SFB_COUNT]; MAX_WINDOW_GROUPS] }
    }

    // scale_factor_data, § 8.3.2.5
    pub fn decode(
        bs: &mut BitReader<'_>,
        ics: &IcsInfo,
        section: &SectionInfo,
        global_gain: u8,
    ) -> Result<ScalefactorInfo> {
        let mut info = ScalefactorInfo::new();

        let mut sf = i32::from(global_gain);
        let mut stereo_position = 0i32;
        let mut noise_energy = i32::from(global_gain) - 90;
        let mut noise_pcm_read = false;

        for g in 0..ics.window_group_count {
            for sfb in 0..ics.sfb_count {
                let codebook = section.sfb_codebooks[g][sfb];

                if codebook == ZERO_HCB {
                    // Inactive bands consume no bits.
                    continue;
                }

                if codebook == INTENSITY_HCB || codebook == INTENSITY_HCB2 {
                    // Intensity bands run their own DPCM chain and store
                    // the position biased into the unsigned range.
                    stereo_position += huffman::decode_scalefactor(bs)?;

                    let biased = stereo_position + 128;
                    if biased < 0 || biased > 255 {
                        return scalefactor_error("aac: stereo position out of range");
                    }

                    info.scalefactors[g][sfb] = biased as u8;
                }
                else if codebook == NOISE_HCB {
                    // The noise energy chain is consumed but never applied:
                    // substituted noise is not synthesized and the band
                    // stays silent.
                    if !noise_pcm_read {
                        noise_pcm_read = true;
                        noise_energy += bs.read_uint(9) as i32 - 256;
                        warn!("aac: perceptual noise substitution band will decode as silence");
                    }
                    else {
                        noise_energy += huffman::decode_scalefactor(bs)?;
                    }
                }
                else {
                    sf += huffman::decode_scalefactor(bs)?;

                    if sf < 0 || sf > 255 {
                        return scalefactor_error("aac: scalefactor out of range");
                    }

                    info.scalefactors[g][sfb] = sf as u8;
                }
            }
        }

        if noise_pcm_read {
            debug!("aac: noise energy chain ended at {}", noise_energy);
        }

        Ok(info)
    }
}

impl Default for ScalefactorInfo {
    fn default() -> ScalefactorInfo {
        ScalefactorInfo::new()
    }
}

/// Everything parsed from one channel's individual channel stream. The
/// reconstruction engine consumes this record together with the channel's
/// persistent state.
pub struct DecodeInfo {
    pub global_gain: u8,
    pub ics: IcsInfo,
    pub section: SectionInfo,
    pub sf: ScalefactorInfo,
    pub pulse: pulse::PulseInfo,
    pub tns: tns::TnsInfo,
    /// Quantized spectrum. For short windows the coefficients have been
    /// deinterleaved into eight per-window runs of 128.
    pub quant: [i16; SPECTRUM_SIZE_LONG],
}

// individual_channel_stream
pub fn decode_channel_stream(
    bs: &mut BitReader<'_>,
    band_info: &SfbBandInfo,
    common_ics: Option<&IcsInfo>,
) -> Result<DecodeInfo> {
    let global_gain = bs.read_uint(8) as u8;

    // With a common window the ICS info was decoded once for the pair.
    let ics = match common_ics {
        Some(common) => common.clone(),
        None => IcsInfo::decode(bs, band_info)?,
    };

    let section = SectionInfo::decode(bs, &ics, band_info)?;
    let sf = ScalefactorInfo::decode(bs, &ics, &section, global_gain)?;

    let pulse = pulse::PulseInfo::decode(bs, &ics)?;
    let tns = tns::TnsInfo::decode(bs, &ics)?;

    // Gain control is not allowed in the low-complexity profile.
    if bs.read_bool() {
        return unsupported_error("aac: gain control data");
    }

    let mut quant = decode_spectral_data(bs, &ics, &section)?;

    pulse.apply(&mut quant, band_info)?;

    if !ics.is_long_window {
        quant = deinterleave(&quant, &ics, band_info);
    }

    Ok(DecodeInfo { global_gain, ics, section, sf, pulse, tns, quant })
}

// spectral_data, § 8.3.5
fn decode_spectral_data(
    bs: &mut BitReader<'_>,
    ics: &IcsInfo,
    section: &SectionInfo,
) -> Result<[i16; SPECTRUM_SIZE_LONG]> {
    let mut quant = [0i16; SPECTRUM_SIZE_LONG];

    for g in 0..ics.window_group_count {
        for s in 0..section.section_counts[g] {
            let sect = &section.sections[g][s];

            // Zero, noise, and intensity sections carry no coefficients.
            if sect.codebook == ZERO_HCB || sect.codebook > ESC_HCB {
                continue;
            }

            let start = sect.sample_start;
            let end = start + sect.sample_count;

            if sect.codebook < FIRST_PAIR_HCB {
                let mut k = start;
                while k < end {
                    let values = huffman::decode_quad(bs, sect.codebook)?;
                    for (out, &v) in quant[k..k + 4].iter_mut().zip(&values) {
                        *out = v as i16;
                    }
                    k += 4;
                }
            }
            else {
                let mut k = start;
                while k < end {
                    let values = huffman::decode_pair(bs, sect.codebook)?;
                    for (out, &v) in quant[k..k + 2].iter_mut().zip(&values) {
                        *out = v as i16;
                    }
                    k += 2;
                }
            }
        }
    }

    Ok(quant)
}

/// Reorders a short-window spectrum from interleaved (group-major,
/// band-major) bitstream order into eight contiguous 128-sample windows,
/// per the standard's `quant_to_spec`.
fn deinterleave(
    quant: &[i16; SPECTRUM_SIZE_LONG],
    ics: &IcsInfo,
    band_info: &SfbBandInfo,
) -> [i16; SPECTRUM_SIZE_LONG] {
    let offsets = band_info.short_window.offsets;

    let mut spec = [0i16; SPECTRUM_SIZE_LONG];
    let mut src = 0;

    for g in 0..ics.window_group_count {
        let group = ics.window_groups[g];

        for sfb in 0..ics.sfb_count {
            let offset = offsets[sfb];
            let width = offsets[sfb + 1] - offset;

            for w in 0..group.win_length {
                let dst = (group.win_start + w) * SPECTRUM_SIZE_SHORT + offset;
                spec[dst..dst + width].copy_from_slice(&quant[src..src + width]);
                src += width;
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aac::testutil::BitWriter;
    use crate::common::sample_rate_index;

    fn band_info() -> &'static SfbBandInfo {
        scalefactor_band_info(sample_rate_index(44100))
    }

    fn write_long_ics_info(bw: &mut BitWriter, sfb_count: u32) {
        bw.write(0, 1); // reserved
        bw.write(0, 2); // window sequence: long
        bw.write(0, 1); // window shape: sine
        bw.write(sfb_count, 6);
        bw.write(0, 1); // predictor data present
    }

    #[test]
    fn long_ics_info_derives_a_single_group() {
        let mut bw = BitWriter::new();
        write_long_ics_info(&mut bw, 49);

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        let ics = IcsInfo::decode(&mut bs, band_info()).unwrap();

        assert_eq!(ics.window_sequence, WindowSequence::Long);
        assert!(ics.is_long_window);
        assert_eq!(ics.sfb_count, 49);
        assert_eq!(ics.samples_per_window, 1024);
        assert_eq!(ics.window_count, 1);
        assert_eq!(ics.window_group_count, 1);
        assert_eq!(ics.window_groups[0], WindowGroup { win_start: 0, win_length: 1 });
    }

    #[test]
    fn short_ics_info_groups_windows_by_the_mask() {
        let mut bw = BitWriter::new();
        bw.write(0, 1); // reserved
        bw.write(2, 2); // window sequence: eight short
        bw.write(1, 1); // window shape: kbd
        bw.write(14, 4); // sfb count
        bw.write(0b1100101, 7); // grouping mask

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        let ics = IcsInfo::decode(&mut bs, band_info()).unwrap();

        assert_eq!(ics.window_sequence, WindowSequence::EightShort);
        assert_eq!(ics.window_shape, WindowShape::KaiserBessel);
        assert_eq!(ics.window_count, 8);
        assert_eq!(ics.samples_per_window, 128);

        // Mask 1100101, one bit per window 1..7: set bits extend the
        // current group, so the groups are {0,1,2}, {3}, {4,5}, {6,7}.
        assert_eq!(ics.window_group_count, 4);
        assert_eq!(ics.window_groups[0], WindowGroup { win_start: 0, win_length: 3 });
        assert_eq!(ics.window_groups[1], WindowGroup { win_start: 3, win_length: 1 });
        assert_eq!(ics.window_groups[2], WindowGroup { win_start: 4, win_length: 2 });
        assert_eq!(ics.window_groups[3], WindowGroup { win_start: 6, win_length: 2 });

        // Group lengths always cover the eight windows.
        let total: usize =
            ics.window_groups[..ics.window_group_count].iter().map(|g| g.win_length).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn oversized_sfb_count_is_rejected() {
        let mut bw = BitWriter::new();
        write_long_ics_info(&mut bw, 50); // the 44100 Hz long table has 49

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        assert!(IcsInfo::decode(&mut bs, band_info()).is_err());
    }

    fn long_ics(sfb_count: usize) -> IcsInfo {
        let mut window_groups = [WindowGroup::default(); MAX_WINDOW_GROUPS];
        window_groups[0] = WindowGroup { win_start: 0, win_length: 1 };

        IcsInfo {
            window_sequence: WindowSequence::Long,
            window_shape: WindowShape::Sine,
            is_long_window: true,
            sfb_count,
            samples_per_window: band_info().long_window.offsets[sfb_count],
            window_count: 1,
            window_group_count: 1,
            window_groups,
        }
    }

    #[test]
    fn section_esc_chains_extend_the_length() {
        // 49 bands in two sections: 31 + 3 via an esc chain, then 15.
        let mut bw = BitWriter::new();
        bw.write(1, 4); // codebook
        bw.write(31, 5); // esc
        bw.write(3, 5);
        bw.write(0, 4); // codebook: zero
        bw.write(15, 5);

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        let ics = long_ics(49);
        let section = SectionInfo::decode(&mut bs, &ics, band_info()).unwrap();

        assert_eq!(section.section_counts[0], 2);
        assert_eq!(section.sections[0][0].sfb_start, 0);
        assert_eq!(section.sections[0][0].sfb_length, 34);
        assert_eq!(section.sections[0][1].sfb_start, 34);
        assert_eq!(section.sections[0][1].sfb_length, 15);
        assert_eq!(section.sfb_codebooks[0][33], 1);
        assert_eq!(section.sfb_codebooks[0][34], 0);

        // Interleaved sample accounting covers the whole spectrum.
        let covered = section.sections[0][1].sample_start + section.sections[0][1].sample_count;
        assert_eq!(covered, 1024);
    }

    #[test]
    fn zero_length_sections_are_legal() {
        let mut bw = BitWriter::new();
        bw.write(2, 4); // codebook
        bw.write(0, 5); // zero-length section
        bw.write(1, 4); // codebook
        bw.write(31, 5);
        bw.write(18, 5); // 49 bands

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        let ics = long_ics(49);
        let section = SectionInfo::decode(&mut bs, &ics, band_info()).unwrap();

        assert_eq!(section.section_counts[0], 2);
        assert_eq!(section.sections[0][0].sfb_length, 0);
        assert_eq!(section.sections[0][1].sfb_length, 49);
    }

    #[test]
    fn section_overrun_is_rejected() {
        let mut bw = BitWriter::new();
        bw.write(1, 4);
        bw.write(31, 5);
        bw.write(31, 5);
        bw.write(0, 5); // 62 bands, but only 49 exist

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        let ics = long_ics(49);
        assert!(SectionInfo::decode(&mut bs, &ics, band_info()).is_err());
    }

    #[test]
    fn reserved_codebook_is_rejected() {
        let mut bw = BitWriter::new();
        bw.write(u32::from(RESERVED_HCB), 4);
        bw.write(49, 5);

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        let ics = long_ics(49);
        assert!(SectionInfo::decode(&mut bs, &ics, band_info()).is_err());
    }

    #[test]
    fn scalefactors_track_the_dpcm_chain() {
        let ics = long_ics(2);

        let mut section = SectionInfo::new();
        section.sfb_codebooks[0][0] = 1;
        section.sfb_codebooks[0][1] = 1;

        // Delta +1 then delta -2.
        let plus_one = crate::aac::codebooks::SCF_CODEBOOK.iter().find(|e| e.delta == 1).unwrap();
        let minus_two =
            crate::aac::codebooks::SCF_CODEBOOK.iter().find(|e| e.delta == -2).unwrap();

        let mut bw = BitWriter::new();
        bw.write(plus_one.codeword, u32::from(plus_one.len));
        bw.write(minus_two.codeword, u32::from(minus_two.len));

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        let sf = ScalefactorInfo::decode(&mut bs, &ics, &section, 100).unwrap();

        assert_eq!(sf.scalefactors[0][0], 101);
        assert_eq!(sf.scalefactors[0][1], 99);
    }

    #[test]
    fn scalefactor_overflow_is_rejected() {
        let ics = long_ics(1);

        let mut section = SectionInfo::new();
        section.sfb_codebooks[0][0] = 1;

        let minus_ten =
            crate::aac::codebooks::SCF_CODEBOOK.iter().find(|e| e.delta == -10).unwrap();

        let mut bw = BitWriter::new();
        bw.write(minus_ten.codeword, u32::from(minus_ten.len));

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        // Global gain 5 minus 10 underflows the running value.
        assert!(ScalefactorInfo::decode(&mut bs, &ics, &section, 5).is_err());
    }

    #[test]
    fn zero_codebook_bands_consume_no_bits() {
        let ics = long_ics(3);

        // All bands inactive: an empty bitstream must parse cleanly.
        let section = SectionInfo::new();

        let bytes: [u8; 0] = [];
        let mut bs = BitReader::new(&bytes);

        let sf = ScalefactorInfo::decode(&mut bs, &ics, &section, 77).unwrap();
        assert_eq!(sf.scalefactors[0][0], 0);
    }

    #[test]
    fn deinterleave_regroups_short_window_samples() {
        // Two groups: windows {0,1,2} and {3..7}, one band of width 4.
        let mut window_groups = [WindowGroup::default(); MAX_WINDOW_GROUPS];
        window_groups[0] = WindowGroup { win_start: 0, win_length: 3 };
        window_groups[1] = WindowGroup { win_start: 3, win_length: 5 };

        let ics = IcsInfo {
            window_sequence: WindowSequence::EightShort,
            window_shape: WindowShape::Sine,
            is_long_window: false,
            sfb_count: 1,
            samples_per_window: 4,
            window_count: 8,
            window_group_count: 2,
            window_groups,
        };

        let mut quant = [0i16; SPECTRUM_SIZE_LONG];
        // Interleaved order: (group 0: sfb 0 x windows 0,1,2), (group 1:
        // sfb 0 x windows 3..7); 4 samples each.
        for (i, q) in quant[..32].iter_mut().enumerate() {
            *q = i as i16 + 1;
        }

        let spec = deinterleave(&quant, &ics, band_info());

        for w in 0..8 {
            for i in 0..4 {
                assert_eq!(spec[w * 128 + i], (w * 4 + i) as i16 + 1);
            }
            // Bands beyond the coded width stay zero.
            assert_eq!(spec[w * 128 + 4], 0);
        }
    }
}
