// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The program config element: channel-element inventory and mixdown
//! description. Parsed for diagnostics only; channel routing here follows
//! the SCE/CPE identifiers directly.

use cantata_core::errors::Result;
use cantata_core::io::BitReader;

use crate::common::Profile;

pub const PCE_MAX_CHANNEL_ELEMENTS: usize = 15;
pub const PCE_MAX_LFES: usize = 3;
pub const PCE_MAX_DSES: usize = 7;
pub const PCE_MAX_CCES: usize = 15;

/// A channel element reference: pair flag plus 4-bit instance.
#[derive(Clone, Copy, Default)]
pub struct ElementRef {
    pub is_cpe: bool,
    pub instance: u8,
}

#[derive(Clone, Copy, Default)]
pub struct CouplingRef {
    pub independently_switched: bool,
    pub instance: u8,
}

pub struct ProgramConfig {
    pub instance: u8,
    pub profile: Profile,
    pub sample_rate_index: usize,

    pub front_element_count: usize,
    pub front_elements: [ElementRef; PCE_MAX_CHANNEL_ELEMENTS],

    pub side_element_count: usize,
    pub side_elements: [ElementRef; PCE_MAX_CHANNEL_ELEMENTS],

    pub rear_element_count: usize,
    pub rear_elements: [ElementRef; PCE_MAX_CHANNEL_ELEMENTS],

    pub lfe_element_count: usize,
    pub lfe_elements: [u8; PCE_MAX_LFES],

    pub dse_element_count: usize,
    pub dse_elements: [u8; PCE_MAX_DSES],

    pub cce_element_count: usize,
    pub cce_elements: [CouplingRef; PCE_MAX_CCES],

    pub mono_mixdown: Option<u8>,
    pub stereo_mixdown: Option<u8>,
    pub matrix_mixdown: Option<(u8, bool)>,

    pub comment: Vec<u8>,
}

impl ProgramConfig {
    // program_config_element
    pub fn decode(bs: &mut BitReader<'_>) -> Result<ProgramConfig> {
        let instance = bs.read_uint(4) as u8;
        let profile = Profile::from_bits(bs.read_uint(2));
        let sample_rate_index = bs.read_uint(4) as usize;

        let front_element_count = bs.read_uint(4) as usize;
        let side_element_count = bs.read_uint(4) as usize;
        let rear_element_count = bs.read_uint(4) as usize;
        let lfe_element_count = bs.read_uint(2) as usize;
        let dse_element_count = bs.read_uint(3) as usize;
        let cce_element_count = bs.read_uint(4) as usize;

        let mono_mixdown =
            if bs.read_bool() { Some(bs.read_uint(4) as u8) } else { None };
        let stereo_mixdown =
            if bs.read_bool() { Some(bs.read_uint(4) as u8) } else { None };
        let matrix_mixdown = if bs.read_bool() {
            Some((bs.read_uint(2) as u8, bs.read_bool()))
        }
        else {
            None
        };

        let mut front_elements = [ElementRef::default(); PCE_MAX_CHANNEL_ELEMENTS];
        for element in front_elements[..front_element_count].iter_mut() {
            element.is_cpe = bs.read_bool();
            element.instance = bs.read_uint(4) as u8;
        }

        let mut side_elements = [ElementRef::default(); PCE_MAX_CHANNEL_ELEMENTS];
        for element in side_elements[..side_element_count].iter_mut() {
            element.is_cpe = bs.read_bool();
            element.instance = bs.read_uint(4) as u8;
        }

        let mut rear_elements = [ElementRef::default(); PCE_MAX_CHANNEL_ELEMENTS];
        for element in rear_elements[..rear_element_count].iter_mut() {
            element.is_cpe = bs.read_bool();
            element.instance = bs.read_uint(4) as u8;
        }

        let mut lfe_elements = [0u8; PCE_MAX_LFES];
        for element in lfe_elements[..lfe_element_count].iter_mut() {
            *element = bs.read_uint(4) as u8;
        }

        let mut dse_elements = [0u8; PCE_MAX_DSES];
        for element in dse_elements[..dse_element_count].iter_mut() {
            *element = bs.read_uint(4) as u8;
        }

        let mut cce_elements = [CouplingRef::default(); PCE_MAX_CCES];
        for element in cce_elements[..cce_element_count].iter_mut() {
            element.independently_switched = bs.read_bool();
            element.instance = bs.read_uint(4) as u8;
        }

        // The comment field starts at the next byte boundary.
        bs.align_to_bit(0);

        let comment_length = bs.read_uint(8) as usize;
        let mut comment = vec![0u8; comment_length];
        for byte in comment.iter_mut() {
            *byte = bs.read_byte();
        }

        Ok(ProgramConfig {
            instance,
            profile,
            sample_rate_index,
            front_element_count,
            front_elements,
            side_element_count,
            side_elements,
            rear_element_count,
            rear_elements,
            lfe_element_count,
            lfe_elements,
            dse_element_count,
            dse_elements,
            cce_element_count,
            cce_elements,
            mono_mixdown,
            stereo_mixdown,
            matrix_mixdown,
            comment,
        })
    }
}

impl std::fmt::Display for ProgramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "program config {}: profile {}, rate index {}, \
             front {}, side {}, rear {}, lfe {}, dse {}, cce {}, comment {:?}",
            self.instance,
            self.profile,
            self.sample_rate_index,
            self.front_element_count,
            self.side_element_count,
            self.rear_element_count,
            self.lfe_element_count,
            self.dse_element_count,
            self.cce_element_count,
            String::from_utf8_lossy(&self.comment),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aac::testutil::BitWriter;

    #[test]
    fn parses_elements_mixdowns_and_the_aligned_comment() {
        let mut bw = BitWriter::new();
        bw.write(2, 4); // instance
        bw.write(1, 2); // profile: LC
        bw.write(4, 4); // sample-rate index
        bw.write(2, 4); // front elements
        bw.write(0, 4); // side elements
        bw.write(1, 4); // rear elements
        bw.write(1, 2); // lfe elements
        bw.write(0, 3); // dse elements
        bw.write(0, 4); // cce elements
        bw.write(0, 1); // no mono mixdown
        bw.write(1, 1); // stereo mixdown present
        bw.write(3, 4); // stereo mixdown element
        bw.write(1, 1); // matrix mixdown present
        bw.write(2, 2); // matrix mixdown index
        bw.write(1, 1); // pseudo surround

        // Front: one SCE instance 0, one CPE instance 1.
        bw.write(0, 1);
        bw.write(0, 4);
        bw.write(1, 1);
        bw.write(1, 4);
        // Rear: CPE instance 2.
        bw.write(1, 1);
        bw.write(2, 4);
        // LFE instance 0.
        bw.write(0, 4);

        // Pad to the byte boundary, then the comment.
        let comment = b"hi";
        bw.align();
        bw.write(comment.len() as u32, 8);
        for &b in comment {
            bw.write(u32::from(b), 8);
        }

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        let pce = ProgramConfig::decode(&mut bs).unwrap();

        assert_eq!(pce.instance, 2);
        assert_eq!(pce.profile, Profile::Lc);
        assert_eq!(pce.sample_rate_index, 4);
        assert_eq!(pce.front_element_count, 2);
        assert!(!pce.front_elements[0].is_cpe);
        assert!(pce.front_elements[1].is_cpe);
        assert_eq!(pce.front_elements[1].instance, 1);
        assert_eq!(pce.rear_element_count, 1);
        assert_eq!(pce.lfe_element_count, 1);
        assert_eq!(pce.mono_mixdown, None);
        assert_eq!(pce.stereo_mixdown, Some(3));
        assert_eq!(pce.matrix_mixdown, Some((2, true)));
        assert_eq!(pce.comment, b"hi");
    }
}
