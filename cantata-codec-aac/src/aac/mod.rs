// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The AAC-LC decoder: element dispatch and per-channel state.

use std::collections::HashMap;

use cantata_core::audio::AudioBlock;
use cantata_core::errors::{
    malformed_frame_error, sample_rate_changed, unsupported_error, Result,
};
use cantata_core::io::BitReader;

use log::debug;

use crate::common::sample_rate_index;

mod codebooks;
mod common;
mod cpe;
mod dsp;
mod huffman;
mod ics;
mod pce;
mod window;

#[cfg(test)]
pub(crate) mod testutil;

use common::{scalefactor_band_info, SfbBandInfo};

// Syntactic element identifiers (table 23).
const ELEM_SCE: u32 = 0x0;
const ELEM_CPE: u32 = 0x1;
const ELEM_CCE: u32 = 0x2;
const ELEM_LFE: u32 = 0x3;
const ELEM_DSE: u32 = 0x4;
const ELEM_PCE: u32 = 0x5;
const ELEM_FIL: u32 = 0x6;
const ELEM_END: u32 = 0x7;

/// An AAC-LC decoder for one ADTS stream.
///
/// The decoder is fixed to the sample rate it was constructed with; when
/// the stream's rate changes the caller rebuilds it. Channel state is held
/// per element type and 4-bit instance identifier, created lazily on first
/// sight and kept across blocks for the overlap-add chain.
pub struct Decoder {
    sample_rate: u32,
    sample_rate_index: usize,
    band_info: &'static SfbBandInfo,
    block_count: u64,
    sce_decoders: HashMap<u8, dsp::ChannelDecoder>,
    cpe_decoders: HashMap<u8, [dsp::ChannelDecoder; 2]>,
}

impl Decoder {
    /// Creates a decoder for a stream running at `sample_rate` Hz.
    pub fn try_new(sample_rate: u32) -> Result<Decoder> {
        if sample_rate == 0 {
            return malformed_frame_error("aac: reserved sample rate");
        }

        let index = sample_rate_index(sample_rate);

        Ok(Decoder {
            sample_rate,
            sample_rate_index: index,
            band_info: scalefactor_band_info(index),
            block_count: 0,
            sce_decoders: HashMap::new(),
            cpe_decoders: HashMap::new(),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Checks an incoming frame's rate against the decoder's. A mismatch
    /// reports [`SampleRateChanged`](cantata_core::errors::Error); the
    /// caller is expected to rebuild the decoder at the new rate.
    pub fn ensure_sample_rate(&self, sample_rate: u32) -> Result<()> {
        if sample_rate != self.sample_rate {
            return sample_rate_changed(self.sample_rate, sample_rate);
        }
        Ok(())
    }

    /// Decodes one raw data block into `audio`. On failure the block's
    /// samples are undefined and the caller should drop the block.
    pub fn decode_block(
        &mut self,
        bs: &mut BitReader<'_>,
        audio: &mut AudioBlock,
    ) -> Result<()> {
        let mut done = false;

        while !done && !bs.is_exhausted() {
            let id = bs.read_uint(3);

            match id {
                ELEM_SCE | ELEM_LFE => self.decode_sce(bs, audio)?,
                ELEM_CPE => self.decode_cpe(bs, audio)?,
                ELEM_CCE => return unsupported_error("aac: coupling channel element"),
                ELEM_DSE => return unsupported_error("aac: data stream element"),
                ELEM_PCE => {
                    let config = pce::ProgramConfig::decode(bs)?;
                    debug!("{}", config);
                }
                ELEM_FIL => decode_fil(bs),
                ELEM_END => done = true,
                _ => unreachable!(),
            }
        }

        self.block_count += 1;
        debug!("decoded block {}", self.block_count);

        bs.align_to_bit(0);

        Ok(())
    }

    // single_channel_element (and lfe_channel_element, which shares the
    // syntax).
    fn decode_sce(&mut self, bs: &mut BitReader<'_>, audio: &mut AudioBlock) -> Result<()> {
        let instance = bs.read_uint(4) as u8;

        let info = ics::decode_channel_stream(bs, self.band_info, None)?;

        let mut spec = dsp::dequantize(&info.quant);
        dsp::rescale(&mut spec, &info, self.band_info);

        audio.prepare(self.sample_rate, 1);

        let index = self.sample_rate_index;
        let decoder = self
            .sce_decoders
            .entry(instance)
            .or_insert_with(|| dsp::ChannelDecoder::new(index));

        decoder.synthesize(&info, &mut spec, self.band_info, audio.samples_mut(), 1);

        Ok(())
    }

    // channel_pair_element
    fn decode_cpe(&mut self, bs: &mut BitReader<'_>, audio: &mut AudioBlock) -> Result<()> {
        let instance = bs.read_uint(4) as u8;

        let common_window = bs.read_bool();

        // With a common window, one ICS info and the mid/side mask are
        // shared by both channels.
        let (shared_ics, mask) = if common_window {
            let shared = ics::IcsInfo::decode(bs, self.band_info)?;
            let mask = cpe::MsMaskInfo::decode(bs, &shared)?;
            (Some(shared), mask)
        }
        else {
            (None, cpe::MsMaskInfo::off())
        };

        let info0 = ics::decode_channel_stream(bs, self.band_info, shared_ics.as_ref())?;
        let info1 = ics::decode_channel_stream(bs, self.band_info, shared_ics.as_ref())?;

        let mut left = dsp::dequantize(&info0.quant);
        dsp::rescale(&mut left, &info0, self.band_info);

        let mut right = dsp::dequantize(&info1.quant);
        dsp::rescale(&mut right, &info1, self.band_info);

        if common_window {
            cpe::apply_joint_stereo(&mut left, &mut right, &info0, &info1, &mask, self.band_info);
        }

        audio.prepare(self.sample_rate, 2);

        let index = self.sample_rate_index;
        let pair = self.cpe_decoders.entry(instance).or_insert_with(|| {
            [dsp::ChannelDecoder::new(index), dsp::ChannelDecoder::new(index)]
        });

        let samples = audio.samples_mut();
        pair[0].synthesize(&info0, &mut left, self.band_info, samples, 2);
        pair[1].synthesize(&info1, &mut right, self.band_info, &mut samples[1..], 2);

        Ok(())
    }
}

// fill_element (table 26): a 4-bit count, extended by one byte (biased by
// one) when saturated; the payload is skipped.
fn decode_fil(bs: &mut BitReader<'_>) {
    let mut count = bs.read_uint(4) as usize;

    if count == 15 {
        count += bs.read_uint(8) as usize;
        count -= 1;
    }

    bs.skip_bytes(count);
}
