// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `audio` module provides the PCM block handed from a decoder to its
//! caller.

/// Samples produced per channel for every decoded block.
pub const BLOCK_SAMPLE_COUNT: usize = 1024;

/// Byte order of the 16-bit samples held in an [`AudioBlock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    /// The byte order of the machine this code runs on.
    pub const fn native() -> ByteOrder {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        }
        else {
            ByteOrder::LittleEndian
        }
    }
}

/// A reusable block of interleaved signed 16-bit PCM.
///
/// The block is owned by the caller and lent to the decoder for the duration
/// of a decode call. The sample buffer grows to fit and is never shrunk, so
/// a block can be recycled across frames without reallocation.
#[derive(Default)]
pub struct AudioBlock {
    sample_rate: u32,
    channel_count: usize,
    samples: Vec<i16>,
    byte_order: Option<ByteOrder>,
}

impl AudioBlock {
    pub fn new() -> Self {
        Default::default()
    }

    /// Readies the block for one decoded frame at the given sample rate and
    /// channel count. The backing buffer is reallocated only when the
    /// required capacity exceeds what is already held.
    pub fn prepare(&mut self, sample_rate: u32, channel_count: usize) {
        self.sample_rate = sample_rate;

        if self.channel_count != channel_count {
            self.channel_count = channel_count;

            let needed = BLOCK_SAMPLE_COUNT * channel_count;
            if self.samples.len() < needed {
                self.samples.resize(needed, 0);
            }
        }

        // Samples written by the decoder are native-endian.
        self.byte_order = Some(ByteOrder::native());
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Total interleaved samples in the block.
    pub fn sample_count(&self) -> usize {
        BLOCK_SAMPLE_COUNT * self.channel_count
    }

    /// The interleaved samples. The slice length is always the logical
    /// block size even when the backing buffer is physically larger.
    pub fn samples(&self) -> &[i16] {
        &self.samples[..self.sample_count()]
    }

    pub fn samples_mut(&mut self) -> &mut [i16] {
        let count = self.sample_count();
        &mut self.samples[..count]
    }

    /// Byte-swaps every sample in place when the current order differs from
    /// the target order.
    pub fn switch_byte_order(&mut self, order: ByteOrder) {
        if self.byte_order == Some(order) {
            return;
        }

        for sample in self.samples_mut() {
            *sample = sample.swap_bytes();
        }

        self.byte_order = Some(order);
    }
}
