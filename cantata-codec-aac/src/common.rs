// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constants shared between the framing layer and the decoder proper.

/// Sample rates addressed by the 4-bit sample-rate index (table 35).
/// Indices 12 through 15 are reserved.
pub const AAC_SAMPLE_RATES: [u32; 16] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 0, 0, 0, 0,
];

/// Audio object profiles carried in the ADTS header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Main,
    /// Low complexity, the only profile decoded here.
    Lc,
    /// Scalable sampling rate.
    Ssr,
    Reserved,
}

impl Profile {
    pub fn from_bits(bits: u32) -> Profile {
        match bits & 0x3 {
            0 => Profile::Main,
            1 => Profile::Lc,
            2 => Profile::Ssr,
            3 => Profile::Reserved,
            _ => unreachable!(),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Profile::Main => "Main",
            Profile::Lc => "LC",
            Profile::Ssr => "SSR",
            Profile::Reserved => "(reserved)",
        };
        write!(f, "{}", name)
    }
}

/// The speaker complement named by a 3-bit channel-configuration index
/// (table 42).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelConfiguration {
    pub full_channel_count: usize,
    pub lfe_channel_count: usize,
}

/// Channel configurations 0 through 7. Configuration 0 defers the channel
/// layout to a program config element.
pub const AAC_CHANNEL_CONFIGURATIONS: [ChannelConfiguration; 8] = [
    ChannelConfiguration { full_channel_count: 0, lfe_channel_count: 0 },
    ChannelConfiguration { full_channel_count: 1, lfe_channel_count: 0 },
    ChannelConfiguration { full_channel_count: 2, lfe_channel_count: 0 },
    ChannelConfiguration { full_channel_count: 3, lfe_channel_count: 0 },
    ChannelConfiguration { full_channel_count: 4, lfe_channel_count: 0 },
    ChannelConfiguration { full_channel_count: 5, lfe_channel_count: 0 },
    ChannelConfiguration { full_channel_count: 5, lfe_channel_count: 1 },
    ChannelConfiguration { full_channel_count: 7, lfe_channel_count: 1 },
];

/// Sample-rate windows for binning arbitrary rates onto a canonical index
/// (table 38). The windows jointly cover the whole `u32` range.
const SAMPLE_RATE_BINS: [(u32, u32, usize); 12] = [
    (0, 9390, 11),
    (9391, 11501, 10),
    (11502, 13855, 9),
    (13856, 18782, 8),
    (18783, 23003, 7),
    (23004, 27712, 6),
    (27713, 37565, 5),
    (37566, 46008, 4),
    (46009, 55425, 3),
    (55426, 75131, 2),
    (75132, 92016, 1),
    (92017, u32::MAX, 0),
];

/// Maps a sample rate in Hz onto its canonical 4-bit index. Rates between
/// the standard ones are binned onto the nearest index.
pub fn sample_rate_index(sample_rate: u32) -> usize {
    let mut lo = 0;
    let mut hi = SAMPLE_RATE_BINS.len();

    while lo < hi {
        let mid = (lo + hi) / 2;
        let (min, max, index) = SAMPLE_RATE_BINS[mid];

        if sample_rate < min {
            hi = mid;
        }
        else if sample_rate > max {
            lo = mid + 1;
        }
        else {
            return index;
        }
    }

    // The windows tile the entire value range.
    unreachable!()
}
