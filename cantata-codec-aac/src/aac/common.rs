// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decode limits, window classification, and the scalefactor-band tables.

/// Spectral coefficients per long window, and per whole block.
pub const SPECTRUM_SIZE_LONG: usize = 1024;

/// Spectral coefficients per short window.
pub const SPECTRUM_SIZE_SHORT: usize = 128;

/// Time-domain samples produced by the long-window inverse transform.
pub const XFORM_SIZE_LONG: usize = 2 * SPECTRUM_SIZE_LONG;

/// Time-domain samples produced by the short-window inverse transform.
pub const XFORM_SIZE_SHORT: usize = 2 * SPECTRUM_SIZE_SHORT;

pub const MAX_SFB_COUNT: usize = 51;
pub const MAX_WINDOW_COUNT: usize = 8;
pub const MAX_WINDOW_GROUPS: usize = 8;
pub const MAX_PULSE_COUNT: usize = 4;

pub const MAX_TNS_FILTER_COUNT: usize = 3;
pub const MAX_TNS_ORDER_LONG_LC: usize = 12;
pub const MAX_TNS_ORDER_SHORT: usize = 7;

// Huffman codebook numbers with assigned meanings.
pub const ZERO_HCB: u8 = 0;
pub const FIRST_PAIR_HCB: u8 = 5;
pub const ESC_HCB: u8 = 11;
pub const RESERVED_HCB: u8 = 12;
pub const NOISE_HCB: u8 = 13;
pub const INTENSITY_HCB2: u8 = 14;
pub const INTENSITY_HCB: u8 = 15;

/// Window sequence of a block (table 44).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowSequence {
    Long,
    LongStart,
    EightShort,
    LongStop,
}

impl WindowSequence {
    pub fn from_bits(bits: u32) -> WindowSequence {
        match bits & 0x3 {
            0 => WindowSequence::Long,
            1 => WindowSequence::LongStart,
            2 => WindowSequence::EightShort,
            3 => WindowSequence::LongStop,
            _ => unreachable!(),
        }
    }

    /// Every sequence except the eight-short one is a long window.
    pub fn is_long(self) -> bool {
        self != WindowSequence::EightShort
    }
}

/// Shape of the transform window halves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowShape {
    Sine,
    KaiserBessel,
}

impl WindowShape {
    pub fn from_bits(bits: u32) -> WindowShape {
        if bits & 0x1 == 0 {
            WindowShape::Sine
        }
        else {
            WindowShape::KaiserBessel
        }
    }
}

/// Scalefactor-band offsets for one window size.
///
/// `offsets` carries one extra trailing entry holding the total transform
/// length, so the width of band `b` is always `offsets[b + 1] - offsets[b]`.
pub struct SfbOffsets {
    pub swb_count: usize,
    pub offsets: &'static [usize],
}

/// The pair of band tables in effect for one sample-rate index.
pub struct SfbBandInfo {
    pub long_window: &'static SfbOffsets,
    pub short_window: &'static SfbOffsets,
}

impl SfbBandInfo {
    /// The offsets for the given window class.
    pub fn offsets(&self, long: bool) -> &'static SfbOffsets {
        if long {
            self.long_window
        }
        else {
            self.short_window
        }
    }
}

// Table 45
static SFB_LONG_44100_48000: SfbOffsets = SfbOffsets {
    swb_count: 49,
    offsets: &[
        0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 48, 56, 64, 72, 80, 88, 96, 108, 120, 132, 144,
        160, 176, 196, 216, 240, 264, 292, 320, 352, 384, 416, 448, 480, 512, 544, 576, 608, 640,
        672, 704, 736, 768, 800, 832, 864, 896, 928, 1024,
    ],
};

// Table 46
static SFB_SHORT_32000_44100_48000: SfbOffsets = SfbOffsets {
    swb_count: 14,
    offsets: &[0, 4, 8, 12, 16, 20, 28, 36, 44, 56, 68, 80, 96, 112, 128],
};

// Table 47
static SFB_LONG_32000: SfbOffsets = SfbOffsets {
    swb_count: 51,
    offsets: &[
        0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 48, 56, 64, 72, 80, 88, 96, 108, 120, 132, 144,
        160, 176, 196, 216, 240, 264, 292, 320, 352, 384, 416, 448, 480, 512, 544, 576, 608, 640,
        672, 704, 736, 768, 800, 832, 864, 896, 928, 960, 992, 1024,
    ],
};

// Table 48
static SFB_LONG_8000: SfbOffsets = SfbOffsets {
    swb_count: 40,
    offsets: &[
        0, 12, 24, 36, 48, 60, 72, 84, 96, 108, 120, 132, 144, 156, 172, 188, 204, 220, 236, 252,
        268, 288, 308, 328, 348, 372, 396, 420, 448, 476, 508, 544, 580, 620, 664, 712, 764, 820,
        880, 944, 1024,
    ],
};

// Table 49
static SFB_SHORT_8000: SfbOffsets = SfbOffsets {
    swb_count: 15,
    offsets: &[0, 4, 8, 12, 16, 20, 24, 28, 36, 44, 52, 60, 72, 88, 108, 128],
};

// Table 50
static SFB_LONG_11025_12000_16000: SfbOffsets = SfbOffsets {
    swb_count: 43,
    offsets: &[
        0, 8, 16, 24, 32, 40, 48, 56, 64, 72, 80, 88, 100, 112, 124, 136, 148, 160, 172, 184, 196,
        212, 228, 244, 260, 280, 300, 320, 344, 368, 396, 424, 456, 492, 532, 572, 616, 664, 716,
        772, 832, 896, 960, 1024,
    ],
};

// Table 51
static SFB_SHORT_11025_12000_16000: SfbOffsets = SfbOffsets {
    swb_count: 15,
    offsets: &[0, 4, 8, 12, 16, 20, 24, 28, 32, 40, 48, 60, 72, 88, 108, 128],
};

// Table 52
static SFB_LONG_22050_24000: SfbOffsets = SfbOffsets {
    swb_count: 47,
    offsets: &[
        0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44, 52, 60, 68, 76, 84, 92, 100, 108, 116, 124,
        136, 148, 160, 172, 188, 204, 220, 240, 260, 284, 308, 336, 364, 396, 432, 468, 508, 552,
        600, 652, 704, 768, 832, 896, 960, 1024,
    ],
};

// Table 53
static SFB_SHORT_22050_24000: SfbOffsets = SfbOffsets {
    swb_count: 15,
    offsets: &[0, 4, 8, 12, 16, 20, 24, 28, 36, 44, 52, 64, 76, 92, 108, 128],
};

// Table 54
static SFB_LONG_64000: SfbOffsets = SfbOffsets {
    swb_count: 47,
    offsets: &[
        0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44, 48, 52, 56, 64, 72, 80, 88, 100, 112, 124,
        140, 156, 172, 192, 216, 240, 268, 304, 344, 384, 424, 464, 504, 544, 584, 624, 664, 704,
        744, 784, 824, 864, 904, 944, 984, 1024,
    ],
};

// Table 55
static SFB_SHORT_64000: SfbOffsets = SfbOffsets {
    swb_count: 12,
    offsets: &[0, 4, 8, 12, 16, 20, 24, 32, 40, 48, 64, 92, 128],
};

// Table 56
static SFB_LONG_88200_96000: SfbOffsets = SfbOffsets {
    swb_count: 41,
    offsets: &[
        0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44, 48, 52, 56, 64, 72, 80, 88, 96, 108, 120,
        132, 144, 156, 172, 188, 212, 240, 276, 320, 384, 448, 512, 576, 640, 704, 768, 832, 896,
        960, 1024,
    ],
};

// Table 57
static SFB_SHORT_88200_96000: SfbOffsets = SfbOffsets {
    swb_count: 12,
    offsets: &[0, 4, 8, 12, 16, 20, 24, 32, 40, 48, 64, 92, 128],
};

/// Band tables per sample-rate index.
static SFB_BAND_INFO: [SfbBandInfo; 12] = [
    // 96000
    SfbBandInfo { long_window: &SFB_LONG_88200_96000, short_window: &SFB_SHORT_88200_96000 },
    // 88200
    SfbBandInfo { long_window: &SFB_LONG_88200_96000, short_window: &SFB_SHORT_88200_96000 },
    // 64000
    SfbBandInfo { long_window: &SFB_LONG_64000, short_window: &SFB_SHORT_64000 },
    // 48000
    SfbBandInfo { long_window: &SFB_LONG_44100_48000, short_window: &SFB_SHORT_32000_44100_48000 },
    // 44100
    SfbBandInfo { long_window: &SFB_LONG_44100_48000, short_window: &SFB_SHORT_32000_44100_48000 },
    // 32000
    SfbBandInfo { long_window: &SFB_LONG_32000, short_window: &SFB_SHORT_32000_44100_48000 },
    // 24000
    SfbBandInfo { long_window: &SFB_LONG_22050_24000, short_window: &SFB_SHORT_22050_24000 },
    // 22050
    SfbBandInfo { long_window: &SFB_LONG_22050_24000, short_window: &SFB_SHORT_22050_24000 },
    // 16000
    SfbBandInfo { long_window: &SFB_LONG_11025_12000_16000, short_window: &SFB_SHORT_11025_12000_16000 },
    // 12000
    SfbBandInfo { long_window: &SFB_LONG_11025_12000_16000, short_window: &SFB_SHORT_11025_12000_16000 },
    // 11025
    SfbBandInfo { long_window: &SFB_LONG_11025_12000_16000, short_window: &SFB_SHORT_11025_12000_16000 },
    // 8000
    SfbBandInfo { long_window: &SFB_LONG_8000, short_window: &SFB_SHORT_8000 },
];

/// The scalefactor-band tables for a sample-rate index.
pub fn scalefactor_band_info(sample_rate_index: usize) -> &'static SfbBandInfo {
    &SFB_BAND_INFO[sample_rate_index]
}
