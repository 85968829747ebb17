// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! An AAC-LC decoder for ADTS streams.
//!
//! [`AdtsReader`] walks the framing layer of an ADTS byte stream and
//! [`Decoder`] turns each frame payload into one block of interleaved
//! 16-bit PCM. See ISO/IEC 13818-7 for the bitstream this implements.

mod aac;
mod adts;
mod common;

pub use aac::Decoder;
pub use adts::{AdtsReader, Frame, FrameHeader, ADTS_HEADER_SIZE};
pub use common::{sample_rate_index, ChannelConfiguration, Profile, AAC_SAMPLE_RATES};
