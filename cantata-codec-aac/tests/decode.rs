// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Whole-surface decode tests: ADTS framing feeding the block decoder.

use cantata_codec_aac::{AdtsReader, Decoder, Profile};
use cantata_core::audio::AudioBlock;
use cantata_core::errors::Error;
use cantata_core::io::BitReader;

/// One 13-byte ADTS frame at 44100 Hz, mono, LC: a single-channel element
/// with forty-nine zero-codebook bands and no spectral data, then the end
/// element.
const SILENT_FRAME: &[u8] = &[
    0xFF, 0xF1, 0x50, 0x40, 0x01, 0xA0, 0x00, // header
    0x00, 0xC8, 0x18, 0x83, 0xF2, 0x1C, // raw data block
];

#[test]
fn a_silent_stream_decodes_to_silent_blocks() {
    // Three identical frames back to back.
    let mut stream = Vec::new();
    for _ in 0..3 {
        stream.extend_from_slice(SILENT_FRAME);
    }

    let mut reader = AdtsReader::new(&stream);
    assert_eq!(reader.skip_id3(), 0);
    assert!(reader.is_at_frame_header());

    let header = reader.read_frame_header().unwrap();
    assert_eq!(header.sample_rate(), 44100);
    assert_eq!(header.profile(), Profile::Lc);
    assert_eq!(header.channel_configuration().full_channel_count, 1);

    let mut decoder = Decoder::try_new(header.sample_rate()).unwrap();
    let mut audio = AudioBlock::new();

    let mut blocks = 0;

    while !reader.is_complete() {
        let frame = reader.read_frame().unwrap();

        let mut bs = BitReader::new(frame.payload());
        decoder.decode_block(&mut bs, &mut audio).unwrap();

        assert_eq!(audio.sample_rate(), 44100);
        assert_eq!(audio.channel_count(), 1);
        assert_eq!(audio.samples().len(), 1024);
        assert!(audio.samples().iter().all(|&s| s == 0));

        let size = frame.size();
        reader.advance(size);
        blocks += 1;
    }

    assert_eq!(blocks, 3);
    assert_eq!(reader.position(), stream.len());
}

#[test]
fn an_id3_prefix_is_stepped_over() {
    let mut stream = vec![b'I', b'D', b'3', 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    stream.extend_from_slice(SILENT_FRAME);

    let mut reader = AdtsReader::new(&stream);

    assert_eq!(reader.skip_id3(), 10);
    assert_eq!(reader.position(), 10);
    assert!(reader.is_at_frame_header());
}

#[test]
fn garbage_between_frames_is_resynchronized() {
    let mut stream = Vec::new();
    stream.extend_from_slice(SILENT_FRAME);
    stream.extend_from_slice(&[0x13, 0x37, 0xFF, 0x00]);
    stream.extend_from_slice(SILENT_FRAME);

    let mut reader = AdtsReader::new(&stream);
    let mut decoder = Decoder::try_new(44100).unwrap();
    let mut audio = AudioBlock::new();

    let mut blocks = 0;

    while !reader.is_complete() {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(_) => {
                reader.find_next_frame();
                continue;
            }
        };

        let mut bs = BitReader::new(frame.payload());
        decoder.decode_block(&mut bs, &mut audio).unwrap();

        let size = frame.size();
        reader.advance(size);
        blocks += 1;
    }

    assert_eq!(blocks, 2);
}

#[test]
fn rate_mismatches_force_a_rebuild() {
    let decoder = Decoder::try_new(48000).unwrap();

    let err = decoder.ensure_sample_rate(44100).unwrap_err();
    assert!(matches!(err, Error::SampleRateChanged { from: 48000, to: 44100 }));
}
