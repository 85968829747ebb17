// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `aac-to-wav`: decode an ADTS stream to `out.wav`.

use std::fs;

use clap::{Arg, Command};
use log::{info, warn};

use cantata_codec_aac::{AdtsReader, Decoder, Profile};
use cantata_core::audio::{AudioBlock, ByteOrder};
use cantata_core::errors::{unsupported_profile_error, Result};
use cantata_core::io::BitReader;

mod wav;

use wav::WavWriter;

const OUTPUT_PATH: &str = "out.wav";

fn main() {
    pretty_env_logger::init();

    let matches = Command::new("aac-to-wav")
        .about("Decode an ADTS AAC-LC stream to a WAV file")
        .arg(
            Arg::new("INPUT")
                .help("The input file path")
                .required(true)
                .index(1),
        )
        .get_matches();

    let path = matches.get_one::<String>("INPUT").unwrap();

    if let Err(err) = run(path) {
        eprintln!("{}: {}", path, err);
        std::process::exit(1);
    }
}

fn run(path: &str) -> Result<()> {
    let data = fs::read(path)?;

    let mut reader = AdtsReader::new(&data);

    // An ID3v2 tag may precede the first frame.
    let skipped = reader.skip_id3();
    if skipped > 0 {
        info!("skipped an id3v2 tag of {} bytes", skipped);
    }

    // Position the reader at the first frame header.
    if !reader.is_at_frame_header() {
        reader.find_next_frame();
    }

    let header = reader.read_frame_header()?;

    info!(
        "{} Hz, profile {}, channel configuration {}",
        header.sample_rate(),
        header.profile(),
        header.channel_configuration_index(),
    );

    if header.profile() != Profile::Lc {
        return unsupported_profile_error("only the low-complexity profile is decoded");
    }

    let mut decoder = Decoder::try_new(header.sample_rate())?;

    let mut audio = AudioBlock::new();
    let mut writer: Option<WavWriter> = None;

    while !reader.is_complete() {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let skipped = reader.find_next_frame();
                warn!("{}; skipped {} bytes resynchronizing", err, skipped);
                continue;
            }
        };

        // A rate change invalidates all decoder state.
        if let Err(err) = decoder.ensure_sample_rate(frame.header().sample_rate()) {
            info!("{}; rebuilding the decoder", err);
            decoder = Decoder::try_new(frame.header().sample_rate())?;
        }

        let mut bs = BitReader::new(frame.payload());
        decoder.decode_block(&mut bs, &mut audio)?;

        if writer.is_none() {
            writer = Some(WavWriter::open(
                OUTPUT_PATH,
                audio.channel_count() as u16,
                16,
                audio.sample_rate(),
            )?);
        }

        audio.switch_byte_order(ByteOrder::LittleEndian);

        if let Some(writer) = writer.as_mut() {
            writer.write_samples(audio.samples())?;
        }

        let size = frame.size();
        reader.advance(size);
    }

    if let Some(writer) = writer {
        writer.finalize()?;
    }

    Ok(())
}
