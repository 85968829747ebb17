// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A minimal RIFF/WAVE writer for 16-bit PCM.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

const WAV_HEADER_SIZE: u32 = 44;

/// Writes a canonical 44-byte-header WAV file. The RIFF and data chunk
/// lengths are patched when the writer is finalized.
pub struct WavWriter {
    file: BufWriter<File>,
    bytes_written: u32,
}

impl WavWriter {
    pub fn open<P: AsRef<Path>>(
        path: P,
        channel_count: u16,
        bits_per_sample: u16,
        sample_rate: u32,
    ) -> io::Result<WavWriter> {
        let mut file = BufWriter::new(File::create(path)?);

        let bytes_per_second =
            (sample_rate * u32::from(bits_per_sample) * u32::from(channel_count)) >> 3;
        let bytes_per_sampling_interval = (bits_per_sample * channel_count) >> 3;

        let mut header = [0u8; WAV_HEADER_SIZE as usize];

        header[0..4].copy_from_slice(b"RIFF");
        // Bytes 4..8: RIFF chunk size, patched on finalize.
        header[8..12].copy_from_slice(b"WAVE");

        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&16u32.to_le_bytes());
        header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
        header[22..24].copy_from_slice(&channel_count.to_le_bytes());
        header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&bytes_per_second.to_le_bytes());
        header[32..34].copy_from_slice(&bytes_per_sampling_interval.to_le_bytes());
        header[34..36].copy_from_slice(&bits_per_sample.to_le_bytes());

        header[36..40].copy_from_slice(b"data");
        // Bytes 40..44: data chunk size, patched on finalize.

        file.write_all(&header)?;

        Ok(WavWriter { file, bytes_written: 0 })
    }

    /// Appends samples in their in-memory byte order. The caller switches
    /// the block to little-endian beforehand.
    pub fn write_samples(&mut self, samples: &[i16]) -> io::Result<()> {
        for sample in samples {
            self.file.write_all(&sample.to_ne_bytes())?;
        }

        self.bytes_written += 2 * samples.len() as u32;

        Ok(())
    }

    /// Patches the chunk lengths and flushes the file.
    pub fn finalize(mut self) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(u64::from(WAV_HEADER_SIZE) - 4))?;
        self.file.write_all(&self.bytes_written.to_le_bytes())?;

        let riff_size = self.bytes_written + WAV_HEADER_SIZE - 8;
        self.file.seek(SeekFrom::Start(4))?;
        self.file.write_all(&riff_size.to_le_bytes())?;

        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn header_and_lengths_are_canonical() {
        let path = std::env::temp_dir().join(format!("cantata-wav-test-{}.wav", std::process::id()));

        let mut writer = WavWriter::open(&path, 2, 16, 44100).unwrap();
        writer.write_samples(&[0i16; 1024 * 2]).unwrap();
        writer.finalize().unwrap();

        let bytes = fs::read(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(bytes.len(), 44 + 4096);

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 4096 + 44 - 8);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32::from_le_bytes(bytes[16..20].try_into().unwrap()), 16);
        assert_eq!(u16::from_le_bytes(bytes[20..22].try_into().unwrap()), 1);
        assert_eq!(u16::from_le_bytes(bytes[22..24].try_into().unwrap()), 2);
        assert_eq!(u32::from_le_bytes(bytes[24..28].try_into().unwrap()), 44100);
        assert_eq!(u32::from_le_bytes(bytes[28..32].try_into().unwrap()), 44100 * 4);
        assert_eq!(u16::from_le_bytes(bytes[32..34].try_into().unwrap()), 4);
        assert_eq!(u16::from_le_bytes(bytes[34..36].try_into().unwrap()), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 4096);
    }
}
