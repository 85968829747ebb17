// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Huffman decoding of scalefactor deltas and spectral coefficient tuples.
//!
//! The decoders walk their codebook tables directly. Because each table is
//! sorted by ascending codeword length with equal lengths contiguous, the
//! scan holds a running `(len, codeword)` pair, widens it whenever the
//! table moves to a longer length, and compares codewords within the
//! current run.

use cantata_core::errors::{huffman_error, Result};
use cantata_core::io::BitReader;

use super::codebooks::{SpectrumEntries, SCF_CODEBOOK, SPECTRUM_CODEBOOKS};
use super::common::ESC_HCB;

/// Decoded magnitude marking the start of an escape sequence in codebook 11.
const ESCAPE_MAGNITUDE: i32 = 16;

/// Scans `entries` for the codeword at the reader's position. Returns the
/// matching entry index.
fn scan_codebook<E>(
    bs: &mut BitReader<'_>,
    entries: &[E],
    code: impl Fn(&E) -> (u8, u32),
) -> Result<usize> {
    let mut codeword = bs.read_bit();
    let mut len = 1u8;
    let mut i = 0;

    loop {
        // The next entry needs more bits than are held; read the difference.
        let (entry_len, _) = code(&entries[i]);

        if len < entry_len {
            let read_count = entry_len - len;
            codeword = (codeword << read_count) | bs.read_uint(u32::from(read_count));
            len = entry_len;
        }

        // Compare against each entry of the current length.
        while i < entries.len() {
            let (entry_len, entry_codeword) = code(&entries[i]);

            if entry_len != len {
                break;
            }

            if entry_codeword == codeword {
                return Ok(i);
            }

            i += 1;
        }

        if i >= entries.len() {
            return huffman_error("aac: codeword not present in codebook");
        }
    }
}

/// Decodes one signed scalefactor DPCM delta from the shared codebook.
pub fn decode_scalefactor(bs: &mut BitReader<'_>) -> Result<i32> {
    let i = scan_codebook(bs, &SCF_CODEBOOK, |e| (e.len, e.codeword))?;
    Ok(i32::from(SCF_CODEBOOK[i].delta))
}

/// Decodes one 4-tuple of spectral coefficients using codebooks 1 to 4.
pub fn decode_quad(bs: &mut BitReader<'_>, codebook: u8) -> Result<[i32; 4]> {
    let book = &SPECTRUM_CODEBOOKS[usize::from(codebook) - 1];

    let entries = match book.entries {
        SpectrumEntries::Quads(entries) => entries,
        SpectrumEntries::Pairs(_) => unreachable!("codebook dimension"),
    };

    let i = scan_codebook(bs, entries, |e| (e.len, e.codeword))?;

    let mut values = [0i32; 4];
    for (value, &raw) in values.iter_mut().zip(&entries[i].values) {
        *value = i32::from(raw);
    }

    if !book.signed {
        // One sign bit follows the codeword for every non-zero magnitude.
        for value in values.iter_mut() {
            if *value != 0 && bs.read_bool() {
                *value = -*value;
            }
        }
    }

    Ok(values)
}

/// Decodes one 2-tuple of spectral coefficients using codebooks 5 to 11.
pub fn decode_pair(bs: &mut BitReader<'_>, codebook: u8) -> Result<[i32; 2]> {
    let book = &SPECTRUM_CODEBOOKS[usize::from(codebook) - 1];

    let entries = match book.entries {
        SpectrumEntries::Pairs(entries) => entries,
        SpectrumEntries::Quads(_) => unreachable!("codebook dimension"),
    };

    let i = scan_codebook(bs, entries, |e| (e.len, e.codeword))?;

    let mut values = [0i32; 2];
    for (value, &raw) in values.iter_mut().zip(&entries[i].values) {
        *value = i32::from(raw);
    }

    if !book.signed {
        // Sign bits for both magnitudes precede any escape sequence, and
        // escapes resolve before the signs are applied.
        let negative =
            [values[0] != 0 && bs.read_bool(), values[1] != 0 && bs.read_bool()];

        if codebook == ESC_HCB {
            for value in values.iter_mut() {
                if *value == ESCAPE_MAGNITUDE {
                    *value = read_escape(bs)?;
                }
            }
        }

        for (value, &negative) in values.iter_mut().zip(&negative) {
            if negative {
                *value = -*value;
            }
        }
    }

    Ok(values)
}

/// Reads a codebook-11 escape: a unary run of ones of length L, then an
/// (L + 4)-bit word. The decoded magnitude is `(1 << (L + 4)) + word`.
fn read_escape(bs: &mut BitReader<'_>) -> Result<i32> {
    let mut prefix = 0u32;

    while bs.read_bit() == 1 {
        prefix += 1;

        // Quantized magnitudes never exceed 13 bits.
        if prefix > 8 {
            return huffman_error("aac: escape prefix too long");
        }
    }

    let word = bs.read_uint(prefix + 4) as i32;

    Ok((1 << (prefix + 4)) + word)
}

#[cfg(test)]
mod tests {
    use super::super::testutil::BitWriter;
    use super::*;
    use crate::aac::codebooks::{PairEntry, QuadEntry};

    fn quad_entry(codebook: u8, values: [i8; 4]) -> QuadEntry {
        match SPECTRUM_CODEBOOKS[usize::from(codebook) - 1].entries {
            SpectrumEntries::Quads(entries) => {
                *entries.iter().find(|e| e.values == values).unwrap()
            }
            _ => panic!("not a quad codebook"),
        }
    }

    fn pair_entry(codebook: u8, values: [i8; 2]) -> PairEntry {
        match SPECTRUM_CODEBOOKS[usize::from(codebook) - 1].entries {
            SpectrumEntries::Pairs(entries) => {
                *entries.iter().find(|e| e.values == values).unwrap()
            }
            _ => panic!("not a pair codebook"),
        }
    }

    #[test]
    fn every_spectrum_codeword_scans_to_its_own_entry() {
        for book in SPECTRUM_CODEBOOKS.iter() {
            let codes: Vec<(u8, u32)> = match book.entries {
                SpectrumEntries::Quads(entries) => {
                    entries.iter().map(|e| (e.len, e.codeword)).collect()
                }
                SpectrumEntries::Pairs(entries) => {
                    entries.iter().map(|e| (e.len, e.codeword)).collect()
                }
            };

            for (i, &(len, codeword)) in codes.iter().enumerate() {
                let mut bw = BitWriter::new();
                bw.write(codeword, u32::from(len));

                let bytes = bw.finish();
                let mut bs = BitReader::new(&bytes);

                let found = scan_codebook(&mut bs, &codes, |&c| c).unwrap();
                assert_eq!(found, i);
            }
        }
    }

    #[test]
    fn scalefactor_deltas_round_trip() {
        for entry in SCF_CODEBOOK.iter() {
            let mut bw = BitWriter::new();
            bw.write(entry.codeword, u32::from(entry.len));

            let bytes = bw.finish();
            let mut bs = BitReader::new(&bytes);

            assert_eq!(decode_scalefactor(&mut bs).unwrap(), i32::from(entry.delta));
        }
    }

    #[test]
    fn signed_quad_decodes_without_sign_bits() {
        let entry = quad_entry(1, [-1, 0, 1, 0]);

        let mut bw = BitWriter::new();
        bw.write(entry.codeword, u32::from(entry.len));
        bw.write(0b1011, 4); // guard bits

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        assert_eq!(decode_quad(&mut bs, 1).unwrap(), [-1, 0, 1, 0]);

        // No sign bits may have been consumed for a signed codebook.
        assert_eq!(bs.read_uint(4), 0b1011);
    }

    #[test]
    fn unsigned_quad_reads_one_sign_bit_per_nonzero_value() {
        let entry = quad_entry(3, [2, 0, 1, 2]);

        let mut bw = BitWriter::new();
        bw.write(entry.codeword, u32::from(entry.len));
        bw.write(0b101, 3); // negate v1 and v4, keep v3

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        assert_eq!(decode_quad(&mut bs, 3).unwrap(), [-2, 0, 1, -2]);
    }

    #[test]
    fn unsigned_pair_reads_sign_bits() {
        let entry = pair_entry(7, [1, 3]);

        let mut bw = BitWriter::new();
        bw.write(entry.codeword, u32::from(entry.len));
        bw.write(0b01, 2); // keep v1, negate v2

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        assert_eq!(decode_pair(&mut bs, 7).unwrap(), [1, -3]);
    }

    #[test]
    fn escape_magnitudes_resolve_before_signs() {
        let entry = pair_entry(11, [16, 0]);

        let mut bw = BitWriter::new();
        bw.write(entry.codeword, u32::from(entry.len));
        bw.write(1, 1); // sign bit: negative
        bw.write(0b110, 3); // unary escape prefix, L = 2
        bw.write(0b000101, 6); // escape word

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        assert_eq!(decode_pair(&mut bs, 11).unwrap(), [-((1 << 6) + 5), 0]);
    }

    #[test]
    fn short_escape_has_no_unary_prefix() {
        let entry = pair_entry(11, [0, 16]);

        let mut bw = BitWriter::new();
        bw.write(entry.codeword, u32::from(entry.len));
        bw.write(0, 1); // sign bit: positive
        bw.write(0, 1); // empty unary prefix, L = 0
        bw.write(0xF, 4); // escape word

        let bytes = bw.finish();
        let mut bs = BitReader::new(&bytes);

        assert_eq!(decode_pair(&mut bs, 11).unwrap(), [0, 16 + 0xF]);
    }
}
