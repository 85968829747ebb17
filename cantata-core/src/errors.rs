// Cantata
// Copyright (c) 2025-2026 The Cantata Project Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error;
use std::fmt;
use std::io;
use std::result;

/// `Error` enumerates all failures reported by Cantata.
///
/// Every failure is expected data: parsing and reconstruction return a typed
/// error and the caller decides whether to resynchronize, rebuild, or stop.
#[derive(Debug)]
pub enum Error {
    /// The bytes at the current stream position do not form a valid frame
    /// header (bad syncword, reserved sample-rate index, truncated payload).
    /// Recoverable by scanning for the next frame header.
    MalformedFrameHeader(&'static str),
    /// The stream uses a profile other than the one supported here.
    UnsupportedProfile(&'static str),
    /// The stream uses a feature this decoder does not implement.
    UnsupportedFeature(&'static str),
    /// A codeword could not be matched against its Huffman codebook.
    HuffmanDecodeFailure(&'static str),
    /// A DPCM running value left its allowed range.
    InvalidScalefactor(&'static str),
    /// Section data overran the band or sample limits.
    InvalidSectionLayout(&'static str),
    /// A noise-shaping filter order exceeded its profile limit.
    InvalidTnsOrder(&'static str),
    /// A reserved or out-of-place codebook number was encountered.
    InvalidCodebook(&'static str),
    /// The stream contained malformed data not covered by a more specific
    /// variant.
    DecodeError(&'static str),
    /// The stream changed its sample rate between frames. Informational:
    /// the caller is expected to rebuild the decoder at the new rate.
    SampleRateChanged { from: u32, to: u32 },
    /// An IO error occurred while reading or writing a stream.
    IoError(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::MalformedFrameHeader(msg) => {
                write!(f, "malformed frame header: {}", msg)
            }
            Error::UnsupportedProfile(profile) => {
                write!(f, "unsupported profile: {}", profile)
            }
            Error::UnsupportedFeature(feature) => {
                write!(f, "unsupported feature: {}", feature)
            }
            Error::HuffmanDecodeFailure(msg) => {
                write!(f, "huffman decode failure: {}", msg)
            }
            Error::InvalidScalefactor(msg) => {
                write!(f, "invalid scalefactor: {}", msg)
            }
            Error::InvalidSectionLayout(msg) => {
                write!(f, "invalid section layout: {}", msg)
            }
            Error::InvalidTnsOrder(msg) => {
                write!(f, "invalid tns order: {}", msg)
            }
            Error::InvalidCodebook(msg) => {
                write!(f, "invalid codebook: {}", msg)
            }
            Error::DecodeError(msg) => {
                write!(f, "malformed stream: {}", msg)
            }
            Error::SampleRateChanged { from, to } => {
                write!(f, "sample rate changed: {} -> {} Hz", from, to)
            }
            Error::IoError(ref err) => {
                write!(f, "io error: {}", err)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create a malformed frame header error.
pub fn malformed_frame_error<T>(msg: &'static str) -> Result<T> {
    Err(Error::MalformedFrameHeader(msg))
}

/// Convenience function to create an unsupported profile error.
pub fn unsupported_profile_error<T>(profile: &'static str) -> Result<T> {
    Err(Error::UnsupportedProfile(profile))
}

/// Convenience function to create an unsupported feature error.
pub fn unsupported_error<T>(feature: &'static str) -> Result<T> {
    Err(Error::UnsupportedFeature(feature))
}

/// Convenience function to create a Huffman decode error.
pub fn huffman_error<T>(msg: &'static str) -> Result<T> {
    Err(Error::HuffmanDecodeFailure(msg))
}

/// Convenience function to create a scalefactor range error.
pub fn scalefactor_error<T>(msg: &'static str) -> Result<T> {
    Err(Error::InvalidScalefactor(msg))
}

/// Convenience function to create a section layout error.
pub fn section_layout_error<T>(msg: &'static str) -> Result<T> {
    Err(Error::InvalidSectionLayout(msg))
}

/// Convenience function to create a TNS order error.
pub fn tns_order_error<T>(msg: &'static str) -> Result<T> {
    Err(Error::InvalidTnsOrder(msg))
}

/// Convenience function to create an invalid codebook error.
pub fn codebook_error<T>(msg: &'static str) -> Result<T> {
    Err(Error::InvalidCodebook(msg))
}

/// Convenience function to create a generic decode error.
pub fn decode_error<T>(msg: &'static str) -> Result<T> {
    Err(Error::DecodeError(msg))
}

/// Convenience function to create a sample rate change notification.
pub fn sample_rate_changed<T>(from: u32, to: u32) -> Result<T> {
    Err(Error::SampleRateChanged { from, to })
}
