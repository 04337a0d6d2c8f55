// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Steganographic encoding and decoding of files in PNG images.
//!
//! The file content is encrypted with AES-256-GCM under a key derived by
//! PBKDF2-HMAC-SHA256 from the security note (plus optional password), framed
//! behind a 328-byte clear header, and written into the least significant bit
//! of each pixel's R, G and B channels. Alpha is never modified.
//!
//! Two ways to encode:
//!
//! - **Cover** (`encode(file, Some(image), ..)`): hide the file in an existing
//!   image of any readable format. The output is always PNG.
//! - **Quick** (`encode(file, None, ..)`): generate a square random-noise
//!   image just large enough for the file.
//!
//! [`decode`] tries each configured decoder variant (current RGB layout, then
//! the legacy RGBA layout) and returns the first file that decrypts.

pub mod error;
pub mod crypto;
pub mod frame;
pub mod note;
pub mod capacity;
pub mod payload;
pub mod lsb;
pub mod carrier;
pub mod variants;
pub mod progress;
mod pipeline;
#[cfg(not(target_arch = "wasm32"))]
pub mod worker;

pub use error::StegoError;

/// Largest side of a generated quick-mode carrier, in pixels.
///
/// 8192 x 8192 holds a little over 25 MB of file content.
pub const MAX_CARRIER_SIDE: u32 = 8192;

pub use pipeline::{
    capacity, decode, decode_raster, decode_with, encode, encode_with_generated_note,
    encode_with_progress, inspect, DecodeOptions, EncodeOutput,
};
pub use capacity::CapacityInfo;
pub use frame::PayloadHeader;
pub use note::{generate_note, NoteStyle};
pub use payload::FileEntry;
pub use progress::{Progress, Stage};
pub use variants::DecoderVariant;

#[cfg(test)]
mod limit_tests {
    use super::*;

    #[test]
    fn largest_quick_carrier_holds_25_mb() {
        let pixels = MAX_CARRIER_SIDE as u64 * MAX_CARRIER_SIDE as u64;
        let max = capacity::max_file_size(pixels);
        assert!(max > 25_000_000 && max < 25_200_000, "{max}");
    }
}
