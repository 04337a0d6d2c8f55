// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Encode/decode pipeline.
//!
//! Encode:
//! 1. Validate the file name and size
//! 2. Decode the cover to raw RGBA, or generate a noise carrier (quick mode)
//! 3. Check capacity from the file size alone, before any key derivation
//! 4. Build the encrypted payload (PBKDF2 + AES-256-GCM, 328-byte header)
//! 5. Embed it into the RGB LSBs
//! 6. Write the raster back out as PNG
//!
//! Decode mirrors it, trying each configured [`DecoderVariant`] in order.
//! Every call is single-shot and stateless: either a complete result comes
//! back or nothing does.

use tracing::debug;

use crate::raster::{self, Raster};
use crate::stego::capacity::{self, CapacityInfo};
use crate::stego::carrier;
use crate::stego::error::StegoError;
use crate::stego::frame::{self, PayloadHeader};
use crate::stego::lsb;
use crate::stego::note::{self, NoteStyle};
use crate::stego::payload::{self, FileEntry};
use crate::stego::progress::{Progress, Stage};
use crate::stego::variants::{self, DecoderVariant};

/// Result of a successful encode.
#[derive(Debug, Clone)]
pub struct EncodeOutput {
    /// The carrier with the hidden file, as PNG.
    pub png: Vec<u8>,
    /// The note needed to recover the file. Show it once; it is not stored anywhere.
    pub note: String,
    pub width: u32,
    pub height: u32,
}

/// Decoder configuration.
pub struct DecodeOptions {
    /// Strategies tried in order; the first that decrypts wins.
    pub variants: Vec<Box<dyn DecoderVariant>>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            variants: variants::default_variants(),
        }
    }
}

impl std::fmt::Debug for DecodeOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.variants.iter().map(|v| v.name()).collect();
        f.debug_struct("DecodeOptions").field("variants", &names).finish()
    }
}

/// Hide `file` in `carrier` (any readable image format), or in a generated
/// noise image when `carrier` is `None`.
///
/// # Errors
/// - [`StegoError::InvalidImage`] if the carrier cannot be decoded.
/// - [`StegoError::ImageTooSmall`] if the carrier is too small for the file.
/// - [`StegoError::InputTooLarge`] if no carrier could hold the file.
/// - [`StegoError::FilenameTooLong`] / [`StegoError::InvalidFilename`].
pub fn encode(
    file: &FileEntry,
    carrier: Option<&[u8]>,
    note: &str,
    password: Option<&str>,
) -> Result<EncodeOutput, StegoError> {
    encode_with_progress(file, carrier, note, password, &Progress::new())
}

/// [`encode`] with a freshly generated note, returned in the output.
pub fn encode_with_generated_note(
    file: &FileEntry,
    carrier: Option<&[u8]>,
    style: NoteStyle,
    password: Option<&str>,
) -> Result<EncodeOutput, StegoError> {
    let note = note::generate_note(style);
    encode(file, carrier, &note, password)
}

/// [`encode`] reporting stages to, and honoring cancellation from, `progress`.
pub fn encode_with_progress(
    file: &FileEntry,
    carrier: Option<&[u8]>,
    note: &str,
    password: Option<&str>,
    progress: &Progress,
) -> Result<EncodeOutput, StegoError> {
    let result = encode_impl(file, carrier, note, password, progress);
    progress.finish(result)
}

fn encode_impl(
    file: &FileEntry,
    carrier: Option<&[u8]>,
    note: &str,
    password: Option<&str>,
    progress: &Progress,
) -> Result<EncodeOutput, StegoError> {
    progress.enter(Stage::PreparingPayload)?;

    let file_size = file.content.len() as u64;
    frame::validate_file_name(&file.filename)?;
    capacity::check_file_size(file_size)?;

    let mut raster = match carrier {
        Some(bytes) => raster::decode_image(bytes)?,
        None => carrier::noise_carrier_for(file_size)?,
    };

    let info = CapacityInfo::new(raster.width(), raster.height(), file_size);
    debug!(
        width = raster.width(),
        height = raster.height(),
        quick = carrier.is_none(),
        file_size,
        usage = info.usage(),
        "carrier ready"
    );
    if !info.fits {
        return Err(StegoError::ImageTooSmall {
            required_bits: info.required_bits,
            capacity_bits: info.capacity_bits,
        });
    }

    let payload = payload::build_payload(file, note, password)?;

    progress.enter(Stage::Embedding)?;
    lsb::encode_lsb(&mut raster, &payload)?;

    progress.enter(Stage::Finalizing)?;
    let png = raster::encode_png(&raster)?;
    debug!(png_len = png.len(), "encode complete");

    Ok(EncodeOutput {
        png,
        note: note.to_string(),
        width: raster.width(),
        height: raster.height(),
    })
}

/// Recover the hidden file from an encoded image.
///
/// # Errors
/// - [`StegoError::ChecksumFailed`] for a wrong note or password.
/// - [`StegoError::InvalidSignature`] / [`StegoError::InvalidHeader`] if no
///   decoder variant finds a payload.
/// - [`StegoError::UnsupportedVersion`] for payloads from a newer format.
/// - [`StegoError::IntegrityCheckFailed`] if decrypted content fails its hash.
pub fn decode(
    carrier: &[u8],
    note: &str,
    password: Option<&str>,
) -> Result<FileEntry, StegoError> {
    decode_with(carrier, note, password, &DecodeOptions::default(), &Progress::new())
}

/// [`decode`] with explicit decoder variants and progress handle.
pub fn decode_with(
    carrier: &[u8],
    note: &str,
    password: Option<&str>,
    options: &DecodeOptions,
    progress: &Progress,
) -> Result<FileEntry, StegoError> {
    let result = decode_impl(carrier, note, password, options, progress);
    progress.finish(result)
}

fn decode_impl(
    carrier: &[u8],
    note: &str,
    password: Option<&str>,
    options: &DecodeOptions,
    progress: &Progress,
) -> Result<FileEntry, StegoError> {
    progress.enter(Stage::PreparingPayload)?;
    let raster = raster::decode_image(carrier)?;

    progress.enter(Stage::Extracting)?;
    let (file, variant) = decode_raster(&raster, note, password, options)?;

    progress.enter(Stage::Finalizing)?;
    debug!(variant, file_size = file.content.len(), "decode complete");
    Ok(file)
}

/// Run the decoder variants against an already decoded raster.
pub fn decode_raster(
    raster: &Raster,
    note: &str,
    password: Option<&str>,
    options: &DecodeOptions,
) -> Result<(FileEntry, &'static str), StegoError> {
    variants::decode_first(&options.variants, raster, note, password)
}

/// Read the clear header fields of a hidden payload without any secret.
///
/// Uses the first decoder variant that yields a well-formed header.
pub fn inspect(carrier: &[u8]) -> Result<PayloadHeader, StegoError> {
    let raster = raster::decode_image(carrier)?;
    let mut failures = Vec::new();
    for variant in variants::default_variants() {
        match variant.extract(&raster).and_then(|raw| payload::inspect_payload(&raw)) {
            Ok(header) => return Ok(header),
            Err(e) => failures.push((variant.name(), e)),
        }
    }
    Err(variants::combine_failures(failures))
}

/// Capacity of an image file for a file of `file_size` bytes.
pub fn capacity(carrier: &[u8], file_size: u64) -> Result<CapacityInfo, StegoError> {
    let raster = raster::decode_image(carrier)?;
    Ok(CapacityInfo::new(raster.width(), raster.height(), file_size))
}
