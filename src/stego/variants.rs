// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Decoder variants tried in order when recovering a file.
//!
//! Each variant knows one way to pull a payload out of a raster. The decode
//! pipeline runs them in sequence (or concurrently with the `parallel`
//! feature) and takes the first one whose payload decrypts. If all fail, the
//! most informative error is reported: a wrong secret beats an integrity
//! failure, which beats "no data found".

use tracing::debug;

use crate::raster::Raster;
use crate::stego::error::StegoError;
use crate::stego::lsb::{self, ChannelLayout};
use crate::stego::payload::{self, FileEntry};

/// One strategy for extracting a raw payload from a carrier raster.
pub trait DecoderVariant: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Extract the raw payload bytes (header + ciphertext).
    fn extract(&self, raster: &Raster) -> Result<Vec<u8>, StegoError>;
}

/// Current format: length-prefixed stream in the RGB LSBs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbLsb;

impl DecoderVariant for RgbLsb {
    fn name(&self) -> &'static str {
        "rgb-lsb"
    }

    fn extract(&self, raster: &Raster) -> Result<Vec<u8>, StegoError> {
        lsb::decode_lsb(raster)
    }
}

/// Images from older releases that also used the alpha LSB.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyRgbaLsb;

impl DecoderVariant for LegacyRgbaLsb {
    fn name(&self) -> &'static str {
        "legacy-rgba-lsb"
    }

    fn extract(&self, raster: &Raster) -> Result<Vec<u8>, StegoError> {
        lsb::extract(raster, ChannelLayout::Rgba)
    }
}

/// Ordered decoder list used when the caller does not configure one.
pub fn default_variants() -> Vec<Box<dyn DecoderVariant>> {
    vec![Box::new(RgbLsb), Box::new(LegacyRgbaLsb)]
}

/// Extract with `variant` and decrypt the result.
pub fn attempt(
    variant: &dyn DecoderVariant,
    raster: &Raster,
    note: &str,
    password: Option<&str>,
) -> Result<FileEntry, StegoError> {
    let raw = variant.extract(raster)?;
    payload::parse_payload(&raw, note, password)
}

/// Ranking used to pick the error to report when every variant failed.
fn specificity(e: &StegoError) -> u8 {
    match e {
        e if e.is_wrong_secret() => 3,
        StegoError::IntegrityCheckFailed => 2,
        StegoError::UnsupportedVersion(_) => 1,
        _ => 0,
    }
}

/// Reduce per-variant failures to one error.
///
/// The highest-ranked error wins; ties go to the earliest variant.
pub fn combine_failures(failures: Vec<(&'static str, StegoError)>) -> StegoError {
    let mut best: Option<StegoError> = None;
    for (name, err) in failures {
        debug!(variant = name, error = %err, "decoder variant failed");
        best = match best {
            Some(b) if specificity(&b) >= specificity(&err) => Some(b),
            _ => Some(err),
        };
    }
    best.unwrap_or(StegoError::InvalidHeader)
}

/// Try `variants` in order; first success wins.
#[cfg(not(feature = "parallel"))]
pub fn decode_first(
    variants: &[Box<dyn DecoderVariant>],
    raster: &Raster,
    note: &str,
    password: Option<&str>,
) -> Result<(FileEntry, &'static str), StegoError> {
    let mut failures = Vec::with_capacity(variants.len());
    for variant in variants {
        match attempt(variant.as_ref(), raster, note, password) {
            Ok(file) => return Ok((file, variant.name())),
            Err(e) => failures.push((variant.name(), e)),
        }
    }
    Err(combine_failures(failures))
}

/// Run all `variants` concurrently; the earliest successful one in list order wins.
#[cfg(feature = "parallel")]
pub fn decode_first(
    variants: &[Box<dyn DecoderVariant>],
    raster: &Raster,
    note: &str,
    password: Option<&str>,
) -> Result<(FileEntry, &'static str), StegoError> {
    use rayon::prelude::*;

    let results: Vec<Result<FileEntry, StegoError>> = variants
        .par_iter()
        .map(|v| attempt(v.as_ref(), raster, note, password))
        .collect();

    let mut failures = Vec::with_capacity(variants.len());
    for (variant, result) in variants.iter().zip(results) {
        match result {
            Ok(file) => return Ok((file, variant.name())),
            Err(e) => failures.push((variant.name(), e)),
        }
    }
    Err(combine_failures(failures))
}
