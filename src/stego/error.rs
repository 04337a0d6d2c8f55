// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers all failure modes from carrier decoding through
//! encryption, payload framing and LSB extraction. Every variant is a stable
//! kind the caller can branch on; none of them carry secret material.

use core::fmt;

use crate::raster::error::RasterError;

/// Errors that can occur during steganographic encoding or decoding.
#[derive(Debug)]
pub enum StegoError {
    /// The carrier image could not be decoded or encoded.
    InvalidImage(RasterError),
    /// The carrier has fewer LSB slots than the payload needs.
    ImageTooSmall { required_bits: u64, capacity_bits: u64 },
    /// The file is larger than a generated carrier, the 32-bit length prefix,
    /// or AES-GCM can accommodate.
    InputTooLarge { file_size: u64, max_file_size: u64 },
    /// The extracted payload does not start with the `PX` signature.
    InvalidSignature,
    /// The payload was written by an unknown format version.
    UnsupportedVersion(u8),
    /// The embedded length prefix or header is inconsistent with the carrier.
    InvalidHeader,
    /// AES-GCM authentication failed (wrong note/password or corrupted data).
    ChecksumFailed,
    /// The decrypted content does not match the stored SHA-256 or size.
    IntegrityCheckFailed,
    /// The file name encodes to more than 256 UTF-8 bytes.
    FilenameTooLong { len: usize },
    /// The file name contains a NUL byte.
    InvalidFilename,
    /// The operating system random source failed.
    RandomSource,
    /// The operation was cancelled by the caller.
    Cancelled,
    /// A background worker thread could not be started.
    WorkerUnavailable,
}

impl StegoError {
    /// Stable machine-readable kind, used by bindings that can only pass strings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidImage(_) => "InvalidImage",
            Self::ImageTooSmall { .. } => "ImageTooSmall",
            Self::InputTooLarge { .. } => "InputTooLarge",
            Self::InvalidSignature => "InvalidSignature",
            Self::UnsupportedVersion(_) => "UnsupportedVersion",
            Self::InvalidHeader => "InvalidHeader",
            Self::ChecksumFailed => "ChecksumFailed",
            Self::IntegrityCheckFailed => "IntegrityCheckFailed",
            Self::FilenameTooLong { .. } => "FilenameTooLong",
            Self::InvalidFilename => "InvalidFilename",
            Self::RandomSource => "RandomSource",
            Self::Cancelled => "Cancelled",
            Self::WorkerUnavailable => "WorkerUnavailable",
        }
    }

    /// True when the user should re-check the security note or password.
    pub fn is_wrong_secret(&self) -> bool {
        matches!(self, Self::ChecksumFailed)
    }
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidImage(e) => write!(f, "invalid carrier image: {e}"),
            Self::ImageTooSmall { required_bits, capacity_bits } => write!(
                f,
                "image too small: payload needs {required_bits} bits, carrier holds {capacity_bits}"
            ),
            Self::InputTooLarge { file_size, max_file_size } => write!(
                f,
                "file too large: {file_size} bytes (max {max_file_size})"
            ),
            Self::InvalidSignature => write!(f, "no hidden file found (signature mismatch)"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported payload version {v}"),
            Self::InvalidHeader => write!(f, "embedded header is corrupted or missing"),
            Self::ChecksumFailed => write!(f, "incorrect note or password"),
            Self::IntegrityCheckFailed => write!(f, "recovered file failed integrity check"),
            Self::FilenameTooLong { len } => {
                write!(f, "file name is {len} bytes (max 256 UTF-8 bytes)")
            }
            Self::InvalidFilename => write!(f, "file name must not contain NUL"),
            Self::RandomSource => write!(f, "secure random source unavailable"),
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::WorkerUnavailable => write!(f, "could not start worker thread"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidImage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RasterError> for StegoError {
    fn from(e: RasterError) -> Self {
        Self::InvalidImage(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_secret_message_does_not_say_which() {
        let msg = StegoError::ChecksumFailed.to_string();
        assert_eq!(msg, "incorrect note or password");
        assert!(StegoError::ChecksumFailed.is_wrong_secret());
        assert!(!StegoError::IntegrityCheckFailed.is_wrong_secret());
    }

    #[test]
    fn image_too_small_reports_both_numbers() {
        let e = StegoError::ImageTooSmall { required_bits: 40, capacity_bits: 39 };
        let msg = e.to_string();
        assert!(msg.contains("40") && msg.contains("39"));
        assert_eq!(e.kind(), "ImageTooSmall");
    }

    #[test]
    fn raster_errors_are_wrapped_with_source() {
        use std::error::Error;
        let e: StegoError = RasterError::Decode("bad".into()).into();
        assert_eq!(e.kind(), "InvalidImage");
        assert!(e.source().is_some());
    }
}
