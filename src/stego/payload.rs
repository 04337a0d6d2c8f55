// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Encrypted payload construction and recovery.
//!
//! A payload is the [`PayloadHeader`](crate::stego::frame::PayloadHeader)
//! followed by the AES-GCM ciphertext of the file content:
//!
//! ```text
//! [328 bytes] header (signature, version, flags, size, name, salt, nonce, hash)
//! [N+16     ] ciphertext with tag
//! ```
//!
//! The file name and size travel in clear inside the header; only the file
//! content is encrypted. The MIME type is not stored.

use tracing::{debug, warn};

use crate::stego::capacity;
use crate::stego::crypto::{self, TAG_LEN};
use crate::stego::error::StegoError;
use crate::stego::frame::{self, PayloadHeader, HEADER_LEN, VERSION};
use crate::stego::note::SecretMaterial;

/// MIME type reported for every recovered file.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A file to hide, or a file recovered from a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub filename: String,
    pub content: Vec<u8>,
}

impl FileEntry {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Always `application/octet-stream`; the file name extension is the only type hint.
    pub fn mime_type(&self) -> &'static str {
        OCTET_STREAM
    }
}

/// Encrypt a file and wrap it in a payload header.
///
/// # Errors
/// - [`StegoError::FilenameTooLong`] / [`StegoError::InvalidFilename`] for names
///   that do not fit the header field. Checked before any key derivation.
/// - [`StegoError::InputTooLarge`] if the payload would overflow the 32-bit
///   length prefix.
pub fn build_payload(
    file: &FileEntry,
    note: &str,
    password: Option<&str>,
) -> Result<Vec<u8>, StegoError> {
    frame::validate_file_name(&file.filename)?;
    capacity::check_file_size(file.content.len() as u64)?;

    let secret = SecretMaterial::combine(note, password);
    let content_hash = crypto::sha256(&file.content);
    let (ciphertext, nonce, salt) = crypto::encrypt(&file.content, secret.as_str())?;

    let header = PayloadHeader {
        version: VERSION,
        has_password: secret.has_password(),
        original_size: file.content.len() as u64,
        file_name: file.filename.clone(),
        salt,
        nonce,
        content_hash,
    };

    let mut payload = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    payload.extend_from_slice(&header.to_bytes()?);
    payload.extend_from_slice(&ciphertext);

    debug!(
        file_size = file.content.len(),
        payload_len = payload.len(),
        has_password = header.has_password,
        "built payload"
    );
    Ok(payload)
}

/// Parse the header of an extracted payload without decrypting.
///
/// Lets a caller show the stored name and size, and whether a password is
/// needed, before asking for secrets.
pub fn inspect_payload(raw: &[u8]) -> Result<PayloadHeader, StegoError> {
    let header = PayloadHeader::parse(raw)?;
    if raw.len() < HEADER_LEN + TAG_LEN {
        return Err(StegoError::InvalidHeader);
    }
    Ok(header)
}

/// Decrypt an extracted payload and verify the recovered content.
///
/// `raw` must be exactly the payload (the LSB decoder returns no trailing bytes).
///
/// # Errors
/// - [`StegoError::InvalidSignature`], [`StegoError::UnsupportedVersion`],
///   [`StegoError::InvalidHeader`] for foreign or truncated data.
/// - [`StegoError::ChecksumFailed`] if AES-GCM authentication fails. Does not
///   say whether the note or the password was wrong.
/// - [`StegoError::IntegrityCheckFailed`] if the plaintext does not match the
///   stored SHA-256 or size.
pub fn parse_payload(
    raw: &[u8],
    note: &str,
    password: Option<&str>,
) -> Result<FileEntry, StegoError> {
    let header = inspect_payload(raw)?;
    let ciphertext = &raw[HEADER_LEN..];

    let secret = SecretMaterial::combine(note, password);
    let content = crypto::decrypt(ciphertext, secret.as_str(), &header.salt, &header.nonce)?;

    if crypto::sha256(&content) != header.content_hash {
        warn!(file_size = content.len(), "content hash mismatch after successful decryption");
        return Err(StegoError::IntegrityCheckFailed);
    }
    if content.len() as u64 != header.original_size {
        warn!(
            file_size = content.len(),
            declared = header.original_size,
            "recovered size differs from header"
        );
        return Err(StegoError::IntegrityCheckFailed);
    }

    debug!(file_size = content.len(), "payload decrypted and verified");
    Ok(FileEntry {
        filename: header.file_name,
        content,
    })
}
