// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Payload header construction and parsing.
//!
//! The header is a fixed 328-byte little-endian structure placed in front of
//! the AES-GCM ciphertext:
//!
//! ```text
//! offset  size  field
//!   0       2   signature        "PX"
//!   2       1   version          1
//!   3       1   has_password     0 / 1
//!   4       8   original size    u64 LE
//!  12     256   file name        UTF-8, NUL-padded
//! 268      16   PBKDF2 salt
//! 284      12   AES-GCM nonce
//! 296      32   SHA-256 of the plaintext
//! ```
//!
//! Total payload = 328 + file_size + 16 (tag) bytes. The layout is shared with
//! other implementations and must stay bit-exact.

use crate::stego::crypto::{HASH_LEN, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::stego::error::StegoError;

/// Magic bytes at the start of every payload.
pub const SIGNATURE: &[u8; 2] = b"PX";
/// Current (and only supported) payload version.
pub const VERSION: u8 = 1;
/// Size of the file-name field in bytes.
pub const FILENAME_LEN: usize = 256;

const OFF_VERSION: usize = 2;
const OFF_FLAG: usize = 3;
const OFF_SIZE: usize = 4;
const OFF_NAME: usize = 12;
const OFF_SALT: usize = OFF_NAME + FILENAME_LEN; // 268
const OFF_NONCE: usize = OFF_SALT + SALT_LEN; // 284
const OFF_HASH: usize = OFF_NONCE + NONCE_LEN; // 296

/// Total header size: 2 + 1 + 1 + 8 + 256 + 16 + 12 + 32 = 328 bytes.
pub const HEADER_LEN: usize = OFF_HASH + HASH_LEN;

/// Bytes added on top of the file size: header + AES-GCM tag.
pub const PAYLOAD_OVERHEAD: usize = HEADER_LEN + TAG_LEN; // 344

/// Parsed payload header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadHeader {
    pub version: u8,
    pub has_password: bool,
    pub original_size: u64,
    pub file_name: String,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub content_hash: [u8; HASH_LEN],
}

/// Check that a file name fits the NUL-terminated 256-byte field.
pub fn validate_file_name(name: &str) -> Result<(), StegoError> {
    let len = name.len();
    if len > FILENAME_LEN {
        return Err(StegoError::FilenameTooLong { len });
    }
    if name.as_bytes().contains(&0) {
        return Err(StegoError::InvalidFilename);
    }
    Ok(())
}

impl PayloadHeader {
    /// Serialize to the fixed 328-byte layout.
    pub fn to_bytes(&self) -> Result<[u8; HEADER_LEN], StegoError> {
        validate_file_name(&self.file_name)?;

        let mut out = [0u8; HEADER_LEN];
        out[..OFF_VERSION].copy_from_slice(SIGNATURE);
        out[OFF_VERSION] = self.version;
        out[OFF_FLAG] = u8::from(self.has_password);
        out[OFF_SIZE..OFF_NAME].copy_from_slice(&self.original_size.to_le_bytes());
        let name = self.file_name.as_bytes();
        out[OFF_NAME..OFF_NAME + name.len()].copy_from_slice(name);
        out[OFF_SALT..OFF_NONCE].copy_from_slice(&self.salt);
        out[OFF_NONCE..OFF_HASH].copy_from_slice(&self.nonce);
        out[OFF_HASH..HEADER_LEN].copy_from_slice(&self.content_hash);
        Ok(out)
    }

    /// Parse the header at the start of `data`.
    ///
    /// Checks run in a fixed order: signature, version, then length. Bytes
    /// after the header are not inspected.
    pub fn parse(data: &[u8]) -> Result<Self, StegoError> {
        if data.len() < OFF_VERSION || &data[..OFF_VERSION] != SIGNATURE {
            return Err(StegoError::InvalidSignature);
        }
        let version = *data.get(OFF_VERSION).ok_or(StegoError::InvalidHeader)?;
        if version != VERSION {
            return Err(StegoError::UnsupportedVersion(version));
        }
        if data.len() < HEADER_LEN {
            return Err(StegoError::InvalidHeader);
        }

        let has_password = match data[OFF_FLAG] {
            0 => false,
            1 => true,
            _ => return Err(StegoError::InvalidHeader),
        };

        let mut size = [0u8; 8];
        size.copy_from_slice(&data[OFF_SIZE..OFF_NAME]);

        let name_field = &data[OFF_NAME..OFF_SALT];
        let name_end = name_field.iter().position(|&b| b == 0).unwrap_or(FILENAME_LEN);
        let file_name = String::from_utf8_lossy(&name_field[..name_end]).into_owned();

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[OFF_SALT..OFF_NONCE]);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&data[OFF_NONCE..OFF_HASH]);
        let mut content_hash = [0u8; HASH_LEN];
        content_hash.copy_from_slice(&data[OFF_HASH..HEADER_LEN]);

        Ok(Self {
            version,
            has_password,
            original_size: u64::from_le_bytes(size),
            file_name,
            salt,
            nonce,
            content_hash,
        })
    }
}
