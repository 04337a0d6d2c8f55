// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Cryptographic primitives for payload encryption.
//!
//! - **Key derivation**: PBKDF2-HMAC-SHA256, 100,000 iterations, 16-byte
//!   random salt, 256-bit output. The salt travels in the payload header.
//! - **Encryption**: AES-256-GCM with a 12-byte random nonce. The 16-byte
//!   authentication tag is appended to the ciphertext.
//! - **Hashing**: SHA-256, used for the plaintext integrity field and for
//!   fingerprinting notes.
//!
//! These parameters match what browser WebCrypto produces, so payloads are
//! interchangeable with other implementations of the same format.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

/// PBKDF2 iteration count.
pub const KDF_ITERATIONS: u32 = 100_000;
/// PBKDF2 salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// SHA-256 digest length in bytes.
pub const HASH_LEN: usize = 32;

/// Largest plaintext AES-GCM accepts under one key/nonce pair (2^36 - 32 bytes).
pub const MAX_PLAINTEXT_LEN: u64 = (1 << 36) - 32;

/// Fill a fixed-size array from the OS CSPRNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], StegoError> {
    let mut out = [0u8; N];
    OsRng
        .try_fill_bytes(&mut out)
        .map_err(|_| StegoError::RandomSource)?;
    Ok(out)
}

/// Derive the AES-256 key from the combined secret and salt.
pub fn derive_key(secret: &str, salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt, KDF_ITERATIONS, &mut *key);
    key
}

/// Encrypt plaintext with AES-256-GCM under a fresh salt and nonce.
///
/// Returns (ciphertext_with_tag, nonce, salt).
pub fn encrypt(
    plaintext: &[u8],
    secret: &str,
) -> Result<(Vec<u8>, [u8; NONCE_LEN], [u8; SALT_LEN]), StegoError> {
    let salt = random_bytes::<SALT_LEN>()?;
    let nonce = random_bytes::<NONCE_LEN>()?;
    let ciphertext = encrypt_with(plaintext, secret, &salt, &nonce)?;
    Ok((ciphertext, nonce, salt))
}

/// Encrypt plaintext with AES-256-GCM using caller-provided salt and nonce.
///
/// Only [`encrypt`] should be used for real payloads; this exists for
/// known-answer vectors shared with other implementations.
pub fn encrypt_with(
    plaintext: &[u8],
    secret: &str,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>, StegoError> {
    let key = derive_key(secret, salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| StegoError::InputTooLarge {
            file_size: plaintext.len() as u64,
            max_file_size: MAX_PLAINTEXT_LEN,
        })
}

/// Decrypt AES-256-GCM ciphertext (tag appended).
///
/// Any authentication failure maps to [`StegoError::ChecksumFailed`]. A wrong
/// key and a modified ciphertext are deliberately indistinguishable.
pub fn decrypt(
    ciphertext: &[u8],
    secret: &str,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>, StegoError> {
    let key = derive_key(secret, salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| StegoError::ChecksumFailed)
}

/// SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; HASH_LEN] {
    Sha256::digest(data).into()
}

/// SHA-256 digest as 64 lowercase hex characters.
pub fn hash_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let msg = b"Hello, steganography!";
        let (ct, nonce, salt) = encrypt(msg, "secret123").unwrap();
        assert_eq!(ct.len(), msg.len() + TAG_LEN);
        let pt = decrypt(&ct, "secret123", &salt, &nonce).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn wrong_secret_fails() {
        let (ct, nonce, salt) = encrypt(b"secret message", "alpha").unwrap();
        let result = decrypt(&ct, "beta", &salt, &nonce);
        assert!(matches!(result, Err(StegoError::ChecksumFailed)));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let (mut ct, nonce, salt) = encrypt(b"secret message", "pass").unwrap();
        ct[0] ^= 0x01;
        assert!(matches!(
            decrypt(&ct, "pass", &salt, &nonce),
            Err(StegoError::ChecksumFailed)
        ));
    }

    #[test]
    fn empty_message_works() {
        let (ct, nonce, salt) = encrypt(b"", "pass").unwrap();
        assert_eq!(ct.len(), TAG_LEN);
        let pt = decrypt(&ct, "pass", &salt, &nonce).unwrap();
        assert!(pt.is_empty());
    }

    #[test]
    fn derive_key_deterministic() {
        let salt = [7u8; SALT_LEN];
        assert_eq!(derive_key("note", &salt), derive_key("note", &salt));
    }

    #[test]
    fn derive_key_differs_by_salt_and_secret() {
        let a = derive_key("pass", &[0u8; SALT_LEN]);
        let b = derive_key("pass", &[1u8; SALT_LEN]);
        let c = derive_key("pass2", &[0u8; SALT_LEN]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    /// Changing the iteration count breaks every previously encoded image.
    #[test]
    fn derive_key_uses_configured_iterations() {
        let salt = [0x11u8; SALT_LEN];
        let mut expected = [0u8; KEY_LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(b"note", &salt, 100_000, &mut expected);
        assert_eq!(*derive_key("note", &salt), expected);
    }

    /// Computed with Python's `hashlib.pbkdf2_hmac`, not with this crate.
    #[test]
    fn derive_key_known_answer() {
        let key = derive_key("secret", &[7u8; SALT_LEN]);
        assert_eq!(
            hex::encode(*key),
            "11b95c7bea1c42ada739a28bfd183bb7c4c6282590311d3a10f6961f6366e29c"
        );
    }

    #[test]
    fn encrypt_with_is_deterministic() {
        let salt = [3u8; SALT_LEN];
        let nonce = [9u8; NONCE_LEN];
        let a = encrypt_with(b"abc", "k", &salt, &nonce).unwrap();
        let b = encrypt_with(b"abc", "k", &salt, &nonce).unwrap();
        assert_eq!(a, b);
        assert_eq!(decrypt(&a, "k", &salt, &nonce).unwrap(), b"abc");
    }

    #[test]
    fn ciphertext_differs_per_encryption() {
        let (ct1, n1, s1) = encrypt(b"same message", "pass").unwrap();
        let (ct2, n2, s2) = encrypt(b"same message", "pass").unwrap();
        assert_ne!(ct1, ct2);
        assert_ne!(n1, n2);
        assert_ne!(s1, s2);
    }

    #[test]
    fn sha256_hex_known_answer() {
        assert_eq!(
            hash_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_hex(b"").len(), 64);
    }
}
