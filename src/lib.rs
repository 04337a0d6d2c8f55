// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # pxstego-core
//!
//! Client-side steganography codec for hiding an encrypted file inside a
//! PNG image. The file is encrypted with AES-256-GCM (key from
//! PBKDF2-HMAC-SHA256, 100,000 iterations, over a security note plus an
//! optional password) and written into the least significant bit of each
//! pixel's red, green and blue channels.
//!
//! All processing is local. Image decoding and PNG encoding go through the
//! `raster` module; everything steganographic lives in `stego`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use pxstego_core::{encode, decode, FileEntry};
//!
//! let file = FileEntry::new("hello.txt", b"hello world!!".to_vec());
//! let out = encode(&file, None, "my-note", None).unwrap();
//! let back = decode(&out.png, "my-note", None).unwrap();
//! assert_eq!(back, file);
//! ```

pub mod raster;
pub mod stego;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use raster::{Raster, RasterError};
pub use stego::{
    capacity, decode, decode_with, encode, encode_with_generated_note, encode_with_progress,
    generate_note, inspect, CapacityInfo, DecodeOptions, DecoderVariant, EncodeOutput, FileEntry,
    NoteStyle, PayloadHeader, Progress, Stage, StegoError, MAX_CARRIER_SIDE,
};
pub use stego::progress;
