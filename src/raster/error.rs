// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for carrier image decoding and PNG encoding.

use std::fmt;

/// Errors that can occur while converting between image files and rasters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// The input bytes could not be decoded as any supported image format.
    Decode(String),
    /// The PNG encoder rejected the raster.
    Encode(String),
    /// The pixel buffer length does not equal `width * height * 4`.
    BufferSizeMismatch { expected: usize, actual: usize },
    /// Width or height is zero, or the pixel count overflows.
    InvalidDimensions { width: u32, height: u32 },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(msg) => write!(f, "could not decode carrier image: {msg}"),
            Self::Encode(msg) => write!(f, "could not encode PNG: {msg}"),
            Self::BufferSizeMismatch { expected, actual } => {
                write!(f, "RGBA buffer is {actual} bytes, expected {expected}")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid raster dimensions {width}x{height}")
            }
        }
    }
}

impl std::error::Error for RasterError {}

pub type Result<T> = std::result::Result<T, RasterError>;
