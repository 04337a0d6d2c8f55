// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Raw RGBA raster and the image codec boundary.
//!
//! Carriers enter as encoded image bytes (PNG, or any other format the
//! `image` crate can read) and leave as PNG. In both directions the channel
//! values pass through untouched:
//!
//! - Decoding expands palette/grayscale/low-bit-depth input to 8-bit RGBA but
//!   never applies gAMA, cHRM, sRGB or iCCP chunks. A color-space transform
//!   would rewrite channel values and wipe the embedded LSBs.
//! - Encoding writes the buffer as an 8-bit RGBA PNG without any color
//!   metadata, so viewers have nothing to "correct" either.

pub mod error;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

pub use error::RasterError;
use error::Result;

/// Bytes per pixel in a [`Raster`] buffer (R, G, B, A).
pub const CHANNELS: usize = 4;

/// An 8-bit RGBA pixel buffer in raster order (row-major, top-left first).
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Wrap an existing RGBA buffer, checking that its length matches the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height)?;
        if pixels.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Allocate a fully transparent black raster.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = buffer_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0u8; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.pixels.len() / CHANNELS
    }

    /// The raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to the raw RGBA bytes. The length cannot change.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

fn buffer_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|p| p.checked_mul(CHANNELS))
        .ok_or(RasterError::InvalidDimensions { width, height })
}

/// Decode image bytes into an 8-bit RGBA raster with no color management.
pub fn decode_image(bytes: &[u8]) -> Result<Raster> {
    let decoded = image::load_from_memory(bytes).map_err(|e| RasterError::Decode(e.to_string()))?;
    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_rgba(width, height, rgba.into_raw())
}

/// Encode a raster as an 8-bit RGBA PNG without color metadata.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(
            raster.as_bytes(),
            raster.width(),
            raster.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| RasterError::Encode(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height) as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, (200 + x % 50) as u8]);
            }
        }
        Raster::from_rgba(width, height, pixels).unwrap()
    }

    #[test]
    fn png_roundtrip_is_bit_exact() {
        let raster = gradient(37, 21);
        let png = encode_png(&raster).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let back = decode_image(&png).unwrap();
        assert_eq!(back, raster);
    }

    #[test]
    fn odd_lsbs_survive_roundtrip() {
        let mut raster = gradient(8, 8);
        for b in raster.as_bytes_mut() {
            *b |= 1;
        }
        let back = decode_image(&encode_png(&raster).unwrap()).unwrap();
        assert!(back.as_bytes().iter().all(|b| b & 1 == 1));
    }

    /// A PNG chunk: length, type, data, CRC over type + data.
    fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = (data.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(kind);
        out.extend_from_slice(data);
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(kind);
        hasher.update(data);
        out.extend_from_slice(&hasher.finalize().to_be_bytes());
        out
    }

    /// Insert ancillary chunks right after IHDR (8-byte signature + 25-byte IHDR).
    fn with_chunks(png: &[u8], chunks: &[Vec<u8>]) -> Vec<u8> {
        assert_eq!(&png[12..16], b"IHDR");
        let mut out = png[..33].to_vec();
        for c in chunks {
            out.extend_from_slice(c);
        }
        out.extend_from_slice(&png[33..]);
        out
    }

    fn gama_1_over_1_8() -> Vec<u8> {
        chunk(b"gAMA", &55_556u32.to_be_bytes())
    }

    fn chrm_bt709() -> Vec<u8> {
        let points = [31_270u32, 32_900, 64_000, 33_000, 30_000, 60_000, 15_000, 6_000];
        let data: Vec<u8> = points.iter().flat_map(|p| p.to_be_bytes()).collect();
        chunk(b"cHRM", &data)
    }

    /// zlib stream holding `data` in a single stored block.
    fn zlib_stored(data: &[u8]) -> Vec<u8> {
        let len = data.len() as u16;
        let mut out = vec![0x78, 0x01, 0x01];
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(data);
        let (mut a, mut b) = (1u32, 0u32);
        for &byte in data {
            a = (a + byte as u32) % 65_521;
            b = (b + a) % 65_521;
        }
        out.extend_from_slice(&((b << 16) | a).to_be_bytes());
        out
    }

    #[test]
    fn gamma_chrm_srgb_chunks_are_ignored() {
        let raster = gradient(16, 16);
        let png = with_chunks(
            &encode_png(&raster).unwrap(),
            &[gama_1_over_1_8(), chrm_bt709(), chunk(b"sRGB", &[0])],
        );
        assert_eq!(decode_image(&png).unwrap(), raster);
    }

    #[test]
    fn gamma_chrm_iccp_chunks_are_ignored() {
        let raster = gradient(16, 16);
        let mut iccp = b"custom\0\0".to_vec();
        iccp.extend(zlib_stored(&[0x42; 128]));
        let png = with_chunks(
            &encode_png(&raster).unwrap(),
            &[gama_1_over_1_8(), chrm_bt709(), chunk(b"iCCP", &iccp)],
        );
        assert_eq!(decode_image(&png).unwrap(), raster);
    }

    #[test]
    fn buffer_size_mismatch_rejected() {
        let err = Raster::from_rgba(2, 2, vec![0u8; 15]).unwrap_err();
        assert_eq!(err, RasterError::BufferSizeMismatch { expected: 16, actual: 15 });
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(matches!(Raster::new(0, 5), Err(RasterError::InvalidDimensions { .. })));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(decode_image(b"not an image"), Err(RasterError::Decode(_))));
    }
}
