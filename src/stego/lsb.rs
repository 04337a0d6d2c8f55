// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! LSB bit packing over RGBA rasters.
//!
//! The embedded stream is a 32-bit payload length followed by the payload,
//! every value written least-significant bit first. Logical bit `i` lands in
//! the LSB of channel `i % k` of pixel `i / k`, where `k` is the number of
//! channels the [`ChannelLayout`] uses:
//!
//! ```text
//! RGB : byte offset = (i / 3) * 4 + i % 3      alpha never touched
//! RGBA: byte offset = (i / 4) * 4 + i % 4      legacy read path only
//! ```
//!
//! Only bit 0 of each channel changes, so every channel moves by at most 1.

use crate::raster::{Raster, CHANNELS};
use crate::stego::capacity::LENGTH_PREFIX_BITS;
use crate::stego::error::StegoError;

/// Which channels of each pixel carry payload bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// R, G, B. The only layout written by this crate.
    Rgb,
    /// R, G, B, A. Written by older releases; read for compatibility.
    Rgba,
}

impl ChannelLayout {
    /// Payload bits per pixel.
    pub fn bits_per_pixel(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// LSB slots a raster offers under this layout.
    pub fn capacity_bits(self, raster: &Raster) -> u64 {
        raster.pixel_count() as u64 * self.bits_per_pixel() as u64
    }
}

/// Embed `data` into the RGB LSBs of `raster`.
///
/// Fails with [`StegoError::ImageTooSmall`] before touching any pixel if the
/// raster cannot hold `32 + data.len() * 8` bits.
pub fn encode_lsb(raster: &mut Raster, data: &[u8]) -> Result<(), StegoError> {
    embed(raster, data, ChannelLayout::Rgb)
}

/// Extract the length-prefixed byte stream from the RGB LSBs of `raster`.
///
/// Returns exactly the embedded bytes, no trailing data.
pub fn decode_lsb(raster: &Raster) -> Result<Vec<u8>, StegoError> {
    extract(raster, ChannelLayout::Rgb)
}

/// Embed `data` using an explicit channel layout.
pub fn embed(raster: &mut Raster, data: &[u8], layout: ChannelLayout) -> Result<(), StegoError> {
    let len = u32::try_from(data.len()).map_err(|_| StegoError::InputTooLarge {
        file_size: data.len() as u64,
        max_file_size: u32::MAX as u64,
    })?;

    let required_bits = LENGTH_PREFIX_BITS + data.len() as u64 * 8;
    let capacity_bits = layout.capacity_bits(raster);
    if required_bits > capacity_bits {
        return Err(StegoError::ImageTooSmall {
            required_bits,
            capacity_bits,
        });
    }

    let prefix = (0..32).map(|i| ((len >> i) & 1) as u8);
    let body = data.iter().flat_map(|&byte| (0..8).map(move |i| (byte >> i) & 1));

    for (slot, bit) in slots_mut(raster, layout).zip(prefix.chain(body)) {
        *slot = (*slot & !1) | bit;
    }
    Ok(())
}

/// Extract a length-prefixed byte stream using an explicit channel layout.
///
/// # Errors
/// [`StegoError::InvalidHeader`] if the raster cannot even hold the prefix,
/// or the prefix announces more bytes than the raster can hold. This is what
/// an image without embedded data usually produces.
pub fn extract(raster: &Raster, layout: ChannelLayout) -> Result<Vec<u8>, StegoError> {
    let capacity_bits = layout.capacity_bits(raster);
    if capacity_bits < LENGTH_PREFIX_BITS {
        return Err(StegoError::InvalidHeader);
    }

    let mut bits = slots(raster, layout).map(|b| b & 1);

    let mut len = 0u32;
    for (i, bit) in bits.by_ref().take(32).enumerate() {
        len |= (bit as u32) << i;
    }

    if len as u64 * 8 > capacity_bits - LENGTH_PREFIX_BITS {
        return Err(StegoError::InvalidHeader);
    }

    let mut out = Vec::with_capacity(len as usize);
    for _ in 0..len {
        let mut byte = 0u8;
        for i in 0..8 {
            let bit = bits.next().ok_or(StegoError::InvalidHeader)?;
            byte |= bit << i;
        }
        out.push(byte);
    }
    Ok(out)
}

/// Channel bytes in embedding order.
fn slots(raster: &Raster, layout: ChannelLayout) -> impl Iterator<Item = u8> + '_ {
    let used = layout.bits_per_pixel();
    raster
        .as_bytes()
        .chunks_exact(CHANNELS)
        .flat_map(move |px| px[..used].iter().copied())
}

fn slots_mut(raster: &mut Raster, layout: ChannelLayout) -> impl Iterator<Item = &mut u8> + '_ {
    let used = layout.bits_per_pixel();
    raster
        .as_bytes_mut()
        .chunks_exact_mut(CHANNELS)
        .flat_map(move |px| px[..used].iter_mut())
}
