// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Carrier capacity arithmetic.
//!
//! For a file of `n` bytes:
//!
//! ```text
//! payload bytes = 328 (header) + n + 16 (tag)
//! needed bits   = 32 (length prefix) + payload bytes * 8
//! needed pixels = ceil(needed bits / 3)          RGB LSBs only
//! square side   = ceil(sqrt(needed pixels))      generated carriers
//! ```
//!
//! All functions are pure and saturate instead of overflowing.

use crate::stego::error::StegoError;
use crate::stego::frame::PAYLOAD_OVERHEAD;

/// Bits of the little-endian payload length written before the payload.
pub const LENGTH_PREFIX_BITS: u64 = 32;

/// LSB slots per pixel when embedding (R, G, B).
pub const BITS_PER_PIXEL: u64 = 3;

/// Largest file whose payload length still fits the 32-bit prefix.
pub const MAX_FILE_SIZE: u64 = u32::MAX as u64 - PAYLOAD_OVERHEAD as u64;

/// Payload length in bytes for a file of `file_size` bytes.
pub fn payload_len(file_size: u64) -> u64 {
    file_size.saturating_add(PAYLOAD_OVERHEAD as u64)
}

/// LSB slots needed to embed a payload of `payload_len` bytes.
pub fn required_bits(payload_len: u64) -> u64 {
    payload_len.saturating_mul(8).saturating_add(LENGTH_PREFIX_BITS)
}

/// RGB LSB slots available in a carrier of `pixel_count` pixels.
pub fn capacity_bits(pixel_count: u64) -> u64 {
    pixel_count.saturating_mul(BITS_PER_PIXEL)
}

/// Pixels needed to hide a file of `file_size` bytes.
pub fn needed_pixels(file_size: u64) -> u64 {
    required_bits(payload_len(file_size)).div_ceil(BITS_PER_PIXEL)
}

/// Side of the smallest square carrier that holds a file of `file_size` bytes.
pub fn min_square_side(file_size: u64) -> u64 {
    ceil_sqrt(needed_pixels(file_size))
}

/// Largest file that fits a carrier of `pixel_count` pixels (0 if none does).
pub fn max_file_size(pixel_count: u64) -> u64 {
    let bits = capacity_bits(pixel_count);
    if bits < LENGTH_PREFIX_BITS {
        return 0;
    }
    let payload_bytes = (bits - LENGTH_PREFIX_BITS) / 8;
    payload_bytes
        .saturating_sub(PAYLOAD_OVERHEAD as u64)
        .min(MAX_FILE_SIZE)
}

/// Reject files whose payload cannot be described by the length prefix.
pub fn check_file_size(file_size: u64) -> Result<(), StegoError> {
    if file_size > MAX_FILE_SIZE {
        return Err(StegoError::InputTooLarge {
            file_size,
            max_file_size: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

fn ceil_sqrt(n: u64) -> u64 {
    let mut s = (n as f64).sqrt() as u64;
    while s.saturating_mul(s) < n {
        s += 1;
    }
    while s > 0 && (s - 1).saturating_mul(s - 1) >= n {
        s -= 1;
    }
    s
}

/// Capacity of a specific carrier relative to a specific file, for UI meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityInfo {
    pub width: u32,
    pub height: u32,
    /// RGB LSB slots in the carrier.
    pub capacity_bits: u64,
    /// Slots the file's payload needs, including the length prefix.
    pub required_bits: u64,
    /// Whether the file fits.
    pub fits: bool,
    /// Largest file this carrier can hold.
    pub max_file_size: u64,
}

impl CapacityInfo {
    pub fn new(width: u32, height: u32, file_size: u64) -> Self {
        let pixels = width as u64 * height as u64;
        let capacity_bits = capacity_bits(pixels);
        let required_bits = required_bits(payload_len(file_size));
        Self {
            width,
            height,
            capacity_bits,
            required_bits,
            fits: required_bits <= capacity_bits && file_size <= MAX_FILE_SIZE,
            max_file_size: max_file_size(pixels),
        }
    }

    /// Fraction of capacity used, clamped to `0.0..=1.0`.
    pub fn usage(&self) -> f64 {
        if self.capacity_bits == 0 {
            return 1.0;
        }
        (self.required_bits as f64 / self.capacity_bits as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world_numbers() {
        // 13-byte file: 357 payload bytes, 2888 bits, 963 pixels, side 32.
        assert_eq!(payload_len(13), 357);
        assert_eq!(required_bits(357), 2888);
        assert_eq!(needed_pixels(13), 963);
        assert_eq!(min_square_side(13), 32);
    }

    #[test]
    fn needed_pixels_is_pure() {
        for size in [0u64, 1, 13, 1000, 65_537, 10_000_000] {
            assert_eq!(needed_pixels(size), needed_pixels(size));
            let side = min_square_side(size);
            assert!(side * side >= needed_pixels(size));
            assert!((side - 1) * (side - 1) < needed_pixels(size));
        }
    }

    #[test]
    fn ceil_sqrt_exact_squares() {
        assert_eq!(ceil_sqrt(0), 0);
        assert_eq!(ceil_sqrt(1), 1);
        assert_eq!(ceil_sqrt(2), 2);
        assert_eq!(ceil_sqrt(1024), 32);
        assert_eq!(ceil_sqrt(1025), 33);
        assert_eq!(ceil_sqrt(u32::MAX as u64 * u32::MAX as u64), u32::MAX as u64);
    }

    #[test]
    fn max_file_size_is_inverse() {
        for pixels in [0u64, 10, 115, 116, 963, 2500, 1_000_000] {
            let max = max_file_size(pixels);
            if max > 0 {
                assert!(needed_pixels(max) <= pixels);
            }
            assert!(needed_pixels(max + 1) > pixels || max == MAX_FILE_SIZE);
        }
    }

    #[test]
    fn tiny_carrier_holds_nothing() {
        assert_eq!(max_file_size(4), 0);
        let info = CapacityInfo::new(2, 2, 1024);
        assert_eq!(info.capacity_bits, 12);
        assert!(!info.fits);
        assert_eq!(info.usage(), 1.0);
    }

    #[test]
    fn capacity_info_for_50x50() {
        let info = CapacityInfo::new(50, 50, 13);
        assert_eq!(info.capacity_bits, 7500);
        assert_eq!(info.required_bits, 2888);
        assert!(info.fits);
        assert_eq!(info.max_file_size, (7500 - 32) / 8 - 344);
    }

    #[test]
    fn oversized_file_rejected() {
        assert!(check_file_size(MAX_FILE_SIZE).is_ok());
        assert!(matches!(
            check_file_size(MAX_FILE_SIZE + 1),
            Err(StegoError::InputTooLarge { .. })
        ));
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        assert_eq!(required_bits(u64::MAX), u64::MAX);
        assert!(needed_pixels(u64::MAX) > 0);
    }
}
