// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Random-noise carriers for quick mode.
//!
//! When no cover image is supplied, the payload goes into a square image of
//! uniformly random RGB values with opaque alpha, just large enough to hold it.

use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::raster::{Raster, CHANNELS};
use crate::stego::capacity;
use crate::stego::error::StegoError;
use crate::stego::MAX_CARRIER_SIDE;

/// Generate a noise carrier sized for a file of `file_size` bytes.
///
/// # Errors
/// - [`StegoError::InputTooLarge`] if the square would exceed
///   [`MAX_CARRIER_SIDE`] on a side.
/// - [`StegoError::RandomSource`] if the OS RNG cannot seed the generator.
pub fn noise_carrier_for(file_size: u64) -> Result<Raster, StegoError> {
    let side = carrier_side_for(file_size)?;
    let mut rng = ChaCha20Rng::from_rng(OsRng).map_err(|_| StegoError::RandomSource)?;
    noise_carrier(side, &mut rng)
}

/// Side length of the quick-mode carrier for a file of `file_size` bytes.
pub fn carrier_side_for(file_size: u64) -> Result<u32, StegoError> {
    capacity::check_file_size(file_size)?;
    let side = capacity::min_square_side(file_size);
    if side > MAX_CARRIER_SIDE as u64 {
        let max_pixels = MAX_CARRIER_SIDE as u64 * MAX_CARRIER_SIDE as u64;
        return Err(StegoError::InputTooLarge {
            file_size,
            max_file_size: capacity::max_file_size(max_pixels),
        });
    }
    Ok(side as u32)
}

/// Fill a `side x side` raster with random RGB and opaque alpha.
pub fn noise_carrier<R: RngCore>(side: u32, rng: &mut R) -> Result<Raster, StegoError> {
    let mut raster = Raster::new(side, side)?;
    let bytes = raster.as_bytes_mut();
    rng.fill_bytes(bytes);
    for px in bytes.chunks_exact_mut(CHANNELS) {
        px[3] = 0xFF;
    }
    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_matches_capacity_math() {
        assert_eq!(carrier_side_for(13).unwrap(), 32);
        for size in [0u64, 1, 500, 123_456] {
            let side = carrier_side_for(size).unwrap() as u64;
            assert!(side * side >= capacity::needed_pixels(size));
        }
    }

    #[test]
    fn generated_carrier_is_opaque_square() {
        let raster = noise_carrier_for(13).unwrap();
        assert_eq!((raster.width(), raster.height()), (32, 32));
        assert!(raster.as_bytes().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn generated_carrier_is_noisy() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let raster = noise_carrier(64, &mut rng).unwrap();
        let distinct: std::collections::HashSet<u8> =
            raster.as_bytes().chunks_exact(4).map(|px| px[0]).collect();
        assert!(distinct.len() > 200);
    }

    #[test]
    fn oversized_file_is_input_too_large() {
        let max = capacity::max_file_size(MAX_CARRIER_SIDE as u64 * MAX_CARRIER_SIDE as u64);
        assert_eq!(carrier_side_for(max).unwrap(), MAX_CARRIER_SIDE);
        assert!(matches!(
            carrier_side_for(max + 1),
            Err(StegoError::InputTooLarge { max_file_size, .. }) if max_file_size == max
        ));
    }
}
