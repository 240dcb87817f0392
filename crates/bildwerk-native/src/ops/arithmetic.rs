// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Point operations: invert and gamma.

use bildwerk_core::{NativeError, NativeErrorCode};
use image::GrayImage;
use tracing::debug;

use crate::NativeResult;
use crate::image::NativeImage;

impl NativeImage {
    /// Photographic negative of every band: `max - v`.
    pub fn invert(&self) -> NativeResult<NativeImage> {
        let bands = self
            .planes()
            .iter()
            .map(|band| {
                let mut band = band.clone();
                image::imageops::invert(&mut band);
                band
            })
            .collect();
        Ok(self.with_bands(bands))
    }

    /// Raise every sample to `1 / exponent`, normalised to the format's
    /// maximum: `max * (v / max)^(1 / exponent)`.
    pub fn gamma(&self, exponent: f64) -> NativeResult<NativeImage> {
        if !(exponent.is_finite() && exponent > 0.0) {
            return Err(NativeError::new(
                "gamma",
                NativeErrorCode::InvalidArgument,
                format!("exponent must be a positive number, got {exponent}"),
            ));
        }

        let max = f64::from(self.max_value());
        let lut: [u8; 256] = std::array::from_fn(|v| {
            let normalised = v as f64 / max;
            (normalised.powf(1.0 / exponent) * max).round().clamp(0.0, max) as u8
        });
        debug!(exponent, "Applying gamma lookup table");

        let bands = self.planes().iter().map(|band| apply_lut(band, &lut)).collect();
        Ok(self.with_bands(bands))
    }
}

fn apply_lut(band: &GrayImage, lut: &[u8; 256]) -> GrayImage {
    let mut out = band.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = lut[usize::from(pixel.0[0])];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildwerk_core::Interpretation;

    fn gradient() -> NativeImage {
        let samples: Vec<u8> = (0..=255).collect();
        NativeImage::from_interleaved(16, 16, 1, Interpretation::BW, &samples).unwrap()
    }

    #[test]
    fn invert_maps_every_band() {
        let img = NativeImage::from_interleaved(1, 1, 4, Interpretation::Srgb, &[0, 10, 200, 255]).unwrap();
        let inverted = img.invert().unwrap();
        assert_eq!(inverted.to_interleaved(), vec![255, 245, 55, 0]);
        assert_eq!(inverted.interpretation(), Interpretation::Srgb);
    }

    #[test]
    fn gamma_one_is_identity() {
        let img = gradient();
        assert_eq!(img.gamma(1.0).unwrap(), img);
    }

    #[test]
    fn gamma_keeps_end_points() {
        let out = gradient().gamma(2.2).unwrap().to_interleaved();
        assert_eq!(out[0], 0);
        assert_eq!(out[255], 255);
        // Exponent above one brightens mid-tones.
        assert!(out[128] > 128);
    }

    #[test]
    fn gamma_rejects_non_positive_exponent() {
        for exponent in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = gradient().gamma(exponent).unwrap_err();
            assert_eq!(err.code, NativeErrorCode::InvalidArgument, "exponent {exponent}");
            assert_eq!(err.operation, "gamma");
        }
    }
}
