// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Convolution primitives: Gaussian blur and unsharp-mask sharpening, both
// delegated to `imageproc::filter` one plane at a time. The kernel radius is
// `ceil(2 * sigma)`, so sigma is capped at `MAX_SIGMA`.

use bildwerk_core::{Interpretation, MAX_SIGMA, NativeError, NativeErrorCode};
use imageproc::filter::{gaussian_blur_f32, sharpen_gaussian};
use tracing::debug;

use crate::NativeResult;
use crate::image::NativeImage;

impl NativeImage {
    /// Gaussian blur of every band (alpha included) with standard deviation
    /// `sigma`.
    pub fn gaussblur(&self, sigma: f32) -> NativeResult<NativeImage> {
        require_sigma("gaussblur", sigma)?;

        debug!(sigma, bands = self.bands(), "Gaussian blur");
        let bands = self
            .planes()
            .iter()
            .map(|band| gaussian_blur_f32(band, sigma))
            .collect();
        Ok(self.with_bands(bands))
    }

    /// Sharpen the colour bands with a Gaussian unsharp mask; alpha is left
    /// alone.
    ///
    /// Sharpening runs on additive colour, so a CMYK image is converted to
    /// sRGB first and the result stays tagged sRGB.
    pub fn sharpen(&self, sigma: f32, amount: f32) -> NativeResult<NativeImage> {
        require_sigma("sharpen", sigma)?;
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(NativeError::new(
                "sharpen",
                NativeErrorCode::InvalidArgument,
                format!("amount must be zero or positive, got {amount}"),
            ));
        }

        let working = match self.interpretation() {
            Interpretation::Cmyk => self.colourspace(Interpretation::Srgb)?,
            _ => self.clone(),
        };
        debug!(
            sigma,
            amount,
            from = %self.interpretation(),
            working = %working.interpretation(),
            "Sharpening"
        );

        let colour = working.colour_bands() as usize;
        let bands = working
            .planes()
            .iter()
            .enumerate()
            .map(|(i, band)| {
                if i < colour {
                    sharpen_gaussian(band, sigma, amount)
                } else {
                    band.clone()
                }
            })
            .collect();
        Ok(working.with_bands(bands))
    }
}

fn require_sigma(operation: &'static str, sigma: f32) -> NativeResult<()> {
    if sigma.is_finite() && sigma > 0.0 && sigma <= MAX_SIGMA {
        Ok(())
    } else {
        Err(NativeError::new(
            operation,
            NativeErrorCode::InvalidArgument,
            format!("sigma must be in (0, {MAX_SIGMA}], got {sigma}"),
        ))
    }
}
