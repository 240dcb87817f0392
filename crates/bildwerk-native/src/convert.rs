// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion between `NativeImage` and the `image` crate's `DynamicImage`.
//
// Decoded images arrive as `DynamicImage`; anything wider than 8 bits per
// sample is narrowed to 8 bits on the way in. CMYK images are converted to
// sRGB on the way out since `DynamicImage` has no CMYK layout.

use bildwerk_core::{Interpretation, NativeError, NativeErrorCode};
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use tracing::debug;

use crate::NativeResult;
use crate::image::NativeImage;

impl NativeImage {
    /// Split a decoded image into planes. Grey images become B_W, colour
    /// images sRGB; alpha is kept as the last band.
    pub fn from_dynamic(image: &DynamicImage) -> NativeResult<Self> {
        let color = image.color();
        let (width, height) = (image.width(), image.height());

        let (interpretation, bands, samples) = match (color.has_color(), color.has_alpha()) {
            (false, false) => (Interpretation::BW, 1, image.to_luma8().into_raw()),
            (false, true) => (Interpretation::BW, 2, image.to_luma_alpha8().into_raw()),
            (true, false) => (Interpretation::Srgb, 3, image.to_rgb8().into_raw()),
            (true, true) => (Interpretation::Srgb, 4, image.to_rgba8().into_raw()),
        };
        debug!(?color, width, height, %interpretation, bands, "Splitting decoded image into bands");

        NativeImage::from_interleaved(width, height, bands, interpretation, &samples)
    }

    /// Interleave the planes back into a `DynamicImage`.
    pub fn to_dynamic(&self) -> NativeResult<DynamicImage> {
        if self.interpretation() == Interpretation::Cmyk {
            return self.colourspace(Interpretation::Srgb)?.to_dynamic();
        }

        let (width, height) = (self.width(), self.height());
        let samples = self.to_interleaved();
        let image = match self.bands() {
            1 => GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8),
            2 => GrayAlphaImage::from_raw(width, height, samples).map(DynamicImage::ImageLumaA8),
            3 => RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(width, height, samples).map(DynamicImage::ImageRgba8),
            n => {
                return Err(NativeError::new(
                    "to_dynamic",
                    NativeErrorCode::UnsupportedConversion,
                    format!("{n} bands have no standard pixel layout"),
                ));
            }
        };

        image.ok_or_else(|| {
            NativeError::new(
                "to_dynamic",
                NativeErrorCode::InvalidImage,
                "interleaved samples do not fill the image",
            )
        })
    }
}
