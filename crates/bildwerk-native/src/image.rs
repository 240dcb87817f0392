// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The native image representation: planar 8-bit bands plus metadata.

use std::sync::Arc;

use bildwerk_core::{Interpretation, NativeError, NativeErrorCode};
use image::GrayImage;

use crate::NativeResult;

/// An immutable, planar, 8-bit image.
///
/// Each band (channel) is stored as a separate `GrayImage` plane. All planes
/// share the same width and height. The interpretation tells the colour
/// primitives how to read the bands; alpha, when present, is always the last
/// band.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeImage {
    width: u32,
    height: u32,
    interpretation: Interpretation,
    bands: Vec<GrayImage>,
    icc_profile: Option<Arc<[u8]>>,
}

impl NativeImage {
    // -- Construction ---------------------------------------------------------

    /// Build an image from band planes.
    ///
    /// Fails when there are no bands, when the planes disagree on size, when
    /// the image is empty, or when the band count does not fit the
    /// interpretation (B_W takes 1–2 bands, sRGB 3–4, CMYK 4–5).
    pub fn new(interpretation: Interpretation, bands: Vec<GrayImage>) -> NativeResult<Self> {
        let first = bands.first().ok_or_else(|| invalid("image has no bands"))?;
        let (width, height) = first.dimensions();
        if width == 0 || height == 0 {
            return Err(invalid(format!("image has zero size ({width}x{height})")));
        }
        if let Some(odd) = bands.iter().find(|b| b.dimensions() != (width, height)) {
            return Err(invalid(format!(
                "band planes disagree on size: {}x{} vs {}x{}",
                width,
                height,
                odd.width(),
                odd.height()
            )));
        }
        let count = bands.len() as u32;
        if !band_count_fits(interpretation, count) {
            return Err(invalid(format!(
                "{count} bands cannot be interpreted as {interpretation}"
            )));
        }

        Ok(Self {
            width,
            height,
            interpretation,
            bands,
            icc_profile: None,
        })
    }

    /// Build an image from pixel-interleaved samples (`b0 b1 .. bn b0 b1 ..`).
    pub fn from_interleaved(
        width: u32,
        height: u32,
        bands: u32,
        interpretation: Interpretation,
        data: &[u8],
    ) -> NativeResult<Self> {
        let pixel_count = width as usize * height as usize;
        let band_count = bands as usize;
        if band_count == 0 || data.len() != pixel_count * band_count {
            return Err(invalid(format!(
                "expected {} samples for {width}x{height}x{bands}, got {}",
                pixel_count * band_count,
                data.len()
            )));
        }

        let planes = (0..band_count)
            .map(|b| {
                let samples = data.iter().skip(b).step_by(band_count).copied().collect();
                plane(width, height, samples)
            })
            .collect::<NativeResult<Vec<_>>>()?;

        Self::new(interpretation, planes)
    }

    /// Attach an embedded ICC profile.
    pub fn with_icc_profile(mut self, profile: impl Into<Arc<[u8]>>) -> Self {
        self.icc_profile = Some(profile.into());
        self
    }

    /// Same metadata, new planes. The interpretation is kept when it still
    /// fits the band count and falls back to `Multiband` otherwise.
    pub(crate) fn with_bands(&self, bands: Vec<GrayImage>) -> Self {
        let interpretation = fit_interpretation(self.interpretation, bands.len() as u32);
        Self {
            width: self.width,
            height: self.height,
            interpretation,
            bands,
            icc_profile: self.icc_profile.clone(),
        }
    }

    /// New planes under a new interpretation. Colour conversions drop the
    /// embedded profile since it no longer describes the samples.
    pub(crate) fn converted(&self, interpretation: Interpretation, bands: Vec<GrayImage>) -> Self {
        Self {
            width: self.width,
            height: self.height,
            interpretation: fit_interpretation(interpretation, bands.len() as u32),
            bands,
            icc_profile: None,
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bands, alpha included.
    pub fn bands(&self) -> u32 {
        self.bands.len() as u32
    }

    pub fn band(&self, index: u32) -> Option<&GrayImage> {
        self.bands.get(index as usize)
    }

    pub(crate) fn planes(&self) -> &[GrayImage] {
        &self.bands
    }

    pub fn interpretation(&self) -> Interpretation {
        self.interpretation
    }

    pub fn icc_profile(&self) -> Option<&[u8]> {
        self.icc_profile.as_deref()
    }

    /// Whether the last band is alpha: two-band B_W, four-band sRGB, or
    /// five-band CMYK.
    pub fn has_alpha(&self) -> bool {
        matches!(
            (self.interpretation, self.bands()),
            (Interpretation::BW, 2) | (Interpretation::Srgb, 4) | (Interpretation::Cmyk, 5)
        )
    }

    /// Number of bands that carry colour, i.e. everything except alpha.
    pub fn colour_bands(&self) -> u32 {
        self.bands() - u32::from(self.has_alpha())
    }

    /// Largest sample value of the band format.
    pub fn max_value(&self) -> u8 {
        u8::MAX
    }

    /// Samples in pixel-interleaved order.
    pub fn to_interleaved(&self) -> Vec<u8> {
        let raws: Vec<&[u8]> = self.bands.iter().map(|b| b.as_raw().as_slice()).collect();
        let pixel_count = self.width as usize * self.height as usize;
        let mut out = Vec::with_capacity(pixel_count * raws.len());
        for i in 0..pixel_count {
            out.extend(raws.iter().map(|raw| raw[i]));
        }
        out
    }
}

// -- Helpers ------------------------------------------------------------------

/// Wrap a sample vector as a plane.
pub(crate) fn plane(width: u32, height: u32, samples: Vec<u8>) -> NativeResult<GrayImage> {
    let len = samples.len();
    GrayImage::from_raw(width, height, samples)
        .ok_or_else(|| invalid(format!("{len} samples do not fill a {width}x{height} plane")))
}

fn band_count_fits(interpretation: Interpretation, count: u32) -> bool {
    match interpretation.colour_bands() {
        Some(colour) => count == colour || count == colour + 1,
        None => count >= 1,
    }
}

pub(crate) fn fit_interpretation(interpretation: Interpretation, count: u32) -> Interpretation {
    if band_count_fits(interpretation, count) {
        interpretation
    } else {
        Interpretation::Multiband
    }
}

fn invalid(message: impl Into<String>) -> NativeError {
    NativeError::new("new", NativeErrorCode::InvalidImage, message)
}
