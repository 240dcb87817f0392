// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `Effects` implemented on top of the bildwerk-native primitives.
//
// Each effect is a short sequence of native calls run on every layer through
// `Image::apply_to_layers`; native failures surface as
// `BildwerkError::OperationFailed`.

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::{Color, EffectsConfig, Interpretation};
use bildwerk_native::{NativeImage, NativeResult};
use tracing::{info, instrument, warn};

use crate::image::Image;
use crate::traits::Effects;

const BACKEND: &str = "native";

/// Effects adapter bound to one image.
///
/// ```ignore
/// let mut image = Image::open("photo.png")?;
/// image.effects().gamma(2.2)?.sharpen()?.blur(Some(0.8))?;
/// image.save("photo-edited.png")?;
/// ```
pub struct NativeEffects<'a> {
    image: &'a mut Image,
    config: EffectsConfig,
}

impl<'a> NativeEffects<'a> {
    pub fn new(image: &'a mut Image) -> Self {
        Self::with_config(image, EffectsConfig::default())
    }

    pub fn with_config(image: &'a mut Image, config: EffectsConfig) -> Self {
        Self { image, config }
    }

    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    /// Run `transform` on every layer, translating native failures.
    fn apply<F>(&mut self, failure: &'static str, transform: F) -> Result<&mut Self>
    where
        F: Fn(&NativeImage) -> NativeResult<NativeImage>,
    {
        self.image
            .apply_to_layers(self.config.layer_failure, transform)
            .map_err(|err| {
                warn!(%err, policy = ?self.config.layer_failure, "{failure}");
                BildwerkError::operation_failed(failure, err)
            })?;
        Ok(self)
    }
}

impl Effects for NativeEffects<'_> {
    #[instrument(skip(self))]
    fn gamma(&mut self, correction: f64) -> Result<&mut Self> {
        info!(layers = self.image.layer_count(), "Applying gamma correction");
        self.apply("Failed to apply gamma correction to the image", |native| {
            native.gamma(correction)
        })
    }

    #[instrument(skip(self))]
    fn negative(&mut self) -> Result<&mut Self> {
        info!(layers = self.image.layer_count(), "Negating image");
        self.apply("Failed to negate the image", |native| {
            if native.has_alpha() {
                let last = native.bands() - 1;
                let colour = native.extract_band(0, last)?;
                let alpha = native.extract_band(last, 1)?;
                colour.invert()?.bandjoin(&alpha)
            } else {
                native.invert()
            }
        })
    }

    #[instrument(skip(self))]
    fn grayscale(&mut self) -> Result<&mut Self> {
        info!(layers = self.image.layer_count(), "Converting to grayscale");
        self.apply("Failed to grayscale the image", |native| {
            // CMYK has no direct path to B_W; go through the embedded profile.
            if native.interpretation() == Interpretation::Cmyk {
                native.icc_import()?.colourspace(Interpretation::BW)
            } else {
                native.colourspace(Interpretation::BW)
            }
        })
    }

    #[instrument(skip(self))]
    fn colorize(&mut self, color: Color) -> Result<&mut Self> {
        warn!(%color, "colorize requested but not available");
        Err(BildwerkError::NotImplemented {
            operation: "colorize",
            backend: BACKEND,
        })
    }

    #[instrument(skip(self))]
    fn sharpen(&mut self) -> Result<&mut Self> {
        let (sigma, amount) = (self.config.sharpen_sigma, self.config.sharpen_amount);
        info!(layers = self.image.layer_count(), sigma, amount, "Sharpening image");
        self.apply("Failed to sharpen the image", move |native| {
            let original = native.interpretation();
            let sharpened = native.sharpen(sigma, amount)?;
            if sharpened.interpretation() == original {
                return Ok(sharpened);
            }
            // Back in the original colourspace the embedded profile applies again.
            let restored = sharpened.colourspace(original)?;
            Ok(match native.icc_profile() {
                Some(profile) => restored.with_icc_profile(profile),
                None => restored,
            })
        })
    }

    #[instrument(skip(self))]
    fn blur(&mut self, sigma: Option<f32>) -> Result<&mut Self> {
        let sigma = sigma.unwrap_or(self.config.default_blur_sigma);
        info!(layers = self.image.layer_count(), sigma, "Blurring image");
        self.apply("Failed to blur the image", move |native| native.gaussblur(sigma))
    }
}
