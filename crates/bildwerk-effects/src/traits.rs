// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The image-effects capability set.
//
// Backends implement `Effects` for an adapter bound to one image. Every
// method returns the adapter again so calls chain with `?`:
//
//     effects.gamma(2.2)?.negative()?.blur(None)?;

use bildwerk_core::Color;
use bildwerk_core::error::Result;

/// Effects that can be applied to every layer of an image.
pub trait Effects {
    /// Gamma-correct every band: each sample becomes
    /// `max * (v / max)^(1 / correction)`. `correction` must be positive.
    fn gamma(&mut self, correction: f64) -> Result<&mut Self>;

    /// Invert the colour bands. Alpha, when present, is left untouched.
    fn negative(&mut self) -> Result<&mut Self>;

    /// Convert to black and white (one band, or two when alpha is present).
    fn grayscale(&mut self) -> Result<&mut Self>;

    /// Tint the image with `color`.
    fn colorize(&mut self, color: Color) -> Result<&mut Self>;

    /// Sharpen without changing the image's interpretation.
    fn sharpen(&mut self) -> Result<&mut Self>;

    /// Gaussian blur with standard deviation `sigma`, or the backend's
    /// configured default when `None`.
    fn blur(&mut self, sigma: Option<f32>) -> Result<&mut Self>;
}
