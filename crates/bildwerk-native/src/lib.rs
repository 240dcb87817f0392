// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-native — the imaging library underneath the effects layer.
//
// A `NativeImage` stores every band as its own 8-bit plane plus an
// interpretation tag and an optional embedded ICC profile. Every primitive
// (gamma, band extraction/joining, invert, colourspace conversion, profile
// import, sharpen, Gaussian blur) takes `&self` and returns a new image or a
// `NativeError`; nothing is mutated in place.

pub mod convert;
pub mod image;
pub mod ops;

pub use crate::image::NativeImage;

/// Result of a native primitive.
pub type NativeResult<T> = std::result::Result<T, bildwerk_core::NativeError>;
