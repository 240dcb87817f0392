// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-effects — Image effects for Bildwerk.
//
// Provides the multi-layer `Image` (loading, saving, per-layer transforms),
// the `Effects` capability trait (gamma, negative, grayscale, colorize,
// sharpen, blur), its implementation over `bildwerk-native`, and the
// `EffectStep` table that maps effect names onto trait calls.

pub mod effects;
pub mod image;
pub mod step;
pub mod traits;

// Re-export the primary types so callers can use `bildwerk_effects::Image` etc.
pub use effects::NativeEffects;
pub use image::{Image, Layer};
pub use step::EffectStep;
pub use traits::Effects;
