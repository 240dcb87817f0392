// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Bildwerk.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BildwerkError;

/// Largest Gaussian standard deviation accepted by blur and sharpen.
pub const MAX_SIGMA: f32 = 1000.0;

/// Colourspace tag of a native image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interpretation {
    /// Black and white (luminance), optionally with alpha.
    BW,
    /// sRGB, optionally with alpha.
    Srgb,
    /// Device CMYK, optionally with alpha.
    Cmyk,
    /// Arbitrary bands with no colour meaning.
    Multiband,
}

impl Interpretation {
    /// Number of colour (non-alpha) bands this interpretation implies, or
    /// `None` for `Multiband`.
    pub fn colour_bands(&self) -> Option<u32> {
        match self {
            Interpretation::BW => Some(1),
            Interpretation::Srgb => Some(3),
            Interpretation::Cmyk => Some(4),
            Interpretation::Multiband => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interpretation::BW => "b-w",
            Interpretation::Srgb => "srgb",
            Interpretation::Cmyk => "cmyk",
            Interpretation::Multiband => "multiband",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An RGBA colour. Parsed from `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = BildwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BildwerkError::InvalidEffect(format!("invalid colour `{s}`, expected #rrggbb or #rrggbbaa"));

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}
