// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Effect steps — the textual form of an `Effects` call (`gamma=2.2`,
// `negative`, `blur=1.5`, ...) used by the command line.

use std::fmt;
use std::str::FromStr;

use bildwerk_core::Color;
use bildwerk_core::error::{BildwerkError, Result};
use tracing::debug;

use crate::traits::Effects;

/// One effect call with its arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectStep {
    Gamma(f64),
    Negative,
    Grayscale,
    Colorize(Color),
    Sharpen,
    /// `None` uses the configured default sigma.
    Blur(Option<f32>),
}

impl EffectStep {
    pub fn name(&self) -> &'static str {
        match self {
            EffectStep::Gamma(_) => "gamma",
            EffectStep::Negative => "negative",
            EffectStep::Grayscale => "grayscale",
            EffectStep::Colorize(_) => "colorize",
            EffectStep::Sharpen => "sharpen",
            EffectStep::Blur(_) => "blur",
        }
    }

    /// Perform this step on `effects`.
    pub fn apply_to<E: Effects>(&self, effects: &mut E) -> Result<()> {
        debug!(step = %self, "Applying effect step");
        match *self {
            EffectStep::Gamma(correction) => effects.gamma(correction)?,
            EffectStep::Negative => effects.negative()?,
            EffectStep::Grayscale => effects.grayscale()?,
            EffectStep::Colorize(color) => effects.colorize(color)?,
            EffectStep::Sharpen => effects.sharpen()?,
            EffectStep::Blur(sigma) => effects.blur(sigma)?,
        };
        Ok(())
    }
}

impl fmt::Display for EffectStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectStep::Gamma(correction) => write!(f, "gamma={correction}"),
            EffectStep::Colorize(color) => write!(f, "colorize={color}"),
            EffectStep::Blur(Some(sigma)) => write!(f, "blur={sigma}"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for EffectStep {
    type Err = BildwerkError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, value) = match s.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim())),
            None => (s.trim(), None),
        };

        let number = |value: Option<&str>| -> Result<f64> {
            let value = value.ok_or_else(|| {
                BildwerkError::InvalidEffect(format!("`{name}` needs a value, e.g. `{name}=1.5`"))
            })?;
            value.parse::<f64>().map_err(|_| {
                BildwerkError::InvalidEffect(format!("`{value}` is not a number for `{name}`"))
            })
        };
        let no_value = |step: EffectStep| match value {
            Some(value) => Err(BildwerkError::InvalidEffect(format!(
                "`{name}` takes no value, got `{value}`"
            ))),
            None => Ok(step),
        };

        match name.to_ascii_lowercase().as_str() {
            "gamma" => Ok(EffectStep::Gamma(number(value)?)),
            "negative" => no_value(EffectStep::Negative),
            "grayscale" | "greyscale" => no_value(EffectStep::Grayscale),
            "sharpen" => no_value(EffectStep::Sharpen),
            "colorize" | "colourize" => {
                let hex = value.ok_or_else(|| {
                    BildwerkError::InvalidEffect("`colorize` needs a colour, e.g. `colorize=#ff0000`".into())
                })?;
                Ok(EffectStep::Colorize(hex.parse()?))
            }
            "blur" => match value {
                Some(_) => Ok(EffectStep::Blur(Some(number(value)? as f32))),
                None => Ok(EffectStep::Blur(None)),
            },
            _ => Err(BildwerkError::InvalidEffect(format!(
                "unknown effect `{name}` (expected gamma, negative, grayscale, colorize, sharpen, or blur)"
            ))),
        }
    }
}
