// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Effects configuration and its JSON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{BildwerkError, Result};
use crate::types::MAX_SIGMA;

/// What happens to a multi-layer image when one layer's transform fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerFailurePolicy {
    /// Every layer is computed before any is replaced; a failure leaves the
    /// whole image untouched.
    #[default]
    Rollback,
    /// Layers are replaced one by one; layers before the failing one stay
    /// transformed.
    KeepApplied,
}

/// Tunables for the effects adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Sigma used by `blur` when the caller does not pass one.
    pub default_blur_sigma: f32,
    /// Standard deviation of the Gaussian used by `sharpen`.
    pub sharpen_sigma: f32,
    /// How strongly `sharpen` boosts detail (0 = no-op).
    pub sharpen_amount: f32,
    pub layer_failure: LayerFailurePolicy,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            default_blur_sigma: 1.0,
            sharpen_sigma: 1.0,
            sharpen_amount: 1.0,
            layer_failure: LayerFailurePolicy::Rollback,
        }
    }
}

impl EffectsConfig {
    /// Check that every value is usable by the native primitives.
    pub fn validate(&self) -> Result<()> {
        check_sigma("default_blur_sigma", self.default_blur_sigma)?;
        check_sigma("sharpen_sigma", self.sharpen_sigma)?;
        if !(self.sharpen_amount.is_finite() && self.sharpen_amount >= 0.0) {
            return Err(BildwerkError::InvalidConfig(format!(
                "sharpen_amount must be zero or positive, got {}",
                self.sharpen_amount
            )));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        debug!(?config, "Effects configuration loaded");
        Ok(config)
    }

    /// Persist the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

fn check_sigma(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= MAX_SIGMA {
        Ok(())
    } else {
        Err(BildwerkError::InvalidConfig(format!(
            "{name} must be in (0, {MAX_SIGMA}], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EffectsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_blur_sigma, 1.0);
        assert_eq!(config.layer_failure, LayerFailurePolicy::Rollback);
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effects.json");

        let config = EffectsConfig {
            default_blur_sigma: 2.5,
            layer_failure: LayerFailurePolicy::KeepApplied,
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = EffectsConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effects.json");
        std::fs::write(&path, r#"{ "layer_failure": "keep-applied" }"#).unwrap();

        let loaded = EffectsConfig::load(&path).unwrap();
        assert_eq!(loaded.layer_failure, LayerFailurePolicy::KeepApplied);
        assert_eq!(loaded.default_blur_sigma, 1.0);
        assert_eq!(loaded.sharpen_amount, 1.0);
    }

    #[test]
    fn non_positive_blur_sigma_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effects.json");
        std::fs::write(&path, r#"{ "default_blur_sigma": 0.0 }"#).unwrap();

        match EffectsConfig::load(&path) {
            Err(BildwerkError::InvalidConfig(msg)) => assert!(msg.contains("default_blur_sigma")),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn oversized_sigmas_are_rejected() {
        let huge = EffectsConfig {
            default_blur_sigma: 1e20,
            ..Default::default()
        };
        match huge.validate() {
            Err(BildwerkError::InvalidConfig(msg)) => assert!(msg.contains("default_blur_sigma")),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }

        let huge = EffectsConfig {
            sharpen_sigma: MAX_SIGMA * 2.0,
            ..Default::default()
        };
        assert!(matches!(huge.validate(), Err(BildwerkError::InvalidConfig(_))));

        let largest = EffectsConfig {
            default_blur_sigma: MAX_SIGMA,
            sharpen_sigma: MAX_SIGMA,
            ..Default::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EffectsConfig::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(BildwerkError::Io(_))));
    }
}
