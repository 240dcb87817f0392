// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — command-line front end.
//
// Loads an image (every GIF frame becomes a layer), applies the requested
// effects in order, and writes the result:
//
//     bildwerk in.png out.png -e gamma=2.2 -e negative -e blur=1.5

use std::path::PathBuf;
use std::process::ExitCode;

use bildwerk_core::EffectsConfig;
use bildwerk_core::error::Result;
use bildwerk_effects::{EffectStep, Image, NativeEffects};
use clap::Parser;
use tracing::{error, info};

/// Apply image effects to every layer of an image.
#[derive(Debug, Parser)]
#[command(name = "bildwerk", version, about)]
struct Cli {
    /// Image to read.
    input: PathBuf,

    /// Where to write the result; the extension picks the format.
    output: PathBuf,

    /// Effect to apply, repeatable and applied in order: gamma=<f>,
    /// negative, grayscale, colorize=<#rrggbb>, sharpen, blur[=<sigma>].
    #[arg(short, long = "effect", value_name = "STEP")]
    effects: Vec<EffectStep>,

    /// JSON effects configuration (default blur sigma, sharpen strength,
    /// layer failure policy).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "bildwerk failed");
            eprintln!("bildwerk: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EffectsConfig::load(path)?,
        None => EffectsConfig::default(),
    };

    let mut image = Image::open(&cli.input)?;
    info!(
        input = %cli.input.display(),
        layers = image.layer_count(),
        steps = cli.effects.len(),
        "Applying effects"
    );

    let mut effects = NativeEffects::with_config(&mut image, config);
    for step in &cli.effects {
        step.apply_to(&mut effects)?;
    }

    image.save(&cli.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    use bildwerk_core::{BildwerkError, Interpretation, LayerFailurePolicy};
    use bildwerk_native::NativeImage;

    fn write_png(path: &std::path::Path) {
        let native = NativeImage::from_interleaved(
            2,
            1,
            3,
            Interpretation::Srgb,
            &[0, 0, 0, 200, 100, 50],
        )
        .unwrap();
        Image::from_native(native).save(path).unwrap();
    }

    #[test]
    fn parses_repeated_effects_in_order() {
        let cli = Cli::try_parse_from([
            "bildwerk", "in.png", "out.png", "-e", "gamma=2.2", "--effect", "negative", "-e", "blur",
        ])
        .unwrap();
        assert_eq!(
            cli.effects,
            vec![EffectStep::Gamma(2.2), EffectStep::Negative, EffectStep::Blur(None)]
        );
        assert!(cli.config.is_none());
    }

    #[test]
    fn rejects_unknown_effect() {
        let err = Cli::try_parse_from(["bildwerk", "in.png", "out.png", "-e", "sparkle"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn run_applies_effects_and_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        write_png(&input);

        let cli = Cli::try_parse_from([
            OsStr::new("bildwerk"),
            input.as_os_str(),
            output.as_os_str(),
            OsStr::new("-e"),
            OsStr::new("negative"),
        ])
        .unwrap();
        run(&cli).unwrap();

        let result = Image::open(&output).unwrap();
        assert_eq!(
            result.layers()[0].native().to_interleaved(),
            vec![255, 255, 255, 55, 155, 205]
        );
    }

    #[test]
    fn run_rejects_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        let config_path = dir.path().join("effects.json");
        write_png(&input);

        // `save` writes whatever it is given; `load` validates.
        EffectsConfig {
            default_blur_sigma: 0.0,
            layer_failure: LayerFailurePolicy::KeepApplied,
            ..EffectsConfig::default()
        }
        .save(&config_path)
        .unwrap();

        let cli = Cli {
            input,
            output: output.clone(),
            effects: vec![EffectStep::Blur(None)],
            config: Some(config_path),
        };
        let err = run(&cli).unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidConfig(_)), "got {err}");
        assert!(!output.exists());
    }

    #[test]
    fn run_uses_configured_blur_sigma() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let configured = dir.path().join("configured.png");
        let explicit = dir.path().join("explicit.png");
        let config_path = dir.path().join("effects.json");
        write_png(&input);
        std::fs::write(&config_path, r#"{ "default_blur_sigma": 3.0 }"#).unwrap();

        run(&Cli {
            input: input.clone(),
            output: configured.clone(),
            effects: vec![EffectStep::Blur(None)],
            config: Some(config_path),
        })
        .unwrap();
        run(&Cli {
            input,
            output: explicit.clone(),
            effects: vec![EffectStep::Blur(Some(3.0))],
            config: None,
        })
        .unwrap();

        assert_eq!(Image::open(&configured).unwrap(), Image::open(&explicit).unwrap());
    }

    #[test]
    fn failed_step_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        write_png(&input);

        let cli = Cli {
            input,
            output: output.clone(),
            effects: vec![EffectStep::Negative, EffectStep::Blur(Some(0.0))],
            config: None,
        };
        let err = run(&cli).unwrap_err();
        assert!(matches!(err, BildwerkError::OperationFailed { .. }), "got {err}");
        assert!(!output.exists());
    }
}
