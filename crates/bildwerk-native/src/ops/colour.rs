// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colourspace conversion and embedded-profile import.
//
// Supported paths:
//
//   sRGB <-> B_W     luminance (Rec. 709 weights) / replication
//   sRGB <-> CMYK    naive device conversion
//   B_W  ->  CMYK    via sRGB
//   any  ->  multiband (re-tag only)
//
// CMYK -> B_W has no direct path: callers import the embedded profile first.
// Alpha, when present, is carried across every conversion unchanged.

use bildwerk_core::{Interpretation, NativeError, NativeErrorCode};
use image::{GrayImage, Pixel, Rgb};
use tracing::debug;

use crate::NativeResult;
use crate::image::{NativeImage, plane};

/// Offset and value of the signature every ICC profile header carries.
const ICC_SIGNATURE_OFFSET: usize = 36;
const ICC_SIGNATURE: &[u8; 4] = b"acsp";
/// Offset of the data colour space field in the ICC header.
const ICC_COLOUR_SPACE_OFFSET: usize = 16;
const ICC_HEADER_LEN: usize = 128;

impl NativeImage {
    /// Convert to another interpretation.
    pub fn colourspace(&self, target: Interpretation) -> NativeResult<NativeImage> {
        use Interpretation::*;

        debug!(from = %self.interpretation(), to = %target, "Converting colourspace");
        match (self.interpretation(), target) {
            (BW, BW) | (Srgb, Srgb) | (Cmyk, Cmyk) | (Multiband, Multiband) => Ok(self.clone()),
            (_, Multiband) => Ok(self.converted(Multiband, self.planes().to_vec())),
            (Multiband, _) => Err(unsupported(
                "colourspace",
                format!("multiband images have no colour meaning to convert to {target}"),
            )),
            (Srgb, BW) => self.convert_pixels(BW, 1, |src, dst| {
                dst[0] = Rgb([src[0], src[1], src[2]]).to_luma().0[0];
            }),
            (BW, Srgb) => self.convert_pixels(Srgb, 3, |src, dst| {
                dst.fill(src[0]);
            }),
            (Srgb, Cmyk) => self.convert_pixels(Cmyk, 4, |src, dst| {
                dst.copy_from_slice(&rgb_to_cmyk([src[0], src[1], src[2]]));
            }),
            (Cmyk, Srgb) => self.convert_pixels(Srgb, 3, |src, dst| {
                dst.copy_from_slice(&cmyk_to_rgb([src[0], src[1], src[2], src[3]]));
            }),
            (BW, Cmyk) => self.convert_pixels(Cmyk, 4, |src, dst| {
                dst.copy_from_slice(&rgb_to_cmyk([src[0]; 3]));
            }),
            (Cmyk, BW) => Err(unsupported(
                "colourspace",
                "no direct conversion from cmyk to b-w; import the embedded profile first",
            )),
        }
    }

    /// Import the embedded ICC profile, moving the image into sRGB.
    ///
    /// The profile header is checked (length, `acsp` signature, and a data
    /// colour space matching the interpretation) before the device samples are
    /// transformed. The result carries no profile.
    pub fn icc_import(&self) -> NativeResult<NativeImage> {
        let profile = self.icc_profile().ok_or_else(|| {
            NativeError::new(
                "icc_import",
                NativeErrorCode::MissingProfile,
                "image has no embedded ICC profile",
            )
        })?;

        if profile.len() < ICC_HEADER_LEN
            || &profile[ICC_SIGNATURE_OFFSET..ICC_SIGNATURE_OFFSET + 4] != ICC_SIGNATURE
        {
            return Err(NativeError::new(
                "icc_import",
                NativeErrorCode::CorruptProfile,
                format!("embedded profile ({} bytes) has no valid ICC header", profile.len()),
            ));
        }

        let space = &profile[ICC_COLOUR_SPACE_OFFSET..ICC_COLOUR_SPACE_OFFSET + 4];
        let expected: &[u8; 4] = match self.interpretation() {
            Interpretation::Cmyk => b"CMYK",
            Interpretation::Srgb => b"RGB ",
            Interpretation::BW => b"GRAY",
            Interpretation::Multiband => {
                return Err(unsupported("icc_import", "multiband images cannot carry a colour profile"));
            }
        };
        if space != expected {
            return Err(NativeError::new(
                "icc_import",
                NativeErrorCode::CorruptProfile,
                format!(
                    "profile colour space {:?} does not match a {} image",
                    String::from_utf8_lossy(space),
                    self.interpretation()
                ),
            ));
        }

        debug!(profile_len = profile.len(), from = %self.interpretation(), "Importing embedded profile");
        let imported = self.colourspace(Interpretation::Srgb)?;
        Ok(imported.converted(Interpretation::Srgb, imported.planes().to_vec()))
    }

    /// Run `convert` over every pixel's colour samples, producing
    /// `out_colour` bands under `target`; alpha is appended untouched.
    fn convert_pixels<F>(&self, target: Interpretation, out_colour: usize, convert: F) -> NativeResult<NativeImage>
    where
        F: Fn(&[u8], &mut [u8]),
    {
        let (width, height) = (self.width(), self.height());
        let in_colour = self.colour_bands() as usize;
        let sources: Vec<&[u8]> = self.planes()[..in_colour]
            .iter()
            .map(|b| b.as_raw().as_slice())
            .collect();

        let pixel_count = width as usize * height as usize;
        let mut outputs = vec![Vec::with_capacity(pixel_count); out_colour];
        let mut src = vec![0u8; in_colour];
        let mut dst = vec![0u8; out_colour];
        for i in 0..pixel_count {
            for (s, raw) in src.iter_mut().zip(&sources) {
                *s = raw[i];
            }
            convert(&src, &mut dst);
            for (out, d) in outputs.iter_mut().zip(&dst) {
                out.push(*d);
            }
        }

        let mut bands = outputs
            .into_iter()
            .map(|samples| plane(width, height, samples))
            .collect::<NativeResult<Vec<GrayImage>>>()?;
        if self.has_alpha() {
            bands.extend(self.planes().last().cloned());
        }

        Ok(self.converted(target, bands))
    }
}

fn rgb_to_cmyk([r, g, b]: [u8; 3]) -> [u8; 4] {
    let (r, g, b) = (f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0);
    let k = 1.0 - r.max(g).max(b);
    if k >= 1.0 {
        return [0, 0, 0, 255];
    }
    let scale = |v: f32| (((1.0 - v - k) / (1.0 - k)) * 255.0).round().clamp(0.0, 255.0) as u8;
    [scale(r), scale(g), scale(b), (k * 255.0).round() as u8]
}

fn cmyk_to_rgb([c, m, y, k]: [u8; 4]) -> [u8; 3] {
    let k = 1.0 - f32::from(k) / 255.0;
    let scale = |v: u8| ((1.0 - f32::from(v) / 255.0) * k * 255.0).round().clamp(0.0, 255.0) as u8;
    [scale(c), scale(m), scale(y)]
}

fn unsupported(operation: &'static str, message: impl Into<String>) -> NativeError {
    NativeError::new(operation, NativeErrorCode::UnsupportedConversion, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icc_header(space: &[u8; 4]) -> Vec<u8> {
        let mut profile = vec![0u8; ICC_HEADER_LEN];
        profile[ICC_COLOUR_SPACE_OFFSET..ICC_COLOUR_SPACE_OFFSET + 4].copy_from_slice(space);
        profile[ICC_SIGNATURE_OFFSET..ICC_SIGNATURE_OFFSET + 4].copy_from_slice(ICC_SIGNATURE);
        profile
    }

    fn cmyk_alpha() -> NativeImage {
        // 50% magenta, 128 alpha.
        NativeImage::from_interleaved(1, 1, 5, Interpretation::Cmyk, &[0, 128, 0, 0, 128]).unwrap()
    }

    #[test]
    fn srgb_to_bw_uses_luminance_and_keeps_alpha() {
        let img = NativeImage::from_interleaved(1, 1, 4, Interpretation::Srgb, &[255, 255, 255, 9]).unwrap();
        let bw = img.colourspace(Interpretation::BW).unwrap();
        assert_eq!(bw.interpretation(), Interpretation::BW);
        assert_eq!(bw.to_interleaved(), vec![255, 9]);

        let green = NativeImage::from_interleaved(1, 1, 3, Interpretation::Srgb, &[0, 255, 0]).unwrap();
        let luma = green.colourspace(Interpretation::BW).unwrap().to_interleaved()[0];
        // Green dominates Rec. 709 luminance.
        assert!(luma > 150 && luma < 200, "luma {luma}");
    }

    #[test]
    fn bw_is_replicated_into_srgb() {
        let img = NativeImage::from_interleaved(1, 1, 1, Interpretation::BW, &[77]).unwrap();
        let rgb = img.colourspace(Interpretation::Srgb).unwrap();
        assert_eq!(rgb.to_interleaved(), vec![77, 77, 77]);
    }

    #[test]
    fn cmyk_round_trips_through_srgb() {
        let img = cmyk_alpha();
        let rgb = img.colourspace(Interpretation::Srgb).unwrap();
        assert_eq!(rgb.bands(), 4);
        assert_eq!(rgb.to_interleaved(), vec![255, 127, 255, 128]);

        let back = rgb.colourspace(Interpretation::Cmyk).unwrap();
        assert_eq!(back.interpretation(), Interpretation::Cmyk);
        assert_eq!(back.to_interleaved(), vec![0, 128, 0, 0, 128]);
    }

    #[test]
    fn cmyk_to_bw_is_not_direct() {
        let err = cmyk_alpha().colourspace(Interpretation::BW).unwrap_err();
        assert_eq!(err.code, NativeErrorCode::UnsupportedConversion);
    }

    #[test]
    fn icc_import_requires_profile() {
        let err = cmyk_alpha().icc_import().unwrap_err();
        assert_eq!(err.code, NativeErrorCode::MissingProfile);
    }

    #[test]
    fn icc_import_rejects_corrupt_or_mismatched_profile() {
        let truncated = cmyk_alpha().with_icc_profile(vec![0u8; 40]);
        assert_eq!(truncated.icc_import().unwrap_err().code, NativeErrorCode::CorruptProfile);

        let wrong_space = cmyk_alpha().with_icc_profile(icc_header(b"RGB "));
        assert_eq!(wrong_space.icc_import().unwrap_err().code, NativeErrorCode::CorruptProfile);
    }

    #[test]
    fn icc_import_moves_cmyk_into_srgb() {
        let img = cmyk_alpha().with_icc_profile(icc_header(b"CMYK"));
        let imported = img.icc_import().unwrap();
        assert_eq!(imported.interpretation(), Interpretation::Srgb);
        assert_eq!(imported.bands(), 4);
        assert!(imported.icc_profile().is_none());
    }

    #[test]
    fn multiband_retag_only() {
        let img = cmyk_alpha();
        let multi = img.colourspace(Interpretation::Multiband).unwrap();
        assert_eq!(multi.interpretation(), Interpretation::Multiband);
        assert_eq!(multi.to_interleaved(), img.to_interleaved());
        assert!(multi.colourspace(Interpretation::Srgb).is_err());
    }
}
