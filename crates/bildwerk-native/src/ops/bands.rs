// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Band extraction and joining.

use bildwerk_core::{NativeError, NativeErrorCode};

use crate::NativeResult;
use crate::image::NativeImage;

impl NativeImage {
    /// Take `n` bands starting at `index`.
    ///
    /// The interpretation is kept when the remaining band count still fits it
    /// (e.g. the three colour bands of an RGBA image stay sRGB); otherwise the
    /// result is `Multiband`.
    pub fn extract_band(&self, index: u32, n: u32) -> NativeResult<NativeImage> {
        let end = index.checked_add(n);
        match end {
            Some(end) if n > 0 && end <= self.bands() => {
                let bands = self.planes()[index as usize..end as usize].to_vec();
                Ok(self.with_bands(bands))
            }
            _ => Err(NativeError::new(
                "extract_band",
                NativeErrorCode::BandRange,
                format!(
                    "cannot take {n} band(s) from index {index} of a {}-band image",
                    self.bands()
                ),
            )),
        }
    }

    /// Append the bands of `other` after this image's bands. The result takes
    /// this image's interpretation when the joined band count fits it.
    pub fn bandjoin(&self, other: &NativeImage) -> NativeResult<NativeImage> {
        if (self.width(), self.height()) != (other.width(), other.height()) {
            return Err(NativeError::new(
                "bandjoin",
                NativeErrorCode::GeometryMismatch,
                format!(
                    "cannot join a {}x{} image with a {}x{} image",
                    self.width(),
                    self.height(),
                    other.width(),
                    other.height()
                ),
            ));
        }

        let bands = self
            .planes()
            .iter()
            .chain(other.planes())
            .cloned()
            .collect();
        Ok(self.with_bands(bands))
    }
}
