// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.
//
// `NativeError` is what the imaging library raises; `BildwerkError` is what
// callers of the effects layer see.

use std::fmt;

use thiserror::Error;

/// Numeric codes carried by every [`NativeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum NativeErrorCode {
    /// A numeric argument was out of range (zero sigma, negative exponent...).
    InvalidArgument = 1,
    /// A band index or band count outside the image.
    BandRange = 2,
    /// Two images that must share width/height do not.
    GeometryMismatch = 3,
    /// No conversion path between the two interpretations.
    UnsupportedConversion = 4,
    /// The operation needs an embedded ICC profile and there is none.
    MissingProfile = 5,
    /// The embedded ICC profile is not a valid profile.
    CorruptProfile = 6,
    /// Band planes do not describe a well-formed image.
    InvalidImage = 7,
}

impl NativeErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for NativeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NativeErrorCode::InvalidArgument => "invalid-argument",
            NativeErrorCode::BandRange => "band-range",
            NativeErrorCode::GeometryMismatch => "geometry-mismatch",
            NativeErrorCode::UnsupportedConversion => "unsupported-conversion",
            NativeErrorCode::MissingProfile => "missing-profile",
            NativeErrorCode::CorruptProfile => "corrupt-profile",
            NativeErrorCode::InvalidImage => "invalid-image",
        };
        f.write_str(name)
    }
}

/// Failure raised by a primitive of the native imaging library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation}: {message} ({code})")]
pub struct NativeError {
    /// Name of the primitive that failed (`gaussblur`, `icc_import`, ...).
    pub operation: &'static str,
    pub code: NativeErrorCode,
    pub message: String,
}

impl NativeError {
    pub fn new(operation: &'static str, code: NativeErrorCode, message: impl Into<String>) -> Self {
        Self {
            operation,
            code,
            message: message.into(),
        }
    }

    /// Numeric error code, as surfaced through `BildwerkError::OperationFailed`.
    pub fn code(&self) -> i32 {
        self.code.as_i32()
    }
}

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Effect errors --
    /// A native primitive failed while applying an effect. The image is left
    /// in its pre-call state (see `LayerFailurePolicy` for multi-layer images).
    #[error("{message} (code {code})")]
    OperationFailed {
        message: String,
        code: i32,
        #[source]
        source: NativeError,
    },

    /// The effect exists in the interface but the backend does not provide it.
    #[error("{operation} not implemented yet in the {backend} backend")]
    NotImplemented {
        operation: &'static str,
        backend: &'static str,
    },

    #[error("invalid effect: {0}")]
    InvalidEffect(String),

    // -- Image errors --
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("image codec error: {0}")]
    ImageError(String),

    #[error("native library error: {0}")]
    Native(#[from] NativeError),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BildwerkError {
    /// Wrap a native failure raised while applying an effect.
    pub fn operation_failed(message: impl Into<String>, source: NativeError) -> Self {
        Self::OperationFailed {
            message: message.into(),
            code: source.code(),
            source,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn operation_failed_carries_native_code() {
        let native = NativeError::new(
            "gaussblur",
            NativeErrorCode::InvalidArgument,
            "sigma must be positive, got 0",
        );
        let err = BildwerkError::operation_failed("Failed to blur the image", native.clone());

        match &err {
            BildwerkError::OperationFailed { code, message, .. } => {
                assert_eq!(*code, 1);
                assert_eq!(message, "Failed to blur the image");
            }
            other => panic!("unexpected error variant: {other}"),
        }
        assert_eq!(err.to_string(), "Failed to blur the image (code 1)");

        let source = err.source().expect("source should be the native error");
        assert_eq!(source.to_string(), native.to_string());
    }

    #[test]
    fn native_error_display_names_operation_and_code() {
        let err = NativeError::new("icc_import", NativeErrorCode::MissingProfile, "no embedded profile");
        assert_eq!(err.to_string(), "icc_import: no embedded profile (missing-profile)");
        assert_eq!(err.code(), 5);
    }

    #[test]
    fn not_implemented_message() {
        let err = BildwerkError::NotImplemented {
            operation: "colorize",
            backend: "native",
        };
        assert_eq!(err.to_string(), "colorize not implemented yet in the native backend");
    }
}
