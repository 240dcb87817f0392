// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multi-layer image — owns the layers (frames) and applies per-layer
// transforms. Loads and saves through the `image` crate; GIF files map every
// frame to a layer.

use std::fmt::Display;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use bildwerk_core::LayerFailurePolicy;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_native::NativeImage;
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Delay, DynamicImage, Frame, ImageDecoder, ImageFormat, ImageReader};
use tracing::{debug, info, instrument, warn};

use crate::effects::NativeEffects;

/// One frame of an image.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    native: NativeImage,
    /// Display time for animation frames.
    delay: Option<Duration>,
}

impl Layer {
    pub fn new(native: NativeImage) -> Self {
        Self { native, delay: None }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn native(&self) -> &NativeImage {
        &self.native
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }
}

/// An image made of one or more layers, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    layers: Vec<Layer>,
}

impl Image {
    // -- Construction ---------------------------------------------------------

    /// Build an image from its layers. At least one layer is required.
    pub fn new(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(BildwerkError::InvalidImage("an image needs at least one layer".into()));
        }
        Ok(Self { layers })
    }

    /// Single-layer image.
    pub fn from_native(native: NativeImage) -> Self {
        Self {
            layers: vec![Layer::new(native)],
        }
    }

    /// Single-layer image from an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        Ok(Self::from_native(NativeImage::from_dynamic(image)?))
    }

    /// Decode an image from encoded bytes (PNG, JPEG, GIF, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let format = image::guess_format(data).map_err(|err| {
            BildwerkError::ImageError(format!("failed to detect image format: {}", err))
        })?;

        if format == ImageFormat::Gif {
            return decode_gif(data);
        }

        let decode_err =
            |err: image::ImageError| BildwerkError::ImageError(format!("failed to decode image: {}", err));
        let mut decoder = ImageReader::with_format(Cursor::new(data), format)
            .into_decoder()
            .map_err(decode_err)?;
        let icc_profile = decoder.icc_profile().map_err(decode_err)?;
        let decoded = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
        debug!(
            ?format,
            width = decoded.width(),
            height = decoded.height(),
            icc_profile = icc_profile.is_some(),
            "Image decoded from bytes"
        );

        let native = NativeImage::from_dynamic(&decoded)?;
        Ok(Self::from_native(attach_profile(native, icc_profile.as_deref())))
    }

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        let image = Self::from_bytes(&data)?;
        info!(
            layers = image.layer_count(),
            width = image.width(),
            height = image.height(),
            "Image loaded"
        );
        Ok(image)
    }

    // -- Accessors ------------------------------------------------------------

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Width of the first layer.
    pub fn width(&self) -> u32 {
        self.layers[0].native.width()
    }

    /// Height of the first layer.
    pub fn height(&self) -> u32 {
        self.layers[0].native.height()
    }

    /// Effects adapter bound to this image, with the default configuration.
    pub fn effects(&mut self) -> NativeEffects<'_> {
        NativeEffects::new(self)
    }

    // -- Transformation -------------------------------------------------------

    /// Replace every layer's native image with `transform(&current)`.
    ///
    /// Layer order and count never change. With `Rollback`, every layer is
    /// computed before any is replaced, so a failure leaves the image as it
    /// was. With `KeepApplied`, layers are replaced one at a time and those
    /// before the failing layer stay transformed.
    pub fn apply_to_layers<F, E>(&mut self, policy: LayerFailurePolicy, mut transform: F) -> std::result::Result<(), E>
    where
        F: FnMut(&NativeImage) -> std::result::Result<NativeImage, E>,
        E: Display,
    {
        match policy {
            LayerFailurePolicy::Rollback => {
                let replaced = self
                    .layers
                    .iter()
                    .enumerate()
                    .map(|(index, layer)| {
                        transform(&layer.native).inspect_err(|err| {
                            warn!(layer = index, %err, "Layer transform failed; image left unchanged");
                        })
                    })
                    .collect::<std::result::Result<Vec<_>, E>>()?;

                for (layer, native) in self.layers.iter_mut().zip(replaced) {
                    layer.native = native;
                }
            }
            LayerFailurePolicy::KeepApplied => {
                for (index, layer) in self.layers.iter_mut().enumerate() {
                    match transform(&layer.native) {
                        Ok(native) => layer.native = native,
                        Err(err) => {
                            warn!(
                                layer = index,
                                applied = index,
                                %err,
                                "Layer transform failed; earlier layers keep the new pixels"
                            );
                            return Err(err);
                        }
                    }
                }
            }
        }

        debug!(layers = self.layers.len(), "Transform applied to all layers");
        Ok(())
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image to a file; the format follows the extension. GIF
    /// output keeps every layer as an animation frame, other formats write
    /// the first layer only.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path).map_err(|err| {
            BildwerkError::ImageError(format!("cannot pick a format for {}: {}", path.display(), err))
        })?;

        if format == ImageFormat::Gif {
            return self.save_gif(path);
        }

        if self.layers.len() > 1 {
            warn!(
                layers = self.layers.len(),
                ?format,
                "Format holds a single frame; writing the first layer only"
            );
        }
        let first = self.layers[0].native.to_dynamic()?;
        first.save_with_format(path, format).map_err(|err| {
            BildwerkError::ImageError(format!("failed to save image to {}: {}", path.display(), err))
        })?;
        info!(?format, "Image saved");
        Ok(())
    }

    fn save_gif(&self, path: &Path) -> Result<()> {
        let frames = self
            .layers
            .iter()
            .map(|layer| {
                let rgba = layer.native.to_dynamic()?.to_rgba8();
                let delay = Delay::from_saturating_duration(layer.delay.unwrap_or_default());
                Ok(Frame::from_parts(rgba, 0, 0, delay))
            })
            .collect::<Result<Vec<_>>>()?;

        let file = std::fs::File::create(path)?;
        let mut encoder = GifEncoder::new(file);
        let gif_err = |err: image::ImageError| {
            BildwerkError::ImageError(format!("GIF encoding failed for {}: {}", path.display(), err))
        };
        encoder.set_repeat(Repeat::Infinite).map_err(gif_err)?;
        encoder.encode_frames(frames).map_err(gif_err)?;
        info!(frames = self.layers.len(), "Animated GIF saved");
        Ok(())
    }
}

fn decode_gif(data: &[u8]) -> Result<Image> {
    let mut decoder = GifDecoder::new(Cursor::new(data)).map_err(|err| {
        BildwerkError::ImageError(format!("failed to decode GIF: {}", err))
    })?;
    let icc_profile = decoder.icc_profile().map_err(|err| {
        BildwerkError::ImageError(format!("failed to read GIF colour profile: {}", err))
    })?;
    let frames = decoder.into_frames().collect_frames().map_err(|err| {
        BildwerkError::ImageError(format!("failed to decode GIF frames: {}", err))
    })?;

    let layers = frames
        .into_iter()
        .map(|frame| {
            let delay = Duration::from(frame.delay());
            let native = NativeImage::from_dynamic(&DynamicImage::ImageRgba8(frame.into_buffer()))?;
            Ok(Layer::new(attach_profile(native, icc_profile.as_deref())).with_delay(delay))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(frames = layers.len(), "GIF decoded into layers");

    Image::new(layers)
}

/// Carry a decoder's embedded ICC profile over to the native image.
fn attach_profile(native: NativeImage, profile: Option<&[u8]>) -> NativeImage {
    match profile {
        Some(profile) => native.with_icc_profile(profile),
        None => native,
    }
}
