//! Thumbnail derivation

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::inline::InlineImage;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSpec {
    /// Longest edge of the thumbnail in pixels
    pub max_edge: u32,
    /// JPEG quality, 1-100
    pub quality: u8,
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        Self {
            max_edge: 100,
            quality: 70,
        }
    }
}

/// Decode an inline payload, shrink it so the longer edge is at most
/// `spec.max_edge` (aspect preserved, never upscaled) and re-encode it as a
/// JPEG data URL.
pub fn derive_thumbnail(payload: &str, spec: &ThumbnailSpec) -> Result<String> {
    let source = InlineImage::parse(payload)?;
    let decoded = image::load_from_memory(&source.bytes)?;

    let scaled = if decoded.width().max(decoded.height()) > spec.max_edge {
        decoded.thumbnail(spec.max_edge, spec.max_edge)
    } else {
        decoded
    };

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(scaled.to_rgb8());
    let mut bytes = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(
        &mut bytes,
        spec.quality.clamp(1, 100),
    ))?;

    tracing::debug!(
        width = rgb.width(),
        height = rgb.height(),
        bytes = bytes.len(),
        "Derived thumbnail"
    );

    Ok(InlineImage::new("image/jpeg", bytes).to_data_url())
}
