//! Image ingestion: size policy, normalization, re-encoding.
//!
//! The size policy applies to the original payload before any re-encoding.
//! GIFs pass through untouched - re-encoding through a raster surface
//! would flatten the animation. Everything else is decoded, uniformly
//! downscaled so neither dimension exceeds the configured maximum, and
//! re-encoded: JPEG at the configured quality for JPEG-like inputs,
//! lossless PNG otherwise.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use memo_common::{EmbedError, SurfaceConfig};

use crate::container::ImageBlock;

/// Where an image payload came from. Paste and drop carry different size
/// limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestSource {
    Paste,
    Drop,
}

impl IngestSource {
    pub fn limit_bytes(self, config: &SurfaceConfig) -> usize {
        match self {
            IngestSource::Paste => config.paste_limit_bytes,
            IngestSource::Drop => config.drop_limit_bytes,
        }
    }
}

/// Normalize one image payload into an embeddable container fragment.
///
/// Fails user-visibly on oversize or undecodable input; nothing is
/// inserted on failure.
pub fn ingest(
    bytes: &[u8],
    mime: &str,
    source: IngestSource,
    config: &SurfaceConfig,
) -> Result<ImageBlock, EmbedError> {
    if !mime.starts_with("image/") {
        return Err(EmbedError::NotAnImage(mime.to_owned()));
    }

    let limit = source.limit_bytes(config);
    if bytes.len() > limit {
        return Err(EmbedError::TooLarge {
            actual_bytes: bytes.len(),
            limit_bytes: limit,
        });
    }

    let data_url = if mime.eq_ignore_ascii_case("image/gif") {
        // Raw binary-to-text passthrough keeps the animation.
        format!("data:image/gif;base64,{}", STANDARD.encode(bytes))
    } else {
        reencode(bytes, mime, config)?
    };

    tracing::debug!(
        target: "memo::embed",
        original_bytes = bytes.len(),
        mime,
        ?source,
        "image ingested"
    );

    Ok(ImageBlock::for_data_url(&data_url))
}

fn reencode(bytes: &[u8], mime: &str, config: &SurfaceConfig) -> Result<String, EmbedError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| EmbedError::Decode(e.to_string()))?;
    let resized = downscale(decoded, config.max_image_dimension);

    let lowered = mime.to_ascii_lowercase();
    let jpeg_like = lowered.contains("jpeg") || lowered.contains("jpg");
    let mut buf = Vec::new();
    let out_mime = if jpeg_like {
        // JPEG has no alpha channel; flatten before encoding.
        let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
        let encoder = JpegEncoder::new_with_quality(&mut buf, config.jpeg_quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| EmbedError::Encode(e.to_string()))?;
        "image/jpeg"
    } else {
        resized
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| EmbedError::Encode(e.to_string()))?;
        "image/png"
    };

    Ok(format!("data:{out_mime};base64,{}", STANDARD.encode(&buf)))
}

/// Uniform downscale so neither dimension exceeds `max_dim`. Images
/// already inside the bound are returned untouched - never upscaled.
fn downscale(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    let longest = w.max(h);
    if longest <= max_dim {
        return img;
    }
    let scale = f64::from(max_dim) / f64::from(longest);
    let new_w = ((f64::from(w) * scale).round() as u32).max(1);
    let new_h = ((f64::from(h) * scale).round() as u32).max(1);
    tracing::trace!(
        target: "memo::embed",
        from = format!("{w}x{h}"),
        to = format!("{new_w}x{new_h}"),
        "downscaling image"
    );
    img.resize_exact(new_w, new_h, image::imageops::FilterType::Triangle)
}
