//! Image decoding and encoding at the command-line boundary.
//!
//! Inputs arrive as file paths, `data:image/<fmt>;base64,` URIs, or bare
//! base64 payloads. Anything the `image` crate can decode is normalized to
//! 8-bit RGB or RGBA before it reaches the engine. Outputs are always PNG.

use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat};
use spritefx_core::RasterImage;

use crate::error::CliError;

/// Prefix of every encoded output URI.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Output target meaning "print a data URI to stdout".
pub const STDOUT_TARGET: &str = "-";

/// Load an image from a path, a data URI or a bare base64 payload.
pub fn load_input(input: &str) -> Result<RasterImage, CliError> {
    if input.starts_with("data:") {
        return decode_base64_image(data_uri_payload(input)?);
    }

    let path = Path::new(input);
    if path.is_file() {
        let bytes = std::fs::read(path)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "read input file");
        return decode_image(&bytes);
    }

    // A missing path like `abcd` is also valid base64; only treat the input
    // as inline data when the decoded bytes carry a known image signature.
    match STANDARD.decode(input.trim()) {
        Ok(bytes) if image::guess_format(&bytes).is_ok() => decode_image(&bytes),
        _ => Err(CliError::InputNotFound(input.to_string())),
    }
}

/// Payload of a `data:image/<fmt>;base64,<payload>` URI.
pub fn data_uri_payload(uri: &str) -> Result<&str, CliError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CliError::MalformedDataUri("missing `data:` scheme".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CliError::MalformedDataUri("missing ',' before payload".into()))?;
    if !header.starts_with("image/") {
        return Err(CliError::MalformedDataUri(format!(
            "media type {header:?} is not an image"
        )));
    }
    if !header.ends_with(";base64") {
        return Err(CliError::MalformedDataUri(
            "only base64-encoded payloads are supported".into(),
        ));
    }
    Ok(payload)
}

fn decode_base64_image(payload: &str) -> Result<RasterImage, CliError> {
    let bytes = STANDARD.decode(payload.trim())?;
    decode_image(&bytes)
}

/// Decode encoded image bytes (PNG, JPEG, WebP) into a raster.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, CliError> {
    let decoded = image::load_from_memory(bytes)?;
    into_raster(decoded)
}

/// Normalize any decoded layout to 8-bit RGB or RGBA.
///
/// Layouts carrying alpha become RGBA so transparency survives; everything
/// else (grayscale, 16-bit, float) becomes RGB.
pub fn into_raster(image: DynamicImage) -> Result<RasterImage, CliError> {
    let normalized = match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
        other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };
    Ok(RasterImage::try_from(normalized)?)
}

/// Encode a raster as PNG bytes.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, CliError> {
    let dynamic = DynamicImage::try_from(image.clone())?;
    let mut buf = Cursor::new(Vec::new());
    dynamic.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Encode a raster as a `data:image/png;base64,...` URI.
pub fn to_data_uri(image: &RasterImage) -> Result<String, CliError> {
    let png = encode_png(image)?;
    Ok(format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png)))
}

/// Write a raster as PNG to `target`, or as a data URI to stdout when the
/// target is `-`.
pub fn write_output(image: &RasterImage, target: &str) -> Result<(), CliError> {
    if target == STDOUT_TARGET {
        println!("{}", to_data_uri(image)?);
        return Ok(());
    }
    let png = encode_png(image)?;
    std::fs::write(target, &png)?;
    tracing::info!(path = target, bytes = png.len(), "wrote output file");
    Ok(())
}
