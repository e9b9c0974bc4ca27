//! Hue rotation.

use crate::color::Hsv;
use crate::config::EngineConfig;
use crate::error::{PostProcessError, Result};
use crate::image::RasterImage;
use crate::transform::pointwise::map_hsv;

/// Rotate every pixel's hue by `degrees`.
///
/// ```text
/// h' = (h + degrees / 360) mod 1
/// ```
///
/// Saturation, value and alpha are unchanged. Any finite angle is accepted;
/// whole turns (0, ±360, ...) return an exact copy. Images larger than the
/// default [`EngineConfig::max_dimension`] are rejected.
pub fn hue_shift(image: &RasterImage, degrees: f64) -> Result<RasterImage> {
    let config = EngineConfig::default();
    config.check_image(image)?;
    hue_shift_with(image, degrees, &config)
}

pub(crate) fn check_degrees(degrees: f64) -> Result<()> {
    if degrees.is_finite() {
        Ok(())
    } else {
        Err(PostProcessError::out_of_range(
            "degrees",
            degrees,
            "a finite angle",
        ))
    }
}

pub(crate) fn hue_shift_with(
    image: &RasterImage,
    degrees: f64,
    config: &EngineConfig,
) -> Result<RasterImage> {
    check_degrees(degrees)?;

    let shift = degrees / 360.0;
    if shift.rem_euclid(1.0) == 0.0 {
        return Ok(image.clone());
    }

    tracing::debug!(degrees, "hue shift");
    Ok(map_hsv(image, config, |hsv| Hsv {
        h: (hsv.h + shift).rem_euclid(1.0),
        ..hsv
    }))
}
