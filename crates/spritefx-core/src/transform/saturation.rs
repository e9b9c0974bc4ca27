//! Saturation scaling.

use crate::color::Hsv;
use crate::config::EngineConfig;
use crate::error::{PostProcessError, Result};
use crate::image::RasterImage;
use crate::transform::pointwise::map_hsv;

/// Scale every pixel's HSV saturation by `factor`, clamped at 1.
///
/// `factor = 1.0` is the identity. `factor = 0.0` collapses each pixel to
/// R = G = B = V, i.e. grayscale by value rather than by luminance.
/// Images larger than the default [`EngineConfig::max_dimension`] are
/// rejected.
pub fn saturation_adjust(image: &RasterImage, factor: f64) -> Result<RasterImage> {
    let config = EngineConfig::default();
    config.check_image(image)?;
    saturation_adjust_with(image, factor, &config)
}

pub(crate) fn check_factor(factor: f64) -> Result<()> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(PostProcessError::out_of_range(
            "factor",
            factor,
            "a finite value >= 0",
        ))
    }
}

pub(crate) fn saturation_adjust_with(
    image: &RasterImage,
    factor: f64,
    config: &EngineConfig,
) -> Result<RasterImage> {
    check_factor(factor)?;
    if factor == 1.0 {
        return Ok(image.clone());
    }

    tracing::debug!(factor, "saturation adjust");
    Ok(map_hsv(image, config, |hsv| Hsv {
        s: (hsv.s * factor).min(1.0),
        ..hsv
    }))
}
