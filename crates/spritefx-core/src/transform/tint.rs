//! Color tint — blend hue and saturation toward a target color.
//!
//! The hue blend is a plain linear interpolation of `h` in `[0, 1)`, not a
//! shortest-arc blend on the color wheel. Blending a hue of 0.97 toward
//! 0.02 therefore passes through cyan instead of staying near red. Callers
//! that depend on the existing look rely on this, so it stays.

use crate::color::{Hsv, parse_hex_color};
use crate::config::EngineConfig;
use crate::error::{PostProcessError, Result};
use crate::image::RasterImage;
use crate::transform::pointwise::map_hsv;

/// Intensity applied when the caller only names a color.
pub const DEFAULT_INTENSITY: f64 = 0.5;

/// Tint toward a `#rrggbb` color.
///
/// ```text
/// h' = h × (1 − i) + target_h × i
/// s' = min(s + (target_s − s) × i, 1)
/// v' = v
/// ```
///
/// Images larger than the default [`EngineConfig::max_dimension`] are
/// rejected.
pub fn color_tint(image: &RasterImage, target_hex: &str, intensity: f64) -> Result<RasterImage> {
    let target = parse_hex_color(target_hex)?;
    color_tint_rgb(image, target, intensity)
}

/// Tint toward an already-parsed RGB color.
pub fn color_tint_rgb(image: &RasterImage, target: [u8; 3], intensity: f64) -> Result<RasterImage> {
    let config = EngineConfig::default();
    config.check_image(image)?;
    color_tint_rgb_with(image, target, intensity, &config)
}

pub(crate) fn check_intensity(intensity: f64) -> Result<()> {
    if (0.0..=1.0).contains(&intensity) {
        Ok(())
    } else {
        Err(PostProcessError::out_of_range(
            "intensity",
            intensity,
            "a value in [0, 1]",
        ))
    }
}

pub(crate) fn color_tint_with(
    image: &RasterImage,
    target_hex: &str,
    intensity: f64,
    config: &EngineConfig,
) -> Result<RasterImage> {
    let target = parse_hex_color(target_hex)?;
    color_tint_rgb_with(image, target, intensity, config)
}

fn color_tint_rgb_with(
    image: &RasterImage,
    target: [u8; 3],
    intensity: f64,
    config: &EngineConfig,
) -> Result<RasterImage> {
    check_intensity(intensity)?;
    if intensity == 0.0 {
        return Ok(image.clone());
    }

    let tint = Hsv::from_rgb8(target);
    tracing::debug!(?target, intensity, "color tint");

    let keep = 1.0 - intensity;
    Ok(map_hsv(image, config, |hsv| Hsv {
        h: hsv.h * keep + tint.h * intensity,
        s: (hsv.s + (tint.s - hsv.s) * intensity).min(1.0),
        v: hsv.v,
    }))
}
