//! Background matting — turn the background of a flat image transparent.
//!
//! Two interchangeable policies produce an [`AlphaMask`]:
//!
//! - **Connectivity**: dark pixels (mean of R, G, B at or below a
//!   threshold) that are 8-connected to the image border through other dark
//!   pixels. Dark detail enclosed by the subject (eyes, shadows) stays
//!   opaque.
//! - **Color distance**: pixels whose summed per-channel distance to a
//!   target color is at most `3 × tolerance`. Purely pointwise.
//!
//! Output images are always RGBA with binary alpha and untouched RGB.
//! RGBA inputs are first flattened onto white, so existing transparency
//! reads as bright foreground rather than as a dark background.
//!
//! The free functions here cannot fail and do not enforce
//! [`EngineConfig::max_dimension`]; go through
//! [`PostProcessor`](crate::PostProcessor) to bound untrusted input.

mod floodfill;
pub mod mask;

use std::borrow::Cow;

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::image::{ChannelMode, RasterImage};

pub use mask::AlphaMask;

/// Brightness threshold used when the caller does not pick one.
pub const DEFAULT_THRESHOLD: u8 = 30;
/// Per-channel tolerance used when the caller does not pick one.
pub const DEFAULT_TOLERANCE: u32 = 30;
/// Background that RGBA inputs are composited onto before matting.
pub const FLATTEN_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Mask of dark pixels connected to the image border.
pub fn connectivity_mask(image: &RasterImage, threshold: u8) -> AlphaMask {
    connectivity_mask_with(image, threshold, &EngineConfig::default())
}

/// Mask of pixels within `3 × tolerance` (L1 distance) of `target`.
pub fn color_mask(image: &RasterImage, target: [u8; 3], tolerance: u32) -> AlphaMask {
    color_mask_with(image, target, tolerance, &EngineConfig::default())
}

/// Make the border-connected dark background transparent.
///
/// Unbounded: cost is linear in the pixel count of `image`.
pub fn matte_by_connectivity(image: &RasterImage, threshold: u8) -> RasterImage {
    matte_by_connectivity_with(image, threshold, &EngineConfig::default())
}

/// Make every pixel close to `target` transparent.
///
/// Unbounded: cost is linear in the pixel count of `image`.
pub fn matte_by_color(image: &RasterImage, target: [u8; 3], tolerance: u32) -> RasterImage {
    matte_by_color_with(image, target, tolerance, &EngineConfig::default())
}

pub(crate) fn matte_by_connectivity_with(
    image: &RasterImage,
    threshold: u8,
    config: &EngineConfig,
) -> RasterImage {
    let rgb = flattened(image);
    let mask = dark_border_mask(&rgb, threshold, config);
    tracing::debug!(
        threshold,
        background = mask.background_count(),
        total = rgb.pixel_count(),
        "connectivity matte"
    );
    apply_mask(&rgb, &mask)
}

pub(crate) fn matte_by_color_with(
    image: &RasterImage,
    target: [u8; 3],
    tolerance: u32,
    config: &EngineConfig,
) -> RasterImage {
    let rgb = flattened(image);
    let mask = near_color_mask(&rgb, target, tolerance, config);
    tracing::debug!(
        ?target,
        tolerance,
        background = mask.background_count(),
        total = rgb.pixel_count(),
        "color matte"
    );
    apply_mask(&rgb, &mask)
}

fn connectivity_mask_with(image: &RasterImage, threshold: u8, config: &EngineConfig) -> AlphaMask {
    dark_border_mask(&flattened(image), threshold, config)
}

fn color_mask_with(
    image: &RasterImage,
    target: [u8; 3],
    tolerance: u32,
    config: &EngineConfig,
) -> AlphaMask {
    near_color_mask(&flattened(image), target, tolerance, config)
}

fn flattened(image: &RasterImage) -> Cow<'_, RasterImage> {
    match image.mode() {
        ChannelMode::Rgb => Cow::Borrowed(image),
        ChannelMode::Rgba => Cow::Owned(image.flatten_onto(FLATTEN_BACKGROUND)),
    }
}

fn dark_border_mask(rgb: &RasterImage, threshold: u8, config: &EngineConfig) -> AlphaMask {
    // mean(r, g, b) <= threshold, kept in integers so ties are exact.
    let limit = 3 * threshold as u16;
    let dark = classify(rgb, config, |px| {
        px[0] as u16 + px[1] as u16 + px[2] as u16 <= limit
    });
    let (width, height) = rgb.dimensions();
    let background = floodfill::fill_border_connected(&dark, width, height);
    AlphaMask::from_flags(width, height, background)
}

fn near_color_mask(
    rgb: &RasterImage,
    target: [u8; 3],
    tolerance: u32,
    config: &EngineConfig,
) -> AlphaMask {
    let limit = 3 * tolerance as u64;
    let background = classify(rgb, config, |px| {
        let distance: u64 = px
            .iter()
            .zip(target)
            .map(|(&c, t)| c.abs_diff(t) as u64)
            .sum();
        distance <= limit
    });
    let (width, height) = rgb.dimensions();
    AlphaMask::from_flags(width, height, background)
}

/// Evaluate `predicate` on every pixel of an RGB image.
fn classify<F>(rgb: &RasterImage, config: &EngineConfig, predicate: F) -> Vec<bool>
where
    F: Fn(&[u8; 3]) -> bool + Sync,
{
    debug_assert_eq!(rgb.mode(), ChannelMode::Rgb);
    let pixels = bytemuck::cast_slice::<u8, [u8; 3]>(rgb.as_raw());
    if config.parallel_for(pixels.len()) {
        pixels.par_iter().map(&predicate).collect()
    } else {
        pixels.iter().map(&predicate).collect()
    }
}

fn apply_mask(rgb: &RasterImage, mask: &AlphaMask) -> RasterImage {
    rgb.attach_alpha(&mask.to_alpha())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(image: &RasterImage, x: u32, y: u32) -> u8 {
        image.pixel(x, y).expect("pixel in bounds")[3]
    }

    #[test]
    fn test_single_dark_pixel_is_background() {
        let image = RasterImage::from_rgb_pixel(1, 1, [0, 0, 0]);
        let out = matte_by_connectivity(&image, DEFAULT_THRESHOLD);
        assert_eq!(out.as_raw(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // mean(30, 30, 30) == 30 is dark; mean(30, 30, 31) is not.
        let dark = RasterImage::from_rgb_pixel(2, 2, [30, 30, 30]);
        let light = RasterImage::from_rgb_pixel(2, 2, [30, 30, 31]);
        assert_eq!(connectivity_mask(&dark, 30).background_count(), 4);
        assert_eq!(connectivity_mask(&light, 30).background_count(), 0);
    }

    #[test]
    fn test_enclosed_dark_detail_stays_opaque() {
        let mut image = RasterImage::from_rgb_pixel(7, 7, [0, 0, 0]);
        let subject = [200, 180, 160];
        for y in 1..=5 {
            for x in 1..=5 {
                image.set_pixel(x, y, &subject);
            }
        }
        // A dark "eye" inside the subject.
        image.set_pixel(3, 3, &[5, 5, 5]);

        let out = matte_by_connectivity(&image, DEFAULT_THRESHOLD);
        assert_eq!(alpha_at(&out, 0, 0), 0);
        assert_eq!(alpha_at(&out, 6, 3), 0);
        assert_eq!(alpha_at(&out, 3, 3), 255);
        assert_eq!(alpha_at(&out, 1, 1), 255);
        assert_eq!(&out.pixel(3, 3).unwrap()[..3], &[5, 5, 5]);
    }

    #[test]
    fn test_rgba_input_is_flattened_onto_white() {
        // A fully transparent dark pixel flattens to white, so it is not dark.
        let mut image = RasterImage::from_rgba_pixel(3, 1, [0, 0, 0, 255]);
        image.set_pixel(1, 0, &[0, 0, 0, 0]);
        let out = matte_by_connectivity(&image, DEFAULT_THRESHOLD);
        assert_eq!(out.as_raw(), &[0, 0, 0, 0, 255, 255, 255, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn test_color_mask_boundary() {
        // Distance 3 × 10 = 30 is inside, 31 is not.
        let inside = RasterImage::from_rgb_pixel(1, 1, [10, 10, 10]);
        let outside = RasterImage::from_rgb_pixel(1, 1, [10, 10, 11]);
        assert_eq!(color_mask(&inside, [0, 0, 0], 10).background_count(), 1);
        assert_eq!(color_mask(&outside, [0, 0, 0], 10).background_count(), 0);
    }

    #[test]
    fn test_color_matte_ignores_connectivity() {
        let mut image = RasterImage::from_rgb_pixel(5, 5, [255, 255, 255]);
        image.set_pixel(2, 2, &[250, 0, 250]);
        let out = matte_by_color(&image, [255, 0, 255], 5);
        assert_eq!(alpha_at(&out, 2, 2), 0);
        assert_eq!(alpha_at(&out, 0, 0), 255);
    }

    #[test]
    fn test_huge_tolerance_does_not_overflow() {
        let image = RasterImage::from_rgb_pixel(2, 1, [255, 255, 255]);
        assert_eq!(color_mask(&image, [0, 0, 0], u32::MAX).background_count(), 2);
    }

    #[test]
    fn test_parallel_and_sequential_masks_agree() {
        let mut image = RasterImage::from_rgb_pixel(64, 48, [0, 0, 0]);
        for y in 0..48 {
            for x in 0..64 {
                let v = ((x * 7 + y * 13) % 64) as u8;
                image.set_pixel(x, y, &[v, v / 2, v.wrapping_mul(3)]);
            }
        }
        let sequential = EngineConfig {
            parallel_pixel_threshold: usize::MAX,
            ..EngineConfig::default()
        };
        let parallel = EngineConfig {
            parallel_pixel_threshold: 1,
            ..EngineConfig::default()
        };
        assert_eq!(
            connectivity_mask_with(&image, 20, &sequential),
            connectivity_mask_with(&image, 20, &parallel)
        );
        assert_eq!(
            color_mask_with(&image, [10, 5, 30], 8, &sequential),
            color_mask_with(&image, [10, 5, 30], 8, &parallel)
        );
    }

    #[test]
    fn test_zero_area_image() {
        let image = RasterImage::from_rgb_pixel(0, 5, [0, 0, 0]);
        let out = matte_by_connectivity(&image, DEFAULT_THRESHOLD);
        assert_eq!(out.mode(), ChannelMode::Rgba);
        assert!(out.as_raw().is_empty());
    }

    #[test]
    fn test_matte_matches_public_mask_apply() {
        let mut image = RasterImage::from_rgb_pixel(6, 5, [0, 0, 0]);
        image.set_pixel(2, 2, &[250, 10, 10]);
        image.set_pixel(3, 2, &[3, 3, 3]);

        let mask = connectivity_mask(&image, DEFAULT_THRESHOLD);
        assert_eq!(mask.dimensions(), (6, 5));
        assert_eq!(
            matte_by_connectivity(&image, DEFAULT_THRESHOLD),
            mask.apply(&image).unwrap()
        );

        let mask = color_mask(&image, [0, 0, 0], 5);
        assert_eq!(matte_by_color(&image, [0, 0, 0], 5), mask.apply(&image).unwrap());
    }
}
