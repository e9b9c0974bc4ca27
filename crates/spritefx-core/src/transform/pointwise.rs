//! Shared per-pixel HSV driver for the color transforms.

use rayon::prelude::*;

use crate::color::Hsv;
use crate::config::EngineConfig;
use crate::image::RasterImage;

/// Run `f` on every pixel's HSV form and write the result back as 8-bit RGB.
///
/// Works on a copy of the flat buffer. Only the first three bytes of each
/// pixel are rewritten, so an alpha channel passes through untouched.
pub(crate) fn map_hsv<F>(image: &RasterImage, config: &EngineConfig, f: F) -> RasterImage
where
    F: Fn(Hsv) -> Hsv + Sync,
{
    let channels = image.mode().channels();
    let mut data = image.as_raw().to_vec();

    let recolor = |px: &mut [u8]| {
        let rgb = f(Hsv::from_rgb8([px[0], px[1], px[2]])).to_rgb8();
        px[..3].copy_from_slice(&rgb);
    };

    if config.parallel_for(image.pixel_count()) {
        data.par_chunks_exact_mut(channels).for_each(recolor);
    } else {
        data.chunks_exact_mut(channels).for_each(recolor);
    }

    image.with_buffer(data)
}
