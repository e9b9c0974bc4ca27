//! Engine configuration: resource limits and parallelism.

use serde::{Deserialize, Serialize};

use crate::error::{PostProcessError, Result};
use crate::image::RasterImage;

/// Default upper bound on either side of an input image, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 8192;

/// Pixel count at which pointwise passes switch to rayon.
pub const DEFAULT_PARALLEL_PIXEL_THRESHOLD: usize = 32 * 1024;

/// Runtime knobs for the post-processing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest accepted width or height. Work is O(width × height) and the
    /// dimensions come from the caller, so they must be bounded.
    pub max_dimension: u32,
    /// Images with at least this many pixels are processed in parallel.
    pub parallel_pixel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            parallel_pixel_threshold: DEFAULT_PARALLEL_PIXEL_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Reject images whose width or height exceeds `max_dimension`.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if width > self.max_dimension || height > self.max_dimension {
            return Err(PostProcessError::ImageTooLarge {
                width,
                height,
                max: self.max_dimension,
            });
        }
        Ok(())
    }

    pub(crate) fn check_image(&self, image: &RasterImage) -> Result<()> {
        self.check_dimensions(image.width(), image.height())
    }

    pub(crate) fn parallel_for(&self, pixel_count: usize) -> bool {
        pixel_count >= self.parallel_pixel_threshold
    }
}
