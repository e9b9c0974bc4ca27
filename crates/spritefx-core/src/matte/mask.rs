//! Boolean background masks and their conversion to alpha.

use crate::error::{PostProcessError, Result};
use crate::image::RasterImage;

/// Alpha written for background pixels.
pub const BACKGROUND_ALPHA: u8 = 0;
/// Alpha written for everything else.
pub const FOREGROUND_ALPHA: u8 = 255;

/// Per-pixel background flags, row-major, same size as the source image.
///
/// `true` marks a background pixel that becomes fully transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    background: Vec<bool>,
}

impl AlphaMask {
    /// A mask with no background pixels.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: vec![false; width as usize * height as usize],
        }
    }

    /// Wrap row-major background flags.
    pub fn from_vec(width: u32, height: u32, background: Vec<bool>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if background.len() != expected {
            return Err(PostProcessError::DimensionMismatch {
                expected: format!("{expected} mask entries for {width}x{height}"),
                actual: format!("{} mask entries", background.len()),
            });
        }
        Ok(Self {
            width,
            height,
            background,
        })
    }

    /// Flags already known to be `width × height` long.
    pub(crate) fn from_flags(width: u32, height: u32, background: Vec<bool>) -> Self {
        debug_assert_eq!(background.len(), width as usize * height as usize);
        Self {
            width,
            height,
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.background
    }

    /// Whether `(x, y)` is background. Out-of-bounds coordinates are not.
    pub fn is_background(&self, x: u32, y: u32) -> bool {
        x < self.width
            && y < self.height
            && self.background[y as usize * self.width as usize + x as usize]
    }

    /// Number of background pixels.
    pub fn background_count(&self) -> usize {
        self.background.iter().filter(|&&b| b).count()
    }

    /// Pixels that are background in either mask.
    pub fn union(&self, other: &AlphaMask) -> Result<AlphaMask> {
        if self.dimensions() != other.dimensions() {
            return Err(PostProcessError::size_mismatch(
                self.dimensions(),
                other.dimensions(),
            ));
        }
        let background = self
            .background
            .iter()
            .zip(&other.background)
            .map(|(&a, &b)| a || b)
            .collect();
        Ok(AlphaMask {
            width: self.width,
            height: self.height,
            background,
        })
    }

    /// Alpha plane: [`BACKGROUND_ALPHA`] where the mask is set,
    /// [`FOREGROUND_ALPHA`] elsewhere.
    pub fn to_alpha(&self) -> Vec<u8> {
        self.background
            .iter()
            .map(|&bg| if bg { BACKGROUND_ALPHA } else { FOREGROUND_ALPHA })
            .collect()
    }

    /// Produce an RGBA copy of `image` whose alpha comes from this mask.
    ///
    /// Color channels are copied unchanged; any alpha the image already had
    /// is replaced.
    pub fn apply(&self, image: &RasterImage) -> Result<RasterImage> {
        if self.dimensions() != image.dimensions() {
            return Err(PostProcessError::size_mismatch(
                image.dimensions(),
                self.dimensions(),
            ));
        }
        Ok(image.attach_alpha(&self.to_alpha()))
    }
}
