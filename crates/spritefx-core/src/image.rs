//! Raster image representation for the post-processing engine.

use std::fmt;

use image::{ColorType, DynamicImage, ImageBuffer};
use serde::{Deserialize, Serialize};

use crate::error::{PostProcessError, Result};

/// Interleaved channel layout of a [`RasterImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelMode {
    /// Three 8-bit channels per pixel.
    Rgb,
    /// Three 8-bit color channels followed by 8-bit straight alpha.
    Rgba,
}

impl ChannelMode {
    /// Number of interleaved bytes per pixel.
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba)
    }

    /// Map a per-pixel channel count onto a supported mode.
    pub fn from_channel_count(channels: u8) -> Result<Self> {
        match channels {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            n => Err(PostProcessError::UnsupportedPixelFormat(format!(
                "{n} channels per pixel"
            ))),
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb => write!(f, "RGB"),
            Self::Rgba => write!(f, "RGBA"),
        }
    }
}

impl TryFrom<ColorType> for ChannelMode {
    type Error = PostProcessError;

    fn try_from(color: ColorType) -> Result<Self> {
        match color {
            ColorType::Rgb8 => Ok(Self::Rgb),
            ColorType::Rgba8 => Ok(Self::Rgba),
            other => Err(PostProcessError::UnsupportedPixelFormat(format!("{other:?}"))),
        }
    }
}

/// An 8-bit RGB or RGBA image stored as a row-major interleaved buffer.
///
/// The buffer always holds exactly `width × height × channels` bytes.
/// Operations never mutate an image in place; each returns a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    mode: ChannelMode,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap an interleaved buffer, validating its length against the
    /// dimensions and channel mode.
    pub fn new(width: u32, height: u32, mode: ChannelMode, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * mode.channels();
        if data.len() != expected {
            return Err(PostProcessError::DimensionMismatch {
                expected: format!("{expected} bytes for {width}x{height} {mode}"),
                actual: format!("{} bytes", data.len()),
            });
        }
        Ok(Self {
            width,
            height,
            mode,
            data,
        })
    }

    /// Like [`RasterImage::new`] but with the layout given as a channel count.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, ChannelMode::from_channel_count(channels)?, data)
    }

    /// Solid RGB image.
    pub fn from_rgb_pixel(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self {
            width,
            height,
            mode: ChannelMode::Rgb,
            data: rgb.repeat(width as usize * height as usize),
        }
    }

    /// Solid RGBA image.
    pub fn from_rgba_pixel(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            mode: ChannelMode::Rgba,
            data: rgba.repeat(width as usize * height as usize),
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

    pub fn mode(&self) -> ChannelMode {
        self.mode
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The interleaved pixel buffer.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Same size and mode as `self`, backed by `data`.
    pub(crate) fn with_buffer(&self, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            width: self.width,
            height: self.height,
            mode: self.mode,
            data,
        }
    }

    /// Bytes of the pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.mode.channels();
        let start = (y as usize * self.width as usize + x as usize) * c;
        Some(&self.data[start..start + c])
    }

    /// Overwrite the pixel at `(x, y)`. `value` must match the channel count.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: &[u8]) {
        let c = self.mode.channels();
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        assert_eq!(value.len(), c, "pixel value has wrong channel count");
        let start = (y as usize * self.width as usize + x as usize) * c;
        self.data[start..start + c].copy_from_slice(value);
    }

    /// Copy of the color channels with any alpha dropped.
    pub fn to_rgb(&self) -> RasterImage {
        let data = match self.mode {
            ChannelMode::Rgb => self.data.clone(),
            ChannelMode::Rgba => bytemuck::cast_slice::<u8, [u8; 4]>(&self.data)
                .iter()
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
        };
        Self {
            width: self.width,
            height: self.height,
            mode: ChannelMode::Rgb,
            data,
        }
    }

    /// The alpha plane, one byte per pixel, if the image has one.
    pub fn alpha_plane(&self) -> Option<Vec<u8>> {
        match self.mode {
            ChannelMode::Rgb => None,
            ChannelMode::Rgba => Some(
                bytemuck::cast_slice::<u8, [u8; 4]>(&self.data)
                    .iter()
                    .map(|px| px[3])
                    .collect(),
            ),
        }
    }

    /// Composite onto an opaque background color, producing RGB.
    ///
    /// ```text
    /// out = (c × a + bg × (255 − a)) / 255, rounded
    /// ```
    ///
    /// RGB images are returned unchanged.
    pub fn flatten_onto(&self, background: [u8; 3]) -> RasterImage {
        if self.mode == ChannelMode::Rgb {
            return self.clone();
        }
        let data = bytemuck::cast_slice::<u8, [u8; 4]>(&self.data)
            .iter()
            .flat_map(|px| {
                let a = px[3] as u32;
                let blend =
                    |c: u8, bg: u8| ((c as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
                [
                    blend(px[0], background[0]),
                    blend(px[1], background[1]),
                    blend(px[2], background[2]),
                ]
            })
            .collect();
        Self {
            width: self.width,
            height: self.height,
            mode: ChannelMode::Rgb,
            data,
        }
    }

    /// Attach an explicit alpha plane to this image's color channels.
    ///
    /// Any existing alpha is replaced. `alpha` must hold one byte per pixel.
    pub fn with_alpha(&self, alpha: &[u8]) -> Result<RasterImage> {
        if alpha.len() != self.pixel_count() {
            return Err(PostProcessError::DimensionMismatch {
                expected: format!("{} alpha values", self.pixel_count()),
                actual: format!("{} alpha values", alpha.len()),
            });
        }
        Ok(self.attach_alpha(alpha))
    }

    /// [`RasterImage::with_alpha`] for an alpha plane the caller built from
    /// this image's own dimensions.
    pub(crate) fn attach_alpha(&self, alpha: &[u8]) -> RasterImage {
        debug_assert_eq!(alpha.len(), self.pixel_count());
        let c = self.mode.channels();
        let mut data = Vec::with_capacity(self.pixel_count() * 4);
        for (px, &a) in self.data.chunks_exact(c).zip(alpha) {
            data.extend_from_slice(&[px[0], px[1], px[2], a]);
        }
        Self {
            width: self.width,
            height: self.height,
            mode: ChannelMode::Rgba,
            data,
        }
    }
}

impl TryFrom<DynamicImage> for RasterImage {
    type Error = PostProcessError;

    /// Accepts 8-bit RGB and RGBA images only; convert other layouts before
    /// handing them to the engine.
    fn try_from(img: DynamicImage) -> Result<Self> {
        let (width, height) = (img.width(), img.height());
        match img {
            DynamicImage::ImageRgb8(buf) => {
                Self::new(width, height, ChannelMode::Rgb, buf.into_raw())
            }
            DynamicImage::ImageRgba8(buf) => {
                Self::new(width, height, ChannelMode::Rgba, buf.into_raw())
            }
            other => Err(PostProcessError::UnsupportedPixelFormat(format!(
                "{:?}",
                other.color()
            ))),
        }
    }
}

impl TryFrom<RasterImage> for DynamicImage {
    type Error = PostProcessError;

    fn try_from(img: RasterImage) -> Result<Self> {
        let RasterImage {
            width,
            height,
            mode,
            data,
        } = img;
        let len = data.len();
        let converted = match mode {
            ChannelMode::Rgb => {
                ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgb8)
            }
            ChannelMode::Rgba => {
                ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgba8)
            }
        };
        converted.ok_or_else(|| PostProcessError::DimensionMismatch {
            expected: format!("{width}x{height} {mode} buffer"),
            actual: format!("{len} bytes"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_short_buffer() {
        let err = RasterImage::new(2, 2, ChannelMode::Rgb, vec![0; 11]).unwrap_err();
        assert!(matches!(err, PostProcessError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_from_raw_rejects_gray() {
        let err = RasterImage::from_raw(1, 1, 1, vec![0]).unwrap_err();
        assert!(matches!(err, PostProcessError::UnsupportedPixelFormat(_)));
    }

    #[test]
    fn test_pixel_addressing_is_row_major() {
        let mut img = RasterImage::from_rgb_pixel(3, 2, [0, 0, 0]);
        img.set_pixel(2, 1, &[1, 2, 3]);
        assert_eq!(img.as_raw()[15..18], [1, 2, 3]);
        assert_eq!(img.pixel(2, 1), Some(&[1u8, 2, 3][..]));
        assert_eq!(img.pixel(3, 0), None);
    }

    #[test]
    fn test_flatten_onto_white() {
        let mut img = RasterImage::from_rgba_pixel(2, 1, [0, 0, 0, 0]);
        img.set_pixel(1, 0, &[10, 20, 30, 255]);
        let flat = img.flatten_onto([255, 255, 255]);
        assert_eq!(flat.mode(), ChannelMode::Rgb);
        assert_eq!(flat.as_raw(), &[255, 255, 255, 10, 20, 30]);
    }

    #[test]
    fn test_flatten_half_alpha_rounds() {
        let img = RasterImage::from_rgba_pixel(1, 1, [0, 100, 255, 128]);
        let flat = img.flatten_onto([255, 255, 255]);
        // (0·128 + 255·127) / 255 → 127, (100·128 + 255·127) / 255 → 177
        assert_eq!(flat.as_raw(), &[127, 177, 255]);
    }

    #[test]
    fn test_with_alpha_checks_length() {
        let img = RasterImage::from_rgb_pixel(2, 2, [9, 9, 9]);
        assert!(img.with_alpha(&[0; 3]).is_err());
        let rgba = img.with_alpha(&[0, 1, 2, 3]).unwrap();
        assert_eq!(rgba.alpha_plane(), Some(vec![0, 1, 2, 3]));
        assert_eq!(rgba.to_rgb(), img);
    }

    #[test]
    fn test_dynamic_image_conversion() {
        let dynamic = DynamicImage::new_rgba8(4, 3);
        let raster = RasterImage::try_from(dynamic).unwrap();
        assert_eq!(raster.dimensions(), (4, 3));
        assert_eq!(raster.mode(), ChannelMode::Rgba);

        let back = DynamicImage::try_from(raster).unwrap();
        assert_eq!(back.color(), ColorType::Rgba8);
    }

    #[test]
    fn test_dynamic_luma_is_unsupported() {
        let err = RasterImage::try_from(DynamicImage::new_luma8(2, 2)).unwrap_err();
        assert!(matches!(err, PostProcessError::UnsupportedPixelFormat(_)));
    }

    #[test]
    fn test_dynamic_image_keeps_pixels() {
        let mut img = RasterImage::from_rgb_pixel(3, 2, [1, 2, 3]);
        img.set_pixel(2, 1, &[7, 8, 9]);
        let dynamic = DynamicImage::try_from(img.clone()).unwrap();
        assert_eq!(dynamic.color(), ColorType::Rgb8);
        assert_eq!(RasterImage::try_from(dynamic).unwrap(), img);
    }
}
