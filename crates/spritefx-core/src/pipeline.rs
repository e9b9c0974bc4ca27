//! Operation requests and the processor that validates and runs them.
//!
//! `ColorTransformRequest` is the wire contract with the caller: a tagged
//! operation plus its parameters. Parameters arrive in wide types and are
//! checked here, so the typed operations in [`crate::matte`] and
//! [`crate::transform`] only ever see in-range values.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{PostProcessError, Result};
use crate::image::{ChannelMode, RasterImage};
use crate::matte::{self, DEFAULT_THRESHOLD, DEFAULT_TOLERANCE};
use crate::transform::{self, DEFAULT_INTENSITY};

/// One post-processing operation and its parameters.
///
/// Serialized as `{"operation": "<snake_case tag>", ...params}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum ColorTransformRequest {
    /// Border-connected dark background → transparent. Output is RGBA.
    MatteByConnectivity {
        /// Brightness cut-off, 0–255 inclusive.
        #[serde(default = "default_threshold")]
        threshold: i64,
    },
    /// Pixels near a color → transparent. Output is RGBA.
    MatteByColor {
        #[serde(default)]
        target_color: [u8; 3],
        /// Allowed mean per-channel difference, >= 0.
        #[serde(default = "default_tolerance")]
        tolerance: i64,
    },
    /// Rotate hue by an angle in degrees.
    HueShift {
        #[serde(default)]
        degrees: f64,
    },
    /// Multiply saturation, >= 0.
    SaturationAdjust {
        #[serde(default = "default_factor")]
        factor: f64,
    },
    /// Blend hue and saturation toward a `#rrggbb` color.
    ColorTint {
        target_hex: String,
        /// Blend amount, 0–1 inclusive.
        #[serde(default = "default_intensity")]
        intensity: f64,
    },
}

fn default_threshold() -> i64 {
    DEFAULT_THRESHOLD as i64
}

fn default_tolerance() -> i64 {
    DEFAULT_TOLERANCE as i64
}

fn default_factor() -> f64 {
    1.0
}

fn default_intensity() -> f64 {
    DEFAULT_INTENSITY
}

impl ColorTransformRequest {
    /// The serialized operation tag.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MatteByConnectivity { .. } => "matte_by_connectivity",
            Self::MatteByColor { .. } => "matte_by_color",
            Self::HueShift { .. } => "hue_shift",
            Self::SaturationAdjust { .. } => "saturation_adjust",
            Self::ColorTint { .. } => "color_tint",
        }
    }

    /// Channel mode of the image this request produces from `input`.
    pub const fn output_mode(&self, input: ChannelMode) -> ChannelMode {
        match self {
            Self::MatteByConnectivity { .. } | Self::MatteByColor { .. } => ChannelMode::Rgba,
            _ => input,
        }
    }

    /// Check parameters without touching an image.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::MatteByConnectivity { threshold } => checked_threshold(*threshold).map(drop),
            Self::MatteByColor { tolerance, .. } => checked_tolerance(*tolerance).map(drop),
            Self::HueShift { degrees } => transform::hue::check_degrees(*degrees),
            Self::SaturationAdjust { factor } => transform::saturation::check_factor(*factor),
            Self::ColorTint {
                target_hex,
                intensity,
            } => {
                crate::color::parse_hex_color(target_hex)?;
                transform::tint::check_intensity(*intensity)
            }
        }
    }
}

fn checked_threshold(threshold: i64) -> Result<u8> {
    u8::try_from(threshold).map_err(|_| {
        PostProcessError::out_of_range("threshold", threshold, "an integer in 0..=255")
    })
}

fn checked_tolerance(tolerance: i64) -> Result<u32> {
    u32::try_from(tolerance).map_err(|_| {
        PostProcessError::out_of_range("tolerance", tolerance, "a non-negative 32-bit integer")
    })
}

/// Runs requests against images under a fixed [`EngineConfig`].
///
/// Holds no per-call state; one processor can serve any number of
/// concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct PostProcessor {
    config: EngineConfig,
}

impl PostProcessor {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate `request` and apply it, returning a new image.
    pub fn process(
        &self,
        image: &RasterImage,
        request: &ColorTransformRequest,
    ) -> Result<RasterImage> {
        let (width, height) = image.dimensions();
        self.config.check_dimensions(width, height)?;
        tracing::debug!(
            operation = request.name(),
            width,
            height,
            mode = %image.mode(),
            "processing"
        );

        let config = &self.config;
        match request {
            ColorTransformRequest::MatteByConnectivity { threshold } => {
                let threshold = checked_threshold(*threshold)?;
                Ok(matte::matte_by_connectivity_with(image, threshold, config))
            }
            ColorTransformRequest::MatteByColor {
                target_color,
                tolerance,
            } => {
                let tolerance = checked_tolerance(*tolerance)?;
                Ok(matte::matte_by_color_with(
                    image,
                    *target_color,
                    tolerance,
                    config,
                ))
            }
            ColorTransformRequest::HueShift { degrees } => {
                transform::hue::hue_shift_with(image, *degrees, config)
            }
            ColorTransformRequest::SaturationAdjust { factor } => {
                transform::saturation::saturation_adjust_with(image, *factor, config)
            }
            ColorTransformRequest::ColorTint {
                target_hex,
                intensity,
            } => transform::tint::color_tint_with(image, target_hex, *intensity, config),
        }
    }

    /// Apply `requests` in order, feeding each output into the next.
    ///
    /// Every request is validated up front so a bad parameter late in the
    /// chain fails before any pixel work. An empty chain returns a copy.
    pub fn process_chain(
        &self,
        image: &RasterImage,
        requests: &[ColorTransformRequest],
    ) -> Result<RasterImage> {
        for request in requests {
            request.validate()?;
        }
        requests
            .iter()
            .try_fold(image.clone(), |current, request| {
                self.process(&current, request)
            })
    }
}
