//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use spritefx_core::color::parse_hex_color;
use spritefx_core::matte::{DEFAULT_THRESHOLD, DEFAULT_TOLERANCE};
use spritefx_core::transform::DEFAULT_INTENSITY;
use spritefx_core::{ColorTransformRequest, EngineConfig};

use crate::codec::STDOUT_TARGET;
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "spritefx")]
#[command(version, about = "Background matting and color remapping for sprites", long_about = None)]
pub struct Cli {
    /// Largest accepted image width or height (overrides SPRITEFX_MAX_DIMENSION)
    #[arg(long, global = true, value_name = "PIXELS")]
    pub max_dimension: Option<u32>,

    /// Pixel count at which work runs in parallel (overrides SPRITEFX_PARALLEL_THRESHOLD)
    #[arg(long, global = true, value_name = "PIXELS")]
    pub parallel_threshold: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Apply command-line overrides on top of `base`.
    pub fn engine_config(&self, base: EngineConfig) -> EngineConfig {
        EngineConfig {
            max_dimension: self.max_dimension.unwrap_or(base.max_dimension),
            parallel_pixel_threshold: self
                .parallel_threshold
                .unwrap_or(base.parallel_pixel_threshold),
        }
    }
}

/// Where to read the image from and where to write the result.
#[derive(Debug, Clone, Args)]
pub struct IoArgs {
    /// Image file, data URI, or bare base64 payload
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Output PNG path, or `-` to print a data URI
    #[arg(short, long, value_name = "FILE", default_value = STDOUT_TARGET)]
    pub output: String,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Make the dark background connected to the border transparent
    Matte {
        #[command(flatten)]
        io: IoArgs,

        /// Brightness cut-off (0-255); pixels at or below it count as dark
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_THRESHOLD as i64,
            allow_negative_numbers = true
        )]
        threshold: i64,
    },

    /// Make every pixel close to a color transparent
    MatteColor {
        #[command(flatten)]
        io: IoArgs,

        /// Background color as #rrggbb
        #[arg(short, long, value_name = "HEX", default_value = "#000000")]
        color: String,

        /// Allowed mean per-channel difference
        #[arg(long, default_value_t = DEFAULT_TOLERANCE as i64, allow_negative_numbers = true)]
        tolerance: i64,
    },

    /// Rotate hue
    Hue {
        #[command(flatten)]
        io: IoArgs,

        /// Angle in degrees; negative values rotate backwards
        #[arg(short, long, allow_negative_numbers = true)]
        degrees: f64,
    },

    /// Scale saturation
    Saturate {
        #[command(flatten)]
        io: IoArgs,

        /// Multiplier (0 = grayscale, 1 = unchanged)
        #[arg(short, long, allow_negative_numbers = true)]
        factor: f64,
    },

    /// Blend hue and saturation toward a color
    Tint {
        #[command(flatten)]
        io: IoArgs,

        /// Target color as #rrggbb
        #[arg(short, long, value_name = "HEX")]
        color: String,

        /// Blend amount (0-1)
        #[arg(short, long, default_value_t = DEFAULT_INTENSITY, allow_negative_numbers = true)]
        intensity: f64,
    },

    /// Run a JSON plan: an array of {"operation": ..., ...} requests
    Run {
        #[command(flatten)]
        io: IoArgs,

        /// Inline JSON array, or a path to a file holding one
        #[arg(short, long, value_name = "JSON|FILE")]
        plan: String,
    },
}

impl Commands {
    pub fn io(&self) -> &IoArgs {
        match self {
            Self::Matte { io, .. }
            | Self::MatteColor { io, .. }
            | Self::Hue { io, .. }
            | Self::Saturate { io, .. }
            | Self::Tint { io, .. }
            | Self::Run { io, .. } => io,
        }
    }

    /// The requests this command stands for, in execution order.
    pub fn requests(&self) -> Result<Vec<ColorTransformRequest>, CliError> {
        let request = match self {
            Self::Matte { threshold, .. } => ColorTransformRequest::MatteByConnectivity {
                threshold: *threshold,
            },
            Self::MatteColor {
                color, tolerance, ..
            } => ColorTransformRequest::MatteByColor {
                target_color: parse_hex_color(color)?,
                tolerance: *tolerance,
            },
            Self::Hue { degrees, .. } => ColorTransformRequest::HueShift { degrees: *degrees },
            Self::Saturate { factor, .. } => {
                ColorTransformRequest::SaturationAdjust { factor: *factor }
            }
            Self::Tint {
                color, intensity, ..
            } => ColorTransformRequest::ColorTint {
                target_hex: color.clone(),
                intensity: *intensity,
            },
            Self::Run { plan, .. } => return load_plan(plan),
        };
        Ok(vec![request])
    }
}

/// Parse a plan given inline or as a file path.
pub fn load_plan(plan: &str) -> Result<Vec<ColorTransformRequest>, CliError> {
    let trimmed = plan.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    let contents = std::fs::read_to_string(plan)?;
    Ok(serde_json::from_str(&contents)?)
}
