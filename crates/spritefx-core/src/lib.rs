//! spritefx core — post-processing for generated sprite images.
//!
//! Deterministic pixel-level transforms applied after an image has been
//! generated or uploaded: background matting (brightness + border
//! connectivity, or distance to a color) and HSV color remapping (hue
//! shift, saturation, tint). No I/O and no model dependencies; callers
//! decode into a [`RasterImage`] and re-encode the result.

pub mod color;
pub mod config;
pub mod error;
pub mod image;
pub mod matte;
pub mod pipeline;
pub mod transform;

// Re-exports for convenience.
pub use config::EngineConfig;
pub use error::{PostProcessError, Result};
pub use image::{ChannelMode, RasterImage};
pub use matte::{AlphaMask, matte_by_color, matte_by_connectivity};
pub use pipeline::{ColorTransformRequest, PostProcessor};
pub use transform::{color_tint, hue_shift, saturation_adjust};
