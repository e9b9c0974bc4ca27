//! Color transforms — hue shift, saturation adjust and color tint.
//!
//! Each transform maps pixels through an HSV round trip, keeps the input's
//! channel mode and never touches alpha.

pub mod hue;
pub(crate) mod pointwise;
pub mod saturation;
pub mod tint;

pub use hue::hue_shift;
pub use saturation::saturation_adjust;
pub use tint::{DEFAULT_INTENSITY, color_tint, color_tint_rgb};
