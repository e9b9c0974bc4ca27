//! Color space utilities — HSV conversion and hex parsing.

pub mod hex;
pub mod hsv;

pub use hex::parse_hex_color;
pub use hsv::{Hsv, hsv_to_rgb, rgb_to_hsv};
