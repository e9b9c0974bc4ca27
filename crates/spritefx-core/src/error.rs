//! Error type shared by every post-processing operation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PostProcessError>;

/// Everything that can go wrong while post-processing a raster image.
///
/// All variants are local, recoverable failures; callers at the transport
/// boundary decide how to surface them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PostProcessError {
    #[error("invalid color format {input:?}: expected 6 hex digits, optionally prefixed with '#'")]
    InvalidColorFormat { input: String },

    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("parameter `{name}` out of range: {value} (expected {expected})")]
    ParameterOutOfRange {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("image {width}x{height} exceeds the maximum dimension of {max}")]
    ImageTooLarge { width: u32, height: u32, max: u32 },
}

impl PostProcessError {
    pub(crate) fn out_of_range(
        name: &'static str,
        value: impl std::fmt::Display,
        expected: &'static str,
    ) -> Self {
        Self::ParameterOutOfRange {
            name,
            value: value.to_string(),
            expected,
        }
    }

    pub(crate) fn size_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }
}
