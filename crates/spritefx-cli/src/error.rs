//! Errors raised at the command-line boundary.

use spritefx_core::PostProcessError;

/// Errors that can occur while loading, processing or writing an image.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Process(#[from] PostProcessError),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid plan: {0}")]
    Plan(#[from] serde_json::Error),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("malformed data URI: {0}")]
    MalformedDataUri(String),

    #[error("input {0:?} is neither a readable file nor base64 image data")]
    InputNotFound(String),
}
