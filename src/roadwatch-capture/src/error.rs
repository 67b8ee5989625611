//! Capture error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file is empty: {0}")]
    EmptyFile(String),

    #[error("unsupported media: {0} (only still images can be analyzed)")]
    UnsupportedMedia(String),

    #[error("not an image data URL")]
    InvalidDataUrl,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, CaptureError>;
