//! roadwatch-capture - Frame acquisition for Roadwatch
//!
//! Reads still images and encodes them as JPEG `data:` URLs for the
//! detection gateway.

pub mod error;
pub mod media;
pub mod still;

pub use error::CaptureError;
pub use media::MediaKind;
pub use still::{encode_jpeg, frame_from_data_url, StillCapture, DEFAULT_JPEG_QUALITY};
