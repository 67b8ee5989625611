//! Still-image capture into JPEG data URLs

use crate::error::{CaptureError, Result};
use crate::media::MediaKind;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use roadwatch_detect::Frame;
use std::path::Path;
use tracing::debug;

/// JPEG quality used for submitted frames
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Turns image sources into frames ready for submission
#[derive(Debug, Clone)]
pub struct StillCapture {
    quality: u8,
}

impl StillCapture {
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Load an image file and encode it as a frame
    pub fn capture_file(&self, path: &Path) -> Result<Frame> {
        if MediaKind::from_path(path) == MediaKind::Video {
            return Err(CaptureError::UnsupportedMedia(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(CaptureError::EmptyFile(path.display().to_string()));
        }

        let img = image::load_from_memory(&bytes)?;
        debug!(
            "captured {} ({}x{}, {} bytes)",
            path.display(),
            img.width(),
            img.height(),
            bytes.len()
        );

        self.capture_image(&img)
    }

    /// Encode an already decoded image as a frame
    pub fn capture_image(&self, img: &DynamicImage) -> Result<Frame> {
        let jpeg = encode_jpeg(img, self.quality)?;
        Ok(Frame::new(format!("{}{}", DATA_URL_PREFIX, STANDARD.encode(jpeg))))
    }
}

impl Default for StillCapture {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode as baseline JPEG; alpha is dropped
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&rgb)?;
    Ok(buf)
}

/// Accept an existing `data:image/...;base64,` URL as a frame
pub fn frame_from_data_url(url: &str) -> Result<Frame> {
    let valid = url
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| !payload.is_empty())
        .unwrap_or(false);

    if !valid {
        return Err(CaptureError::InvalidDataUrl);
    }
    Ok(Frame::new(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use std::io::Write;

    fn test_image() -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(16, 8, Rgba([200, 30, 30, 255])))
    }

    #[test]
    fn test_capture_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        test_image().save(&path).unwrap();

        let frame = StillCapture::new().capture_file(&path).unwrap();
        assert_eq!(frame.media_type(), Some("image/jpeg"));

        let payload = frame.as_str().strip_prefix(DATA_URL_PREFIX).unwrap();
        let jpeg = STANDARD.decode(payload).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_video_file_is_rejected() {
        let err = StillCapture::new()
            .capture_file(Path::new("traffic.mp4"))
            .unwrap_err();
        assert!(matches!(err, CaptureError::UnsupportedMedia(_)));
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        let err = StillCapture::new().capture_file(file.path()).unwrap_err();
        assert!(matches!(err, CaptureError::EmptyFile(_)));
    }

    #[test]
    fn test_garbage_file_is_image_error() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(b"definitely not a jpeg").unwrap();
        let err = StillCapture::new().capture_file(file.path()).unwrap_err();
        assert!(matches!(err, CaptureError::Image(_)));
    }

    #[test]
    fn test_data_url_passthrough() {
        let frame = frame_from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(frame.media_type(), Some("image/png"));

        assert!(frame_from_data_url("data:text/plain;base64,aGk=").is_err());
        assert!(frame_from_data_url("data:image/png;base64,").is_err());
        assert!(frame_from_data_url("iVBORw0KGgo=").is_err());
    }
}
