//! Media type detection for capture sources

use std::path::Path;

/// Broad class of a capture source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Unknown,
}

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v", "wmv", "flv"];

impl MediaKind {
    /// Classify a path by its extension
    pub fn from_path(path: &Path) -> Self {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_ascii_lowercase(),
            None => return MediaKind::Unknown,
        };

        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Video
        } else if image::ImageFormat::from_extension(&ext).is_some() {
            MediaKind::Image
        } else {
            MediaKind::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(MediaKind::from_path(Path::new("cam/frame.JPG")), MediaKind::Image);
        assert_eq!(MediaKind::from_path(Path::new("frame.png")), MediaKind::Image);
        assert_eq!(MediaKind::from_path(Path::new("clip.mp4")), MediaKind::Video);
        assert_eq!(MediaKind::from_path(Path::new("notes.txt")), MediaKind::Unknown);
        assert_eq!(MediaKind::from_path(Path::new("README")), MediaKind::Unknown);
    }
}
