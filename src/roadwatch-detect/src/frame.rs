//! Encoded still frames

use serde::{Deserialize, Serialize};

/// A single encoded still image, usually a base64 `data:` URL.
///
/// The gateway forwards the string to the model untouched; it is never
/// decoded or stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame(String);

impl Frame {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Media type of a `data:` URL, if the frame is one
    pub fn media_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let end = rest.find([';', ','])?;
        Some(&rest[..end])
    }

    /// Encoded length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type() {
        let frame = Frame::new("data:image/jpeg;base64,/9j/4AAQ");
        assert_eq!(frame.media_type(), Some("image/jpeg"));
        assert_eq!(Frame::new("/9j/4AAQ").media_type(), None);
    }

    #[test]
    fn test_blank_frame_is_empty() {
        assert!(Frame::new("").is_empty());
        assert!(Frame::new("   ").is_empty());
        assert!(!Frame::new("x").is_empty());
    }
}
