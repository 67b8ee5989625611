//! Error types for violation detection

use thiserror::Error;

/// Machine-readable failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Configuration,
    Upstream,
    Parse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Parse => "parse",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while turning a frame into a violation report.
///
/// The `Display` output of each variant is the message sent to callers, so
/// the strings here are part of the wire contract.
#[derive(Error, Debug)]
pub enum DetectError {
    /// Request carried no usable image
    #[error("No image provided")]
    MissingImage,

    /// Request body could not be read as JSON
    #[error("Invalid request body: {0}")]
    MalformedRequest(String),

    /// Model credential is not present in the environment
    #[error("{0} not configured")]
    MissingCredential(String),

    /// Model endpoint answered with a non-success status
    #[error("AI API error: {status}")]
    UpstreamStatus { status: u16 },

    /// Transport failure, timeout or an unreadable reply envelope
    #[error("AI API error: {0}")]
    Upstream(String),

    /// Model text did not hold a valid violation array
    #[error("Failed to parse violation detection results")]
    Parse(String),
}

impl DetectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DetectError::MissingImage | DetectError::MalformedRequest(_) => ErrorKind::InvalidInput,
            DetectError::MissingCredential(_) => ErrorKind::Configuration,
            DetectError::UpstreamStatus { .. } | DetectError::Upstream(_) => ErrorKind::Upstream,
            DetectError::Parse(_) => ErrorKind::Parse,
        }
    }

    /// Extra context that is logged but never sent to callers
    pub fn detail(&self) -> Option<&str> {
        match self {
            DetectError::Parse(detail) => Some(detail),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectError>;
