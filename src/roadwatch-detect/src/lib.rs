//! roadwatch-detect - Traffic-violation detection for Roadwatch
//!
//! Sends a captured frame to a hosted multimodal model, pulls the JSON
//! violation array out of its reply and validates every record before it
//! reaches a caller.

mod chat;
mod classifier;
mod detector;
mod error;
mod extract;
mod frame;
pub mod prompt;
mod violation;

pub use chat::{ChatClassifier, ChatConfig, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use classifier::Classifier;
pub use detector::{parse_request, Detector, DEFAULT_TIMEOUT};
pub use error::{DetectError, ErrorKind, Result};
pub use extract::{extract_json, extract_violations};
pub use frame::Frame;
pub use violation::{
    parse_reports, AnalysisResult, DetectionResponse, Severity, ViolationReport, ViolationType,
};
