//! Classifier capability

use crate::error::Result;
use crate::frame::Frame;
use async_trait::async_trait;
use std::time::Duration;

/// An opaque image classifier that returns the model's raw reply text.
///
/// Parsing the text is the caller's job, so implementations can be swapped
/// for canned stubs without touching the extraction rules.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Whether a credential is available right now
    fn is_configured(&self) -> bool;

    /// Name of the credential this classifier needs, for error messages
    fn credential_name(&self) -> &str;

    /// Classify one frame, giving up after `timeout`
    async fn classify(&self, frame: &Frame, timeout: Duration) -> Result<String>;
}
