//! Frame-to-report pipeline run once per gateway request

use crate::classifier::Classifier;
use crate::error::{DetectError, Result};
use crate::extract::extract_violations;
use crate::frame::Frame;
use crate::violation::ViolationReport;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Stateless detector; holds nothing between requests but the classifier
#[derive(Clone)]
pub struct Detector {
    classifier: Arc<dyn Classifier>,
    timeout: Duration,
}

impl Detector {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the whole pipeline on a raw request body
    pub async fn run(&self, body: &[u8]) -> Result<Vec<ViolationReport>> {
        let frame = parse_request(body)?;
        self.detect(&frame).await
    }

    /// Classify a frame and turn the reply into reports.
    ///
    /// Steps run strictly in order: credential check, one classifier call,
    /// extraction. Nothing is retried.
    pub async fn detect(&self, frame: &Frame) -> Result<Vec<ViolationReport>> {
        if frame.is_empty() {
            return Err(DetectError::MissingImage);
        }

        if !self.classifier.is_configured() {
            return Err(DetectError::MissingCredential(
                self.classifier.credential_name().to_string(),
            ));
        }

        info!(
            "analyzing image for traffic violations ({} bytes, {}) with {}",
            frame.len(),
            frame.media_type().unwrap_or("raw"),
            self.classifier.name()
        );

        let text = self.classifier.classify(frame, self.timeout).await?;
        debug!("AI response: {}", text);

        let violations = extract_violations(&text)?;
        info!("detected {} violation(s)", violations.len());

        Ok(violations)
    }
}

/// Read the `image` field out of a request body
pub fn parse_request(body: &[u8]) -> Result<Frame> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| DetectError::MalformedRequest(e.to_string()))?;

    value
        .get("image")
        .and_then(serde_json::Value::as_str)
        .map(Frame::new)
        .filter(|frame| !frame.is_empty())
        .ok_or(DetectError::MissingImage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, ViolationType};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns canned text and counts calls
    struct CannedClassifier {
        reply: std::result::Result<String, u16>,
        configured: bool,
        calls: AtomicUsize,
    }

    impl CannedClassifier {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                configured: true,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                configured: true,
                calls: AtomicUsize::new(0),
            })
        }

        fn unconfigured() -> Arc<Self> {
            Arc::new(Self {
                reply: Ok("[]".to_string()),
                configured: false,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Classifier for CannedClassifier {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        fn credential_name(&self) -> &str {
            "TEST_API_KEY"
        }

        async fn classify(&self, _frame: &Frame, _timeout: Duration) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(DetectError::UpstreamStatus { status: *status }),
            }
        }
    }

    const IMAGE_BODY: &[u8] = br#"{"image": "data:image/jpeg;base64,AAAA"}"#;

    #[tokio::test]
    async fn test_well_formed_reply() {
        let classifier = CannedClassifier::replying(
            r#"[{"type":"RED_LIGHT_VIOLATION","confidence":0.8,"description":"car ran the light","location":"junction","severity":"high"}]"#,
        );
        let detector = Detector::new(classifier.clone());

        let reports = detector.run(IMAGE_BODY).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].violation_type, ViolationType::RedLightViolation);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_image_checked_before_configuration() {
        let classifier = CannedClassifier::unconfigured();
        let detector = Detector::new(classifier.clone());

        let bodies: [&[u8]; 4] = [b"{}", br#"{"image": ""}"#, br#"{"image": 42}"#, b"[]"];
        for body in bodies {
            let err = detector.run(body).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
            assert_eq!(err.to_string(), "No image provided");
        }
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let detector = Detector::new(CannedClassifier::replying("[]"));
        let err = detector.run(b"not json").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_unconfigured_classifier_is_never_called() {
        let classifier = CannedClassifier::unconfigured();
        let detector = Detector::new(classifier.clone());

        let err = detector.run(IMAGE_BODY).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "TEST_API_KEY not configured");
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_status_propagates() {
        let classifier = CannedClassifier::failing(503);
        let detector = Detector::new(classifier.clone());

        let err = detector.run(IMAGE_BODY).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(err.to_string().contains("503"));
        // one shot, no retries
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unparseable_reply() {
        let detector = Detector::new(CannedClassifier::replying("I cannot analyze this."));
        let err = detector.run(IMAGE_BODY).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse violation detection results");
    }
}
