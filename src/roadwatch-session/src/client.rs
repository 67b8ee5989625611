//! Gateway client

use async_trait::async_trait;
use reqwest::Client;
use roadwatch_detect::{parse_reports, AnalysisResult, Frame};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8787/detect-violations";
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Anything that can turn a frame into an analysis result.
///
/// Implementations never fail outright: every problem is folded into
/// `AnalysisResult::Failure`.
#[async_trait]
pub trait FrameSubmitter: Send + Sync {
    async fn submit_frame(&self, frame: &Frame) -> AnalysisResult;
}

/// HTTP client for the detection gateway
pub struct GatewayClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl GatewayClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout: DEFAULT_CLIENT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl FrameSubmitter for GatewayClient {
    async fn submit_frame(&self, frame: &Frame) -> AnalysisResult {
        debug!("sending image for analysis ({} bytes)", frame.len());

        let response = match self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&json!({ "image": frame.as_str() }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("gateway request failed: {}", e);
                return AnalysisResult::failure(format!("Could not reach detection gateway: {}", e));
            }
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(body) => interpret_response(status, &body),
            Err(e) => AnalysisResult::failure(format!("Could not read gateway response: {}", e)),
        }
    }
}

/// Turn a gateway reply into a result.
///
/// An `error` field always wins. A missing or non-array `violations`
/// field, or any record that fails validation, is a failure rather than
/// zero violations.
pub fn interpret_response(status: u16, body: &[u8]) -> AnalysisResult {
    let success = (200..300).contains(&status);

    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) if !success => {
            return AnalysisResult::failure(format!("Gateway returned HTTP {}", status))
        }
        Err(e) => return AnalysisResult::failure(format!("Malformed gateway response: {}", e)),
    };

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return AnalysisResult::failure(error);
    }

    if !success {
        return AnalysisResult::failure(format!("Gateway returned HTTP {}", status));
    }

    let violations = match value.get("violations") {
        Some(violations) => violations.clone(),
        None => return AnalysisResult::failure("Malformed gateway response: missing violations"),
    };

    match parse_reports(violations) {
        Ok(reports) => AnalysisResult::success(reports),
        Err(e) => AnalysisResult::failure(format!("Malformed gateway response: {}", e)),
    }
}
