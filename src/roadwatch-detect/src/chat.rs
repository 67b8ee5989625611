//! Chat-completions classifier backed by a hosted multimodal model

use crate::classifier::Classifier;
use crate::error::{DetectError, Result};
use crate::frame::Frame;
use crate::prompt::{MAX_TOKENS, SYSTEM_INSTRUCTION, TEMPERATURE, USER_INSTRUCTION};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_ENDPOINT: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "LOVABLE_API_KEY";

/// Upstream error bodies are logged up to this many bytes
const MAX_LOGGED_ERROR_BYTES: usize = 500;

/// Model endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Full URL of the chat-completions endpoint
    pub endpoint: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Environment variable holding the bearer token
    pub api_key_env: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

/// Classifier that sends the frame to a chat-completions endpoint
pub struct ChatClassifier {
    client: Client,
    config: ChatConfig,
    api_key: Option<String>,
}

impl ChatClassifier {
    /// The credential is looked up in `config.api_key_env` on every call
    pub fn new(config: ChatConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key: None,
        }
    }

    /// Use a fixed credential instead of the environment
    pub fn with_api_key(config: ChatConfig, api_key: String) -> Self {
        Self {
            api_key: Some(api_key),
            ..Self::new(config)
        }
    }

    fn api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }

        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| DetectError::MissingCredential(self.config.api_key_env.clone()))
    }

    /// Build the request body for one frame
    pub fn request_body(&self, frame: &Frame) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_INSTRUCTION,
                },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": USER_INSTRUCTION },
                        { "type": "image_url", "image_url": { "url": frame.as_str() } },
                    ],
                },
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        })
    }
}

#[async_trait]
impl Classifier for ChatClassifier {
    fn name(&self) -> &'static str {
        "chat-completions"
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    fn credential_name(&self) -> &str {
        &self.config.api_key_env
    }

    async fn classify(&self, frame: &Frame, timeout: Duration) -> Result<String> {
        let api_key = self.api_key()?;

        // never log the full key
        let key_prefix = api_key.get(..8).filter(|_| api_key.len() > 8).unwrap_or("***");
        debug!(
            "requesting {} from {} with key {}...",
            self.config.model, self.config.endpoint, key_prefix
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout)
            .json(&self.request_body(frame))
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("AI API error: {}", truncate(&text, MAX_LOGGED_ERROR_BYTES));
            return Err(DetectError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DetectError::Upstream("malformed response".to_string()))
    }
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> DetectError {
    if err.is_timeout() {
        DetectError::Upstream(format!("timed out after {:?}", timeout))
    } else if err.is_decode() {
        DetectError::Upstream("malformed response".to_string())
    } else {
        DetectError::Upstream(err.to_string())
    }
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let classifier = ChatClassifier::with_api_key(ChatConfig::default(), "k".into());
        let body = classifier.request_body(&Frame::new("data:image/jpeg;base64,AAAA"));

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["temperature"].as_f64(), Some(0.3));
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_INSTRUCTION);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"][0]["text"], USER_INSTRUCTION);
        assert_eq!(
            body["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
    }

    #[test]
    fn test_missing_env_credential_is_configuration_error() {
        let config = ChatConfig {
            api_key_env: "ROADWATCH_TEST_UNSET_KEY_7F3A".to_string(),
            ..ChatConfig::default()
        };
        let classifier = ChatClassifier::new(config);

        assert!(!classifier.is_configured());
        let err = classifier.api_key().unwrap_err();
        assert_eq!(err.to_string(), "ROADWATCH_TEST_UNSET_KEY_7F3A not configured");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 500), "short");
        assert_eq!(truncate("héllo", 2), "h");
    }
}
