//! Roadwatch configuration
//!
//! TOML file with a `[gateway]` table for the detection service and a
//! `[client]` table for the analysis session. Every field has a default, so
//! a missing file or a partial one is fine.

use anyhow::{Context, Result};
use roadwatch_detect::{ChatConfig, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use roadwatch_session::{DEFAULT_GATEWAY_URL, DEFAULT_RECENT_LIMIT};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub client: ClientConfig,
}

/// Detection gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Interface to listen on
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Chat-completions endpoint of the model provider
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the provider credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Upper bound on one model call
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,
}

/// Analysis client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,

    /// Recent violations shown on the dashboard
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8787 }
fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_api_key_env() -> String { DEFAULT_API_KEY_ENV.to_string() }
fn default_gateway_timeout() -> u64 { 30 }
fn default_gateway_url() -> String { DEFAULT_GATEWAY_URL.to_string() }
fn default_client_timeout() -> u64 { 60 }
fn default_recent_limit() -> usize { DEFAULT_RECENT_LIMIT }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_gateway_timeout(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            timeout_secs: default_client_timeout(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl GatewayConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            api_key_env: self.api_key_env.clone(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML {}", path.display()))
    }

    /// Load from an explicit path, or from the default location if it exists
    ///
    /// An explicit path must exist. A missing default file yields the
    /// built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// `<config dir>/roadwatch/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("roadwatch").join("config.toml"))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
