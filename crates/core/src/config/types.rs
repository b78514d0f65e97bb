use serde::{Deserialize, Serialize};
use std::net::IpAddr;

pub use crate::pipeline::PipelineConfig;
pub use crate::runner::RunnerConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Telegram transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Bot API token. Environment-sourced in deployment
    /// (`CLIPSTITCH_TELEGRAM_TOKEN`); an empty token fails validation.
    #[serde(default)]
    pub token: String,

    /// Bot API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds for ordinary method calls.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,

    /// Server-side long-poll window for getUpdates, in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u32,

    /// Request timeout in seconds for video uploads.
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
            poll_timeout_secs: default_poll_timeout(),
            upload_timeout_secs: default_upload_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_poll_timeout() -> u32 {
    50
}

fn default_upload_timeout() -> u32 {
    180
}

/// Liveness server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host.to_string(), "0.0.0.0");
    }

    #[test]
    fn test_telegram_defaults() {
        let config = TelegramConfig::default();
        assert!(config.token.is_empty());
        assert_eq!(config.api_url, "https://api.telegram.org");
        assert_eq!(config.poll_timeout_secs, 50);
    }
}
