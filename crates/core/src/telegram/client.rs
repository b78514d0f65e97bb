//! Telegram Bot API client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde_json::json;
use tracing::debug;

use crate::config::TelegramConfig;
use crate::session::UserId;

use super::error::TransportError;
use super::traits::Transport;
use super::types::{ApiResponse, BotIdentity, FileInfo, Update};

/// Bot API client over HTTPS.
///
/// Holds no session state: the token travels in the URL and every method
/// call is independent, so one client is shared freely between tasks.
pub struct TelegramClient {
    client: Client,
    config: TelegramConfig,
}

impl TelegramClient {
    /// Creates a new client.
    pub fn new(config: TelegramConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn base_url(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url(), self.config.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.base_url(),
            self.config.token,
            file_path
        )
    }

    fn map_error(e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::ConnectionFailed(e.to_string())
        } else {
            TransportError::InvalidResponse(e.to_string())
        }
    }

    /// Unwraps the Bot API response envelope.
    async fn into_result<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        let body = response.text().await.map_err(Self::map_error)?;

        let parsed: ApiResponse<T> = serde_json::from_str(&body).map_err(|_| {
            TransportError::InvalidResponse(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            ))
        })?;

        if parsed.ok {
            parsed
                .result
                .ok_or_else(|| TransportError::InvalidResponse("ok response without result".into()))
        } else {
            Err(TransportError::api(
                parsed
                    .description
                    .unwrap_or_else(|| format!("HTTP {}", status)),
            ))
        }
    }

    /// Identifies the bot behind the configured token.
    pub async fn get_me(&self) -> Result<BotIdentity, TransportError> {
        let response = self
            .client
            .get(self.method_url("getMe"))
            .send()
            .await
            .map_err(Self::map_error)?;
        Self::into_result(response).await
    }

    /// Long-polls for the next batch of updates.
    ///
    /// `offset` must be one past the last update already processed, so
    /// acknowledged updates are not redelivered.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TransportError> {
        let mut request = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&[("timeout", self.config.poll_timeout_secs)])
            // The long poll must outlive the client-wide timeout.
            .timeout(Duration::from_secs(
                self.config.poll_timeout_secs as u64 + 10,
            ));
        if let Some(offset) = offset {
            request = request.query(&[("offset", offset)]);
        }

        let response = request.send().await.map_err(Self::map_error)?;
        Self::into_result(response).await
    }
}

#[async_trait]
impl Transport for TelegramClient {
    async fn reply_text(&self, user: UserId, text: &str) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&json!({ "chat_id": user.0, "text": text }))
            .send()
            .await
            .map_err(Self::map_error)?;
        let _: serde_json::Value = Self::into_result(response).await?;
        Ok(())
    }

    async fn reply_video(
        &self,
        user: UserId,
        video: &Path,
        caption: &str,
    ) -> Result<(), TransportError> {
        let bytes = tokio::fs::read(video).await?;
        debug!(user = %user, size = bytes.len(), "uploading video reply");

        let file_name = video
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string());
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("video/mp4")
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
        let form = multipart::Form::new()
            .text("chat_id", user.0.to_string())
            .text("caption", caption.to_string())
            .part("video", part);

        let response = self
            .client
            .post(self.method_url("sendVideo"))
            .multipart(form)
            .timeout(Duration::from_secs(self.config.upload_timeout_secs as u64))
            .send()
            .await
            .map_err(Self::map_error)?;
        let _: serde_json::Value = Self::into_result(response).await?;
        Ok(())
    }

    async fn download(&self, file_id: &str, dest: &Path) -> Result<(), TransportError> {
        let response = self
            .client
            .get(self.method_url("getFile"))
            .query(&[("file_id", file_id)])
            .send()
            .await
            .map_err(Self::map_error)?;
        let info: FileInfo = Self::into_result(response).await?;
        let file_path = info.file_path.ok_or_else(|| {
            TransportError::InvalidResponse("getFile answered without file_path".into())
        })?;

        let response = self
            .client
            .get(self.file_url(&file_path))
            .send()
            .await
            .map_err(Self::map_error)?;
        if !response.status().is_success() {
            return Err(TransportError::api(format!(
                "file download failed: HTTP {}",
                response.status()
            )));
        }
        let bytes = response.bytes().await.map_err(Self::map_error)?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TelegramConfig {
        TelegramConfig {
            token: "123:abc".to_string(),
            api_url: "https://api.telegram.org/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_method_url_strips_trailing_slash() {
        let client = TelegramClient::new(test_config());
        assert_eq!(
            client.method_url("getUpdates"),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn test_file_url() {
        let client = TelegramClient::new(test_config());
        assert_eq!(
            client.file_url("videos/file_7.mp4"),
            "https://api.telegram.org/file/bot123:abc/videos/file_7.mp4"
        );
    }
}
