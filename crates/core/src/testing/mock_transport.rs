//! Mock transport for testing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::session::UserId;
use crate::telegram::{Transport, TransportError};

/// A reply captured by the mock transport.
#[derive(Debug, Clone)]
pub enum RecordedReply {
    Text {
        user: UserId,
        text: String,
    },
    Video {
        user: UserId,
        path: PathBuf,
        caption: String,
        /// Whether the file existed at send time.
        existed: bool,
    },
}

/// Mock implementation of the [`Transport`] trait.
///
/// Downloads write the file id as the file's contents so tests can tell
/// clips apart on disk; replies are recorded in order.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Arc<RwLock<Vec<RecordedReply>>>,
    downloads: Arc<RwLock<Vec<String>>>,
    fail_next_download: Arc<RwLock<Option<TransportError>>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded replies, in send order.
    pub async fn recorded_replies(&self) -> Vec<RecordedReply> {
        self.replies.read().await.clone()
    }

    /// Text replies sent to `user`, in order.
    pub async fn texts_for(&self, user: UserId) -> Vec<String> {
        self.replies
            .read()
            .await
            .iter()
            .filter_map(|r| match r {
                RecordedReply::Text { user: u, text } if *u == user => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Video replies sent to `user`, in order.
    pub async fn videos_for(&self, user: UserId) -> Vec<RecordedReply> {
        self.replies
            .read()
            .await
            .iter()
            .filter(|r| matches!(r, RecordedReply::Video { user: u, .. } if *u == user))
            .cloned()
            .collect()
    }

    /// File ids downloaded so far.
    pub async fn recorded_downloads(&self) -> Vec<String> {
        self.downloads.read().await.clone()
    }

    /// Configure the next download to fail.
    pub async fn fail_next_download(&self, error: TransportError) {
        *self.fail_next_download.write().await = Some(error);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn reply_text(&self, user: UserId, text: &str) -> Result<(), TransportError> {
        self.replies.write().await.push(RecordedReply::Text {
            user,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn reply_video(
        &self,
        user: UserId,
        video: &Path,
        caption: &str,
    ) -> Result<(), TransportError> {
        self.replies.write().await.push(RecordedReply::Video {
            user,
            path: video.to_path_buf(),
            caption: caption.to_string(),
            existed: video.exists(),
        });
        Ok(())
    }

    async fn download(&self, file_id: &str, dest: &Path) -> Result<(), TransportError> {
        if let Some(error) = self.fail_next_download.write().await.take() {
            return Err(error);
        }
        self.downloads.write().await.push(file_id.to_string());
        tokio::fs::write(dest, file_id.as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_download_writes_file_id_as_contents() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");
        let transport = MockTransport::new();

        transport.download("file-7", &dest).await.unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "file-7");
        assert_eq!(transport.recorded_downloads().await, vec!["file-7"]);
    }

    #[tokio::test]
    async fn test_replies_recorded_per_user() {
        let transport = MockTransport::new();
        transport.reply_text(UserId(1), "hello").await.unwrap();
        transport.reply_text(UserId(2), "other").await.unwrap();
        transport.reply_text(UserId(1), "again").await.unwrap();

        assert_eq!(transport.texts_for(UserId(1)).await, vec!["hello", "again"]);
        assert_eq!(transport.texts_for(UserId(2)).await, vec!["other"]);
    }

    #[tokio::test]
    async fn test_injected_download_failure_consumed_once() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");
        let transport = MockTransport::new();
        transport
            .fail_next_download(TransportError::api("file is too big"))
            .await;

        assert!(transport.download("file-1", &dest).await.is_err());
        assert!(!dest.exists());
        assert!(transport.download("file-1", &dest).await.is_ok());
    }
}
