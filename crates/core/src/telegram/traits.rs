//! Trait definition for the outbound transport.

use async_trait::async_trait;
use std::path::Path;

use crate::session::UserId;

use super::error::TransportError;

/// Outbound side of the messaging transport.
///
/// The intake controller only ever replies to the originating user and
/// fetches the file behind an incoming clip; everything else about the
/// transport (polling, retries, delivery guarantees) stays outside the core.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a text reply to the user.
    async fn reply_text(&self, user: UserId, text: &str) -> Result<(), TransportError>;

    /// Sends a video reply to the user, uploading the file at `video`.
    async fn reply_video(
        &self,
        user: UserId,
        video: &Path,
        caption: &str,
    ) -> Result<(), TransportError>;

    /// Downloads the transport file `file_id` to `dest`.
    async fn download(&self, file_id: &str, dest: &Path) -> Result<(), TransportError>;
}
