//! The intake controller.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::metrics::{CLIPS_RECEIVED, MERGES_TOTAL, RESETS_TOTAL};
use crate::pipeline::{MergePipeline, MIN_CLIPS};
use crate::runner::CommandRunner;
use crate::scratch::ScratchFile;
use crate::session::{ClipRef, DrainOutcome, SessionStore, UserId};
use crate::telegram::{Transport, TransportError};

const START_TEXT: &str = "Send me video clips one at a time, then /merge to stitch them into a \
                          single watermarked video. /reset discards your pending clips.";

const MERGE_FAILED_TEXT: &str = "Something went wrong while merging your clips. Your pending \
                                 clips were discarded, please send them again.";

/// Drives session state and the merge pipeline from transport events.
///
/// Every handler produces exactly one reply to the originating user and
/// swallows its own failures (logging them), so the caller's polling loop
/// never dies because of one bad event. Handlers for different users run
/// concurrently; the session store serializes same-user state access.
pub struct IntakeController<R, T> {
    store: Arc<SessionStore>,
    pipeline: MergePipeline<R>,
    transport: Arc<T>,
    clip_dir: PathBuf,
}

impl<R: CommandRunner, T: Transport> IntakeController<R, T> {
    /// Creates a new controller. Clips are downloaded into the pipeline's
    /// work directory.
    pub fn new(store: Arc<SessionStore>, pipeline: MergePipeline<R>, transport: Arc<T>) -> Self {
        let clip_dir = pipeline.work_dir().to_path_buf();
        Self {
            store,
            pipeline,
            transport,
            clip_dir,
        }
    }

    /// Greets a user who issued `/start`.
    pub async fn handle_start(&self, user: UserId) {
        self.send_text(user, START_TEXT).await;
    }

    /// Hints a user who sent something that is neither a clip nor a command.
    pub async fn handle_unknown(&self, user: UserId) {
        self.send_text(user, START_TEXT).await;
    }

    /// Saves an incoming clip into the user's session.
    pub async fn handle_clip(&self, user: UserId, file_id: &str) {
        match self.save_clip(user, file_id).await {
            Ok(pending) => {
                info!(%user, pending, "clip saved");
                self.send_text(
                    user,
                    &format!("Clip saved, {} pending. Send /merge when you are done.", pending),
                )
                .await;
            }
            Err(e) => {
                warn!(%user, error = %e, "failed to save incoming clip");
                self.send_text(user, "Could not save that clip, please send it again.")
                    .await;
            }
        }
    }

    async fn save_clip(&self, user: UserId, file_id: &str) -> Result<usize, TransportError> {
        tokio::fs::create_dir_all(&self.clip_dir).await?;
        let file = ScratchFile::allocate(&self.clip_dir, "clip", "mp4");
        self.transport.download(file_id, file.path()).await?;
        CLIPS_RECEIVED.inc();
        Ok(self.store.append(ClipRef::new(user, file)).await)
    }

    /// Merges the user's pending clips and replies with the result.
    pub async fn handle_merge(&self, user: UserId) {
        let clips = match self.store.drain_ready(user, MIN_CLIPS).await {
            DrainOutcome::Drained(clips) => clips,
            DrainOutcome::TooFew(have) => {
                MERGES_TOTAL.with_label_values(&["too_few"]).inc();
                self.send_text(
                    user,
                    &format!("Need at least {} clips to merge, you have {}.", MIN_CLIPS, have),
                )
                .await;
                return;
            }
        };

        let count = clips.len();
        info!(%user, count, "starting merge");

        match self.pipeline.run(clips).await {
            Ok(output) => {
                info!(%user, "merge finished");
                if let Err(e) = self
                    .transport
                    .reply_video(user, output.path(), "Here is your stitched video!")
                    .await
                {
                    warn!(%user, error = %e, "failed to deliver merged video");
                    self.send_text(
                        user,
                        "Your clips were merged but the video could not be delivered, \
                         please send them again.",
                    )
                    .await;
                }
                // Dropping the output deletes the final artifact.
            }
            Err(e) => {
                // The generic reply goes to the user; the full diagnostic
                // stays in the operator log.
                error!(
                    %user,
                    stage = e.stage(),
                    error = %e,
                    diagnostic = e.diagnostic().unwrap_or(""),
                    "merge pipeline failed"
                );
                self.send_text(user, MERGE_FAILED_TEXT).await;
            }
        }
    }

    /// Discards the user's pending clips.
    pub async fn handle_reset(&self, user: UserId) {
        let removed = self.store.discard(user).await;
        let count = removed.len();
        // Dropping the clips deletes the files.
        drop(removed);
        RESETS_TOTAL.inc();

        if count == 0 {
            self.send_text(user, "Nothing to discard.").await;
        } else {
            info!(%user, count, "session discarded");
            self.send_text(user, &format!("Discarded {} pending clips.", count))
                .await;
        }
    }

    async fn send_text(&self, user: UserId, text: &str) {
        if let Err(e) = self.transport.reply_text(user, text).await {
            warn!(%user, error = %e, "failed to send reply");
        }
    }
}
