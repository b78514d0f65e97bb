//! The two-stage merge pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::metrics::{MERGES_TOTAL, MERGE_DURATION, STAGE_DURATION};
use crate::runner::CommandRunner;
use crate::scratch::ScratchFile;
use crate::session::ClipRef;

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::watermark::{drawtext_filter, WatermarkSpec};

/// Minimum number of clips a merge needs.
pub const MIN_CLIPS: usize = 2;

/// Builds the concat manifest: one `file '<absolute-path>'` line per clip,
/// in sequence order, with single quotes in paths escaped for the concat
/// demuxer.
pub fn concat_manifest(clips: &[ClipRef]) -> String {
    let mut manifest = String::new();
    for clip in clips {
        let path = clip.path().to_string_lossy().replace('\'', "'\\''");
        manifest.push_str("file '");
        manifest.push_str(&path);
        manifest.push_str("'\n");
    }
    manifest
}

/// Turns one user's ordered clips into a single watermarked video.
///
/// Every run owns its inputs: the clips handed to [`run`](Self::run) and
/// every intermediate artifact are deleted on every exit path. Artifact
/// names embed a UUID, so concurrent runs for different users never collide
/// in the shared work directory.
pub struct MergePipeline<R> {
    config: PipelineConfig,
    runner: Arc<R>,
    watermark: WatermarkSpec,
}

impl<R: CommandRunner> MergePipeline<R> {
    /// Creates a new pipeline.
    pub fn new(config: PipelineConfig, runner: Arc<R>, watermark: WatermarkSpec) -> Self {
        Self {
            config,
            runner,
            watermark,
        }
    }

    /// The directory clips and artifacts live in.
    pub fn work_dir(&self) -> &Path {
        &self.config.work_dir
    }

    /// Runs concat then watermark over `clips`, returning the final output.
    ///
    /// With fewer than [`MIN_CLIPS`] inputs this is a caller error, reported
    /// before any file is written or process spawned.
    pub async fn run(&self, clips: Vec<ClipRef>) -> Result<ScratchFile, PipelineError> {
        if clips.len() < MIN_CLIPS {
            return Err(PipelineError::NotEnoughClips { have: clips.len() });
        }

        let started = Instant::now();
        let result = self.run_stages(&clips).await;
        // The run owns its inputs: dropping them deletes the clip files,
        // success or failure.
        drop(clips);

        let label = match &result {
            Ok(_) => "success",
            Err(e) => e.stage(),
        };
        MERGES_TOTAL.with_label_values(&[label]).inc();
        MERGE_DURATION
            .with_label_values(&[label])
            .observe(started.elapsed().as_secs_f64());

        result
    }

    async fn run_stages(&self, clips: &[ClipRef]) -> Result<ScratchFile, PipelineError> {
        tokio::fs::create_dir_all(&self.config.work_dir).await?;

        // Stage 1: concat with stream copy.
        let manifest = ScratchFile::allocate(&self.config.work_dir, "concat", "txt");
        let merged = ScratchFile::allocate(&self.config.work_dir, "merged", "mp4");
        tokio::fs::write(manifest.path(), concat_manifest(clips)).await?;

        let stage = Instant::now();
        let args = self.concat_args(manifest.path(), merged.path());
        debug!(clips = clips.len(), "running concat stage");
        self.runner
            .run(&args)
            .await
            .map_err(|source| PipelineError::ConcatFailed { source })?;
        STAGE_DURATION
            .with_label_values(&["concat"])
            .observe(stage.elapsed().as_secs_f64());

        // Stage 2: watermark overlay.
        let output = ScratchFile::allocate(&self.config.work_dir, "stitched", "mp4");

        let stage = Instant::now();
        let args = self.watermark_args(merged.path(), output.path());
        debug!("running watermark stage");
        self.runner
            .run(&args)
            .await
            .map_err(|source| PipelineError::WatermarkFailed { source })?;
        STAGE_DURATION
            .with_label_values(&["watermark"])
            .observe(stage.elapsed().as_secs_f64());

        // Manifest and merged intermediate are dropped (deleted) here; only
        // the final output leaves the scope.
        Ok(output)
    }

    fn concat_args(&self, manifest: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            manifest.to_string_lossy().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    fn watermark_args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-vf".to_string(),
            drawtext_filter(&self.watermark),
            "-codec:a".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }
}
