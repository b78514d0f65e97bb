//! Configuration for the merge pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for [`MergePipeline`](super::MergePipeline).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory for clips and intermediate artifacts.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,
}

fn default_work_dir() -> PathBuf {
    std::env::temp_dir().join("clipstitch")
}

fn default_log_level() -> String {
    "error".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            ffmpeg_log_level: default_log_level(),
        }
    }
}

impl PipelineConfig {
    /// Sets the work directory.
    pub fn with_work_dir(mut self, work_dir: PathBuf) -> Self {
        self.work_dir = work_dir;
        self
    }
}
