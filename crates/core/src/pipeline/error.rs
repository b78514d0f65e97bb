//! Error types for the merge pipeline.

use thiserror::Error;

use crate::runner::RunnerError;

/// Errors that can occur during a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fewer than two clips were supplied. No resources were created.
    #[error("need at least 2 clips to merge, got {have}")]
    NotEnoughClips { have: usize },

    /// The concat stage failed.
    #[error("concat stage failed: {source}")]
    ConcatFailed {
        #[source]
        source: RunnerError,
    },

    /// The watermark stage failed.
    #[error("watermark stage failed: {source}")]
    WatermarkFailed {
        #[source]
        source: RunnerError,
    },

    /// I/O error writing the manifest or preparing the work directory.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// The stage this error belongs to, for logs and metrics labels.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::NotEnoughClips { .. } => "precondition",
            Self::ConcatFailed { .. } => "concat",
            Self::WatermarkFailed { .. } => "watermark",
            Self::Io(_) => "io",
        }
    }

    /// Diagnostic output captured from the failed external command.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::ConcatFailed { source } | Self::WatermarkFailed { source } => {
                source.diagnostic()
            }
            _ => None,
        }
    }
}
