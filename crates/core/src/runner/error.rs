//! Error types for command invocation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// FFmpeg binary not found.
    #[error("ffmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// The command ran and exited with a nonzero status.
    #[error("command exited with status {status:?}")]
    CommandFailed {
        status: Option<i32>,
        stderr: String,
    },

    /// The command exceeded the configured timeout and was killed.
    #[error("command timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while spawning or reaping the command.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunnerError {
    /// Creates a command-failed error from an exit code and captured stderr.
    pub fn command_failed(status: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            status,
            stderr: stderr.into(),
        }
    }

    /// Captured diagnostic output, when the command produced any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}
