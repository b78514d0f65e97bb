//! FFmpeg-based command runner.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::RunnerConfig;
use super::error::RunnerError;
use super::traits::CommandRunner;

/// Upper bound on the stderr kept for diagnostics.
const STDERR_TAIL_BYTES: usize = 4096;

/// Runs ffmpeg invocations as child processes.
pub struct FfmpegRunner {
    config: RunnerConfig,
}

impl FfmpegRunner {
    /// Creates a new runner with the given configuration.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Creates a runner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RunnerConfig::default())
    }

    fn stderr_tail(stderr: &str) -> String {
        if stderr.len() <= STDERR_TAIL_BYTES {
            return stderr.trim_end().to_string();
        }
        let cut = stderr.len() - STDERR_TAIL_BYTES;
        // Cut on a char boundary.
        let start = stderr
            .char_indices()
            .map(|(i, _)| i)
            .find(|&i| i >= cut)
            .unwrap_or(cut);
        stderr[start..].trim_end().to_string()
    }
}

#[async_trait]
impl CommandRunner for FfmpegRunner {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn run(&self, args: &[String]) -> Result<(), RunnerError> {
        debug!(ffmpeg = %self.config.ffmpeg_path.display(), ?args, "spawning ffmpeg");

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RunnerError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    RunnerError::Io(e)
                }
            })?;

        let stderr = child.stderr.take().expect("stderr should be captured");

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut diagnostics = String::new();
            let mut reader = BufReader::new(stderr);
            reader.read_to_string(&mut diagnostics).await?;
            let status = child.wait().await?;
            Ok::<(std::process::ExitStatus, String), std::io::Error>((status, diagnostics))
        })
        .await;

        match result {
            Ok(Ok((status, diagnostics))) => {
                if status.success() {
                    Ok(())
                } else {
                    Err(RunnerError::command_failed(
                        status.code(),
                        Self::stderr_tail(&diagnostics),
                    ))
                }
            }
            Ok(Err(e)) => Err(RunnerError::Io(e)),
            Err(_) => {
                // Kill and reap the child so it is never left running.
                let _ = child.kill().await;
                Err(RunnerError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        }
    }

    async fn validate(&self) -> Result<(), RunnerError> {
        let result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => Err(RunnerError::command_failed(
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).into_owned(),
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RunnerError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                })
            }
            Err(e) => Err(RunnerError::Io(e)),
        }
    }
}
