//! Mock command runner for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::runner::{CommandRunner, RunnerError};

/// Mock implementation of the [`CommandRunner`] trait.
///
/// Provides controllable behavior for testing:
/// - Records every invocation's argument vector for assertions
/// - Captures concat manifests before the pipeline deletes them
/// - Simulates ffmpeg creating its output file (the final argument)
/// - Injectable failures for specific invocations
#[derive(Debug, Default)]
pub struct MockRunner {
    invocations: Arc<RwLock<Vec<Vec<String>>>>,
    manifests: Arc<RwLock<Vec<String>>>,
    /// Errors keyed by 0-based invocation index.
    errors: Arc<RwLock<HashMap<usize, RunnerError>>>,
}

impl MockRunner {
    /// Create a new mock runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded argument vectors, in invocation order.
    pub async fn recorded_invocations(&self) -> Vec<Vec<String>> {
        self.invocations.read().await.clone()
    }

    /// Number of invocations performed.
    pub async fn invocation_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    /// Contents of every concat manifest read at invocation time.
    pub async fn recorded_manifests(&self) -> Vec<String> {
        self.manifests.read().await.clone()
    }

    /// Configure the invocation at `index` (0-based) to fail.
    pub async fn fail_call(&self, index: usize, error: RunnerError) {
        self.errors.write().await.insert(index, error);
    }

    /// Configure the next invocation to fail.
    pub async fn set_next_error(&self, error: RunnerError) {
        let index = self.invocations.read().await.len();
        self.errors.write().await.insert(index, error);
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, args: &[String]) -> Result<(), RunnerError> {
        let index = {
            let mut invocations = self.invocations.write().await;
            invocations.push(args.to_vec());
            invocations.len() - 1
        };

        // Snapshot the manifest now; the pipeline deletes it on exit.
        if args.iter().any(|a| a == "concat") {
            if let Some(pos) = args.iter().position(|a| a == "-i") {
                if let Some(path) = args.get(pos + 1) {
                    if let Ok(body) = tokio::fs::read_to_string(path).await {
                        self.manifests.write().await.push(body);
                    }
                }
            }
        }

        if let Some(error) = self.errors.write().await.remove(&index) {
            return Err(error);
        }

        // Simulate ffmpeg writing its output file.
        if let Some(output) = args.last() {
            tokio::fs::write(output, b"mock output").await?;
        }

        Ok(())
    }

    async fn validate(&self) -> Result<(), RunnerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_records_invocations_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let out_a = dir.path().join("a.mp4");
        let out_b = dir.path().join("b.mp4");
        let runner = MockRunner::new();

        runner
            .run(&args(&["-y", out_a.to_str().unwrap()]))
            .await
            .unwrap();
        runner
            .run(&args(&["-y", out_b.to_str().unwrap()]))
            .await
            .unwrap();

        let recorded = runner.recorded_invocations().await;
        assert_eq!(recorded.len(), 2);
        assert!(recorded[0][1].ends_with("a.mp4"));
        assert!(out_a.exists());
        assert!(out_b.exists());
    }

    #[tokio::test]
    async fn test_injected_error_consumed_once() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.mp4");
        let runner = MockRunner::new();
        runner
            .set_next_error(RunnerError::command_failed(Some(1), "boom"))
            .await;

        let err = runner.run(&args(&[out.to_str().unwrap()])).await;
        assert!(err.is_err());
        assert!(!out.exists());

        runner.run(&args(&[out.to_str().unwrap()])).await.unwrap();
        assert!(out.exists());
    }

    #[tokio::test]
    async fn test_captures_concat_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("list.txt");
        std::fs::write(&manifest, "file '/tmp/a.mp4'\n").unwrap();
        let out = dir.path().join("merged.mp4");
        let runner = MockRunner::new();

        runner
            .run(&args(&[
                "-y",
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                manifest.to_str().unwrap(),
                "-c",
                "copy",
                out.to_str().unwrap(),
            ]))
            .await
            .unwrap();

        let manifests = runner.recorded_manifests().await;
        assert_eq!(manifests, vec!["file '/tmp/a.mp4'\n"]);
    }
}
