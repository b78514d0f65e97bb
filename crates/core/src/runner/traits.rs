//! Trait definition for command runners.

use async_trait::async_trait;

use super::error::RunnerError;

/// Runs one external command to completion.
///
/// Implementations must not share mutable state between calls: concurrent
/// pipeline runs invoke the same runner without contention.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Returns the name of this runner implementation.
    fn name(&self) -> &str;

    /// Invokes the command with the given arguments and waits for it.
    ///
    /// Zero exit status maps to `Ok(())`; nonzero maps to
    /// [`RunnerError::CommandFailed`] carrying the captured stderr.
    async fn run(&self, args: &[String]) -> Result<(), RunnerError>;

    /// Validates that the runner is properly configured and ready.
    async fn validate(&self) -> Result<(), RunnerError>;
}
