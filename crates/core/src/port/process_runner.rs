// Process Runner Port
// Abstraction for running one child process with a stdin payload

use crate::domain::{InvocationOutcome, InvocationSpec};
use async_trait::async_trait;
use std::time::Duration;

/// Process Runner trait
///
/// Implementations:
/// - SubprocessRunner (infra-system): tokio child process with piped stdio
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `spec` to completion and classify the result.
    ///
    /// Never returns early with an error: spawn problems, non-zero exits and
    /// timeouts are all reported through `InvocationOutcome::Failure`.
    ///
    /// # Arguments
    /// * `spec` - Program, args, environment, working dir and stdin payload
    /// * `timeout` - Upper bound on the run; `None` applies the runner's default
    async fn run(&self, spec: &InvocationSpec, timeout: Option<Duration>) -> InvocationOutcome;
}
