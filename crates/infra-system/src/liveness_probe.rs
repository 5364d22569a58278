// Liveness checker implementation
// reason: a file that exists may still be non-executable or have a broken shebang
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use noteask_core::application::constants::LIVENESS_ARG;
use noteask_core::port::{Liveness, LivenessChecker};

use crate::termination::kill_process_group;

/// Runs `<candidate> --version` and checks for exit status 0
#[derive(Debug, Default)]
pub struct SubprocessLivenessChecker;

impl SubprocessLivenessChecker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LivenessChecker for SubprocessLivenessChecker {
    async fn check(&self, path: &Path, timeout: Duration) -> Liveness {
        let mut command = Command::new(path);
        command
            .arg(LIVENESS_ARG)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // Own group so a timeout also reaches anything a wrapper script started
        #[cfg(unix)]
        command.process_group(0);

        let spawned = command.spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Liveness probe could not start");
                return Liveness::Dead(format!("spawn failed: {}", e));
            }
        };

        let pid = child.id();
        let waited = tokio::time::timeout(timeout, child.wait()).await;
        let verdict = match waited {
            Ok(Ok(status)) if status.success() => Liveness::Alive,
            Ok(Ok(status)) => Liveness::Dead(format!("exited with {}", status)),
            Ok(Err(e)) => Liveness::Dead(format!("wait failed: {}", e)),
            Err(_) => {
                kill_process_group(&mut child, pid).await;
                Liveness::Dead(format!("timed out after {}ms", timeout.as_millis()))
            }
        };

        debug!(path = %path.display(), verdict = ?verdict, "Liveness probe finished");
        verdict
    }
}
