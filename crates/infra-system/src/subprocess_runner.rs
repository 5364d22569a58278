// Subprocess runner implementation
// reason: tokio::process for non-blocking stdio, nix for process-group signals
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, trace, warn};

use noteask_core::application::constants::{
    DEFAULT_INVOCATION_TIMEOUT, STATUS_LOG_INTERVAL, TERMINATION_GRACE,
};
use noteask_core::domain::{FailureKind, InvocationFailure, InvocationOutcome, InvocationSpec};
use noteask_core::port::{ProcessRunner, TimeProvider};

use crate::termination::{force_kill, terminate_gracefully};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Bytes received on one output stream, in arrival order
#[derive(Clone, Default)]
struct StreamBuffer(Arc<Mutex<Vec<u8>>>);

impl StreamBuffer {
    fn append(&self, chunk: &[u8]) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(chunk);
    }

    /// Decoded once at the end so chunk boundaries never split a character
    fn text(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Aborts helper tasks when an invocation finishes, on every path
struct TaskGuard(Vec<AbortHandle>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Subprocess runner
/// Spawns the child with an explicit environment and piped stdio
pub struct SubprocessRunner {
    time_provider: Arc<dyn TimeProvider>,
    default_timeout: Duration,
    termination_grace: Duration,
}

impl SubprocessRunner {
    /// Create a new subprocess runner
    ///
    /// # Arguments
    /// * `time_provider` - Time provider for duration tracking
    ///
    /// # Example
    /// ```ignore
    /// let runner = SubprocessRunner::new(Arc::new(SystemTimeProvider))
    ///     .with_default_timeout(Duration::from_secs(60));
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            time_provider,
            default_timeout: DEFAULT_INVOCATION_TIMEOUT,
            termination_grace: TERMINATION_GRACE,
        }
    }

    /// Bound applied when the caller passes no timeout
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    fn command(spec: &InvocationSpec) -> Command {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .env_clear()
            .envs(&spec.env)
            .current_dir(&spec.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so a timeout can signal helpers the child started
        #[cfg(unix)]
        command.process_group(0);

        command
    }

    /// Internal run method (extracted for function length compliance)
    async fn run_internal(&self, spec: &InvocationSpec, timeout: Duration) -> InvocationOutcome {
        let started_at = self.time_provider.now_millis();

        info!(
            program = %spec.program.display(),
            args = ?spec.args,
            working_dir = %spec.working_dir.display(),
            payload_len = spec.stdin_payload.len(),
            timeout_ms = timeout.as_millis() as u64,
            "Starting subprocess"
        );

        let mut child = match Self::command(spec).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(program = %spec.program.display(), error = %e, "Failed to spawn process");
                return InvocationOutcome::Failure(InvocationFailure::without_output(
                    FailureKind::SpawnError,
                    e.to_string(),
                ));
            }
        };
        let pid = child.id();
        debug!(pid = ?pid, "Process spawned");

        let (Some(stdin), Some(stdout), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            warn!(pid = ?pid, "Child stdio pipe unavailable, killing process");
            force_kill(&mut child).await;
            return InvocationOutcome::Failure(InvocationFailure::without_output(
                FailureKind::StreamUnavailable,
                "failed to open child stdio pipes",
            ));
        };

        let stdout_buf = StreamBuffer::default();
        let stderr_buf = StreamBuffer::default();
        let mut stdout_task = read_stream(stdout, stdout_buf.clone(), "stdout");
        let mut stderr_task = read_stream(stderr, stderr_buf.clone(), "stderr");
        let writer_task = write_payload(stdin, spec.stdin_payload.clone().into_bytes());
        let heartbeat_task = spawn_heartbeat(pid, self.time_provider.clone(), started_at);

        let _guard = TaskGuard(vec![
            stdout_task.abort_handle(),
            stderr_task.abort_handle(),
            writer_task.abort_handle(),
            heartbeat_task.abort_handle(),
        ]);

        // Done = exit status collected AND both output pipes closed
        let completed = tokio::time::timeout(timeout, async {
            let status = child.wait().await;
            let _ = (&mut stdout_task).await;
            let _ = (&mut stderr_task).await;
            status
        })
        .await;

        let outcome = match completed {
            Ok(Ok(status)) => classify(status, &stdout_buf, &stderr_buf),
            Ok(Err(e)) => {
                warn!(pid = ?pid, error = %e, "Failed to wait for process");
                InvocationOutcome::Failure(InvocationFailure {
                    kind: FailureKind::ProcessExitedNonZero,
                    message: format!("failed to wait for process: {}", e),
                    partial_stdout: stdout_buf.text(),
                    partial_stderr: stderr_buf.text(),
                    exit_code: None,
                })
            }
            Err(_) => {
                warn!(pid = ?pid, timeout_ms = timeout.as_millis() as u64, "Process timed out");
                terminate_gracefully(&mut child, pid, self.termination_grace).await;
                InvocationOutcome::Failure(InvocationFailure {
                    kind: FailureKind::Timeout,
                    message: format!("process did not complete within {}ms", timeout.as_millis()),
                    partial_stdout: stdout_buf.text(),
                    partial_stderr: stderr_buf.text(),
                    exit_code: None,
                })
            }
        };

        let duration_ms = self.time_provider.elapsed_millis(started_at);
        info!(
            program = %spec.program.display(),
            duration_ms = %duration_ms,
            success = outcome.is_success(),
            failure = ?outcome.failure_kind(),
            "Subprocess finished"
        );

        outcome
    }
}

/// Build the outcome from the exit status and accumulated output
fn classify(
    status: ExitStatus,
    stdout: &StreamBuffer,
    stderr: &StreamBuffer,
) -> InvocationOutcome {
    if status.success() {
        return InvocationOutcome::success(&stdout.text());
    }

    let stderr_text = stderr.text();
    let message = if stderr_text.is_empty() {
        format!("process exited with {}", status)
    } else {
        stderr_text.clone()
    };

    InvocationOutcome::Failure(InvocationFailure {
        kind: FailureKind::ProcessExitedNonZero,
        message,
        partial_stdout: stdout.text(),
        partial_stderr: stderr_text,
        // None when killed by a signal
        exit_code: status.code(),
    })
}

/// Drain one output stream into `buffer` until EOF
fn read_stream<R>(mut stream: R, buffer: StreamBuffer, label: &'static str) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];
        loop {
            match stream.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    buffer.append(&chunk[..n]);
                    trace!(stream = label, bytes = n, "Output chunk received");
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(stream = label, error = %e, "Output stream read failed");
                    break;
                }
            }
        }
    })
}

/// Write the whole payload, then close stdin (end-of-input).
/// Runs concurrently with the readers so a full pipe never deadlocks.
fn write_payload(mut stdin: ChildStdin, payload: Vec<u8>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match stdin.write_all(&payload).await {
            Ok(()) => debug!(bytes = payload.len(), "Payload written to stdin"),
            // Child exited or closed stdin without reading everything
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!("Child closed stdin before the payload was fully written")
            }
            Err(e) => warn!(error = %e, "Failed to write payload to stdin"),
        }
        drop(stdin);
    })
}

/// Diagnostic only: periodic "still running" line
fn spawn_heartbeat(
    pid: Option<u32>,
    time_provider: Arc<dyn TimeProvider>,
    started_at: i64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(STATUS_LOG_INTERVAL);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            debug!(
                pid = ?pid,
                elapsed_ms = time_provider.elapsed_millis(started_at),
                "Process still running"
            );
        }
    })
}

#[async_trait]
impl ProcessRunner for SubprocessRunner {
    async fn run(&self, spec: &InvocationSpec, timeout: Option<Duration>) -> InvocationOutcome {
        self.run_internal(spec, timeout.unwrap_or(self.default_timeout))
            .await
    }
}
