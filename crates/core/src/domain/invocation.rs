// Invocation request / outcome types for one child process run

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Everything needed to run one child process. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Complete child environment (the parent's is NOT inherited implicitly)
    pub env: BTreeMap<String, String>,
    pub working_dir: PathBuf,
    /// Delivered in full on stdin, followed by end-of-input
    pub stdin_payload: String,
}

impl InvocationSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            working_dir: PathBuf::from("."),
            stdin_payload: String::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn stdin_payload(mut self, payload: impl Into<String>) -> Self {
        self.stdin_payload = payload.into();
        self
    }
}

/// Failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The OS could not start the child
    SpawnError,
    /// The child ran and reported failure (or was killed by a signal)
    ProcessExitedNonZero,
    /// The child did not finish within the bound and was terminated
    Timeout,
    /// A stdio pipe could not be obtained after spawn
    StreamUnavailable,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::SpawnError => "spawn error",
            FailureKind::ProcessExitedNonZero => "process exited non-zero",
            FailureKind::Timeout => "timeout",
            FailureKind::StreamUnavailable => "stream unavailable",
        };
        f.write_str(label)
    }
}

/// Failed invocation with whatever output was captured before the end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationFailure {
    pub kind: FailureKind,
    pub message: String,
    pub partial_stdout: String,
    pub partial_stderr: String,
    pub exit_code: Option<i32>,
}

impl InvocationFailure {
    /// Failure before any output could exist (spawn / stream errors)
    pub fn without_output(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            partial_stdout: String::new(),
            partial_stderr: String::new(),
            exit_code: None,
        }
    }
}

impl fmt::Display for InvocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "{} (exit code {}): {}", self.kind, code, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for InvocationFailure {}

/// Final result of one run. Produced exactly once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Success { stdout: String },
    Failure(InvocationFailure),
}

impl InvocationOutcome {
    /// Successful outcome; stdout is trimmed of surrounding whitespace
    pub fn success(stdout: &str) -> Self {
        InvocationOutcome::Success {
            stdout: stdout.trim().to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            InvocationOutcome::Success { .. } => None,
            InvocationOutcome::Failure(failure) => Some(failure.kind),
        }
    }

    pub fn into_result(self) -> Result<String, InvocationFailure> {
        match self {
            InvocationOutcome::Success { stdout } => Ok(stdout),
            InvocationOutcome::Failure(failure) => Err(failure),
        }
    }
}
