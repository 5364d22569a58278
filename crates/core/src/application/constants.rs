// Shared constants (no magic values in services)
use std::time::Duration;

/// Bound on a single `--version` liveness probe (5s)
pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Verification argument passed to candidates during liveness probes
pub const LIVENESS_ARG: &str = "--version";

/// Default bound on one request to the assistant executable (5 minutes)
pub const DEFAULT_INVOCATION_TIMEOUT: Duration = Duration::from_secs(300);

/// Grace period between SIGTERM and SIGKILL when a child must be stopped (1s)
pub const TERMINATION_GRACE: Duration = Duration::from_secs(1);

/// Interval of the diagnostic "still running" log line (5s)
pub const STATUS_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// Separator placed between the document body and the question
pub const PROMPT_SEPARATOR: &str = "\n\n---------\n\n";

/// Non-interactive, verbose, print-only mode of the assistant executable
pub const DEFAULT_ASSISTANT_ARGS: [&str; 2] = ["--verbose", "--print"];

/// Max characters of document / response text echoed into debug logs
pub const LOG_PREVIEW_CHARS: usize = 200;
