// Request orchestration: document + question -> assistant response
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use super::constants::{
    DEFAULT_ASSISTANT_ARGS, DEFAULT_INVOCATION_TIMEOUT, LOG_PREVIEW_CHARS, PROMPT_SEPARATOR,
};
use super::executable_cache::ExecutableCache;
use crate::domain::{augment_search_path, InvocationSpec, PATH_VAR};
use crate::error::{AppError, Result};
use crate::port::ProcessRunner;

/// How requests are turned into invocations
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Arguments passed to the assistant executable
    pub args: Vec<String>,
    /// Directories prepended to the inherited search path
    pub search_dirs: Vec<PathBuf>,
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            args: DEFAULT_ASSISTANT_ARGS.iter().map(|s| s.to_string()).collect(),
            search_dirs: Vec::new(),
            working_dir: PathBuf::from("."),
            timeout: DEFAULT_INVOCATION_TIMEOUT,
        }
    }
}

/// Build the stdin payload: body, separator, question. Byte-exact, no escaping.
pub fn compose_payload(document_body: &str, question: &str) -> String {
    let mut payload =
        String::with_capacity(document_body.len() + PROMPT_SEPARATOR.len() + question.len());
    payload.push_str(document_body);
    payload.push_str(PROMPT_SEPARATOR);
    payload.push_str(question);
    payload
}

/// Parent environment with the search path extended (never replaced)
pub fn child_environment(
    inherited: impl IntoIterator<Item = (String, String)>,
    search_dirs: &[PathBuf],
) -> BTreeMap<String, String> {
    let mut env: BTreeMap<String, String> = inherited.into_iter().collect();
    let path = augment_search_path(env.get(PATH_VAR).map(String::as_str), search_dirs);
    env.insert(PATH_VAR.to_string(), path);
    env
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}

/// Sends a document and a question to the assistant executable
pub struct RequestOrchestrator {
    runner: Arc<dyn ProcessRunner>,
    executables: Arc<ExecutableCache>,
    config: OrchestratorConfig,
}

impl RequestOrchestrator {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        executables: Arc<ExecutableCache>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            runner,
            executables,
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Ask the assistant about `document_body`.
    ///
    /// Returns the trimmed response verbatim. Failures keep their kind,
    /// message, exit code and partial output.
    ///
    /// # Errors
    /// - AppError::NotFound if no executable is configured or discoverable
    /// - AppError::Invocation for spawn errors, non-zero exits and timeouts
    pub async fn ask(&self, document_body: &str, question: &str) -> Result<String> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("ask", request_id = %request_id);
        self.ask_inner(document_body, question).instrument(span).await
    }

    async fn ask_inner(&self, document_body: &str, question: &str) -> Result<String> {
        let executable = self.executables.current().await.ok_or_else(|| {
            AppError::NotFound(
                "no usable assistant executable; configure its path or install it".to_string(),
            )
        })?;

        info!(
            executable = %executable.path().display(),
            document_len = document_body.len(),
            question_len = question.len(),
            "Sending request"
        );
        debug!(document_preview = %preview(document_body), question = %question, "Request content");

        let spec = self.build_spec(executable.path(), compose_payload(document_body, question));

        let outcome = self.runner.run(&spec, Some(self.config.timeout)).await;
        match outcome.into_result() {
            Ok(stdout) => {
                let response = stdout.trim().to_string();
                info!(response_len = response.len(), "Request completed");
                debug!(response_preview = %preview(&response), "Response content");
                Ok(response)
            }
            Err(failure) => {
                warn!(
                    kind = %failure.kind,
                    exit_code = ?failure.exit_code,
                    message = %failure.message,
                    "Request failed"
                );
                Err(AppError::Invocation(failure))
            }
        }
    }

    fn build_spec(&self, program: &Path, payload: String) -> InvocationSpec {
        let inherited = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));

        InvocationSpec::new(program)
            .args(self.config.args.iter().cloned())
            .env(child_environment(inherited, &self.config.search_dirs))
            .working_dir(&self.config.working_dir)
            .stdin_payload(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::path_resolver::PathResolver;
    use crate::domain::{FailureKind, InvocationFailure, InvocationOutcome};
    use crate::port::executable_locator::mocks::MockExecutableLocator;
    use crate::port::liveness_checker::mocks::MockLivenessChecker;
    use crate::port::process_runner::MockProcessRunner;

    fn executables(alive: bool) -> Arc<ExecutableCache> {
        let locator = MockExecutableLocator::new().with_command("claude", "/usr/bin/claude");
        let alive: Vec<&str> = if alive { vec!["/usr/bin/claude"] } else { vec![] };
        let liveness = Arc::new(MockLivenessChecker::new(alive));
        let resolver = PathResolver::new(Arc::new(locator), liveness, Duration::from_millis(50));
        Arc::new(ExecutableCache::new(
            resolver,
            ["claude"].into_iter().collect(),
            None,
        ))
    }

    fn config() -> OrchestratorConfig {
        OrchestratorConfig {
            search_dirs: vec![PathBuf::from("/opt/tools/bin")],
            working_dir: PathBuf::from("/home/me"),
            timeout: Duration::from_secs(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_compose_payload() {
        assert_eq!(
            compose_payload("# My Note\nSome text.", "Summarize this"),
            "# My Note\nSome text.\n\n---------\n\nSummarize this"
        );
        assert_eq!(compose_payload("", "hi").len(), 15);
    }

    #[test]
    fn test_child_environment_extends_path() {
        let inherited = vec![
            ("PATH".to_string(), "/usr/bin".to_string()),
            ("HOME".to_string(), "/home/me".to_string()),
        ];
        let env = child_environment(inherited, &[PathBuf::from("/opt/tools/bin")]);

        if cfg!(unix) {
            assert_eq!(env["PATH"], "/opt/tools/bin:/usr/bin");
        }
        assert_eq!(env["HOME"], "/home/me");
    }

    #[tokio::test]
    async fn test_ask_builds_invocation() {
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|spec, timeout| {
                spec.program == PathBuf::from("/usr/bin/claude")
                    && spec.args == vec!["--verbose", "--print"]
                    && spec.working_dir == PathBuf::from("/home/me")
                    && spec.stdin_payload == "body\n\n---------\n\nquestion?"
                    && spec
                        .env
                        .get(PATH_VAR)
                        .is_some_and(|path| path.starts_with("/opt/tools/bin"))
                    && *timeout == Some(Duration::from_secs(7))
            })
            .times(1)
            .returning(|_, _| InvocationOutcome::success("  answer \n"));

        let orchestrator = RequestOrchestrator::new(Arc::new(runner), executables(true), config());
        let response = orchestrator.ask("body", "question?").await.unwrap();

        assert_eq!(response, "answer");
    }

    #[tokio::test]
    async fn test_ask_propagates_failure_detail() {
        let mut runner = MockProcessRunner::new();
        runner.expect_run().returning(|_, _| {
            InvocationOutcome::Failure(InvocationFailure {
                kind: FailureKind::ProcessExitedNonZero,
                message: "rate limited".to_string(),
                partial_stdout: "partial".to_string(),
                partial_stderr: "rate limited".to_string(),
                exit_code: Some(2),
            })
        });

        let orchestrator = RequestOrchestrator::new(Arc::new(runner), executables(true), config());
        let err = orchestrator.ask("body", "q").await.unwrap_err();

        let failure = err.invocation().unwrap();
        assert_eq!(failure.kind, FailureKind::ProcessExitedNonZero);
        assert_eq!(failure.exit_code, Some(2));
        assert_eq!(failure.partial_stdout, "partial");
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_ask_without_executable() {
        let mut runner = MockProcessRunner::new();
        runner.expect_run().never();

        let orchestrator = RequestOrchestrator::new(Arc::new(runner), executables(false), config());
        let err = orchestrator.ask("body", "q").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
