//! Stub executables for integration tests (Unix only)

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use noteask_core::application::{
    ExecutableCache, OrchestratorConfig, PathResolver, RequestOrchestrator,
};
use noteask_core::domain::InvocationSpec;
use noteask_core::port::time_provider::SystemTimeProvider;
use noteask_infra_system::{SubprocessLivenessChecker, SubprocessRunner, SystemExecutableLocator};

/// Write an executable `/bin/sh` script and return its path
pub fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    write_file(dir, name, &format!("#!/bin/sh\n{}\n", body), 0o755)
}

pub fn write_file(dir: &Path, name: &str, contents: &str, mode: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
    path
}

/// Spec for `program` with the test process's PATH
pub fn spec(program: impl Into<PathBuf>) -> InvocationSpec {
    let mut env = BTreeMap::new();
    if let Ok(path) = std::env::var("PATH") {
        env.insert("PATH".to_string(), path);
    }
    InvocationSpec::new(program).env(env)
}

pub fn runner() -> SubprocessRunner {
    SubprocessRunner::new(Arc::new(SystemTimeProvider))
}

pub fn resolver(search_path: &Path) -> PathResolver {
    PathResolver::new(
        Arc::new(SystemExecutableLocator::with_search_path(search_path.as_os_str())),
        Arc::new(SubprocessLivenessChecker::new()),
        Duration::from_secs(5),
    )
}

/// Full request stack pointed at `stub` through a configured override
pub fn orchestrator(stub: &Path, config: OrchestratorConfig) -> RequestOrchestrator {
    let executables = Arc::new(ExecutableCache::new(
        resolver(stub.parent().unwrap()),
        ["never-used"].into_iter().collect(),
        Some(stub.display().to_string()),
    ));
    RequestOrchestrator::new(Arc::new(runner()), executables, config)
}

/// Whether `pid` still refers to a live (non-zombie) process
pub fn is_running(pid: i32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    if kill(Pid::from_raw(pid), None).is_err() {
        return false;
    }
    #[cfg(target_os = "linux")]
    {
        if let Ok(stat) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            // Format: pid (comm) state ...
            if let Some(state) = stat.rsplit(')').next().and_then(|rest| rest.split_whitespace().next()) {
                return state != "Z" && state != "X";
            }
        }
    }
    true
}

/// Poll until `pid` is gone or `limit` elapses
pub async fn wait_until_gone(pid: i32, limit: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if !is_running(pid) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    !is_running(pid)
}
