// Child termination helpers shared by the runner and the liveness probe
use std::time::Duration;
use tokio::process::Child;
use tracing::{debug, info, warn};

/// Stop a child and reap it.
///
/// Unix: SIGTERM to the child's process group, wait up to `grace`, then
/// SIGKILL whatever is left in the group. Other platforms: hard kill.
///
/// `pid` is the id captured at spawn: once the child itself has been reaped
/// `Child::id` is gone, but helpers may still hold its group.
pub(crate) async fn terminate_gracefully(child: &mut Child, pid: Option<u32>, grace: Duration) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = pid {
            let pgid = Pid::from_raw(pid as i32);

            // Step 1: SIGTERM for graceful shutdown
            info!(pid = %pid, "Sending SIGTERM to process group");
            if let Err(e) = killpg(pgid, Signal::SIGTERM) {
                warn!(pid = %pid, error = %e, "SIGTERM failed");
            }

            // Step 2: wait for exit, bounded by the grace period
            match tokio::time::timeout(grace, child.wait()).await {
                Ok(_) => {
                    info!(pid = %pid, "Process exited after SIGTERM");
                    // Leader reaped: the id stays a group id only while members remain
                    if killpg(pgid, None).is_ok() {
                        warn!(pid = %pid, "Helpers survived SIGTERM, sending SIGKILL");
                        let _ = killpg(pgid, Signal::SIGKILL);
                    }
                }
                Err(_) => {
                    warn!(pid = %pid, "Process did not exit after SIGTERM, sending SIGKILL");
                    // Leader not reaped yet, so the group id cannot have been reused
                    let _ = killpg(pgid, Signal::SIGKILL);
                }
            }
        }
    }

    #[cfg(not(unix))]
    let _ = (pid, grace);

    force_kill(child).await;
}

/// SIGKILL the child's whole process group, then reap the child.
///
/// Call only while the child is still unreaped.
pub(crate) async fn kill_process_group(child: &mut Child, pid: Option<u32>) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = pid {
            if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                debug!(pid = %pid, error = %e, "Group kill skipped");
            }
        }
    }

    #[cfg(not(unix))]
    let _ = pid;

    force_kill(child).await;
}

/// Kill a child immediately and reap it
pub(crate) async fn force_kill(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        // Already exited
        debug!(error = %e, "Kill skipped");
    }
    if let Err(e) = child.wait().await {
        warn!(error = %e, "Failed to reap child process");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Stdio;
    use std::time::Instant;
    use tokio::process::Command;

    fn spawn_group(script: &str) -> Child {
        let mut command = Command::new("/bin/sh");
        command
            .arg("-c")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .kill_on_drop(true);
        command.spawn().unwrap()
    }

    async fn read_pid(path: &Path) -> i32 {
        for _ in 0..100 {
            if let Ok(text) = std::fs::read_to_string(path) {
                if let Ok(pid) = text.trim().parse() {
                    return pid;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("pid file {} never written", path.display());
    }

    fn is_running(pid: i32) -> bool {
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        if kill(Pid::from_raw(pid), None).is_err() {
            return false;
        }
        // Zombies waiting for init still answer signal 0
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Ok(stat) => stat
                .rsplit(')')
                .next()
                .and_then(|rest| rest.split_whitespace().next())
                .map_or(true, |state| state != "Z" && state != "X"),
            Err(_) => !cfg!(target_os = "linux"),
        }
    }

    async fn gone_within(pid: i32, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if !is_running(pid) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        !is_running(pid)
    }

    #[tokio::test]
    async fn test_sigterm_stops_cooperative_child() {
        let mut child = spawn_group("exec sleep 30");
        let pid = child.id();

        let start = Instant::now();
        terminate_gracefully(&mut child, pid, Duration::from_secs(5)).await;

        // Exited on SIGTERM, well before the grace period ran out
        assert!(start.elapsed() < Duration::from_secs(2));
        assert!(child.try_wait().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_helper_ignoring_sigterm_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("helper.pid");
        let script = format!(
            "sh -c 'trap \"\" TERM; echo $$ > {}; exec sleep 30' &\nwait",
            pid_file.display()
        );
        let mut child = spawn_group(&script);
        let pid = child.id();
        let helper = read_pid(&pid_file).await;

        terminate_gracefully(&mut child, pid, Duration::from_millis(500)).await;

        assert!(gone_within(helper, Duration::from_secs(3)).await);
    }

    #[tokio::test]
    async fn test_kill_process_group_reaches_background_helper() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("helper.pid");
        let script = format!("sleep 30 &\necho $! > {}\nwait", pid_file.display());
        let mut child = spawn_group(&script);
        let pid = child.id();
        let helper = read_pid(&pid_file).await;

        kill_process_group(&mut child, pid).await;

        assert!(child.try_wait().unwrap().is_some());
        assert!(gone_within(helper, Duration::from_secs(3)).await);
    }
}
