//! ProcessRunner behaviour with real child processes

#![cfg(unix)]

mod common;

use std::time::{Duration, Instant};

use common::{runner, spec, wait_until_gone, write_stub};
use noteask_core::domain::{FailureKind, InvocationOutcome};
use noteask_core::port::ProcessRunner;

async fn echo(payload: &str) -> InvocationOutcome {
    let spec = spec("/bin/cat").stdin_payload(payload);
    runner().run(&spec, Some(Duration::from_secs(30))).await
}

#[tokio::test]
async fn test_echo_round_trip_empty() {
    assert_eq!(echo("").await, InvocationOutcome::success(""));
}

#[tokio::test]
async fn test_echo_round_trip_multi_kilobyte() {
    let payload: String = (0..2_000).map(|i| format!("line {}\n", i)).collect();

    let outcome = echo(&payload).await;

    assert_eq!(
        outcome,
        InvocationOutcome::Success {
            stdout: payload.trim().to_string()
        }
    );
}

#[tokio::test]
async fn test_echo_round_trip_non_ascii() {
    let payload = "  # ノート\n要約してください 🚀 — Ünïcödé\n\n";

    let outcome = echo(payload).await;

    assert_eq!(
        outcome,
        InvocationOutcome::Success {
            stdout: payload.trim().to_string()
        }
    );
}

#[tokio::test]
async fn test_large_payload_survives_backpressure() {
    // Far larger than any pipe buffer: stdin writes and stdout reads must overlap
    let payload = "0123456789abcdef".repeat(256 * 1024);

    let InvocationOutcome::Success { stdout } = echo(&payload).await else {
        panic!("expected success");
    };

    assert_eq!(stdout.len(), payload.len());
    assert_eq!(stdout, payload);
}

#[tokio::test]
async fn test_exit_status_three() {
    let dir = tempfile::tempdir().unwrap();
    let stub = write_stub(
        dir.path(),
        "fails",
        "cat > /dev/null\nprintf 'first line\\n' >&2\nprintf '  second line \\n' >&2\nexit 3",
    );

    let outcome = runner()
        .run(&spec(stub).stdin_payload("ignored"), None)
        .await;

    let InvocationOutcome::Failure(failure) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(failure.kind, FailureKind::ProcessExitedNonZero);
    assert_eq!(failure.exit_code, Some(3));
    assert_eq!(failure.partial_stderr, "first line\n  second line \n");
    assert_eq!(failure.message, failure.partial_stderr);
}

#[tokio::test]
async fn test_timeout_terminates_child() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("pid");
    let stub = write_stub(
        dir.path(),
        "hangs",
        &format!("echo $$ > {}\nexec sleep 30", pid_file.display()),
    );

    // Retry until a run records its pid before the 50ms bound
    let mut recorded = None;
    for _ in 0..10 {
        let _ = std::fs::remove_file(&pid_file);

        let start = Instant::now();
        let outcome = runner()
            .run(&spec(stub.clone()), Some(Duration::from_millis(50)))
            .await;
        let elapsed = start.elapsed();

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Timeout));
        // 50ms bound plus SIGTERM handling; well under the grace period
        assert!(elapsed < Duration::from_millis(1_000), "took {:?}", elapsed);

        recorded = std::fs::read_to_string(&pid_file)
            .ok()
            .and_then(|pid| pid.trim().parse::<i32>().ok());
        if recorded.is_some() {
            break;
        }
    }

    let pid = recorded.expect("stub never recorded its pid within the timeout");
    assert!(wait_until_gone(pid, Duration::from_secs(2)).await);
}

#[tokio::test]
async fn test_timeout_terminates_helper_processes() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("helper.pid");
    let stub = write_stub(
        dir.path(),
        "spawns-helper",
        &format!(
            "sleep 30 &\necho $! > {}\nprintf 'working'\nwait",
            pid_file.display()
        ),
    );

    let outcome = runner()
        .run(&spec(stub), Some(Duration::from_millis(500)))
        .await;

    let InvocationOutcome::Failure(failure) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(failure.kind, FailureKind::Timeout);
    assert_eq!(failure.partial_stdout, "working");

    let pid: i32 = std::fs::read_to_string(&pid_file)
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    assert!(wait_until_gone(pid, Duration::from_secs(3)).await);
}

#[tokio::test]
async fn test_missing_executable_is_spawn_error() {
    let dir = tempfile::tempdir().unwrap();

    let outcome = runner()
        .run(&spec(dir.path().join("nope")), None)
        .await;

    let InvocationOutcome::Failure(failure) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(failure.kind, FailureKind::SpawnError);
    assert!(!failure.message.is_empty());
    assert!(failure.partial_stdout.is_empty());
}

#[tokio::test]
async fn test_concurrent_runs_are_independent() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            tokio::spawn(async move {
                let payload = format!("payload-{}", i).repeat(1_000);
                let outcome = echo(&payload).await;
                (payload, outcome)
            })
        })
        .collect();

    for handle in handles {
        let (payload, outcome) = handle.await.unwrap();
        assert_eq!(outcome, InvocationOutcome::Success { stdout: payload });
    }
}
