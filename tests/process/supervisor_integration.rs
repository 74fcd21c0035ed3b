//! Integration tests for the process supervisor (Unix only).
//!
//! Tests cover:
//! - Natural exit and exit-code reporting
//! - Forced termination of a child that ignores the cooperative signal
//! - Observer callbacks and stop idempotence

#![cfg(all(test, unix))]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sqlmapctl::command::{ArgumentVector, CommandBuilder, Environment};
use sqlmapctl::config::SupervisorTiming;
use sqlmapctl::process::{LineObserver, ManagedProcess, Stream};
use sqlmapctl::state::OptionMap;

/// What: Argument vector running exactly `program`.
fn argv(program: &[&str]) -> ArgumentVector {
    let env = Environment::with_program(program.iter().copied());
    CommandBuilder::new(&env).build(&OptionMap::new(), false)
}

/// What: Short timings so tests stay fast.
fn timing(grace_ms: u64) -> SupervisorTiming {
    SupervisorTiming {
        grace: Duration::from_millis(grace_ms),
        settle: Duration::from_millis(100),
        poll: Duration::from_millis(10),
    }
}

/// What: Poll until the child exits or `limit` passes.
fn wait_exit(proc: &ManagedProcess, limit: Duration) {
    let began = Instant::now();
    while proc.is_running() && began.elapsed() < limit {
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
/// What: A command that exits zero ends in a not-running state with code 0.
///
/// Inputs:
/// - `true`.
///
/// Output:
/// - `running` converges to false; `status().exit_code == Some(0)`; stop is a no-op.
fn integration_process_lifecycle_exit_zero() {
    let mut proc = ManagedProcess::new(argv(&["true"]), timing(500));
    assert!(proc.start());
    wait_exit(&proc, Duration::from_secs(5));
    let status = proc.status();
    assert!(!status.running);
    assert_eq!(status.exit_code, Some(0));
    assert!(status.ended_at.is_some());
    assert!(status.memory_mb.is_none());
    assert!(!proc.stop());
}

#[test]
/// What: A child ignoring SIGTERM is killed once the grace period runs out.
///
/// Inputs:
/// - `sh -c "trap '' TERM; exec sleep 30"` with a 300 ms grace period.
///
/// Output:
/// - `stop()` returns true well within grace + slack; the child is no longer running.
fn integration_forced_termination_is_bounded() {
    let mut proc = ManagedProcess::new(
        argv(&["sh", "-c", "trap '' TERM; exec sleep 30"]),
        timing(300),
    );
    assert!(proc.start());
    std::thread::sleep(Duration::from_millis(100));
    assert!(proc.is_running());
    let began = Instant::now();
    assert!(proc.stop());
    let took = began.elapsed();
    assert!(took >= Duration::from_millis(250), "{took:?}");
    assert!(took < Duration::from_secs(3), "{took:?}");
    assert!(!proc.is_running());
    assert!(!proc.stop());
}

#[test]
/// What: The observer sees every line with its stream tag.
///
/// Inputs:
/// - Script writing two stdout lines and one stderr line.
///
/// Output:
/// - Observer records all three; queues hold the same lines.
fn integration_observer_receives_lines() {
    let seen: Arc<Mutex<Vec<(Stream, String)>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let observer: LineObserver = Arc::new(move |stream, line| {
        sink.lock().expect("lock").push((stream, line.to_string()));
    });
    let mut proc = ManagedProcess::new(
        argv(&["sh", "-c", "echo a; echo b; echo c >&2"]),
        timing(500),
    )
    .with_observer(observer);
    assert!(proc.start());
    wait_exit(&proc, Duration::from_secs(5));
    let began = Instant::now();
    while !proc.readers_finished() && began.elapsed() < Duration::from_secs(5) {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(proc.get_output(), ["a", "b"]);
    assert_eq!(proc.get_errors(), ["c"]);
    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 3);
    assert!(seen.contains(&(Stream::Stderr, "c".to_string())));
}

#[test]
fn integration_start_fails_for_missing_program() {
    let mut proc = ManagedProcess::new(argv(&["/nonexistent/sqlmap"]), timing(100));
    assert!(!proc.start());
    assert!(!proc.is_running());
    assert!(proc.status().pid.is_none());
}
