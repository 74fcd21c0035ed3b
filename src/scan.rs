//! Scan orchestration: validate, build, spawn, stream cleaned lines, detect completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use serde::Serialize;
use zeroize::Zeroizing;

use crate::command::{CommandBuilder, Environment};
use crate::config::Settings;
use crate::process::{ElevationOutcome, ManagedProcess, Stream, clean_line};
use crate::state::OptionMap;
use crate::validate::{ValidationReport, Validator};

/// One cleaned output line handed to the display sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    /// Pipe the line came from.
    pub stream: Stream,
    /// Line text without colour escapes or control characters.
    pub text: String,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Validation found errors; nothing was spawned.
    Refused(ValidationReport),
    /// The child could not be spawned.
    SpawnFailed,
    /// The elevation wrapper rejected the secret.
    ElevationRejected {
        /// Wrapper exit code, absent when ended by a signal.
        exit_code: Option<i32>,
    },
    /// Cancellation was requested and the child was stopped.
    Cancelled,
    /// The child exited on its own.
    Completed {
        /// Exit code, absent when ended by a signal.
        exit_code: Option<i32>,
        /// Whether the exit code was zero.
        success: bool,
    },
}

impl ScanOutcome {
    /// Whether the run finished successfully.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed { success: true, .. })
    }
}

/// What: Run one scan end to end.
///
/// Inputs:
/// - `env`: Discovered invocation prefix.
/// - `settings`: Forced-flag policy, elevation wrapper and supervisor timing.
/// - `options`: Option map to validate and build.
/// - `secret`: Elevation secret; when present the run is wrapped in the elevation prefix.
/// - `sink`: Receives every cleaned line in arrival order per stream.
/// - `cancel`: Checked once per poll; when set, the child is stopped.
///
/// Output:
/// - Outcome of the run.
///
/// Details:
/// - Completion is declared once the child has exited and both streams reached
///   end-of-file with their queues drained, so no trailing line is lost.
pub fn run_scan(
    env: &Environment,
    settings: &Settings,
    options: &OptionMap,
    secret: Option<Zeroizing<String>>,
    mut sink: impl FnMut(LogLine),
    cancel: &AtomicBool,
) -> ScanOutcome {
    let report = Validator::new(env).validate_build(options, settings.force_required_flags);
    if !report.is_valid() {
        tracing::warn!(errors = report.errors().len(), "[Scan] refusing to run invalid options");
        return ScanOutcome::Refused(report);
    }
    for warning in report.warnings() {
        tracing::warn!(message = %warning.message, "[Scan] validation warning");
    }

    let args = CommandBuilder::new(env).build(options, settings.force_required_flags);
    let timing = settings.timing();
    let mut process = ManagedProcess::new(args, timing);
    if secret.is_some() {
        process = process.with_elevation(&settings.elevation_prefix());
    }
    tracing::info!(
        command = %process.args().to_command_line(),
        elevated = process.is_elevated(),
        "[Scan] starting"
    );
    if !process.start() {
        return ScanOutcome::SpawnFailed;
    }
    let elevation = secret.map(|s| process.send_elevation_secret(s));

    loop {
        let moved = drain(&process, &mut sink);
        if cancel.load(Ordering::Relaxed) {
            tracing::info!("[Scan] cancellation requested");
            process.stop();
            drain(&process, &mut sink);
            return ScanOutcome::Cancelled;
        }
        if !process.is_running() && process.readers_finished() {
            drain(&process, &mut sink);
            break;
        }
        if moved == 0 {
            thread::sleep(timing.poll);
        }
    }

    if let Some(handle) = elevation {
        match handle.join() {
            Ok(ElevationOutcome::Rejected { exit_code }) => {
                return ScanOutcome::ElevationRejected { exit_code };
            }
            Ok(outcome) => tracing::debug!(?outcome, "[Scan] elevation finished"),
            Err(_) => tracing::warn!("[Scan] elevation thread panicked"),
        }
    }

    let status = process.status();
    let success = status.exit_code == Some(0);
    tracing::info!(
        exit_code = ?status.exit_code,
        duration = ?status.duration,
        success,
        "[Scan] finished"
    );
    ScanOutcome::Completed {
        exit_code: status.exit_code,
        success,
    }
}

/// Move every queued line to `sink`; returns how many were moved.
fn drain(process: &ManagedProcess, sink: &mut impl FnMut(LogLine)) -> usize {
    let out = process.get_output().into_iter().map(|l| (Stream::Stdout, l));
    let err = process.get_errors().into_iter().map(|l| (Stream::Stderr, l));
    let mut moved = 0;
    for (stream, raw) in out.chain(err) {
        sink(LogLine {
            stream,
            text: clean_line(&raw),
        });
        moved += 1;
    }
    moved
}
