//! Point-in-time status of a managed process, with optional resource metrics.

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::Serialize;
use sysinfo::{Pid, System};

/// Point-in-time view of a managed process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessStatus {
    /// Whether the child is still alive.
    pub running: bool,
    /// OS process id, once spawned.
    pub pid: Option<u32>,
    /// Spawn time.
    pub started_at: Option<DateTime<Local>>,
    /// Exit or stop time.
    pub ended_at: Option<DateTime<Local>>,
    /// Elapsed time from start to end, or to now while running.
    pub duration: Option<Duration>,
    /// Exit code; absent while running or when ended by a signal.
    pub exit_code: Option<i32>,
    /// Resident memory in MiB, when the host reports it.
    pub memory_mb: Option<f64>,
    /// CPU usage in percent, when the host reports it.
    pub cpu_percent: Option<f32>,
}

/// What: Sample memory and CPU for `pid`.
///
/// Inputs:
/// - `sys`: Sampler kept across calls so CPU usage has a previous reading to diff.
/// - `pid`: Process to sample.
///
/// Output:
/// - `(memory MiB, cpu %)`, both `None` when the process cannot be read.
pub(super) fn sample(sys: &mut System, pid: u32) -> (Option<f64>, Option<f32>) {
    let pid = Pid::from_u32(pid);
    if !sys.refresh_process(pid) {
        return (None, None);
    }
    sys.process(pid).map_or((None, None), |p| {
        #[allow(clippy::cast_precision_loss)]
        let mib = p.memory() as f64 / (1024.0 * 1024.0);
        (Some(mib), Some(p.cpu_usage()))
    })
}

/// Elapsed time between two local timestamps; `None` when `end` precedes `start`.
pub(super) fn elapsed(start: DateTime<Local>, end: DateTime<Local>) -> Option<Duration> {
    (end - start).to_std().ok()
}
