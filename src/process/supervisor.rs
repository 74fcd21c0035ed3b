//! One supervised run of the external tool.
//!
//! The child gets separate stdin/stdout/stderr pipes. Two reader threads drain stdout
//! and stderr into channels; the consumer polls them without blocking. Elevation-secret
//! delivery runs on its own short-lived thread.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
#[cfg(unix)]
use std::time::Instant;

use chrono::{DateTime, Local};
use serde::Serialize;
use sysinfo::System;
use zeroize::Zeroizing;

use super::status::{self, ProcessStatus};
use crate::command::ArgumentVector;
use crate::config::SupervisorTiming;

/// Which pipe a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        })
    }
}

/// Callback invoked from a reader thread for every raw line as it arrives.
pub type LineObserver = Arc<dyn Fn(Stream, &str) + Send + Sync>;

/// Result of delivering an elevation secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationOutcome {
    /// The child is still running or exited successfully after delivery.
    Accepted,
    /// The child exited unsuccessfully after delivery.
    Rejected {
        /// Exit code, absent when ended by a signal.
        exit_code: Option<i32>,
    },
    /// The invocation is not wrapped for elevation; nothing was written.
    NotElevated,
    /// The process was never started.
    NotRunning,
    /// Writing failed for a reason other than a closed pipe.
    WriteFailed,
}

/// Child handle plus what is known about its exit.
struct ChildSlot {
    child: Child,
    exit: Option<ExitStatus>,
    ended_at: Option<DateTime<Local>>,
}

impl ChildSlot {
    /// Non-blocking exit check; records the first observed exit.
    fn poll(&mut self) -> Option<ExitStatus> {
        if self.exit.is_none() {
            match self.child.try_wait() {
                Ok(Some(st)) => self.record(st),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "[Process] failed to poll child status"),
            }
        }
        self.exit
    }

    fn record(&mut self, st: ExitStatus) {
        self.exit = Some(st);
        self.ended_at = Some(Local::now());
        tracing::info!(
            pid = self.child.id(),
            exit_code = ?st.code(),
            "[Process] child exited"
        );
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A supervised invocation of the external tool.
pub struct ManagedProcess {
    args: ArgumentVector,
    elevated: bool,
    timing: SupervisorTiming,
    observer: Option<LineObserver>,
    slot: Option<Arc<Mutex<ChildSlot>>>,
    stdin: Arc<Mutex<Option<ChildStdin>>>,
    stdout_rx: Option<Receiver<String>>,
    stderr_rx: Option<Receiver<String>>,
    readers: Vec<JoinHandle<()>>,
    pid: Option<u32>,
    started_at: Option<DateTime<Local>>,
    sampler: Mutex<System>,
}

impl fmt::Debug for ManagedProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedProcess")
            .field("args", &self.args.to_command_line())
            .field("elevated", &self.elevated)
            .field("pid", &self.pid)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

impl ManagedProcess {
    /// What: Prepare (but do not spawn) a run.
    ///
    /// Inputs:
    /// - `args`: Full argument vector, program first.
    /// - `timing`: Grace period, settle delay and poll interval.
    #[must_use]
    pub fn new(args: ArgumentVector, timing: SupervisorTiming) -> Self {
        Self {
            args,
            elevated: false,
            timing,
            observer: None,
            slot: None,
            stdin: Arc::new(Mutex::new(None)),
            stdout_rx: None,
            stderr_rx: None,
            readers: Vec::new(),
            pid: None,
            started_at: None,
            sampler: Mutex::new(System::new()),
        }
    }

    /// Forward every line to `observer` from the reader threads.
    #[must_use]
    pub fn with_observer(mut self, observer: LineObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Wrap the invocation in an elevation prefix such as `["sudo", "-S"]`.
    #[must_use]
    pub fn with_elevation(mut self, prefix: &[String]) -> Self {
        self.args = self.args.elevated(prefix);
        self.elevated = true;
        self
    }

    /// Argument vector this process runs.
    #[must_use]
    pub const fn args(&self) -> &ArgumentVector {
        &self.args
    }

    /// Whether the invocation is wrapped for elevation.
    #[must_use]
    pub const fn is_elevated(&self) -> bool {
        self.elevated
    }

    /// What: Spawn the child and its two reader threads.
    ///
    /// Output:
    /// - `true` when the child is running; `false` when it was already started, the
    ///   vector is empty, or spawning failed (e.g. executable not found).
    ///
    /// Details:
    /// - The child inherits the environment and gets separate piped stdin, stdout and
    ///   stderr.
    pub fn start(&mut self) -> bool {
        if self.slot.is_some() {
            tracing::warn!("[Process] start requested twice; ignoring");
            return false;
        }
        let argv = self.args.process_args();
        let Some((program, rest)) = argv.split_first() else {
            tracing::error!("[Process] empty argument vector");
            return false;
        };
        let spawned = Command::new(program)
            .args(rest)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let mut child = match spawned {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(program = %program, error = %e, "[Process] failed to spawn");
                return false;
            }
        };
        let pid = child.id();
        *lock(&self.stdin) = child.stdin.take();

        let (out_tx, out_rx) = mpsc::channel();
        let (err_tx, err_rx) = mpsc::channel();
        if let Some(out) = child.stdout.take() {
            self.readers
                .push(spawn_reader(out, Stream::Stdout, out_tx, self.observer.clone()));
        }
        if let Some(err) = child.stderr.take() {
            self.readers
                .push(spawn_reader(err, Stream::Stderr, err_tx, self.observer.clone()));
        }
        self.stdout_rx = Some(out_rx);
        self.stderr_rx = Some(err_rx);
        self.slot = Some(Arc::new(Mutex::new(ChildSlot {
            child,
            exit: None,
            ended_at: None,
        })));
        self.pid = Some(pid);
        self.started_at = Some(Local::now());
        tracing::info!(
            pid,
            elevated = self.elevated,
            tokens = argv.len(),
            "[Process] started"
        );
        true
    }

    /// Next queued stdout line, without blocking.
    #[must_use]
    pub fn read_output(&self) -> Option<String> {
        self.stdout_rx.as_ref()?.try_recv().ok()
    }

    /// Next queued stderr line, without blocking.
    #[must_use]
    pub fn read_error(&self) -> Option<String> {
        self.stderr_rx.as_ref()?.try_recv().ok()
    }

    /// Every currently queued stdout line.
    #[must_use]
    pub fn get_output(&self) -> Vec<String> {
        self.stdout_rx
            .as_ref()
            .map(|rx| rx.try_iter().collect())
            .unwrap_or_default()
    }

    /// Every currently queued stderr line.
    #[must_use]
    pub fn get_errors(&self) -> Vec<String> {
        self.stderr_rx
            .as_ref()
            .map(|rx| rx.try_iter().collect())
            .unwrap_or_default()
    }

    /// What: Write one line to the child's input.
    ///
    /// Inputs:
    /// - `line`: Text without the trailing newline.
    ///
    /// Output:
    /// - `true` when written and flushed.
    pub fn send_input(&self, line: &str) -> bool {
        match write_line(&self.stdin, line) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "[Process] failed to write to child input");
                false
            }
        }
    }

    /// What: Deliver the elevation secret on a background thread.
    ///
    /// Inputs:
    /// - `secret`: Secret text; wiped from memory when the thread finishes.
    ///
    /// Output:
    /// - Handle resolving to the inferred outcome.
    ///
    /// Details:
    /// - Waits the settle delay, writes the secret plus newline, waits again, then checks
    ///   the child: still running or exit code 0 means accepted.
    /// - A broken pipe on write counts as delivered; wrappers may close input right after
    ///   reading it.
    #[must_use]
    pub fn send_elevation_secret(&self, secret: Zeroizing<String>) -> JoinHandle<ElevationOutcome> {
        let elevated = self.elevated;
        let slot = self.slot.clone();
        let stdin = Arc::clone(&self.stdin);
        let settle = self.timing.settle;
        thread::spawn(move || {
            if !elevated {
                return ElevationOutcome::NotElevated;
            }
            let Some(slot) = slot else {
                return ElevationOutcome::NotRunning;
            };
            thread::sleep(settle);
            match write_line(&stdin, &secret) {
                Ok(()) => tracing::debug!("[Process] elevation secret delivered"),
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    tracing::debug!("[Process] input closed while delivering elevation secret");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "[Process] could not deliver elevation secret");
                    return ElevationOutcome::WriteFailed;
                }
            }
            drop(secret);
            thread::sleep(settle);
            match lock(&slot).poll() {
                None => ElevationOutcome::Accepted,
                Some(st) if st.success() => ElevationOutcome::Accepted,
                Some(st) => {
                    tracing::warn!(exit_code = ?st.code(), "[Process] elevation rejected");
                    ElevationOutcome::Rejected {
                        exit_code: st.code(),
                    }
                }
            }
        })
    }

    /// Whether the child is alive (polls for exit).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|slot| lock(slot).poll().is_none())
    }

    /// Whether both reader threads have seen end-of-stream.
    #[must_use]
    pub fn readers_finished(&self) -> bool {
        self.readers.iter().all(JoinHandle::is_finished)
    }

    /// What: Terminate the child: cooperative signal, bounded wait, then forced kill.
    ///
    /// Output:
    /// - `true` when a running child was stopped; `false` when there was nothing to stop
    ///   (never started or already exited). Repeated calls are no-ops.
    ///
    /// Details:
    /// - Closes the child's input first so pending prompts see end-of-file.
    /// - Unix: `SIGTERM`, polls until the grace period ends, then `SIGKILL`.
    ///   Elsewhere the child is killed directly.
    /// - Returns within grace period plus one poll interval and the final reap.
    pub fn stop(&mut self) -> bool {
        let Some(slot) = self.slot.clone() else {
            return false;
        };
        if lock(&slot).poll().is_some() {
            return false;
        }
        drop(lock(&self.stdin).take());

        #[cfg(unix)]
        {
            let deadline = Instant::now() + self.timing.grace;
            if let Some(pid) = self.pid {
                request_termination(pid);
            }
            loop {
                if lock(&slot).poll().is_some() {
                    tracing::info!(pid = ?self.pid, "[Process] stopped cooperatively");
                    return true;
                }
                let left = deadline.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    break;
                }
                thread::sleep(self.timing.poll.min(left));
            }
        }

        let mut guard = lock(&slot);
        if guard.poll().is_none() {
            if let Err(e) = guard.child.kill() {
                tracing::warn!(error = %e, "[Process] kill failed");
            }
            match guard.child.wait() {
                Ok(st) => guard.record(st),
                Err(e) => tracing::warn!(error = %e, "[Process] failed to reap child"),
            }
            tracing::warn!(pid = ?self.pid, "[Process] forced termination");
        }
        true
    }

    /// What: Best-effort status snapshot.
    ///
    /// Output:
    /// - Running flag, pid, timestamps, duration, exit code and, while running,
    ///   memory/CPU when the host can report them.
    #[must_use]
    pub fn status(&self) -> ProcessStatus {
        let (exit, ended_at) = self.slot.as_ref().map_or((None, None), |slot| {
            let mut guard = lock(slot);
            let exit = guard.poll();
            (exit, guard.ended_at)
        });
        let running = self.slot.is_some() && exit.is_none();
        let (memory_mb, cpu_percent) = match (running, self.pid) {
            (true, Some(pid)) => status::sample(&mut lock(&self.sampler), pid),
            _ => (None, None),
        };
        let duration = self
            .started_at
            .and_then(|start| status::elapsed(start, ended_at.unwrap_or_else(Local::now)));
        ProcessStatus {
            running,
            pid: self.pid,
            started_at: self.started_at,
            ended_at,
            duration,
            exit_code: exit.and_then(|st| st.code()),
            memory_mb,
            cpu_percent,
        }
    }
}

impl Drop for ManagedProcess {
    fn drop(&mut self) {
        if let Some(slot) = &self.slot {
            let mut guard = lock(slot);
            if guard.poll().is_none() {
                tracing::debug!(pid = ?self.pid, "[Process] killing child on drop");
                let _ = guard.child.kill();
                let _ = guard.child.wait();
            }
        }
    }
}

fn write_line(stdin: &Mutex<Option<ChildStdin>>, line: &str) -> io::Result<()> {
    let mut guard = lock(stdin);
    let Some(pipe) = guard.as_mut() else {
        return Err(io::Error::new(io::ErrorKind::NotConnected, "child input is closed"));
    };
    pipe.write_all(line.as_bytes())?;
    pipe.write_all(b"\n")?;
    pipe.flush()
}

/// Drain `source` line by line into `tx`, forwarding each line to `observer`.
fn spawn_reader<R: Read + Send + 'static>(
    source: R,
    stream: Stream,
    tx: Sender<String>,
    observer: Option<LineObserver>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(source);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&buf);
                    let line = text.trim_end_matches(['\n', '\r']);
                    if let Some(obs) = &observer {
                        obs(stream, line);
                    }
                    // Keep draining after the consumer goes away so the child never blocks.
                    let _ = tx.send(line.to_string());
                }
                Err(e) => {
                    tracing::debug!(%stream, error = %e, "[Process] reader error");
                    break;
                }
            }
        }
        tracing::trace!(%stream, "[Process] reader reached end of stream");
    })
}

#[cfg(unix)]
fn request_termination(pid: u32) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    if let Err(e) = kill(Pid::from_raw(raw), Signal::SIGTERM) {
        tracing::debug!(pid, error = %e, "[Process] SIGTERM failed");
    }
}
