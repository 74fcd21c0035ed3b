//! sqlmapctl binary entrypoint kept minimal. The core lives in the library crate.

use std::fmt;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use clap::Parser;
use zeroize::Zeroizing;

use sqlmapctl::args::{self, Args, Dispatch};
use sqlmapctl::command::Environment;
use sqlmapctl::config::{Settings, logs_dir, settings_path};
use sqlmapctl::process::Stream;
use sqlmapctl::scan::{LogLine, ScanOutcome, run_scan};
use sqlmapctl::state::OptionMap;

struct SqlmapctlTimer;

impl tracing_subscriber::fmt::time::FormatTime for SqlmapctlTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        // "YYYY-MM-DD-T HH:MM:SS"
        let ts = chrono::Local::now().format("%Y-%m-%d-T %H:%M:%S");
        write!(w, "{ts}")
    }
}

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// `RUST_LOG` when set, else `level`.
fn env_filter(level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
}

/// Initialize tracing writing to ~/.config/sqlmapctl/logs/sqlmapctl.log, or stderr.
fn init_logging(level: &str) {
    let log_path = logs_dir().join("sqlmapctl.log");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(level))
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(SqlmapctlTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::info!(path = %log_path.display(), "logging initialized");
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(level))
                .with_target(false)
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .with_timer(SqlmapctlTimer)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

const fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn print_line(line: LogLine) {
    match line.stream {
        Stream::Stdout => println!("{}", line.text),
        Stream::Stderr => eprintln!("{}", line.text),
    }
}

/// Ask for the elevation password; `None` when reading the terminal fails.
fn prompt_secret(env: &Environment, settings: &Settings) -> Option<Zeroizing<String>> {
    if !env.elevation_available() {
        tracing::warn!(program = %settings.elevation_program, "elevation wrapper not found on PATH");
    }
    match rpassword::prompt_password(format!("[{}] password: ", settings.elevation_program)) {
        Ok(secret) => {
            tracing::debug!("elevation secret provided");
            Some(Zeroizing::new(secret))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to read elevation password");
            eprintln!("error: cannot read password: {e}");
            None
        }
    }
}

/// Run one scan on a blocking worker while Ctrl-C requests cancellation.
async fn run(args: &Args, env: Environment, mut settings: Settings, options: OptionMap) -> ExitCode {
    settings.force_required_flags = args.force_required_flags(&settings);
    let secret = if args.sudo {
        let Some(secret) = prompt_secret(&env, &settings) else {
            return ExitCode::FAILURE;
        };
        Some(secret)
    } else {
        None
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let watcher = {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received; stopping scan");
                cancel.store(true, Ordering::Relaxed);
            }
        })
    };
    let program = env.program().join(" ");
    let job = tokio::task::spawn_blocking(move || {
        run_scan(&env, &settings, &options, secret, print_line, &cancel)
    });
    let outcome = job.await;
    watcher.abort();

    match outcome {
        Ok(ScanOutcome::Refused(report)) => {
            eprintln!("{}", report.render());
            ExitCode::from(2)
        }
        Ok(ScanOutcome::SpawnFailed) => {
            eprintln!("error: could not start '{program}' (see `sqlmapctl --doctor`)");
            ExitCode::FAILURE
        }
        Ok(ScanOutcome::ElevationRejected { exit_code }) => {
            eprintln!("error: elevation rejected (exit code {exit_code:?})");
            ExitCode::FAILURE
        }
        Ok(ScanOutcome::Cancelled) => {
            eprintln!("scan cancelled");
            ExitCode::from(130)
        }
        Ok(ScanOutcome::Completed { success: true, .. }) => ExitCode::SUCCESS,
        Ok(ScanOutcome::Completed { exit_code, .. }) => {
            ExitCode::from(exit_code.and_then(|c| u8::try_from(c).ok()).unwrap_or(1))
        }
        Err(e) => {
            tracing::error!(error = %e, "scan worker failed");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args::determine_log_level(&args));

    let settings = Settings::load_or_default(&settings_path(args.config.as_deref()));
    let env = Environment::discover(&settings);
    tracing::info!(
        program = %env.program().join(" "),
        available = env.sqlmap_available(),
        "sqlmapctl starting"
    );

    let code = match args::process_args(&args, &env, &settings) {
        Ok(Dispatch::Done(ok)) => exit_code(ok),
        Ok(Dispatch::Run(options)) => run(&args, env, settings, options).await,
        Err(err) => {
            tracing::error!(error = %err, "Application error");
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    };
    tracing::info!("sqlmapctl exited");
    code
}
