//! `settings.toml`: where the external tool lives and how runs are supervised.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Failure to read or parse the settings file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`Settings`].
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, source } => write!(f, "invalid settings in {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// User settings. Every field has a default; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Executable name or script path of the external tool.
    pub sqlmap_path: String,
    /// Interpreter to run a script path with; discovered on `PATH` when absent.
    pub python: Option<String>,
    /// Privilege-elevation wrapper program.
    pub elevation_program: String,
    /// Wrapper flag that makes it read the secret from standard input.
    pub elevation_flag: String,
    /// Inject the non-interactive and no-colour flags on every build.
    pub force_required_flags: bool,
    /// Cooperative termination grace period.
    pub stop_grace_ms: u64,
    /// Queue/exit polling interval.
    pub poll_interval_ms: u64,
    /// Delay before and after writing the elevation secret.
    pub elevation_settle_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sqlmap_path: "sqlmap".to_string(),
            python: None,
            elevation_program: "sudo".to_string(),
            elevation_flag: "-S".to_string(),
            force_required_flags: true,
            stop_grace_ms: 5000,
            poll_interval_ms: 100,
            elevation_settle_ms: 1000,
        }
    }
}

/// Supervisor timing derived from [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorTiming {
    /// Time allowed between the cooperative signal and the forced kill.
    pub grace: Duration,
    /// Delay around elevation-secret delivery.
    pub settle: Duration,
    /// Polling interval for exit detection.
    pub poll: Duration,
}

impl Default for SupervisorTiming {
    fn default() -> Self {
        Settings::default().timing()
    }
}

impl Settings {
    /// What: Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// - Returns the TOML error when the text is malformed or a field has the wrong type.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// What: Load settings from `path`.
    ///
    /// Inputs:
    /// - `path`: Settings file location.
    ///
    /// Output:
    /// - Parsed settings; defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Io` when the file exists but cannot be read.
    /// - `ConfigError::Parse` when the content is not valid settings TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "[Config] no settings file; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// What: Load settings, logging and falling back to defaults on any failure.
    ///
    /// Inputs:
    /// - `path`: Settings file location.
    ///
    /// Output:
    /// - Loaded settings or `Settings::default()`.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(s) => {
                tracing::info!(path = %path.display(), "[Config] settings loaded");
                s
            }
            Err(e) => {
                tracing::warn!(error = %e, "[Config] falling back to default settings");
                Self::default()
            }
        }
    }

    /// Supervisor timing as durations; a zero poll interval is raised to 1 ms.
    #[must_use]
    pub const fn timing(&self) -> SupervisorTiming {
        let poll = if self.poll_interval_ms == 0 {
            1
        } else {
            self.poll_interval_ms
        };
        SupervisorTiming {
            grace: Duration::from_millis(self.stop_grace_ms),
            settle: Duration::from_millis(self.elevation_settle_ms),
            poll: Duration::from_millis(poll),
        }
    }

    /// Two-token elevation prefix, e.g. `["sudo", "-S"]`.
    #[must_use]
    pub fn elevation_prefix(&self) -> Vec<String> {
        vec![self.elevation_program.clone(), self.elevation_flag.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Partial files keep defaults for missing keys and ignore unknown ones.
    ///
    /// Inputs:
    /// - TOML overriding two keys plus an unrecognised key.
    ///
    /// Output:
    /// - Overrides applied, everything else default.
    fn settings_partial_toml_keeps_defaults() {
        let s = Settings::from_toml(
            "sqlmap_path = \"/opt/sqlmap/sqlmap.py\"\nstop_grace_ms = 250\ncolour = \"red\"\n",
        )
        .expect("valid toml");
        assert_eq!(s.sqlmap_path, "/opt/sqlmap/sqlmap.py");
        assert_eq!(s.stop_grace_ms, 250);
        assert_eq!(s.elevation_program, "sudo");
        assert!(s.force_required_flags);
        assert_eq!(s.timing().grace, Duration::from_millis(250));
    }

    #[test]
    fn settings_missing_file_is_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let s = Settings::load(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn settings_malformed_file_is_parse_error_and_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "stop_grace_ms = \"soon\"").expect("write");
        assert!(matches!(Settings::load(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn settings_zero_poll_interval_is_clamped() {
        let s = Settings {
            poll_interval_ms: 0,
            ..Settings::default()
        };
        assert_eq!(s.timing().poll, Duration::from_millis(1));
        assert_eq!(s.elevation_prefix(), vec!["sudo".to_string(), "-S".to_string()]);
    }
}
