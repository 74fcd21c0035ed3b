use std::env;
use std::path::{Path, PathBuf};

/// Directory name used under the config base.
const APP_DIR: &str = "sqlmapctl";

/// Settings file name inside [`config_dir`].
pub const SETTINGS_FILE: &str = "settings.toml";

/// Resolve an XDG base directory from environment or default to `$HOME` + segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g., `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback path segments relative to `$HOME` if `var` is unset/empty.
///
/// Output: Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    home_default
        .iter()
        .fold(PathBuf::from(home), |base, seg| base.join(seg))
}

/// `$HOME/.config/sqlmapctl`, created on demand; `None` without HOME or on I/O failure.
fn home_config_dir() -> Option<PathBuf> {
    let home = env::var("HOME").ok()?;
    let dir = Path::new(&home).join(".config").join(APP_DIR);
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Config directory (ensured to exist): `$HOME/.config/sqlmapctl`, falling back to
/// `$XDG_CONFIG_HOME/sqlmapctl`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(dir) = home_config_dir() {
        return dir;
    }
    let dir = xdg_base_dir("XDG_CONFIG_HOME", &[".config"]).join(APP_DIR);
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Logs directory under config (ensured to exist).
#[must_use]
pub fn logs_dir() -> PathBuf {
    let dir = config_dir().join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// What: Resolve the settings file path.
///
/// Inputs:
/// - `explicit`: Path given on the command line, if any.
///
/// Output:
/// - `explicit` unchanged when present, else `settings.toml` inside [`config_dir`].
#[must_use]
pub fn settings_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(|| config_dir().join(SETTINGS_FILE), Path::to_path_buf)
}
