//! Settings file and on-disk locations.

pub mod paths;
pub mod settings;

pub use paths::{config_dir, logs_dir, settings_path};
pub use settings::{ConfigError, Settings, SupervisorTiming};

#[cfg(test)]
static TEST_MUTEX: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();

#[cfg(test)]
/// Serialises tests that mutate `HOME`/`XDG_CONFIG_HOME`.
pub(crate) fn test_mutex() -> &'static std::sync::Mutex<()> {
    TEST_MUTEX.get_or_init(|| std::sync::Mutex::new(()))
}
