//! Host discovery: how to invoke the external tool on this machine.

use std::path::Path;

use serde::Serialize;

use crate::config::Settings;

/// Interpreters tried, in order, when the tool is configured as a script path.
const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Resolved invocation of the external tool plus what is available on the host.
///
/// Produced once by [`Environment::discover`] and passed by reference to the builder,
/// validator and orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    /// Invocation prefix: a single executable or `<interpreter> <script>`.
    program: Vec<String>,
    /// Whether the external tool was found.
    sqlmap_available: bool,
    /// Interpreter used for a script install, if any.
    python: Option<String>,
    /// Whether the elevation wrapper was found on `PATH`.
    elevation_available: bool,
}

impl Environment {
    /// What: Resolve the tool invocation from settings and `PATH`.
    ///
    /// Inputs:
    /// - `settings`: Configured tool path, optional interpreter and elevation wrapper.
    ///
    /// Output:
    /// - An environment; when nothing resolves the configured path is kept verbatim and
    ///   `sqlmap_available()` is `false`, so spawning later fails cleanly.
    ///
    /// Details:
    /// - A configured path that is an existing `.py` file runs through the configured
    ///   interpreter, else the first of `python3`/`python` found on `PATH`.
    /// - Anything else resolves through `which` as an executable.
    #[must_use]
    pub fn discover(settings: &Settings) -> Self {
        let configured = settings.sqlmap_path.trim();
        let elevation_available = which::which(&settings.elevation_program).is_ok();
        let script = Path::new(configured);
        let is_script = script
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("py"));

        if is_script {
            let python = settings
                .python
                .as_deref()
                .and_then(|p| which::which(p).ok())
                .or_else(|| PYTHON_CANDIDATES.iter().find_map(|p| which::which(p).ok()))
                .map(|p| p.display().to_string());
            let available = python.is_some() && script.is_file();
            let interpreter = python.clone().unwrap_or_else(|| "python3".to_string());
            tracing::info!(
                script = configured,
                interpreter = %interpreter,
                available,
                "[Environment] using script install"
            );
            return Self {
                program: vec![interpreter, configured.to_string()],
                sqlmap_available: available,
                python,
                elevation_available,
            };
        }

        match which::which(configured) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "[Environment] found external tool");
                Self {
                    program: vec![path.display().to_string()],
                    sqlmap_available: true,
                    python: None,
                    elevation_available,
                }
            }
            Err(e) => {
                tracing::warn!(
                    configured,
                    error = %e,
                    "[Environment] external tool not found on PATH"
                );
                Self {
                    program: vec![configured.to_string()],
                    sqlmap_available: false,
                    python: None,
                    elevation_available,
                }
            }
        }
    }

    /// Environment with a fixed invocation prefix, treated as available.
    #[must_use]
    pub fn with_program<I, S>(program: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into_iter().map(Into::into).collect(),
            sqlmap_available: true,
            python: None,
            elevation_available: false,
        }
    }

    /// Invocation prefix tokens.
    #[must_use]
    pub fn program(&self) -> &[String] {
        &self.program
    }

    /// Whether the external tool was found.
    #[must_use]
    pub const fn sqlmap_available(&self) -> bool {
        self.sqlmap_available
    }

    /// Interpreter of a script install.
    #[must_use]
    pub fn python(&self) -> Option<&str> {
        self.python.as_deref()
    }

    /// Whether the elevation wrapper was found.
    #[must_use]
    pub const fn elevation_available(&self) -> bool {
        self.elevation_available
    }

    /// What: Length of this environment's prefix at the start of `words`.
    ///
    /// Inputs:
    /// - `words`: Leading words of a command line.
    ///
    /// Output:
    /// - Number of words that spell the program invocation, or `0` when `words` does not
    ///   start with it. Matches the exact prefix, or by file name so that `sqlmap` and
    ///   `/usr/bin/sqlmap` both count.
    #[must_use]
    pub fn prefix_len(&self, words: &[&str]) -> usize {
        if words.len() >= self.program.len()
            && self.program.iter().zip(words).all(|(p, w)| p == w)
        {
            return self.program.len();
        }
        let Some(first) = words.first() else {
            return 0;
        };
        if is_tool_name(first) {
            return 1;
        }
        if file_name(first).starts_with("python")
            && let Some(second) = words.get(1)
            && is_tool_name(second)
        {
            return 2;
        }
        0
    }
}

fn file_name(word: &str) -> &str {
    word.rsplit(['/', '\\']).next().unwrap_or(word)
}

/// `sqlmap`, `sqlmap.py`, `/opt/sqlmap/sqlmap.py` and similar.
fn is_tool_name(word: &str) -> bool {
    let name = file_name(word);
    name == "sqlmap" || name.starts_with("sqlmap.")
}
