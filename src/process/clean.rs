//! Line cleanup for child output.

/// What: Make one output line safe for a plain-text sink.
///
/// Inputs:
/// - `line`: Raw line from the child's stdout or stderr.
///
/// Output:
/// - Line without ANSI escape sequences, control characters or trailing whitespace.
#[must_use]
pub fn clean_line(line: &str) -> String {
    let stripped = strip_ansi_escapes::strip_str(line);
    let mut out: String = stripped
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    out.truncate(out.trim_end().len());
    out
}
