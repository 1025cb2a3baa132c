//! Shared utility functions.

use std::sync::LazyLock;

use regex::Regex;

/// Prefix every non-blank line of `text` with `prefix`.
///
/// "a\n\nb" with "    " -> "    a\n\n    b"
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove ANSI terminal escape sequences (colors in tracebacks).
pub fn strip_ansi(text: &str) -> String {
    static ANSI_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("valid regex"));

    ANSI_RE.replace_all(text, "").into_owned()
}
