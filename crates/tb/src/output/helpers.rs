//! Common helper functions for output formatting.

use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a table header line, dimmed when colors are on.
pub fn header(line: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", line.dimmed())
    } else {
        format!("{line}\n")
    }
}
