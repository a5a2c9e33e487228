//! Shared helper functions for CLI commands
//!
//! Formatting helpers for the one-line progress output printed while a
//! migration runs.

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Counts characters rather than bytes, so names with accented letters are
/// never cut inside a code point. Longer strings keep their first
/// `max_len - 3` characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// First line of a possibly multi-line cell, for one-line progress output
///
/// CSV cells may hold quoted line breaks. An empty cell yields an empty
/// string.
pub fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}
