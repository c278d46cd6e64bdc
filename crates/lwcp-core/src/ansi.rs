//! ANSI escape code handling utilities
//!
//! The CLI tool colors its human-readable output even when stdout is a pipe.
//! Lines are cleaned before they reach the output log.

use regex::Regex;
use std::sync::LazyLock;

/// Regex pattern for ANSI escape sequences.
///
/// Covers:
/// - CSI sequences: ESC [ ... letter (colors, cursor, etc.)
/// - OSC sequences: ESC ] ... BEL or ST (hyperlinks, titles)
/// - Simple escapes: ESC letter
static ANSI_ESCAPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \x1b\[[0-9;?]*[A-Za-z]               # CSI sequences
        | \x1b\][^\x07\x1b]*(?:\x07|\x1b\\)  # OSC sequences
        | \x1b[A-Za-z]                       # Simple escapes
        ",
    )
    .expect("ANSI regex pattern is valid")
});

/// Spinner frames redrawn with carriage returns; keep only the final frame.
static CARRIAGE_RETURN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*\r").expect("Carriage return regex pattern is valid"));

/// Strip ANSI escape sequences and carriage-return redraws from a line.
///
/// # Examples
///
/// ```
/// use lwcp_core::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[31mred text\x1b[0m"), "red text");
/// assert_eq!(strip_ansi_codes("Starting... \rStarting... done"), "Starting... done");
/// ```
pub fn strip_ansi_codes(input: &str) -> String {
    let without_ansi = ANSI_ESCAPE_PATTERN.replace_all(input, "");
    CARRIAGE_RETURN_PATTERN
        .replace(&without_ansi, "")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_simple_color_codes() {
        let input = "\x1b[31mred text\x1b[0m";
        assert_eq!(strip_ansi_codes(input), "red text");
    }

    #[test]
    fn test_strip_256_color_codes() {
        let input = "\x1b[38;5;244mWARNING: plugin outdated\x1b[0m";
        assert_eq!(strip_ansi_codes(input), "WARNING: plugin outdated");
    }

    #[test]
    fn test_strip_osc_hyperlink() {
        let input = "\x1b]8;;https://example.com\x07link\x1b]8;;\x07";
        assert_eq!(strip_ansi_codes(input), "link");
    }

    #[test]
    fn test_spinner_redraw_keeps_last_frame() {
        let input = "Launching emulator |\rLaunching emulator /\rLaunching emulator done";
        assert_eq!(strip_ansi_codes(input), "Launching emulator done");
    }

    #[test]
    fn test_no_codes() {
        let input = "Plain text with no codes";
        assert_eq!(strip_ansi_codes(input), input);
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(strip_ansi_codes(""), "");
    }
}
