//! GitHub Actions workflow-command output.
//!
//! The runner scans the step's stdout for `::command::message` lines.
//! Plain lines end up in the log as-is.

use std::io::{self, Write};

/// Escapes a message so it stays on one workflow-command line.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn issue_command<W: Write>(writer: &mut W, command: &str, message: &str) -> io::Result<()> {
    writeln!(writer, "::{}::{}", command, escape_data(message))
}

/// Writes an informational log line.
pub fn info<W: Write>(writer: &mut W, message: &str) -> io::Result<()> {
    writeln!(writer, "{message}")
}

/// Writes a debug message, shown only when step debug logging is on.
pub fn debug<W: Write>(writer: &mut W, message: &str) -> io::Result<()> {
    issue_command(writer, "debug", message)
}

/// Writes an error annotation. The caller is responsible for exiting
/// with a failure status.
pub fn error<W: Write>(writer: &mut W, message: &str) -> io::Result<()> {
    issue_command(writer, "error", message)
}

/// Reports a failed run: the full error chain as debug output and the
/// one-line cause chain as an error annotation.
pub fn report_failure<W: Write>(writer: &mut W, err: &anyhow::Error) -> io::Result<()> {
    debug(writer, &format!("{err:?}"))?;
    error(writer, &format!("{err:#}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("plain"), "plain");
        assert_eq!(escape_data("100%"), "100%25");
        assert_eq!(escape_data("a\r\nb\nc"), "a%0D%0Ab%0Ac");
    }

    #[test]
    fn test_info_is_plain() {
        assert_eq!(
            output(|w| info(w, "Updated labels in 1. Added: bug.")),
            "Updated labels in 1. Added: bug.\n"
        );
    }

    #[test]
    fn test_debug_and_error_commands() {
        assert_eq!(output(|w| debug(w, "two\nlines")), "::debug::two%0Alines\n");
        assert_eq!(output(|w| error(w, "boom")), "::error::boom\n");
    }

    #[test]
    fn test_report_failure() {
        let err = anyhow::anyhow!("Not Found").context("Can not update issue number 4 in o/r repository");
        let out = output(|w| report_failure(w, &err));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("::debug::Can not update issue number 4"));
        assert!(lines[0].contains("Caused by:"));
        assert_eq!(
            lines[1],
            "::error::Can not update issue number 4 in o/r repository: Not Found"
        );
    }
}
