//! Shared utilities
//!
//! The subprocess runner used by both OS boundaries (window-title scripting
//! and the media-control CLI), plus small string helpers for the tray.

use std::fmt;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

/// Default timeout for external commands (osascript, nowplaying-cli)
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Why an external command produced no output.
///
/// Callers match on the variant rather than inspecting message text, so a
/// timeout is distinguishable from a missing binary.
#[derive(Debug)]
pub enum CommandError {
    /// The command could not be spawned (missing binary, permissions)
    Spawn(std::io::Error),

    /// The command did not finish before the deadline and was killed
    TimedOut(Duration),

    /// Waiting on the running command failed
    Wait(std::io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Spawn(e) => write!(f, "failed to spawn command: {e}"),
            CommandError::TimedOut(t) => write!(f, "command timed out after {t:?}"),
            CommandError::Wait(e) => write!(f, "failed to wait on command: {e}"),
        }
    }
}

impl std::error::Error for CommandError {}

// ---------------------------------------------------------------------------
// Unicode-safe string truncation
// ---------------------------------------------------------------------------

/// Truncate a string to at most `max_chars` Unicode characters.
///
/// If truncated, appends "..." so the total character count is ≤ `max_chars`.
/// Never panics on multi-byte characters (unlike byte-index slicing).
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

// ---------------------------------------------------------------------------
// Command execution with timeout
// ---------------------------------------------------------------------------

/// Run a command with a timeout. Kills the child if it exceeds the deadline.
///
/// Drains stdout/stderr in background threads to avoid pipe-buffer deadlocks
/// (a common issue when the child's output exceeds the OS pipe capacity).
pub fn run_command_with_timeout(
    cmd: &mut Command,
    timeout: Duration,
) -> Result<Output, CommandError> {
    let mut child = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(CommandError::Spawn)?;

    // Take ownership of pipes and drain them in background threads
    // to prevent the child from blocking on a full pipe buffer.
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_handle {
            std::io::Read::read_to_end(&mut out, &mut buf).ok();
        }
        buf
    });
    let stderr_thread = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_handle {
            std::io::Read::read_to_end(&mut err, &mut buf).ok();
        }
        buf
    });

    // Poll for exit with timeout
    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait().map_err(CommandError::Wait)? {
            Some(status) => break status,
            None => {
                if Instant::now() >= deadline {
                    child.kill().ok();
                    child.wait().ok();
                    return Err(CommandError::TimedOut(timeout));
                }
                std::thread::sleep(Duration::from_millis(50));
            }
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- truncate --

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("Hi", 10), "Hi");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate("Hello", 5), "Hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("Hello, World!", 10), "Hello, ...");
    }

    #[test]
    fn test_truncate_empty() {
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn test_truncate_unicode() {
        // Multi-byte: "日本語テスト" (6 chars, each 3 bytes)
        let s = "日本語テスト"; // 6 chars
        let result = truncate(s, 5);
        assert_eq!(result, "日本...");
        assert!(result.is_char_boundary(result.len()));
    }

    // -- run_command_with_timeout --

    #[test]
    fn test_command_with_timeout_success() {
        let output =
            run_command_with_timeout(Command::new("echo").arg("hello"), Duration::from_secs(5))
                .unwrap();
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }

    #[test]
    fn test_command_with_timeout_times_out() {
        let result =
            run_command_with_timeout(Command::new("sleep").arg("10"), Duration::from_secs(1));
        assert!(matches!(result, Err(CommandError::TimedOut(_))));
    }

    #[test]
    fn test_command_spawn_failure_is_classified() {
        let result = run_command_with_timeout(
            &mut Command::new("/nonexistent/deezer-overlay-test-binary"),
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(CommandError::Spawn(_))));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_truncate_never_panics(s in ".*", max in 0usize..200) {
            let _ = truncate(&s, max);
        }

        #[test]
        fn prop_truncate_respects_max_chars(s in ".{0,100}", max in 3usize..100) {
            let result = truncate(&s, max);
            prop_assert!(result.chars().count() <= max);
        }

        #[test]
        fn prop_truncate_short_identity(s in ".{0,10}") {
            let result = truncate(&s, 100);
            prop_assert_eq!(result, s);
        }
    }
}
