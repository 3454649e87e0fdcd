//! macOS title source
//!
//! Reads the Deezer window title through System Events via `osascript`.
//! Requires the Automation permission for System Events; without it the
//! script exits non-zero and the error is surfaced as [`TitleError::Script`].

use super::{TitleError, TitleReading, TitleSource};
use crate::util::{self, CommandError};
use log::trace;
use std::process::Command;
use std::time::Duration;

/// Deadline for one osascript invocation
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(2);

/// AppleScript probe. Answers with the window title, or one of the two
/// sentinels when there is no title to read.
const TITLE_SCRIPT: &str = r#"
tell application "System Events"
    if exists (process "Deezer") then
        try
            set windowTitle to name of first window of (first process whose name is "Deezer")
            return windowTitle
        on error
            return "DEEZER_RUNNING_NO_WINDOW"
        end try
    else
        return "DEEZER_NOT_FOUND"
    end if
end tell
"#;

/// Title source backed by `osascript`.
pub struct MacTitleSource {
    timeout: Duration,
}

impl MacTitleSource {
    pub fn new() -> Self {
        Self {
            timeout: SCRIPT_TIMEOUT,
        }
    }
}

impl Default for MacTitleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleSource for MacTitleSource {
    fn read_title(&self) -> Result<TitleReading, TitleError> {
        let output = util::run_command_with_timeout(
            Command::new("osascript").args(["-e", TITLE_SCRIPT]),
            self.timeout,
        )
        .map_err(|e| match e {
            CommandError::TimedOut(_) => TitleError::Timeout,
            CommandError::Spawn(e) | CommandError::Wait(e) => TitleError::Command(e.to_string()),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(TitleError::Script(stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        trace!("osascript returned: {:?}", stdout.trim());
        Ok(TitleReading::from_script_output(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_answers_with_sentinels_or_title() {
        // The script must only ever answer with a title or a known sentinel;
        // the classifier depends on it.
        assert!(TITLE_SCRIPT.contains(super::super::NOT_FOUND_SENTINEL));
        assert!(TITLE_SCRIPT.contains(super::super::NO_WINDOW_SENTINEL));
        assert!(TITLE_SCRIPT.contains(r#"process "Deezer""#));
    }

    #[test]
    fn test_default_timeout_is_bounded() {
        let source = MacTitleSource::new();
        assert!(source.timeout <= Duration::from_secs(2));
    }
}
