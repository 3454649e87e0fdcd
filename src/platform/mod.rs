//! Platform boundary for window-title introspection
//!
//! Reading another application's window title is inherently OS-specific.
//! The boundary returns a tagged [`TitleReading`] rather than raw sentinel
//! strings, so downstream matching is exhaustive; failures are classified
//! structurally in [`TitleError`] rather than by message inspection.

use std::fmt;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(not(target_os = "macos"))]
pub mod unsupported;

#[cfg(target_os = "macos")]
pub use macos::MacTitleSource as NativeTitleSource;

#[cfg(not(target_os = "macos"))]
pub use unsupported::UnsupportedTitleSource as NativeTitleSource;

/// Sentinel emitted by the probe script when no Deezer process exists
pub const NOT_FOUND_SENTINEL: &str = "DEEZER_NOT_FOUND";

/// Sentinel emitted when Deezer runs but exposes no readable window
pub const NO_WINDOW_SENTINEL: &str = "DEEZER_RUNNING_NO_WINDOW";

/// One reading of the Deezer window title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleReading {
    /// No Deezer process exists
    ApplicationAbsent,

    /// Deezer runs but its window title could not be read
    NoWindow,

    /// The raw window title
    Window(String),
}

impl TitleReading {
    /// Classify raw probe-script output into a reading.
    ///
    /// The script signals the two no-title conditions with literal
    /// sentinels; everything else is a window title. Output is trimmed
    /// before comparison.
    pub fn from_script_output(raw: &str) -> Self {
        match raw.trim() {
            NOT_FOUND_SENTINEL => TitleReading::ApplicationAbsent,
            NO_WINDOW_SENTINEL => TitleReading::NoWindow,
            title => TitleReading::Window(title.to_string()),
        }
    }
}

/// Why a title reading failed.
#[derive(Debug)]
pub enum TitleError {
    /// The probe did not answer within its deadline
    Timeout,

    /// The probe ran but exited non-zero (stderr attached)
    Script(String),

    /// The probe could not be run at all
    Command(String),

    /// This build has no title source for the current OS
    Unsupported,
}

impl fmt::Display for TitleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleError::Timeout => write!(f, "window-title probe timed out"),
            TitleError::Script(stderr) => write!(f, "window-title probe failed: {stderr}"),
            TitleError::Command(e) => write!(f, "could not run window-title probe: {e}"),
            TitleError::Unsupported => {
                write!(f, "window-title introspection is not supported on this platform")
            }
        }
    }
}

impl std::error::Error for TitleError {}

/// Source of window-title readings.
pub trait TitleSource {
    /// Read the current Deezer window title. Bounded-time; one reading per
    /// call.
    fn read_title(&self) -> Result<TitleReading, TitleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_sentinel_classifies_as_absent() {
        assert_eq!(
            TitleReading::from_script_output("DEEZER_NOT_FOUND"),
            TitleReading::ApplicationAbsent
        );
    }

    #[test]
    fn test_no_window_sentinel_classifies_as_no_window() {
        assert_eq!(
            TitleReading::from_script_output("DEEZER_RUNNING_NO_WINDOW"),
            TitleReading::NoWindow
        );
    }

    #[test]
    fn test_sentinels_are_trimmed_before_comparison() {
        assert_eq!(
            TitleReading::from_script_output("DEEZER_NOT_FOUND\n"),
            TitleReading::ApplicationAbsent
        );
        assert_eq!(
            TitleReading::from_script_output("  DEEZER_RUNNING_NO_WINDOW  "),
            TitleReading::NoWindow
        );
    }

    #[test]
    fn test_anything_else_is_a_window_title() {
        assert_eq!(
            TitleReading::from_script_output("Song - Artist - Deezer\n"),
            TitleReading::Window("Song - Artist - Deezer".to_string())
        );
        // A title merely containing a sentinel is still a title
        assert_eq!(
            TitleReading::from_script_output("DEEZER_NOT_FOUND - Artist - Deezer"),
            TitleReading::Window("DEEZER_NOT_FOUND - Artist - Deezer".to_string())
        );
    }

    #[test]
    fn test_empty_output_is_an_empty_window_title() {
        assert_eq!(
            TitleReading::from_script_output(""),
            TitleReading::Window(String::new())
        );
    }
}
