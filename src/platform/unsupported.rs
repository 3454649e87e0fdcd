//! Stub title source for platforms without window-title introspection
//!
//! The overlay only targets the macOS Deezer app; other platforms still
//! compile and report themselves as unsupported at runtime.

use super::{TitleError, TitleReading, TitleSource};

pub struct UnsupportedTitleSource;

impl UnsupportedTitleSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnsupportedTitleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleSource for UnsupportedTitleSource {
    fn read_title(&self) -> Result<TitleReading, TitleError> {
        Err(TitleError::Unsupported)
    }
}
