//! Window-title parser
//!
//! Deezer encodes the current track in its window title. Two formats are
//! known:
//!
//! - `"<track> - <artist> - Deezer"`, the desktop app's normal title.
//!   The artist part may itself contain `" - "`, so only the FIRST
//!   separator splits track from artist.
//! - `"<artist> - <track> | Deezer"`, an alternate title seen on some
//!   builds, with the artist listed first.
//!
//! Anything else (settings windows, login screens, bare `"Deezer"`) is
//! surfaced as `Unparsed` so the caller can show a waiting state instead of
//! a stale track.

use regex::Regex;
use std::sync::LazyLock;

/// Artist used when the title carries no artist part
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// Separator between the track and artist parts
const SEPARATOR: &str = " - ";

/// Anchored suffix of the normal dash-format title
static DASH_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" - Deezer$").unwrap());

/// Anchored suffix of the alternate pipe-format title
static PIPE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" \| Deezer$").unwrap());

/// Result of parsing one window title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTitle {
    /// The title carried a track
    Track { title: String, artist: String },

    /// The title matched no known format; the raw text is kept as a hint
    Unparsed { raw: String },
}

/// Parse a raw Deezer window title into track info.
pub fn parse_window_title(raw: &str) -> ParsedTitle {
    let trimmed = raw.trim();

    if let Some(track_part) = strip_suffix(&DASH_SUFFIX_RE, trimmed) {
        return parse_dash_format(&track_part, trimmed);
    }

    if let Some(track_part) = strip_suffix(&PIPE_SUFFIX_RE, trimmed) {
        return parse_pipe_format(&track_part, trimmed);
    }

    ParsedTitle::Unparsed {
        raw: trimmed.to_string(),
    }
}

/// Strip an anchored suffix, returning the trimmed remainder on a match.
fn strip_suffix(suffix: &Regex, title: &str) -> Option<String> {
    if !suffix.is_match(title) {
        return None;
    }
    Some(suffix.replace(title, "").trim().to_string())
}

/// Normal format: track first, artist second. The artist keeps any internal
/// `" - "` occurrences intact.
fn parse_dash_format(track_part: &str, raw: &str) -> ParsedTitle {
    if track_part.is_empty() {
        return ParsedTitle::Unparsed {
            raw: raw.to_string(),
        };
    }

    match track_part.split_once(SEPARATOR) {
        Some((title, artist)) => ParsedTitle::Track {
            title: title.trim().to_string(),
            artist: artist.trim().to_string(),
        },
        None => ParsedTitle::Track {
            title: track_part.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
        },
    }
}

/// Alternate format: artist first, track second.
fn parse_pipe_format(track_part: &str, raw: &str) -> ParsedTitle {
    if track_part.is_empty() {
        return ParsedTitle::Unparsed {
            raw: raw.to_string(),
        };
    }

    match track_part.split_once(SEPARATOR) {
        Some((artist, title)) => ParsedTitle::Track {
            title: title.trim().to_string(),
            artist: artist.trim().to_string(),
        },
        None => ParsedTitle::Track {
            title: track_part.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
        },
    }
}
