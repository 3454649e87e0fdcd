//! Deezer now-playing reader
//!
//! This crate mirrors the "now playing" state of the Deezer desktop app.
//! It polls Deezer's window title via OS scripting, parses track/artist out
//! of the title, fetches cover art from the public Deezer search API and
//! forwards transport commands (play/pause, next, previous) to the system
//! media layer.

use serde::{Deserialize, Serialize};

pub mod artwork;
pub mod parser;
pub mod platform;
pub mod reconciler;
pub mod transport;
#[cfg(target_os = "macos")]
pub mod tray;
pub mod util;

pub use artwork::{ArtworkResolver, CoverLookup, DeezerSearch};
pub use reconciler::{Reconciler, Tick};
pub use transport::{TransportCommand, TransportSink};

/// Why a snapshot carries no track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Deezer is not running. Fatal to the polling loop.
    ApplicationNotFound,

    /// Deezer is running but exposes no readable window (usually a missing
    /// automation permission). Transient.
    NoWindow,

    /// The window title did not match any known track format. Transient,
    /// surfaced as a waiting state rather than an error.
    ParseFailure,

    /// Reading the title failed for some other reason (timeout, script
    /// error). Transient.
    Unknown,
}

/// The now-playing snapshot pushed to the presentation layer on every tick.
///
/// `title` and `artist` are always both present or both absent; a partial
/// parse is never surfaced. `artwork_url` is only ever present alongside a
/// track. Use the constructors below rather than building one by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    /// Track title
    pub title: Option<String>,

    /// Track artist ("Unknown" when the title carried no artist part)
    pub artist: Option<String>,

    /// Whether playback is believed active. Tracked from user transport
    /// actions; the window title carries no play/pause signal.
    pub is_playing: bool,

    /// Cover art URL from the Deezer search API
    pub artwork_url: Option<String>,

    /// Raw window title, kept as a hint when it could not be parsed
    pub window_title: Option<String>,

    /// Set when no track could be derived this tick
    pub error: Option<ErrorKind>,
}

impl NowPlaying {
    /// Snapshot for a parsed track.
    pub fn track(
        title: String,
        artist: String,
        is_playing: bool,
        artwork_url: Option<String>,
    ) -> Self {
        Self {
            title: Some(title),
            artist: Some(artist),
            is_playing,
            artwork_url,
            window_title: None,
            error: None,
        }
    }

    /// Snapshot for a window title that matched no known track format.
    pub fn waiting(raw_title: String) -> Self {
        Self {
            window_title: Some(raw_title),
            error: Some(ErrorKind::ParseFailure),
            ..Self::default()
        }
    }

    /// Snapshot for a tick that produced no title at all.
    pub fn from_error(kind: ErrorKind) -> Self {
        Self {
            error: Some(kind),
            ..Self::default()
        }
    }

    /// Whether this snapshot carries a track.
    pub fn has_track(&self) -> bool {
        self.title.is_some()
    }

    /// Identity key of the carried track, if any.
    pub fn track_key(&self) -> Option<TrackKey> {
        match (&self.title, &self.artist) {
            (Some(title), Some(artist)) => Some(TrackKey::new(title, artist)),
            _ => None,
        }
    }

    /// One-line status text for the tray menu.
    pub fn status_line(&self) -> String {
        match self.error {
            Some(ErrorKind::ApplicationNotFound) => "Deezer not running".to_string(),
            Some(ErrorKind::NoWindow) => "No window - check automation permission".to_string(),
            Some(ErrorKind::ParseFailure) => "Waiting for playback...".to_string(),
            Some(ErrorKind::Unknown) => "Deezer unreachable".to_string(),
            None => match (&self.title, &self.artist) {
                (Some(title), Some(artist)) => {
                    let mark = if self.is_playing { "▶" } else { "⏸" };
                    format!(
                        "{} {}",
                        mark,
                        util::truncate(&format!("{title} — {artist}"), 40)
                    )
                }
                _ => "Nothing playing".to_string(),
            },
        }
    }
}

/// Equality key for track-change detection: the `(title, artist)` pair.
///
/// Exact string equality; the window title is the canonical source, so no
/// case folding or other normalization is applied beyond the parser's trim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackKey {
    title: String,
    artist: String,
}

impl TrackKey {
    pub fn new(title: &str, artist: &str) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }
}

impl std::fmt::Display for TrackKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.title, self.artist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_constructor_sets_both_fields() {
        let snap = NowPlaying::track("Song".into(), "Artist".into(), true, None);
        assert_eq!(snap.title.as_deref(), Some("Song"));
        assert_eq!(snap.artist.as_deref(), Some("Artist"));
        assert!(snap.is_playing);
        assert!(snap.error.is_none());
        assert!(snap.window_title.is_none());
    }

    #[test]
    fn test_waiting_carries_hint_and_parse_failure() {
        let snap = NowPlaying::waiting("Deezer Settings".into());
        assert!(snap.title.is_none());
        assert!(snap.artist.is_none());
        assert!(snap.artwork_url.is_none());
        assert_eq!(snap.window_title.as_deref(), Some("Deezer Settings"));
        assert_eq!(snap.error, Some(ErrorKind::ParseFailure));
    }

    #[test]
    fn test_from_error_has_no_track() {
        for kind in [
            ErrorKind::ApplicationNotFound,
            ErrorKind::NoWindow,
            ErrorKind::Unknown,
        ] {
            let snap = NowPlaying::from_error(kind);
            assert!(!snap.has_track());
            assert!(!snap.is_playing);
            assert!(snap.artwork_url.is_none());
            assert_eq!(snap.error, Some(kind));
        }
    }

    #[test]
    fn test_track_key_equality() {
        let a = TrackKey::new("Song", "Artist");
        let b = TrackKey::new("Song", "Artist");
        let c = TrackKey::new("Song", "Other Artist");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_track_key_from_snapshot() {
        let snap = NowPlaying::track("Song".into(), "Artist".into(), true, None);
        assert_eq!(snap.track_key(), Some(TrackKey::new("Song", "Artist")));
        assert_eq!(
            NowPlaying::from_error(ErrorKind::NoWindow).track_key(),
            None
        );
    }

    #[test]
    fn test_status_line_states() {
        assert_eq!(
            NowPlaying::from_error(ErrorKind::ApplicationNotFound).status_line(),
            "Deezer not running"
        );
        assert_eq!(
            NowPlaying::waiting("Deezer".into()).status_line(),
            "Waiting for playback..."
        );
        let playing = NowPlaying::track("Song".into(), "Artist".into(), true, None);
        assert!(playing.status_line().contains("Song — Artist"));
        assert!(playing.status_line().starts_with('▶'));
        let paused = NowPlaying::track("Song".into(), "Artist".into(), false, None);
        assert!(paused.status_line().starts_with('⏸'));
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snap = NowPlaying::track(
            "Song".into(),
            "Artist".into(),
            true,
            Some("https://cdn-images.dzcdn.net/cover.jpg".into()),
        );
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"title\":\"Song\""));
        assert!(json.contains("\"is_playing\":true"));
        let back: NowPlaying = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
