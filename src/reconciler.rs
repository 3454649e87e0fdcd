//! Playback state reconciler
//!
//! One `tick` turns one title reading into one [`NowPlaying`] snapshot:
//! classify the reading, parse the title, detect whether the track changed
//! since the previous tick, and fetch artwork only on a change (or while
//! artwork is still missing). A failed tick degrades to an error snapshot;
//! the loop itself must never stop. The only reading allowed a process-level
//! side effect is an absent Deezer, which asks the host to shut down.
//!
//! The play/pause flag lives here and nowhere else. The window title carries
//! no play-state signal, so the flag is only ever flipped by user transport
//! actions and carried forward through every parse.

use crate::artwork::{ArtworkResolver, CoverLookup, DeezerSearch};
use crate::parser::{self, ParsedTitle};
use crate::platform::{TitleError, TitleReading};
use crate::{ErrorKind, NowPlaying, TrackKey};
use log::{debug, info};

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    /// Snapshot to push to the presentation layer
    pub snapshot: NowPlaying,

    /// Whether the host should terminate the overlay (Deezer is gone)
    pub shutdown: bool,
}

impl Tick {
    fn emit(snapshot: NowPlaying) -> Self {
        Self {
            snapshot,
            shutdown: false,
        }
    }
}

/// Owns all mutable now-playing state: the play/pause flag, the last seen
/// track identity, the last resolved artwork and the artwork cache.
///
/// Constructed at application start, dropped at shutdown; everything else
/// in the crate is stateless, which keeps this loop testable without a UI.
pub struct Reconciler<C: CoverLookup = DeezerSearch> {
    /// Believed play state. Starts true: a freshly launched overlay next to
    /// a Deezer window showing a track is almost always mid-playback.
    playing: bool,

    /// Identity of the track seen on the previous parsed tick
    last_track_key: Option<TrackKey>,

    /// Artwork resolved for `last_track_key` (None while lookups fail)
    last_artwork: Option<String>,

    artwork: ArtworkResolver<C>,
}

impl Reconciler<DeezerSearch> {
    pub fn new() -> Self {
        Self::with_resolver(ArtworkResolver::new())
    }
}

impl Default for Reconciler<DeezerSearch> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CoverLookup> Reconciler<C> {
    pub fn with_resolver(artwork: ArtworkResolver<C>) -> Self {
        Self {
            playing: true,
            last_track_key: None,
            last_artwork: None,
            artwork,
        }
    }

    /// Reconcile one title reading into a snapshot.
    pub fn tick(&mut self, reading: Result<TitleReading, TitleError>) -> Tick {
        match reading {
            Err(e) => {
                debug!("title reading failed: {e}");
                Tick::emit(NowPlaying::from_error(ErrorKind::Unknown))
            }
            Ok(TitleReading::ApplicationAbsent) => {
                info!("Deezer is not running, requesting shutdown");
                Tick {
                    snapshot: NowPlaying::from_error(ErrorKind::ApplicationNotFound),
                    shutdown: true,
                }
            }
            Ok(TitleReading::NoWindow) => {
                Tick::emit(NowPlaying::from_error(ErrorKind::NoWindow))
            }
            Ok(TitleReading::Window(raw)) => match parser::parse_window_title(&raw) {
                ParsedTitle::Unparsed { raw } => Tick::emit(NowPlaying::waiting(raw)),
                ParsedTitle::Track { title, artist } => self.reconcile_track(title, artist),
            },
        }
    }

    /// Track-change detection plus conditional artwork enrichment.
    fn reconcile_track(&mut self, title: String, artist: String) -> Tick {
        let key = TrackKey::new(&title, &artist);
        let key_changed = self.last_track_key.as_ref() != Some(&key);

        // Look up artwork on a track change, and keep retrying while the
        // current track has none. An unchanged track with known artwork
        // costs nothing.
        if key_changed || self.last_artwork.is_none() {
            if key_changed {
                debug!("track changed: {key}");
            }
            self.last_artwork = self.artwork.resolve(&key);
            self.last_track_key = Some(key);
        }

        Tick::emit(NowPlaying::track(
            title,
            artist,
            self.playing,
            self.last_artwork.clone(),
        ))
    }

    /// Flip the play/pause flag. Optimistic: the flip happens whether or
    /// not the transport command behind it succeeded, and the caller should
    /// re-poll immediately so the change is visible before the next
    /// scheduled tick. Returns the new state.
    pub fn toggle_play_pause(&mut self) -> bool {
        self.playing = !self.playing;
        debug!("play state toggled to {}", self.playing);
        self.playing
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}
