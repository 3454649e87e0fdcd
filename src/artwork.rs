//! Cover-art lookup against the Deezer search API
//!
//! One GET per uncached track, bounded by a global timeout. Successful
//! lookups are memoized for the life of the process; failures are not, so a
//! transient network error does not pin a track to placeholder art forever.
//!
//! Every failure path resolves to `None`; the overlay renders placeholder
//! artwork, never an error.

use crate::TrackKey;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use ureq::Agent;

/// Public search endpoint; no API key required
pub const SEARCH_ENDPOINT: &str = "https://api.deezer.com/search";

/// Deadline for one search request
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// User-Agent sent with every search request
const USER_AGENT: &str = "DeezerOverlay/1.0";

/// One-shot cover lookup. Implementations never error; any failure is
/// reported as `None`.
pub trait CoverLookup {
    fn lookup(&self, title: &str, artist: &str) -> Option<String>;
}

/// Top-level search payload: `{"data": [ ... ]}`
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    album: Option<SearchAlbum>,
}

#[derive(Debug, Deserialize)]
struct SearchAlbum {
    /// 250x250 cover variant
    cover_medium: Option<String>,
}

/// Extract the first result's medium cover URL from a search response body.
fn parse_search_response(body: &str) -> Option<String> {
    let response: SearchResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            debug!("malformed search response: {e}");
            return None;
        }
    };
    response.data.into_iter().next()?.album?.cover_medium
}

/// HTTP client for the Deezer search API.
pub struct DeezerSearch {
    agent: Agent,
}

impl DeezerSearch {
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(LOOKUP_TIMEOUT))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent: config.new_agent(),
        }
    }
}

impl Default for DeezerSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverLookup for DeezerSearch {
    /// Search `"<title> <artist>"` with `limit=1` and take the first
    /// result's `album.cover_medium`. Exactly one attempt; no retry.
    fn lookup(&self, title: &str, artist: &str) -> Option<String> {
        let query = format!("{title} {artist}");

        let mut response = match self
            .agent
            .get(SEARCH_ENDPOINT)
            .query("q", &query)
            .query("limit", "1")
            .call()
        {
            Ok(r) => r,
            Err(e) => {
                warn!("artwork lookup failed for {query:?}: {e}");
                return None;
            }
        };

        let body = match response.body_mut().read_to_string() {
            Ok(b) => b,
            Err(e) => {
                warn!("artwork response unreadable for {query:?}: {e}");
                return None;
            }
        };

        parse_search_response(&body)
    }
}

/// Artwork resolver with a process-lifetime cache keyed by [`TrackKey`].
///
/// Only successes are memoized; a failed lookup leaves the key uncached so a
/// later tick may retry it. Entries are never evicted nor overwritten:
/// the first successful resolution wins.
pub struct ArtworkResolver<C = DeezerSearch> {
    cache: HashMap<TrackKey, String>,
    client: C,
}

impl ArtworkResolver<DeezerSearch> {
    pub fn new() -> Self {
        Self::with_client(DeezerSearch::new())
    }
}

impl Default for ArtworkResolver<DeezerSearch> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CoverLookup> ArtworkResolver<C> {
    pub fn with_client(client: C) -> Self {
        Self {
            cache: HashMap::new(),
            client,
        }
    }

    /// Resolve cover art for a track. Cache hits return without any
    /// outbound call.
    pub fn resolve(&mut self, key: &TrackKey) -> Option<String> {
        if let Some(url) = self.cache.get(key) {
            return Some(url.clone());
        }

        let url = self.client.lookup(key.title(), key.artist())?;
        debug!("caching artwork for {key}: {url}");
        self.cache.insert(key.clone(), url.clone());
        Some(url)
    }

    /// Number of cached covers.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    /// Fake lookup that replays scripted outcomes and counts calls.
    struct ScriptedLookup {
        outcomes: RefCell<VecDeque<Option<String>>>,
        calls: Cell<usize>,
    }

    impl ScriptedLookup {
        fn new(outcomes: Vec<Option<String>>) -> Self {
            Self {
                outcomes: RefCell::new(outcomes.into()),
                calls: Cell::new(0),
            }
        }
    }

    impl CoverLookup for ScriptedLookup {
        fn lookup(&self, _title: &str, _artist: &str) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            self.outcomes.borrow_mut().pop_front().flatten()
        }
    }

    fn key() -> TrackKey {
        TrackKey::new("Song", "Artist")
    }

    #[test]
    fn test_second_resolve_hits_cache_without_outbound_call() {
        let mut resolver = ArtworkResolver::with_client(ScriptedLookup::new(vec![Some(
            "https://covers/1.jpg".to_string(),
        )]));

        assert_eq!(
            resolver.resolve(&key()).as_deref(),
            Some("https://covers/1.jpg")
        );
        assert_eq!(
            resolver.resolve(&key()).as_deref(),
            Some("https://covers/1.jpg")
        );
        assert_eq!(resolver.client.calls.get(), 1);
    }

    #[test]
    fn test_failure_is_not_cached_and_retry_can_succeed() {
        let mut resolver = ArtworkResolver::with_client(ScriptedLookup::new(vec![
            None,
            Some("https://covers/late.jpg".to_string()),
        ]));

        assert_eq!(resolver.resolve(&key()), None);
        assert_eq!(resolver.cached_count(), 0);

        // The earlier failure must not poison the key.
        assert_eq!(
            resolver.resolve(&key()).as_deref(),
            Some("https://covers/late.jpg")
        );
        assert_eq!(resolver.cached_count(), 1);
        assert_eq!(resolver.client.calls.get(), 2);
    }

    #[test]
    fn test_distinct_keys_resolve_independently() {
        let mut resolver = ArtworkResolver::with_client(ScriptedLookup::new(vec![
            Some("https://covers/a.jpg".to_string()),
            Some("https://covers/b.jpg".to_string()),
        ]));

        let a = TrackKey::new("Song A", "Artist A");
        let b = TrackKey::new("Song B", "Artist B");
        assert_eq!(resolver.resolve(&a).as_deref(), Some("https://covers/a.jpg"));
        assert_eq!(resolver.resolve(&b).as_deref(), Some("https://covers/b.jpg"));
        assert_eq!(resolver.cached_count(), 2);
    }

    // -- response parsing --

    const SAMPLE_RESPONSE: &str = r#"{
        "data": [
            {
                "id": 3135556,
                "title": "Harder, Better, Faster, Stronger",
                "artist": { "id": 27, "name": "Daft Punk" },
                "album": {
                    "id": 302127,
                    "title": "Discovery",
                    "cover_small": "https://cdn-images.dzcdn.net/images/cover/xyz/56x56.jpg",
                    "cover_medium": "https://cdn-images.dzcdn.net/images/cover/xyz/250x250.jpg",
                    "cover_big": "https://cdn-images.dzcdn.net/images/cover/xyz/500x500.jpg"
                }
            }
        ],
        "total": 1
    }"#;

    #[test]
    fn test_parse_takes_first_results_medium_cover() {
        assert_eq!(
            parse_search_response(SAMPLE_RESPONSE).as_deref(),
            Some("https://cdn-images.dzcdn.net/images/cover/xyz/250x250.jpg")
        );
    }

    #[test]
    fn test_parse_empty_result_set() {
        assert_eq!(parse_search_response(r#"{"data": [], "total": 0}"#), None);
    }

    #[test]
    fn test_parse_missing_data_field() {
        assert_eq!(parse_search_response(r#"{"total": 0}"#), None);
    }

    #[test]
    fn test_parse_result_without_cover() {
        assert_eq!(
            parse_search_response(r#"{"data": [{"id": 1, "album": {"id": 2}}]}"#),
            None
        );
        assert_eq!(parse_search_response(r#"{"data": [{"id": 1}]}"#), None);
    }

    #[test]
    fn test_parse_malformed_payload() {
        assert_eq!(parse_search_response("not json"), None);
        assert_eq!(parse_search_response(""), None);
        assert_eq!(parse_search_response(r#"{"data": "oops"}"#), None);
    }
}
