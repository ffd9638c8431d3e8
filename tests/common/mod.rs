#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use setlistify::{
    Error, Res,
    assembler::PlaylistApi,
    resolver::CatalogSearch,
    setlist::SetlistSource,
    spotify::session::{AuthProvider, Session},
    types::{CatalogTrack, Playlist, SetlistEvent, TrackArtist},
};

pub fn track(id: &str, name: &str, artists: &[&str]) -> CatalogTrack {
    CatalogTrack {
        id: id.to_string(),
        name: name.to_string(),
        uri: Some(format!("spotify:track:{}", id)),
        artists: artists
            .iter()
            .map(|a| TrackArtist {
                id: None,
                name: a.to_string(),
            })
            .collect(),
    }
}

pub fn titles(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Answers queries from a fixed table; unknown queries find nothing.
/// Optional per-query delays let later songs finish first.
#[derive(Default)]
pub struct FakeSearch {
    results: HashMap<String, CatalogTrack>,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, fn() -> Error>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, track: CatalogTrack) -> Self {
        self.results.insert(query.to_string(), track);
        self
    }

    pub fn delayed(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn failing(mut self, query: &str, err: fn() -> Error) -> Self {
        self.failures.insert(query.to_string(), err);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSearch for FakeSearch {
    async fn search(&self, query: &str) -> Res<Option<CatalogTrack>> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(err) = self.failures.get(query) {
            return Err(err());
        }
        Ok(self.results.get(query).cloned())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistCall {
    Create {
        owner_id: String,
        name: String,
        description: String,
        public: bool,
    },
    Append {
        playlist_id: String,
        track_ids: Vec<String>,
    },
}

/// Records every call; the append with the given 1-based number fails.
#[derive(Default)]
pub struct RecordingPlaylistApi {
    pub calls: Mutex<Vec<PlaylistCall>>,
    pub fail_append: Option<usize>,
    pub fail_create: bool,
    pub fail_with_auth: bool,
    appends: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingPlaylistApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_append(number: usize) -> Self {
        Self {
            fail_append: Some(number),
            ..Self::default()
        }
    }

    /// Like [`Self::failing_append`], but the append is rejected with an
    /// authentication failure.
    pub fn auth_failing_append(number: usize) -> Self {
        Self {
            fail_append: Some(number),
            fail_with_auth: true,
            ..Self::default()
        }
    }

    /// Most appends that were running at the same time.
    pub fn max_concurrent_appends(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<PlaylistCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn appended_sizes(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PlaylistCall::Append { track_ids, .. } => Some(track_ids.len()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl PlaylistApi for RecordingPlaylistApi {
    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Res<Playlist> {
        // settle asynchronously so a concurrent append would overtake it
        tokio::time::sleep(Duration::from_millis(5)).await;
        if self.fail_create {
            return Err(Error::Api {
                status: 403,
                message: "Insufficient client scope".to_string(),
            });
        }
        self.calls.lock().unwrap().push(PlaylistCall::Create {
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            public,
        });
        Ok(Playlist {
            id: "playlist-1".to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            public: Some(public),
            snapshot_id: None,
        })
    }

    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Res<()> {
        let number = self.appends.fetch_add(1, Ordering::SeqCst) + 1;
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        // later chunks finish first, so overlapping appends would also reorder
        tokio::time::sleep(Duration::from_millis(10u64.saturating_sub(number as u64))).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_append == Some(number) {
            if self.fail_with_auth {
                return Err(Error::AuthFailure("refresh rejected".to_string()));
            }
            return Err(Error::Api {
                status: 500,
                message: "Server error".to_string(),
            });
        }
        self.calls.lock().unwrap().push(PlaylistCall::Append {
            playlist_id: playlist_id.to_string(),
            track_ids: track_ids.to_vec(),
        });
        Ok(())
    }
}

/// Hands out "stale" until refreshed, then "fresh-<n>".
pub struct CountingAuth {
    pub refreshes: AtomicUsize,
    pub refresh_delay: Duration,
    pub refresh_fails: bool,
}

impl CountingAuth {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            refreshes: AtomicUsize::new(0),
            refresh_delay: Duration::from_millis(20),
            refresh_fails: false,
        })
    }

    pub fn without_refresh_token() -> Arc<Self> {
        Arc::new(Self {
            refreshes: AtomicUsize::new(0),
            refresh_delay: Duration::ZERO,
            refresh_fails: true,
        })
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for CountingAuth {
    async fn get_valid_token(&self) -> Res<String> {
        Ok("stale".to_string())
    }

    async fn refresh_token(&self) -> Res<String> {
        let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.refresh_delay).await;
        if self.refresh_fails {
            return Err(Error::AuthFailure("no refresh token available".to_string()));
        }
        Ok(format!("fresh-{}", n))
    }
}

/// Search behind a session: the "stale" token is rejected with a 401.
pub struct SessionSearch {
    pub session: Session,
    pub tracks: HashMap<String, CatalogTrack>,
    pub tokens_seen: Mutex<Vec<String>>,
}

impl SessionSearch {
    pub fn new(auth: Arc<CountingAuth>, tracks: HashMap<String, CatalogTrack>) -> Self {
        Self {
            session: Session::new(auth),
            tracks,
            tokens_seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CatalogSearch for SessionSearch {
    async fn search(&self, query: &str) -> Res<Option<CatalogTrack>> {
        self.session
            .call(|token| async move {
                self.tokens_seen.lock().unwrap().push(token.clone());
                tokio::time::sleep(Duration::from_millis(2)).await;
                if token == "stale" {
                    return Err(Error::AuthExpired);
                }
                Ok(self.tracks.get(query).cloned())
            })
            .await
    }
}

pub struct FakeSetlistSource {
    pub event: Option<SetlistEvent>,
}

#[async_trait]
impl SetlistSource for FakeSetlistSource {
    async fn fetch_setlist(&self, url: &str) -> Res<SetlistEvent> {
        self.event
            .clone()
            .ok_or_else(|| Error::SetlistNotFound(url.to_string()))
    }
}

/// Always hands out the same token and cannot refresh.
pub struct StaticAuth(pub &'static str);

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn get_valid_token(&self) -> Res<String> {
        Ok(self.0.to_string())
    }

    async fn refresh_token(&self) -> Res<String> {
        Err(Error::AuthFailure("no refresh token available".to_string()))
    }
}
