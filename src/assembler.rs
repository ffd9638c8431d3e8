//! Playlist assembler: creates the playlist and appends tracks in chunks.
//!
//! Spotify accepts at most [`MAX_TRACKS_PER_REQUEST`] tracks per append, and
//! the order of the playlist is the order the appends arrive in, so chunks
//! are submitted strictly one after the other. If an append fails the
//! remaining chunks are skipped and the playlist is left as it is; the
//! returned [`Error::Append`] says how many tracks made it, whatever the
//! cause, authentication failures included.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    error::{Error, Res},
    types::{Playlist, PlaylistRequest},
};

pub const MAX_TRACKS_PER_REQUEST: usize = 100;
pub const PLAYLIST_DESCRIPTION: &str = "Created via Setlist App";

/// Playlist endpoints of the streaming service.
#[async_trait]
pub trait PlaylistApi: Send + Sync {
    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Res<Playlist>;

    /// `track_ids` never holds more than [`MAX_TRACKS_PER_REQUEST`] entries.
    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Res<()>;
}

#[async_trait]
impl<P: PlaylistApi + ?Sized> PlaylistApi for &P {
    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Res<Playlist> {
        (**self)
            .create_playlist(owner_id, name, description, public)
            .await
    }

    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Res<()> {
        (**self).append_tracks(playlist_id, track_ids).await
    }
}

pub struct PlaylistAssembler<P> {
    api: P,
}

impl<P: PlaylistApi> PlaylistAssembler<P> {
    pub fn new(api: P) -> Self {
        Self { api }
    }

    /// Creates a private playlist `name` for `owner_id` holding `track_ids`
    /// in the given order. An empty `track_ids` creates an empty playlist.
    pub async fn create(&self, owner_id: &str, name: &str, track_ids: &[String]) -> Res<Playlist> {
        if owner_id.trim().is_empty() {
            return Err(Error::InvalidRequest(
                "playlist owner id must not be empty".to_string(),
            ));
        }

        let playlist = self
            .api
            .create_playlist(owner_id, name, PLAYLIST_DESCRIPTION, false)
            .await
            .map_err(|e| match e {
                Error::AuthFailure(_) => e,
                other => Error::PlaylistCreate {
                    name: name.to_string(),
                    source: Box::new(other),
                },
            })?;
        info!(playlist = %playlist.id, %name, "playlist created");

        let mut appended = 0;
        for chunk in track_ids.chunks(MAX_TRACKS_PER_REQUEST) {
            debug!(playlist = %playlist.id, size = chunk.len(), "appending tracks");
            self.api
                .append_tracks(&playlist.id, chunk)
                .await
                .map_err(|e| Error::Append {
                    playlist_id: playlist.id.clone(),
                    appended,
                    source: Box::new(e),
                })?;
            appended += chunk.len();
        }

        info!(playlist = %playlist.id, tracks = appended, "tracks appended");
        Ok(playlist)
    }

    pub async fn submit(&self, request: &PlaylistRequest) -> Res<Playlist> {
        self.create(&request.owner_id, &request.name, &request.track_ids)
            .await
    }
}
