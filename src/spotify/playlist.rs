use async_trait::async_trait;

use crate::{
    assembler::{MAX_TRACKS_PER_REQUEST, PlaylistApi},
    error::{Error, Res},
    spotify::client::SpotifyClient,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest, Playlist,
    },
};

/// Spotify's append endpoint takes track URIs, not bare ids.
pub fn track_uri(track_id: &str) -> String {
    if track_id.starts_with("spotify:") {
        track_id.to_string()
    } else {
        format!("spotify:track:{}", track_id)
    }
}

#[async_trait]
impl PlaylistApi for SpotifyClient {
    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Res<Playlist> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
            collaborative: false,
        };

        self.post_json(&format!("/users/{}/playlists", owner_id), &body)
            .await
    }

    async fn append_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Res<()> {
        if track_ids.len() > MAX_TRACKS_PER_REQUEST {
            return Err(Error::InvalidRequest(format!(
                "cannot add {} tracks in one request, the limit is {}",
                track_ids.len(),
                MAX_TRACKS_PER_REQUEST
            )));
        }

        let body = AddTrackToPlaylistRequest {
            uris: track_ids.iter().map(|id| track_uri(id)).collect(),
        };

        let _: AddTrackToPlaylistResponse = self
            .post_json(&format!("/playlists/{}/tracks", playlist_id), &body)
            .await?;
        Ok(())
    }
}
