use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Response body of the accounts service token endpoint. `refresh_token` and
/// `scope` are absent on refresh responses that do not rotate them.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
}

/// What the setlist service returns for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetlistEvent {
    pub artist: String,
    pub date: String,
    pub location: String,
    pub setlist: Vec<String>,
}

#[derive(Tabled)]
pub struct SetlistTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub song: String,
}

/// One setlist entry on its way through the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongQuery {
    pub index: usize,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// A catalog track as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    pub artists: Vec<TrackArtist>,
}

/// A setlist entry matched to a catalog track. `index` is the entry's
/// position in the setlist it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTrack {
    pub index: usize,
    pub title: String,
    pub catalog_id: String,
    pub catalog_name: String,
    pub artist_names: Vec<String>,
}

impl ResolvedTrack {
    pub fn new(query: SongQuery, track: CatalogTrack) -> Self {
        Self {
            index: query.index,
            title: query.title,
            catalog_id: track.id,
            catalog_name: track.name,
            artist_names: track.artists.into_iter().map(|a| a.name).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistRequest {
    pub owner_id: String,
    pub name: String,
    pub track_ids: Vec<String>,
}

impl PlaylistRequest {
    /// Track ids keep the order of `tracks`.
    pub fn from_tracks(owner_id: String, name: String, tracks: &[ResolvedTrack]) -> Self {
        Self {
            owner_id,
            name,
            track_ids: tracks.iter().map(|t| t.catalog_id.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<CatalogTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

/// Handle of a playlist created on Spotify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Tabled)]
pub struct AuditTableRow {
    pub requested: String,
    pub matched: String,
    pub same: bool,
}
