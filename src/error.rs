//! Crate-wide error type.
//!
//! Every layer returns [`Res`], so failures from the Spotify client, the
//! setlist service and the local token cache reach the command layer as a
//! single typed value. A song without a catalog match is not an error: the
//! search capability reports it as `Ok(None)`.

use thiserror::Error;

/// A convenient Result type alias used throughout the crate.
pub type Res<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The access token was rejected (HTTP 401). The session recovers from
    /// this once by refreshing; callers above the session never see it
    /// unless they talk to the API without one.
    #[error("access token expired")]
    AuthExpired,

    /// Authentication cannot be recovered for this operation.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// Not a single song of the setlist could be matched.
    #[error("no songs found on Spotify")]
    EmptyResultSet,

    #[error("failed to create playlist '{name}': {source}")]
    PlaylistCreate {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// A chunk append failed. The playlist exists and keeps the first
    /// `appended` tracks.
    #[error("failed to add tracks to playlist {playlist_id} after {appended} tracks: {source}")]
    Append {
        playlist_id: String,
        appended: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Spotify API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid setlist url '{0}'")]
    InvalidSetlistUrl(String),

    #[error("no setlist found for {0}")]
    SetlistNotFound(String),

    /// The page loaded but does not look like a setlist page.
    #[error("no setlist on page {0}")]
    UnreadableSetlistPage(String),

    #[error("no working proxy left to fetch {0}")]
    ProxiesExhausted(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
