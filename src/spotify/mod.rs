//! # Spotify Integration Module
//!
//! Everything that talks to Spotify's accounts service and Web API.
//!
//! ```text
//! resolver / assembler
//!          ↓  CatalogSearch, PlaylistApi
//! SpotifyClient (reqwest, JSON)
//!          ↓  every request
//! Session (current token, refresh on 401, single-flight)
//!          ↓  AuthProvider
//! TokenManager (cached token file) → accounts service
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - authorization-code flow with PKCE, code exchange and token
//!   refresh against `SPOTIFY_API_TOKEN_URL`
//! - [`session`] - the shared access token; a 401 triggers one refresh that
//!   all concurrently failing requests share, then one retry
//! - [`client`] - reqwest wrapper mapping HTTP status codes onto
//!   [`crate::error::Error`]
//! - [`search`] - `GET /search`, top track for a field-filtered query
//! - [`playlist`] - `POST /users/{id}/playlists` and
//!   `POST /playlists/{id}/tracks`
//!
//! ## Errors
//!
//! - 401 becomes `AuthExpired` and is handled by the session
//! - any other non-2xx becomes `Api { status, message }` with Spotify's own
//!   error message when the body carries one
//! - there is no retry for 429 or 5xx; those surface to the caller

pub mod auth;
pub mod client;
pub mod playlist;
pub mod search;
pub mod session;
