//! Configuration management for setlistify.
//!
//! Values come from environment variables, which are seeded from a `.env`
//! file in the local data directory:
//!
//! - Linux: `~/.local/share/setlistify/.env`
//! - macOS: `~/Library/Application Support/setlistify/.env`
//! - Windows: `%LOCALAPPDATA%/setlistify/.env`
//!
//! Variables already present in the process environment win over the file.
//! Endpoints of the Spotify accounts service and Web API fall back to the
//! public defaults; credentials never do.

use std::{env, path::PathBuf};

use crate::error::{Error, Res};

const DEFAULT_SCOPE: &str =
    "playlist-modify-public playlist-modify-private user-read-private user-read-email";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_PROXY_CHECK_URL: &str = "https://httpbin.org/ip";

/// Loads environment variables from the `.env` file in the local data
/// directory, creating the directory when it is missing.
///
/// A missing `.env` file is not an error: every variable can also be set in
/// the environment directly. A file that exists but cannot be parsed is.
pub async fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Config(format!(
            "cannot read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Root of everything setlistify keeps on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("setlistify");
    path
}

/// Address the local OAuth callback server binds to, e.g. `127.0.0.1:8080`.
pub fn server_addr() -> Res<String> {
    required("SERVER_ADDRESS")
}

/// Spotify user that owns created playlists. When unset the owner is looked
/// up through `GET /me`.
pub fn spotify_user() -> Option<String> {
    optional("SPOTIFY_USER_ID")
}

pub fn spotify_client_id() -> Res<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Must match the redirect URI registered for the Spotify application.
pub fn spotify_redirect_uri() -> Res<String> {
    required("SPOTIFY_API_REDIRECT_URI")
}

pub fn spotify_scope() -> String {
    optional("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string())
}

pub fn spotify_apiauth_url() -> String {
    optional("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string())
}

pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string())
}

/// Base URL of an external setlist scraping service. When unset, setlist
/// pages are read directly.
pub fn setlist_service_url() -> Option<String> {
    optional("SETLIST_SERVICE_URL")
}

/// Proxy list used with `--use-proxies`, `proxy-list.txt` in the data
/// directory unless `SETLIST_PROXY_LIST` says otherwise.
pub fn proxy_list_path() -> PathBuf {
    optional("SETLIST_PROXY_LIST")
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir().join("proxy-list.txt"))
}

pub fn proxy_check_url() -> String {
    optional("SETLIST_PROXY_CHECK_URL").unwrap_or_else(|| DEFAULT_PROXY_CHECK_URL.to_string())
}

/// Whether the match audit report is printed after resolving a setlist.
pub fn match_audit_enabled() -> bool {
    optional("SETLIST_MATCH_AUDIT")
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn required(name: &str) -> Res<String> {
    optional(name).ok_or_else(|| Error::Config(format!("{} must be set", name)))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
