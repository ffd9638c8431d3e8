//! # API Module
//!
//! HTTP endpoints of the short-lived local server that runs during
//! `setlistify auth`.
//!
//! - [`callback`] receives the authorization code from Spotify's redirect and
//!   exchanges it, together with the PKCE verifier, for a token.
//! - [`health`] reports name and version; handy for checking that
//!   `SERVER_ADDRESS` is reachable before registering the redirect URI.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use setlistify::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
