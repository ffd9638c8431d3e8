//! # CLI Module
//!
//! User-facing commands. Each one wires configuration, the token cache and
//! the Spotify client together, calls into the library and turns the result
//! into colored status lines or tables.
//!
//! - [`auth`] - authorization-code flow with PKCE, stores the token
//! - [`setlist`] - shows the songs the setlist service found for a URL
//! - [`playlist`] - fetches a setlist, matches it against Spotify and creates
//!   a private playlist in set order
//!
//! ```bash
//! setlistify auth
//! setlistify setlist https://www.setlist.fm/setlist/...
//! setlistify playlist https://www.setlist.fm/setlist/... --name "Indio 2025"
//! ```
//!
//! Failures end the process through the `error!` macro with exit code 1.

mod auth;
mod playlist;
mod setlist;

pub use auth::auth;
pub use playlist::playlist;
pub use setlist::setlist;
