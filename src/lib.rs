//! Setlist to Spotify playlist library
//!
//! Takes the song list of a concert from its setlist.fm page, matches every
//! song against Spotify's catalog and creates a playlist that follows the
//! order the songs were played in.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local OAuth callback server
//! - `assembler` - playlist creation with chunked, ordered track appends
//! - `audit` - optional report on how well matched names fit the setlist
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Crate-wide error type
//! - `management` - Cached OAuth token
//! - `pipeline` - fetch, resolve and create in one run
//! - `resolver` - song title to catalog track matching
//! - `server` - Local HTTP server for OAuth callbacks
//! - `setlist` - setlist.fm page reader, proxy pool and setlist service client
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers and billing string splitting

pub mod api;
pub mod assembler;
pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod pipeline;
pub mod resolver;
pub mod server;
pub mod setlist;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Res};

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching setlist...");
/// info!("Found {} songs", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program
/// with exit code 1.
///
/// Only for the command layer, where there is nobody left to hand the error
/// to. Library code returns [`Error`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("{} songs could not be found", missing);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
