use std::sync::LazyLock;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use regex::Regex;
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Splits a billing string like `"Kendrick Lamar & SZA"` into its artists.
///
/// Separators are `&`, `+` and the word `and`; `and` only counts when it
/// stands alone, so "Brandon" stays intact. Segments are trimmed, empty ones
/// are dropped, order and duplicates are kept.
pub fn split_artists(billing: &str) -> Vec<String> {
    ARTIST_SEPARATOR
        .split(billing)
        .map(str::trim)
        .filter(|artist| !artist.is_empty())
        .map(str::to_string)
        .collect()
}

static ARTIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:&|\+|\band\b)\s*").expect("artist separator pattern is valid")
});
