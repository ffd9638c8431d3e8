//! Catalog resolver: setlist titles in, ordered catalog tracks out.
//!
//! Every title is looked up independently and all lookups run concurrently.
//! Each lookup carries the title's setlist index, and the results are sorted
//! on that index before they are returned, so output order never depends on
//! which request finished first. Titles without a match are dropped; they do
//! not leave a gap and do not fail the run.

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::{
    error::Res,
    types::{CatalogTrack, ResolvedTrack, SongQuery},
    utils,
};

/// Catalog search. Returns the most relevant track for `query`, if any.
///
/// An expired token must surface as [`crate::error::Error::AuthExpired`] (or
/// as `AuthFailure` once recovery failed), never as `Ok(None)`.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search(&self, query: &str) -> Res<Option<CatalogTrack>>;
}

#[async_trait]
impl<S: CatalogSearch + ?Sized> CatalogSearch for &S {
    async fn search(&self, query: &str) -> Res<Option<CatalogTrack>> {
        (**self).search(query).await
    }
}

/// Builds the field-filtered search query for one title.
pub fn track_query(title: &str, artist: &str) -> String {
    let artist = artist.trim();
    if artist.is_empty() {
        format!("track:{}", title.trim())
    } else {
        format!("track:{} artist:{}", title.trim(), artist)
    }
}

pub struct CatalogResolver<S> {
    search: S,
}

impl<S: CatalogSearch> CatalogResolver<S> {
    pub fn new(search: S) -> Self {
        Self { search }
    }

    /// Resolves `titles` against the catalog for the artists in `billing`.
    ///
    /// The result is a subsequence of `titles` in setlist order. The first
    /// error from the search capability aborts the whole run.
    pub async fn resolve(&self, billing: &str, titles: &[String]) -> Res<Vec<ResolvedTrack>> {
        let artists = utils::split_artists(billing);
        if artists.len() > 1 {
            debug!(?artists, "billing names several artists");
        }

        let lookups = titles.iter().enumerate().map(|(index, title)| {
            let query = SongQuery {
                index,
                title: title.clone(),
            };
            self.resolve_song(query, billing, &artists)
        });

        let mut resolved: Vec<ResolvedTrack> =
            try_join_all(lookups).await?.into_iter().flatten().collect();
        resolved.sort_by_key(|track| track.index);

        debug!(
            requested = titles.len(),
            resolved = resolved.len(),
            "setlist resolved"
        );
        Ok(resolved)
    }

    async fn resolve_song(
        &self,
        query: SongQuery,
        billing: &str,
        artists: &[String],
    ) -> Res<Option<ResolvedTrack>> {
        // co-billed tracks are often credited to the whole billing
        if let Some(track) = self.lookup(&query, billing).await? {
            return Ok(Some(ResolvedTrack::new(query, track)));
        }

        if artists.len() > 1 {
            for artist in artists {
                if let Some(track) = self.lookup(&query, artist).await? {
                    return Ok(Some(ResolvedTrack::new(query, track)));
                }
            }
        }

        warn!(index = query.index, title = %query.title, "no catalog match");
        Ok(None)
    }

    async fn lookup(&self, query: &SongQuery, artist: &str) -> Res<Option<CatalogTrack>> {
        let search_query = track_query(&query.title, artist);
        let track = self.search.search(&search_query).await?;
        debug!(
            index = query.index,
            query = %search_query,
            found = track.as_ref().map(|t| t.name.as_str()),
            "catalog search"
        );
        Ok(track)
    }
}
