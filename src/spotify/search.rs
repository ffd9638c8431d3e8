use async_trait::async_trait;

use crate::{
    error::Res,
    resolver::CatalogSearch,
    spotify::client::SpotifyClient,
    types::{CatalogTrack, SearchResponse},
};

/// Track search through `GET /search`, top result only.
#[async_trait]
impl CatalogSearch for SpotifyClient {
    async fn search(&self, query: &str) -> Res<Option<CatalogTrack>> {
        let response: SearchResponse = self
            .get_json(
                "/search",
                &[("q", query), ("type", "track"), ("limit", "1")],
            )
            .await?;

        Ok(response
            .tracks
            .and_then(|page| page.items.into_iter().next()))
    }
}
