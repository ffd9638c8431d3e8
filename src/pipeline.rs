//! One "setlist URL to playlist" run: fetch, resolve, create.

use tracing::info;

use crate::{
    assembler::{PlaylistApi, PlaylistAssembler},
    audit::{self, AuditReport},
    error::{Error, Res},
    resolver::{CatalogResolver, CatalogSearch},
    setlist::SetlistSource,
    types::{Playlist, PlaylistRequest, ResolvedTrack, SetlistEvent},
};

/// Name used when the caller does not pick one.
pub fn default_playlist_name(event: &SetlistEvent) -> String {
    format!("{} Setlist", event.artist.trim())
}

pub struct PipelineOutcome {
    pub event: SetlistEvent,
    pub tracks: Vec<ResolvedTrack>,
    pub playlist: Playlist,
    pub audit: Option<AuditReport>,
}

pub struct Pipeline<Src, S, P> {
    source: Src,
    resolver: CatalogResolver<S>,
    assembler: PlaylistAssembler<P>,
    audit: bool,
}

impl<Src, S, P> Pipeline<Src, S, P>
where
    Src: SetlistSource,
    S: CatalogSearch,
    P: PlaylistApi,
{
    pub fn new(source: Src, search: S, api: P) -> Self {
        Self {
            source,
            resolver: CatalogResolver::new(search),
            assembler: PlaylistAssembler::new(api),
            audit: false,
        }
    }

    pub fn with_audit(mut self, audit: bool) -> Self {
        self.audit = audit;
        self
    }

    pub async fn fetch(&self, url: &str) -> Res<SetlistEvent> {
        self.source.fetch_setlist(url).await
    }

    /// Resolves the event's songs. Zero matches is [`Error::EmptyResultSet`]:
    /// a playlist without tracks is not worth creating.
    pub async fn resolve(&self, event: &SetlistEvent) -> Res<Vec<ResolvedTrack>> {
        let tracks = self.resolver.resolve(&event.artist, &event.setlist).await?;
        if tracks.is_empty() {
            return Err(Error::EmptyResultSet);
        }
        info!(
            artist = %event.artist,
            requested = event.setlist.len(),
            resolved = tracks.len(),
            "songs matched"
        );
        Ok(tracks)
    }

    pub async fn run(&self, url: &str, owner_id: &str, name: Option<&str>) -> Res<PipelineOutcome> {
        let event = self.fetch(url).await?;
        let tracks = self.resolve(&event).await?;

        let audit = self
            .audit
            .then(|| audit::report(&tracks, event.setlist.len()));

        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| default_playlist_name(&event));
        let request = PlaylistRequest::from_tracks(owner_id.to_string(), name, &tracks);
        let playlist = self.assembler.submit(&request).await?;

        Ok(PipelineOutcome {
            event,
            tracks,
            playlist,
            audit,
        })
    }
}
