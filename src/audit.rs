//! Match quality report.
//!
//! Compares the name of every matched catalog track with the setlist title
//! it was looked up for. Off unless `--audit` or `SETLIST_MATCH_AUDIT` asks
//! for it, and never consulted when deciding what goes into a playlist.

use crate::types::{AuditTableRow, ResolvedTrack};

pub struct AuditReport {
    pub rows: Vec<AuditTableRow>,
    pub requested: usize,
    pub matched: usize,
}

impl AuditReport {
    /// Share of requested songs whose match looks like the same song.
    pub fn success_rate(&self) -> f64 {
        if self.requested == 0 {
            return 0.0;
        }
        self.matched as f64 / self.requested as f64
    }
}

/// Case-insensitive containment of `requested` in `catalog_name`, both
/// trimmed.
pub fn is_same_song(catalog_name: &str, requested: &str) -> bool {
    catalog_name
        .trim()
        .to_lowercase()
        .contains(&requested.trim().to_lowercase())
}

/// `requested` is the length of the setlist the tracks were resolved from.
pub fn report(tracks: &[ResolvedTrack], requested: usize) -> AuditReport {
    let rows: Vec<AuditTableRow> = tracks
        .iter()
        .map(|t| AuditTableRow {
            requested: t.title.clone(),
            matched: t.catalog_name.clone(),
            same: is_same_song(&t.catalog_name, &t.title),
        })
        .collect();
    let matched = rows.iter().filter(|r| r.same).count();

    AuditReport {
        rows,
        requested,
        matched,
    }
}
