//! Maps scraped tracks to catalog identifiers via the search endpoint.

use std::fmt::Display;

use log::{debug, warn};

use crate::{
    catalog::{api::SearchResponse, error::CatalogError, session::CatalogSession},
    domain::track::TrackRecord,
};

/// Outcome of searching one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// exactly one candidate
    Found { uri: String },
    /// several candidates, the first one was taken
    Ambiguous { uri: String, total: u64 },
    NotFound,
    SearchFailed { reason: String },
}

impl Resolution {
    pub fn uri(&self) -> Option<&str> {
        match self {
            Resolution::Found { uri } | Resolution::Ambiguous { uri, .. } => Some(uri),
            Resolution::NotFound | Resolution::SearchFailed { .. } => None,
        }
    }

    /// Line printed for every processed track
    pub fn describe<'a>(&'a self, track: &'a TrackRecord) -> impl Display + 'a {
        ResolutionLine {
            track,
            resolution: self,
        }
    }
}

struct ResolutionLine<'a> {
    track: &'a TrackRecord,
    resolution: &'a Resolution,
}

impl Display for ResolutionLine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let track = self.track;
        match self.resolution {
            Resolution::Found { uri } => write!(f, "{track}: {uri}"),
            Resolution::Ambiguous { uri, total } => write!(f, "{track} [{total}]: {uri}"),
            Resolution::NotFound => write!(f, "Not found: {track}"),
            Resolution::SearchFailed { reason } => write!(f, "Search failed: {track} ({reason})"),
        }
    }
}

/// Applies the disambiguation policy to a search response.
///
/// With several candidates the first one wins. Nothing guarantees it is the
/// best match, which is why such results are reported as ambiguous.
pub fn pick_candidate(response: &SearchResponse) -> Resolution {
    let total = response.tracks.total;
    let first = response.tracks.items.first().map(|item| item.uri.clone());
    match (total, first) {
        (0, _) => Resolution::NotFound,
        (1, Some(uri)) => Resolution::Found { uri },
        (_, Some(uri)) => Resolution::Ambiguous { uri, total },
        (_, None) => {
            warn!("Search reported {total} results but returned no items");
            Resolution::NotFound
        }
    }
}

/// Searches one track and stores its catalog id on success.
///
/// Search failures are reported in the returned [`Resolution`], only a
/// failing token refresh escapes as an error.
pub fn resolve(
    track: &mut TrackRecord,
    session: &mut CatalogSession,
) -> Result<Resolution, CatalogError> {
    let (api, access_token) = session.authorized()?;
    let resolution = match api.search_track(access_token, track.artist(), track.name()) {
        Ok(response) => pick_candidate(&response),
        Err(err) => {
            warn!("Search for {track} failed: {err}");
            Resolution::SearchFailed {
                reason: err.to_string(),
            }
        }
    };

    match &resolution {
        Resolution::Ambiguous { total, .. } => {
            warn!("{total} candidates for {track}, taking the first one");
        }
        Resolution::NotFound => debug!("No candidates for {track}"),
        Resolution::Found { .. } | Resolution::SearchFailed { .. } => {}
    }

    if let Some(uri) = resolution.uri() {
        track.set_external_id(uri);
    }
    Ok(resolution)
}

/// Resolves tracks one after another, in input order.
///
/// `on_resolved` is called right after each track so progress can be shown
/// while the remaining searches run.
pub fn resolve_all<F>(
    tracks: &mut [TrackRecord],
    session: &mut CatalogSession,
    mut on_resolved: F,
) -> Result<Vec<Resolution>, CatalogError>
where
    F: FnMut(&TrackRecord, &Resolution),
{
    let mut resolutions = Vec::with_capacity(tracks.len());
    for track in tracks.iter_mut() {
        let resolution = resolve(track, session)?;
        on_resolved(track, &resolution);
        resolutions.push(resolution);
    }
    Ok(resolutions)
}
