//! One run: scrape a playlist, resolve its tracks, write them into a new
//! playlist of the catalog service.

use std::io::Write;

use log::{info, warn};

use crate::{
    catalog::{
        api::ApiClient,
        playlist,
        resolver::{self, Resolution},
        session::CatalogSession,
    },
    config::Credentials,
    domain::track::TrackRecord,
    pipeline::error::PipelineError,
    scrapers,
    storage::session_store::SessionStore,
};

pub mod error;

#[derive(Debug)]
pub struct RunReport {
    pub tracks: Vec<TrackRecord>,
    pub resolutions: Vec<Resolution>,
    pub playlist_id: String,
    /// snapshot of the last successful write, `None` if nothing was written
    pub snapshot_id: Option<String>,
}

impl RunReport {
    pub fn resolved_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_resolved()).count()
    }

    pub fn succeeded(&self) -> bool {
        self.snapshot_id.is_some()
    }

    pub fn summary(&self) -> String {
        match &self.snapshot_id {
            Some(snapshot_id) => format!("Success! playlist's snapshot id: {snapshot_id}"),
            None => format!("Failed to add tracks to playlist {}", self.playlist_id),
        }
    }
}

/// Restores the stored session, or runs the authorization flow and stores
/// the new one
pub fn open_session<P>(
    store: &SessionStore,
    api: ApiClient,
    credentials: Credentials,
    prompt: P,
) -> Result<CatalogSession, PipelineError>
where
    P: FnOnce(&str) -> std::io::Result<String>,
{
    match store.load()? {
        Some(stored) if stored.belongs_to(&credentials.client_id) => {
            info!("Using session stored at {}", store.path().display());
            return Ok(CatalogSession::restore(api, credentials, stored.into_tokens()?));
        }
        Some(stored) => warn!(
            "Stored session belongs to client {}, authorizing again",
            stored.client_id
        ),
        None => info!("No stored session, authorizing"),
    }

    let session = CatalogSession::bootstrap(api, credentials, prompt)?;
    store.save(&session)?;
    Ok(session)
}

/// Picks the adapter for `locator` and extracts its tracks
pub fn scrape(locator: &str, agent: &ureq::Agent) -> Result<Vec<TrackRecord>, PipelineError> {
    let adapter = scrapers::select(locator)
        .ok_or_else(|| PipelineError::UnsupportedSource(locator.to_string()))?;
    Ok(adapter.tracks(locator, agent)?)
}

/// Resolves `tracks`, creates the playlist and fills it.
///
/// One progress line per track and a final summary are written to `out`.
pub fn run<W: Write>(
    session: &mut CatalogSession,
    mut tracks: Vec<TrackRecord>,
    playlist_name: &str,
    owner_id: &str,
    out: &mut W,
) -> Result<RunReport, PipelineError> {
    let mut output = Ok(());
    let resolutions = resolver::resolve_all(&mut tracks, session, |track, resolution| {
        if output.is_ok() {
            output = writeln!(out, "{}", resolution.describe(track));
        }
    })?;
    output?;
    writeln!(out, "-----------")?;

    let playlist_id = playlist::create_playlist(playlist_name, owner_id, session)?
        .ok_or_else(|| PipelineError::PlaylistNotCreated(playlist_name.to_string()))?;
    let snapshot_id = playlist::add_tracks(&playlist_id, &tracks, session)?;

    let report = RunReport {
        tracks,
        resolutions,
        playlist_id,
        snapshot_id,
    };
    info!(
        "Resolved {} of {} tracks for playlist {}",
        report.resolved_count(),
        report.tracks.len(),
        report.playlist_id
    );
    writeln!(out, "{}", report.summary())?;
    Ok(report)
}

/// Scrapes `locator` and runs the pipeline on its tracks.
///
/// The session is stored afterwards whatever the outcome of the run.
pub fn run_and_save<W: Write>(
    store: &SessionStore,
    session: &mut CatalogSession,
    locator: &str,
    agent: &ureq::Agent,
    playlist_name: &str,
    owner_id: &str,
    out: &mut W,
) -> Result<RunReport, PipelineError> {
    let result = scrape(locator, agent).and_then(|tracks| {
        writeln!(out, "Found {} tracks at {locator}", tracks.len())?;
        run(session, tracks, playlist_name, owner_id, out)
    });

    if let Err(e) = store.save(session) {
        warn!("Could not save session to {}: {e}", store.path().display());
    }
    result
}
