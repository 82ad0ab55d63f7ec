//! Track list stored in a local JSON file:
//!
//! ```json
//! [
//!     { "artist": "NZCA Lines", "title": "Persephone Dreams" },
//!     { "artist": "Boikafe", "title": "Studio 9 Tool" }
//! ]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::{domain::track::TrackRecord, scrapers::error::ScrapeError};

#[derive(Debug, Deserialize)]
struct Entry {
    artist: String,
    title: String,
}

pub(super) fn tracks(path: &Path) -> Result<Vec<TrackRecord>, ScrapeError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ScrapeError::File {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents)
}

fn parse(json: &str) -> Result<Vec<TrackRecord>, ScrapeError> {
    let entries: Vec<Entry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .map(|entry| TrackRecord::new(entry.artist, entry.title))
        .collect())
}
