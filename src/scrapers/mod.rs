//! Extraction of (artist, title) pairs from radio station playlists.
//!
//! Every adapter is a stateless function of the page (or file) it reads. The
//! adapter for a locator is picked from a fixed, ordered table.

use std::{path::Path, sync::LazyLock};

use log::{debug, info};
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::{domain::track::TrackRecord, http::error::RequestError, scrapers::error::ScrapeError};

pub mod error;
mod kampus_radio;
mod load_json;
mod lp3_chart;
mod program_alternatywny;
mod radiospacja;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adapter {
    /// https://radiokampus.fm/playlista.php
    RadioKampus,
    /// http://lp3.polskieradio.pl/
    Lp3Chart,
    /// https://www.polskieradio.pl/9/336
    ProgramAlternatywny,
    /// https://radiospacja.pl/chart/
    RadioSpacja,
    /// local JSON file, e.g. exported from http://radioluz.pwr.edu.pl/playlista/
    JsonFile,
}

/// Checked in this order, the first fragment contained in the locator wins
const REGISTRY: &[(&str, Adapter)] = &[
    ("radiokampus.fm", Adapter::RadioKampus),
    ("lp3.polskieradio.pl", Adapter::Lp3Chart),
    ("polskieradio.pl/9/336", Adapter::ProgramAlternatywny),
    ("radiospacja.pl", Adapter::RadioSpacja),
    (".json", Adapter::JsonFile),
];

/// returns the adapter able to read `locator`, if any
pub fn select(locator: &str) -> Option<Adapter> {
    REGISTRY
        .iter()
        .find(|(fragment, _)| locator.contains(fragment))
        .map(|(_, adapter)| *adapter)
}

impl Adapter {
    pub fn name(self) -> &'static str {
        match self {
            Adapter::RadioKampus => "Radio Kampus",
            Adapter::Lp3Chart => "LP3 chart",
            Adapter::ProgramAlternatywny => "Program Alternatywny",
            Adapter::RadioSpacja => "Radio Spacja",
            Adapter::JsonFile => "JSON file",
        }
    }

    /// Downloads (or reads) the playlist and extracts its tracks in page order
    pub fn tracks(
        self,
        locator: &str,
        agent: &ureq::Agent,
    ) -> Result<Vec<TrackRecord>, ScrapeError> {
        info!("Reading tracks from {locator} with the {} adapter", self.name());
        let tracks = match self {
            Adapter::JsonFile => load_json::tracks(Path::new(locator))?,
            _ => {
                let html = fetch_html(agent, locator)?;
                self.parse_html(&html)?
            }
        };
        debug!("{} tracks extracted from {locator}", tracks.len());
        Ok(tracks)
    }

    fn parse_html(self, html: &str) -> Result<Vec<TrackRecord>, ScrapeError> {
        match self {
            Adapter::RadioKampus => kampus_radio::parse(html),
            Adapter::Lp3Chart => lp3_chart::parse(html),
            Adapter::ProgramAlternatywny => program_alternatywny::parse(html),
            Adapter::RadioSpacja => radiospacja::parse(html),
            Adapter::JsonFile => Err(ScrapeError::Layout(
                "JSON track lists are read from a file, not downloaded".into(),
            )),
        }
    }
}

fn fetch_html(agent: &ureq::Agent, url: &str) -> Result<String, ScrapeError> {
    let download_error = |source: RequestError| ScrapeError::Download {
        url: url.to_string(),
        source,
    };
    agent
        .get(url)
        .call()
        .map_err(|e| download_error(e.into()))?
        .into_string()
        .map_err(|e| download_error(e.into()))
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css.to_string()))
}

/// whole text content of an element, trimmed
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid parenthesis pattern"));

static FEATURING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(feat|ft)\.\s.*$").expect("valid featuring pattern"));

/// Drops featured-artist credits from a title.
///
/// The catalog search does not match titles carrying them, e.g.
/// `"Song (feat. Someone)"` or `"Song feat. Someone"`.
fn strip_featuring(title: &str) -> String {
    let title = PARENTHESIZED.replace_all(title, "");
    let title = FEATURING.replace(&title, "");
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}
