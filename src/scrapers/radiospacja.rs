//! Radio Spacja chart, https://radiospacja.pl/chart/lista-przebojow-xxx

use log::warn;
use scraper::Html;

use crate::{
    domain::track::TrackRecord,
    scrapers::{error::ScrapeError, selector, text_of},
};

pub(super) fn parse(html: &str) -> Result<Vec<TrackRecord>, ScrapeError> {
    let document = Html::parse_document(html);
    let titles_selector = selector("div.qt-titles")?;
    let title_selector = selector("h4")?;
    let artist_selector = selector("p")?;

    let mut tracks = Vec::new();
    for entry in document.select(&titles_selector) {
        let title = entry.select(&title_selector).next().map(text_of);
        let artist = entry.select(&artist_selector).next().map(text_of);
        match (artist, title) {
            (Some(artist), Some(title)) => tracks.push(TrackRecord::new(artist, title)),
            _ => warn!("Skipping Radio Spacja entry without artist or title"),
        }
    }
    Ok(tracks)
}
