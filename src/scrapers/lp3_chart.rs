//! LP3 chart, http://lp3.polskieradio.pl/

use log::warn;
use scraper::Html;

use crate::{
    domain::track::TrackRecord,
    scrapers::{error::ScrapeError, selector, text_of},
};

pub(super) fn parse(html: &str) -> Result<Vec<TrackRecord>, ScrapeError> {
    let document = Html::parse_document(html);
    let chart = document
        .select(&selector("div#divCenter div.boxNotowanie")?)
        .next()
        .ok_or_else(|| ScrapeError::Layout("chart box not found".into()))?;

    let box_selector = selector("div.BoxTrack")?;
    let link_selector = selector("a")?;

    let mut tracks = Vec::new();
    for entry in chart.select(&box_selector) {
        let links: Vec<_> = entry.select(&link_selector).map(text_of).collect();
        match links.as_slice() {
            [artist, title, ..] => tracks.push(TrackRecord::new(artist.as_str(), title.as_str())),
            _ => warn!("Skipping LP3 chart entry with {} links", links.len()),
        }
    }
    Ok(tracks)
}
