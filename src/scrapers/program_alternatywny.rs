//! Program Alternatywny Trójki, https://www.polskieradio.pl/9/336

use log::warn;
use scraper::Html;

use crate::{
    domain::track::TrackRecord,
    scrapers::{error::ScrapeError, selector, text_of},
};

pub(super) fn parse(html: &str) -> Result<Vec<TrackRecord>, ScrapeError> {
    let document = Html::parse_document(html);
    let box_selector = selector("div.boxTrack")?;
    let artist_selector = selector("span.bArtist")?;
    let title_selector = selector("span.bTitle")?;

    let mut tracks = Vec::new();
    for entry in document.select(&box_selector) {
        let artist = entry.select(&artist_selector).next().map(text_of);
        let title = entry.select(&title_selector).next().map(text_of);
        match (artist, title) {
            (Some(artist), Some(title)) => tracks.push(TrackRecord::new(artist, title)),
            _ => warn!("Skipping Program Alternatywny entry without artist or title"),
        }
    }
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artist_and_title_spans() -> anyhow::Result<()> {
        let page = r#"
<article>
  <div class="boxTrack"><span class="bArtist">
      Swans </span><span class="bTitle">The Seer </span></div>
  <div class="boxTrack"><span class="bTitle">Orphan title</span></div>
  <div class="boxTrack"><span class="bArtist">Xiu Xiu</span><span class="bTitle">Wondering</span></div>
</article>"#;

        let tracks = parse(page)?;
        assert_eq!(
            tracks,
            vec![
                TrackRecord::new("Swans", "The Seer"),
                TrackRecord::new("Xiu Xiu", "Wondering"),
            ]
        );
        Ok(())
    }

    #[test]
    fn page_without_tracks_is_empty() -> anyhow::Result<()> {
        assert!(parse("<html></html>")?.is_empty());
        Ok(())
    }
}
