//! Radio Kampus playlist, https://radiokampus.fm/playlista.php
//!
//! Each table row holds `<b>Artist</b> - Title` in its second cell.

use log::warn;
use scraper::Html;

use crate::{
    domain::track::TrackRecord,
    scrapers::{error::ScrapeError, selector, strip_featuring},
};

pub(super) fn parse(html: &str) -> Result<Vec<TrackRecord>, ScrapeError> {
    let document = Html::parse_document(html);
    let container = document
        .select(&selector("div.art_view_full.view_full")?)
        .next()
        .ok_or_else(|| ScrapeError::Layout("playlist table not found".into()))?;

    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let bold_selector = selector("b")?;

    let mut tracks = Vec::new();
    for row in container.select(&row_selector) {
        let Some(cell) = row.select(&cell_selector).nth(1) else {
            continue;
        };
        // rows without a bold artist are headers or announcements
        let Some(bold) = cell.select(&bold_selector).next() else {
            continue;
        };

        let artist: String = bold.text().collect();
        let artist = artist.trim();
        let artist_and_title: String = cell.text().collect();
        let artist_and_title = artist_and_title.trim();

        // the separator between artist and title is dropped
        let title: String = match artist_and_title.strip_prefix(artist) {
            Some(rest) if !artist.is_empty() => rest.trim().chars().skip(1).collect(),
            _ => String::new(),
        };
        let title = strip_featuring(&title);

        if title.is_empty() {
            warn!("Skipping incomplete Radio Kampus row: '{artist_and_title}'");
            continue;
        }
        tracks.push(TrackRecord::new(artist, title));
    }
    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<div class="art_view_full view_full">
  <table>
    <tr><td>Godzina</td><td>Utwór</td></tr>
    <tr><td>12:03</td><td><b>NZCA Lines</b> - Persephone Dreams</td></tr>
    <tr><td>12:07</td><td><b>Boikafe</b> - Studio 9 Tool (feat. Someone)</td></tr>
    <tr><td>12:11</td><td><b>Kamp!</b> – Distance</td></tr>
    <tr><td>12:14</td><td><b>Queen</b> - Killer Queen</td></tr>
    <tr><td>12:15</td></tr>
  </table>
</div>
</body></html>
"#;

    #[test]
    fn rows_with_bold_artist_become_tracks() -> anyhow::Result<()> {
        let tracks = parse(PAGE)?;

        assert_eq!(
            tracks,
            vec![
                TrackRecord::new("NZCA Lines", "Persephone Dreams"),
                TrackRecord::new("Boikafe", "Studio 9 Tool"),
                TrackRecord::new("Kamp!", "Distance"),
                TrackRecord::new("Queen", "Killer Queen"),
            ]
        );
        Ok(())
    }

    #[test]
    fn missing_table_is_a_layout_error() {
        let err = parse("<html><body><p>maintenance</p></body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::Layout(_)));
    }
}
