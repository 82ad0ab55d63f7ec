use std::fmt::Display;

/// Represent a scraped track
///
/// Adapters create records with no catalog id, the resolver sets it once a
/// search succeeds. Artist and title never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    name: String,
    artist: String,
    external_id: Option<String>,
}

impl TrackRecord {
    pub fn new(artist: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            external_id: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// catalog identifier, e.g. `spotify:track:...`
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_resolved(&self) -> bool {
        self.external_id().is_some()
    }

    pub(crate) fn set_external_id(&mut self, id: impl Into<String>) {
        self.external_id = Some(id.into());
    }
}

impl Display for TrackRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {}", self.artist, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::TrackRecord;

    #[test]
    fn new_record_is_unresolved() {
        let track = TrackRecord::new("NZCA Lines", "Persephone Dreams");
        assert_eq!(track.artist(), "NZCA Lines");
        assert_eq!(track.name(), "Persephone Dreams");
        assert!(!track.is_resolved());
        assert_eq!(track.to_string(), "NZCA Lines — Persephone Dreams");
    }

    #[test]
    fn empty_external_id_does_not_count_as_resolved() {
        let mut track = TrackRecord::new("A", "B");
        track.set_external_id("");
        assert!(!track.is_resolved());

        track.set_external_id("spotify:track:XYZ");
        assert_eq!(track.external_id(), Some("spotify:track:XYZ"));
    }
}
