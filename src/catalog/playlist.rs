//! Playlist creation and batched track writes.

use log::{info, warn};

use crate::{
    catalog::{error::CatalogError, session::CatalogSession},
    domain::track::TrackRecord,
};

/// The playlist endpoint accepts at most this many items per request
pub const MAX_ITEMS_PER_WRITE: usize = 100;

/// Creates a private playlist, returns its id or `None` if the service refused
pub fn create_playlist(
    name: &str,
    owner_id: &str,
    session: &mut CatalogSession,
) -> Result<Option<String>, CatalogError> {
    let (api, access_token) = session.authorized()?;
    match api.create_playlist(access_token, owner_id, name) {
        Ok(id) => {
            info!("Created playlist '{name}' ({id}) for {owner_id}");
            Ok(Some(id))
        }
        Err(err) => {
            warn!("Creating playlist '{name}' for {owner_id} failed: {err}");
            Ok(None)
        }
    }
}

/// Catalog ids of resolved tracks, split into request-sized groups
pub fn write_batches(tracks: &[TrackRecord]) -> Vec<Vec<&str>> {
    let uris: Vec<&str> = tracks.iter().filter_map(TrackRecord::external_id).collect();
    uris.chunks(MAX_ITEMS_PER_WRITE)
        .map(<[&str]>::to_vec)
        .collect()
}

/// Appends every resolved track to the playlist.
///
/// Returns the snapshot id of the last successful write. A failed group is
/// logged and skipped, so `None` means no write succeeded at all (or there
/// was nothing to write).
pub fn add_tracks(
    playlist_id: &str,
    tracks: &[TrackRecord],
    session: &mut CatalogSession,
) -> Result<Option<String>, CatalogError> {
    let batches = write_batches(tracks);
    let mut snapshot_id = None;

    for (index, batch) in batches.iter().enumerate() {
        let (api, access_token) = session.authorized()?;
        match api.add_items(access_token, playlist_id, batch) {
            Ok(snapshot) => {
                info!(
                    "Added batch {}/{} ({} tracks) to {playlist_id}",
                    index + 1,
                    batches.len(),
                    batch.len()
                );
                snapshot_id = Some(snapshot);
            }
            Err(err) => warn!(
                "Adding batch {}/{} ({} tracks) to {playlist_id} failed: {err}",
                index + 1,
                batches.len(),
                batch.len()
            ),
        }
    }

    Ok(snapshot_id)
}
