//! Raw requests to the token, search and playlist endpoints.
//!
//! Nothing here knows about token freshness, callers pass an access token
//! obtained from [`crate::catalog::session::CatalogSession`].

use serde::Deserialize;
use serde_json::json;

use crate::{config::ApiConfig, http::error::RequestError};

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// only sent by the code exchange, refreshes usually omit it
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Deserialize)]
pub struct SearchTracks {
    pub total: u64,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub uri: String,
}

#[derive(Debug, Deserialize)]
struct CreatedPlaylist {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    snapshot_id: String,
}

pub struct ApiClient {
    agent: ureq::Agent,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(agent: ureq::Agent, config: ApiConfig) -> Self {
        Self { agent, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// posts a form to the token endpoint, only 200 counts as success
    pub fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, RequestError> {
        let response = self.agent.post(&self.config.token_url).send_form(form)?;
        expect_status(&response, &[200])?;
        response
            .into_json()
            .map_err(|e| RequestError::Decode(e.to_string()))
    }

    pub fn search_track(
        &self,
        access_token: &str,
        artist: &str,
        title: &str,
    ) -> Result<SearchResponse, RequestError> {
        let response = self
            .agent
            .get(&self.config.search_url())
            .set("Authorization", &bearer(access_token))
            .query("q", &format!("artist:{artist} track:{title}"))
            .query("type", "track")
            .call()?;
        expect_status(&response, &[200])?;
        response
            .into_json()
            .map_err(|e| RequestError::Decode(e.to_string()))
    }

    /// creates a private playlist and returns its id
    pub fn create_playlist(
        &self,
        access_token: &str,
        owner_id: &str,
        name: &str,
    ) -> Result<String, RequestError> {
        let response = self
            .agent
            .post(&self.config.playlists_url(owner_id))
            .set("Authorization", &bearer(access_token))
            .send_json(json!({ "name": name, "public": false }))?;
        expect_status(&response, &[200, 201])?;
        let created: CreatedPlaylist = response
            .into_json()
            .map_err(|e| RequestError::Decode(e.to_string()))?;
        Ok(created.id)
    }

    /// appends items to a playlist and returns the new snapshot id
    pub fn add_items(
        &self,
        access_token: &str,
        playlist_id: &str,
        uris: &[&str],
    ) -> Result<String, RequestError> {
        let response = self
            .agent
            .post(&self.config.playlist_tracks_url(playlist_id))
            .set("Authorization", &bearer(access_token))
            .send_json(json!({ "uris": uris }))?;
        expect_status(&response, &[200, 201])?;
        let snapshot: Snapshot = response
            .into_json()
            .map_err(|e| RequestError::Decode(e.to_string()))?;
        Ok(snapshot.snapshot_id)
    }
}

fn bearer(access_token: &str) -> String {
    format!("Bearer {access_token}")
}

fn expect_status(response: &ureq::Response, accepted: &[u16]) -> Result<(), RequestError> {
    if accepted.contains(&response.status()) {
        Ok(())
    } else {
        Err(RequestError::Status(response.status()))
    }
}
