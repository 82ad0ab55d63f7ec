use anyhow::Context;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

use crate::catalog::error::CatalogError;

pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }
}

/// Endpoints of the catalog/playlist service
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub authorize_url: String,
    pub token_url: String,
    pub base_url: String,
    pub redirect_uri: String,
    pub scope: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            authorize_url: "https://accounts.spotify.com/authorize".to_string(),
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            base_url: "https://api.spotify.com/v1".to_string(),
            redirect_uri: "https://localhost".to_string(),
            scope: "playlist-modify-private".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn search_url(&self) -> String {
        format!("{}/search", self.base())
    }

    pub fn playlists_url(&self, owner_id: &str) -> String {
        format!("{}/users/{owner_id}/playlists", self.base())
    }

    pub fn playlist_tracks_url(&self, playlist_id: &str) -> String {
        format!("{}/playlists/{playlist_id}/tracks", self.base())
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("session.toml"),
        }
    }
}

/// Application credentials issued by the catalog service
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CatalogError> {
        let client_id = lookup(CLIENT_ID_VAR).unwrap_or_default();
        let client_secret = lookup(CLIENT_SECRET_VAR).unwrap_or_default();
        let credentials = Self {
            client_id,
            client_secret,
        };
        credentials.validate()?;
        Ok(credentials)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Err(CatalogError::Configuration(format!(
                "{CLIENT_ID_VAR} or {CLIENT_SECRET_VAR} were not in environment variable list. \
                 Use `export` command to fix it"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_config_toml() -> anyhow::Result<()> {
        let toml_str = r#"
[api]
base_url = "http://127.0.0.1:9000/v1/"
token_url = "http://127.0.0.1:9000/api/token"

[http]
timeout_secs = 5

[session]
path = "/tmp/radioplaylist-session.toml"
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert_eq!(cfg.api.token_url, "http://127.0.0.1:9000/api/token");
        // unspecified fields keep their defaults
        assert_eq!(cfg.api.scope, "playlist-modify-private");
        assert_eq!(cfg.api.redirect_uri, "https://localhost");
        assert_eq!(cfg.http.timeout(), Duration::from_secs(5));
        assert_eq!(
            cfg.session.path,
            PathBuf::from("/tmp/radioplaylist-session.toml")
        );

        // trailing slash of base url is not duplicated
        assert_eq!(cfg.api.search_url(), "http://127.0.0.1:9000/v1/search");
        assert_eq!(
            cfg.api.playlists_url("alice"),
            "http://127.0.0.1:9000/v1/users/alice/playlists"
        );
        assert_eq!(
            cfg.api.playlist_tracks_url("PL1"),
            "http://127.0.0.1:9000/v1/playlists/PL1/tracks"
        );

        Ok(())
    }

    #[test]
    fn test_empty_config_uses_defaults() -> anyhow::Result<()> {
        let cfg: Config = toml::from_str("")?;

        assert_eq!(cfg.api.base_url, "https://api.spotify.com/v1");
        assert_eq!(cfg.http.timeout_secs, 30);
        assert_eq!(cfg.session.path, PathBuf::from("session.toml"));

        Ok(())
    }

    #[test]
    fn credentials_require_both_secrets() {
        let env = HashMap::from([(CLIENT_ID_VAR, "id".to_string())]);
        let err = Credentials::from_lookup(|name| env.get(name).cloned()).unwrap_err();
        assert!(matches!(err, CatalogError::Configuration(_)));

        let env = HashMap::from([
            (CLIENT_ID_VAR, "id".to_string()),
            (CLIENT_SECRET_VAR, "  ".to_string()),
        ]);
        let err = Credentials::from_lookup(|name| env.get(name).cloned()).unwrap_err();
        assert!(matches!(err, CatalogError::Configuration(_)));

        let env = HashMap::from([
            (CLIENT_ID_VAR, "id".to_string()),
            (CLIENT_SECRET_VAR, "secret".to_string()),
        ]);
        let credentials = Credentials::from_lookup(|name| env.get(name).cloned()).unwrap();
        assert_eq!(credentials.client_id, "id");
        assert!(!format!("{credentials:?}").contains("\"secret\""));
    }
}
