//! Keeps the catalog session between runs, so the authorization code flow
//! is only needed once.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::session::{CatalogSession, TokenState},
    storage::error::StorageError,
};

pub type SecondsSinceUnix = i64;

/// On-disk form of a session. The client secret is never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub token_issued_at: SecondsSinceUnix,
    pub token_lifetime_seconds: i64,
    pub client_id: String,
}

impl PersistedSession {
    pub fn from_session(session: &CatalogSession) -> Self {
        let tokens = session.tokens();
        Self {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            token_issued_at: tokens.issued_at().timestamp(),
            token_lifetime_seconds: tokens.lifetime_secs(),
            client_id: session.client_id().to_string(),
        }
    }

    pub fn belongs_to(&self, client_id: &str) -> bool {
        self.client_id == client_id
    }

    pub fn into_tokens(self) -> Result<TokenState, StorageError> {
        let issued_at = seconds_to_utc(self.token_issued_at)?;
        Ok(TokenState::new(
            self.access_token,
            self.refresh_token,
            issued_at,
            self.token_lifetime_seconds,
        ))
    }
}

/// converts number of seconds since unix epoch to utc date time
fn seconds_to_utc(since_unix: SecondsSinceUnix) -> Result<DateTime<Utc>, StorageError> {
    DateTime::from_timestamp(since_unix, 0).ok_or(StorageError::InvalidTimestamp(since_unix))
}

/// TOML file holding at most one session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nothing was stored yet
    pub fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        if !self.path.exists() {
            debug!("No session stored at {}", self.path.display());
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let session = toml::from_str(&contents).map_err(|source| StorageError::Decode {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &CatalogSession) -> Result<(), StorageError> {
        self.save_persisted(&PersistedSession::from_session(session))
    }

    /// writes a sibling temp file first, then renames it over the old one
    pub fn save_persisted(&self, session: &PersistedSession) -> Result<(), StorageError> {
        let contents = toml::to_string_pretty(session)?;
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// forgets the stored session, next run authorizes again
    pub fn delete(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!("Removed stored session {}", self.path.display());
        }
        Ok(())
    }
}
