//! Token lifecycle of the catalog service.
//!
//! A session is created by the authorization code flow (or restored from disk)
//! and handed by `&mut` to everything that talks to the catalog. The access
//! token is only reachable through [`CatalogSession::ensure_fresh_token`],
//! which refreshes it once its lifetime is (almost) over.

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::{
    catalog::{api::ApiClient, auth::PendingAuthorization, error::CatalogError},
    config::Credentials,
};

/// Refresh this many seconds before the token actually expires
const EXPIRY_MARGIN_SECS: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenState {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
    pub(crate) issued_at: DateTime<Utc>,
    pub(crate) lifetime_secs: i64,
}

impl TokenState {
    pub fn new(
        access_token: String,
        refresh_token: String,
        issued_at: DateTime<Utc>,
        lifetime_secs: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            issued_at,
            lifetime_secs,
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// true once `now - issued_at >= lifetime - 1s`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let age_ms = now.signed_duration_since(self.issued_at).num_milliseconds();
        let usable_ms = self
            .lifetime_secs
            .saturating_sub(EXPIRY_MARGIN_SECS)
            .saturating_mul(1000);
        age_ms >= usable_ms
    }
}

/// Authenticated session against the catalog service
pub struct CatalogSession {
    api: ApiClient,
    credentials: Credentials,
    tokens: TokenState,
}

impl std::fmt::Debug for CatalogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSession")
            .field("client_id", &self.credentials.client_id)
            .field("issued_at", &self.tokens.issued_at)
            .field("lifetime_secs", &self.tokens.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl CatalogSession {
    /// Runs the whole authorization code flow.
    ///
    /// `prompt` receives the authorize url, blocks until the user has accepted
    /// the permissions and returns the url the browser was redirected to.
    pub fn bootstrap<P>(
        api: ApiClient,
        credentials: Credentials,
        prompt: P,
    ) -> Result<Self, CatalogError>
    where
        P: FnOnce(&str) -> std::io::Result<String>,
    {
        let pending = PendingAuthorization::new(api.config(), &credentials)?;
        info!("Waiting for authorization of client {}", credentials.client_id);
        debug!("Authorization request carries state {}", pending.state());

        let redirect_url = prompt(pending.url()).map_err(|e| {
            CatalogError::Authorization(format!("could not read the redirect url: {e}"))
        })?;
        let code = pending.complete(&redirect_url)?;

        Self::exchange_code_for_tokens(api, credentials, &code)
    }

    /// Exchanges an authorization code for access and refresh tokens
    pub fn exchange_code_for_tokens(
        api: ApiClient,
        credentials: Credentials,
        code: &str,
    ) -> Result<Self, CatalogError> {
        let response = api
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", api.config().redirect_uri.as_str()),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .map_err(|e| {
                CatalogError::Authorization(format!("Generate access token failed: {e}"))
            })?;

        let refresh_token = response.refresh_token.ok_or_else(|| {
            CatalogError::Authorization("token response carries no refresh token".into())
        })?;

        info!("Obtained access token, valid for {}s", response.expires_in);
        let tokens = TokenState::new(
            response.access_token,
            refresh_token,
            Utc::now(),
            response.expires_in,
        );
        Ok(Self::restore(api, credentials, tokens))
    }

    /// Wraps previously obtained tokens, e.g. loaded from the session store
    pub fn restore(api: ApiClient, credentials: Credentials, tokens: TokenState) -> Self {
        Self {
            api,
            credentials,
            tokens,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    pub fn tokens(&self) -> &TokenState {
        &self.tokens
    }

    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.tokens.is_expired_at(now)
    }

    /// Returns an access token that is valid for at least one more second
    pub fn ensure_fresh_token(&mut self) -> Result<&str, CatalogError> {
        self.ensure_fresh_token_at(Utc::now())
    }

    pub fn ensure_fresh_token_at(&mut self, now: DateTime<Utc>) -> Result<&str, CatalogError> {
        if self.needs_refresh(now) {
            debug!(
                "Access token issued at {} expired, refreshing",
                self.tokens.issued_at
            );
            self.refresh_at(now)?;
        }
        Ok(&self.tokens.access_token)
    }

    /// Client and fresh access token, ready for one request
    pub fn authorized(&mut self) -> Result<(&ApiClient, &str), CatalogError> {
        self.ensure_fresh_token()?;
        Ok((&self.api, &self.tokens.access_token))
    }

    /// Trades the refresh token for a new access token.
    ///
    /// On failure the session is left untouched.
    pub fn refresh(&mut self) -> Result<(), CatalogError> {
        self.refresh_at(Utc::now())
    }

    fn refresh_at(&mut self, now: DateTime<Utc>) -> Result<(), CatalogError> {
        let response = self
            .api
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.tokens.refresh_token.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .map_err(|e| {
                CatalogError::Authorization(format!("Refreshing access token failed: {e}"))
            })?;

        self.tokens.access_token = response.access_token;
        self.tokens.lifetime_secs = response.expires_in;
        self.tokens.issued_at = now;
        if let Some(refresh_token) = response.refresh_token.filter(|t| !t.is_empty()) {
            self.tokens.refresh_token = refresh_token;
        }
        info!("Access token refreshed, valid for {}s", response.expires_in);
        Ok(())
    }
}
