//! Authorization code flow, first step.
//!
//! A human opens the authorize url, accepts the permissions and pastes back
//! the url the browser was redirected to. That url carries the code which is
//! later exchanged for tokens.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::{
    catalog::error::CatalogError,
    config::{ApiConfig, Credentials},
};

static CODE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"code=(.*?)(&|$)").expect("valid code pattern"));

/// Authorization waiting for the user to paste the redirect url
#[derive(Debug)]
pub struct PendingAuthorization {
    url: Url,
    state: String,
}

impl PendingAuthorization {
    /// builds the authorize url with a fresh anti-forgery state
    pub fn new(config: &ApiConfig, credentials: &Credentials) -> Result<Self, CatalogError> {
        credentials.validate()?;

        let state = Uuid::new_v4().simple().to_string();
        let url = Url::parse_with_params(
            &config.authorize_url,
            &[
                ("client_id", credentials.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", config.redirect_uri.as_str()),
                ("scope", config.scope.as_str()),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| {
            CatalogError::Configuration(format!(
                "invalid authorize url '{}': {e}",
                config.authorize_url
            ))
        })?;

        Ok(Self { url, state })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// checks the state of the redirect url and returns its authorization code
    pub fn complete(&self, redirect_url: &str) -> Result<String, CatalogError> {
        let redirect_url = redirect_url.trim();
        let parsed = Url::parse(redirect_url)
            .map_err(|e| CatalogError::Authorization(format!("pasted text is not a url: {e}")))?;
        let state = parsed
            .query_pairs()
            .find(|(name, _)| name == "state")
            .map(|(_, value)| value);
        match state {
            Some(state) if state == self.state => {}
            Some(_) => {
                return Err(CatalogError::Authorization(
                    "state of the redirect url does not match the authorization request".into(),
                ));
            }
            None => {
                return Err(CatalogError::Authorization(
                    "state not found in redirect url".into(),
                ));
            }
        }
        extract_authorization_code(redirect_url)
    }
}

/// returns the value following `code=` up to the next `&` or the end of the url
pub fn extract_authorization_code(url_with_code: &str) -> Result<String, CatalogError> {
    extract_param(&CODE_PARAM, url_with_code)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            CatalogError::Authorization(
                "Authorization code not found in url. Did you paste the link?".into(),
            )
        })
}

fn extract_param<'a>(pattern: &Regex, url: &'a str) -> Option<&'a str> {
    pattern
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            client_id: "c48f8c867a844d5d".to_string(),
            client_secret: "secret".to_string(),
        }
    }

    #[test]
    fn test_extract_authorization_code_from_url() {
        let code = extract_authorization_code(
            "https://localhost/?code=AQB5geYwjc0NP9SuDD8WdDzLV1sZGLNB8UvTg1ppg4\
             VJ7hRlGJEwvtkS5ffD5ykCV1uWqsCN_Mys6D4mJDXDqPbFC866ELtDYudd7KKYAE9T\
             -l2a2FLnatWrNqU4WfC6EKTk5IPyfO0bD-KKoW0F0kepdERLTuSw5zg30hcHtUDXjL&\
             state=kmlads23r2k13lm90dask",
        )
        .unwrap();

        assert_eq!(
            code,
            "AQB5geYwjc0NP9SuDD8WdDzLV1sZGLNB8UvTg1ppg4VJ7hRlGJEwvtkS5f\
             fD5ykCV1uWqsCN_Mys6D4mJDXDqPbFC866ELtDYudd7KKYAE9T-l2a2FLn\
             atWrNqU4WfC6EKTk5IPyfO0bD-KKoW0F0kepdERLTuSw5zg30hcHtUDXjL"
        );
    }

    #[test]
    fn code_at_end_of_url() {
        let code = extract_authorization_code("https://localhost/?state=s&code=abc-123").unwrap();
        assert_eq!(code, "abc-123");
    }

    #[test]
    fn missing_code_is_an_authorization_error() {
        for url in ["https://localhost/?state=s", "", "https://localhost/?code="] {
            let err = extract_authorization_code(url).unwrap_err();
            assert!(matches!(err, CatalogError::Authorization(_)), "{url}");
        }
    }

    #[test]
    fn authorize_url_contains_request_parameters() -> anyhow::Result<()> {
        let pending = PendingAuthorization::new(&ApiConfig::default(), &credentials())?;
        let url = Url::parse(pending.url())?;
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert!(params.contains(&("client_id".into(), "c48f8c867a844d5d".into())));
        assert!(params.contains(&("response_type".into(), "code".into())));
        assert!(params.contains(&("redirect_uri".into(), "https://localhost".into())));
        assert!(params.contains(&("scope".into(), "playlist-modify-private".into())));
        assert!(params.contains(&("state".into(), pending.state().to_string())));
        Ok(())
    }

    #[test]
    fn state_is_unique_per_authorization() -> anyhow::Result<()> {
        let first = PendingAuthorization::new(&ApiConfig::default(), &credentials())?;
        let second = PendingAuthorization::new(&ApiConfig::default(), &credentials())?;
        assert_ne!(first.state(), second.state());
        Ok(())
    }

    #[test]
    fn complete_verifies_state() -> anyhow::Result<()> {
        let pending = PendingAuthorization::new(&ApiConfig::default(), &credentials())?;

        let ok = format!("https://localhost/?code=XYZ&state={}\n", pending.state());
        assert_eq!(pending.complete(&ok)?, "XYZ");

        let forged = pending
            .complete("https://localhost/?code=XYZ&state=kmlads23r2k13lm90dask")
            .unwrap_err();
        assert!(matches!(forged, CatalogError::Authorization(_)));

        let stateless = pending.complete("https://localhost/?code=XYZ").unwrap_err();
        assert!(matches!(stateless, CatalogError::Authorization(_)));
        Ok(())
    }

    #[test]
    fn state_is_read_from_its_own_parameter() -> anyhow::Result<()> {
        let pending = PendingAuthorization::new(&ApiConfig::default(), &credentials())?;

        let url = format!("https://localhost/?prevstate=x&code=C&state={}", pending.state());
        assert_eq!(pending.complete(&url)?, "C");

        let err = pending.complete("code=C&state=whatever").unwrap_err();
        assert!(matches!(err, CatalogError::Authorization(_)));
        Ok(())
    }

    #[test]
    fn missing_credentials_fail_before_building_url() {
        let credentials = Credentials {
            client_id: String::new(),
            client_secret: "secret".to_string(),
        };
        let err = PendingAuthorization::new(&ApiConfig::default(), &credentials).unwrap_err();
        assert!(matches!(err, CatalogError::Configuration(_)));
    }
}
