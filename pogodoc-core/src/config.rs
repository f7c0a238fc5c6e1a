//! Client configuration: service base URL and API token.
//!
//! Resolved once at construction and immutable afterwards. The environment
//! constructors read `POGODOC_BASE_URL` and `POGODOC_API_TOKEN`.

use std::fmt;

use tracing::{debug, error, info};
use url::Url;

use crate::error::PogodocError;

pub const DEFAULT_BASE_URL: &str = "https://api.pogodoc.com/v1";
pub const ENV_API_TOKEN: &str = "POGODOC_API_TOKEN";
pub const ENV_BASE_URL: &str = "POGODOC_BASE_URL";

/// Immutable connection settings held for the lifetime of a client.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: Url,
    token: String,
}

impl ClientConfig {
    /// Explicit base URL and token.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, PogodocError> {
        let token = token.into();
        if token.is_empty() {
            error!("Empty API token supplied");
            return Err(PogodocError::Config("API token is empty".to_string()));
        }
        Ok(ClientConfig {
            base_url: parse_base_url(base_url)?,
            token,
        })
    }

    /// Token only; the base URL falls back to [`DEFAULT_BASE_URL`].
    pub fn with_token(token: impl Into<String>) -> Result<Self, PogodocError> {
        Self::new(DEFAULT_BASE_URL, token)
    }

    /// Reads `POGODOC_BASE_URL` and `POGODOC_API_TOKEN` from the process
    /// environment. Empty values count as unset.
    pub fn from_env() -> Result<Self, PogodocError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same precedence rules as [`ClientConfig::from_env`], with variables
    /// resolved through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PogodocError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            Some(url) => {
                debug!(base_url = %url, "Using base URL from environment");
                url
            }
            None => DEFAULT_BASE_URL.to_string(),
        };
        let token = lookup(ENV_API_TOKEN)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                error!(var = ENV_API_TOKEN, "API token missing in environment");
                PogodocError::Config(format!(
                    "API token is required; set the {ENV_API_TOKEN} environment variable"
                ))
            })?;
        let config = Self::new(&base_url, token)?;
        config.trace_loaded();
        Ok(config)
    }

    /// Base URL, always with a trailing slash so endpoint paths join under it.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn trace_loaded(&self) {
        info!(
            base_url = %self.base_url,
            token_set = !self.token.is_empty(),
            "Loaded client configuration"
        );
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

fn parse_base_url(raw: &str) -> Result<Url, PogodocError> {
    let mut url = Url::parse(raw).map_err(|e| {
        error!(error = ?e, base_url = raw, "Malformed base URL");
        PogodocError::Config(format!("malformed base URL {raw:?}: {e}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(PogodocError::Config(format!(
            "base URL {raw:?} must be an absolute http(s) URL"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
