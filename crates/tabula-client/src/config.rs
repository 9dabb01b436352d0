//! Client configuration from the environment.

use url::Url;

use crate::error::ConfigError;

/// Base URL of the REST API.
pub const API_URL_VAR: &str = "TABULA_API_URL";
/// Optional bearer token sent with every request.
pub const API_TOKEN_VAR: &str = "TABULA_API_TOKEN";

/// Where the API lives and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    token: Option<String>,
}

impl ClientConfig {
    /// Parses `base_url`. A trailing slash is added so relative paths join
    /// under it rather than replacing its last segment.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut text = base_url.trim().to_string();
        if !text.ends_with('/') {
            text.push('/');
        }
        let base_url = Url::parse(&text).map_err(|e| ConfigError::InvalidUrl {
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                value: base_url.to_string(),
                reason: "not a base URL".into(),
            });
        }
        Ok(ClientConfig {
            base_url,
            token: None,
        })
    }

    /// Reads [`API_URL_VAR`] (required) and [`API_TOKEN_VAR`] (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var(API_URL_VAR).ok(),
            std::env::var(API_TOKEN_VAR).ok(),
        )
    }

    /// Builds a config from already-read variable values.
    pub fn from_vars(url: Option<String>, token: Option<String>) -> Result<Self, ConfigError> {
        let url = url
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingVar(API_URL_VAR))?;
        let config = ClientConfig::new(&url)?;
        Ok(match token.filter(|t| !t.trim().is_empty()) {
            Some(token) => config.token(token),
            None => config,
        })
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Resolves `path` (with or without a leading `/`) under the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ConfigError::InvalidUrl {
                value: path.to_string(),
                reason: e.to_string(),
            })
    }
}
