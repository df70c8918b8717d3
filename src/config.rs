//! Client configuration.
//!
//! A [`ClientConfig`] can be read from a JSON file or assembled from the
//! environment. Credential values in the file may reference environment
//! variables, see [`LiteralOrEnv`]:
//!
//! ```json
//! {
//!   "apiToken": "$PAYNL_API_TOKEN",
//!   "serviceId": "SL-1234-5678",
//!   "tokenCode": "${PAYNL_TOKEN_CODE}",
//!   "baseUrl": "https://rest-api.pay.nl/",
//!   "timeoutSecs": 30
//! }
//! ```

use paynl_types::config::{ApiAuthentication, LiteralOrEnv};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration for a [`PaynlClient`](crate::PaynlClient).
///
/// Missing `baseUrl` falls back to `$PAYNL_BASE_URL`, then to the production API.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_token: Option<LiteralOrEnv<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service_id: Option<LiteralOrEnv<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_code: Option<LiteralOrEnv<String>>,
    #[serde(default = "config_defaults::default_base_url")]
    base_url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

pub mod config_defaults {
    use std::env;
    use url::Url;

    use crate::client::DEFAULT_BASE_URL;

    pub const ENV_BASE_URL: &str = "PAYNL_BASE_URL";

    /// Returns the base URL with fallback: $PAYNL_BASE_URL env var -> production API
    pub fn default_base_url() -> Url {
        env::var(ENV_BASE_URL)
            .ok()
            .and_then(|s| Url::parse(&s).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.clone())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("Failed to parse config file: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_token: None,
            service_id: None,
            token_code: None,
            base_url: config_defaults::default_base_url(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(path.to_path_buf(), e))?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build configuration from `PAYNL_API_TOKEN`, `PAYNL_SERVICE_ID`,
    /// `PAYNL_TOKEN_CODE` and `PAYNL_BASE_URL`.
    pub fn from_env() -> Self {
        let auth = ApiAuthentication::from_env();
        let literal = |v: Option<&str>| v.map(|v| LiteralOrEnv::from_literal(v.to_string()));
        ClientConfig {
            api_token: literal(auth.api_token()),
            service_id: literal(auth.service_id()),
            token_code: literal(auth.token_code()),
            ..Default::default()
        }
    }

    /// Credentials for the client. Empty values count as unset.
    pub fn authentication(&self) -> ApiAuthentication {
        let mut auth = ApiAuthentication::new();
        let value = |v: &Option<LiteralOrEnv<String>>| {
            v.as_ref()
                .map(|v| v.inner().clone())
                .filter(|v| !v.is_empty())
        };
        if let Some(api_token) = value(&self.api_token) {
            auth = auth.with_api_token(api_token);
        }
        if let Some(service_id) = value(&self.service_id) {
            auth = auth.with_service_id(service_id);
        }
        if let Some(token_code) = value(&self.token_code) {
            auth = auth.with_token_code(token_code);
        }
        auth
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("service_id", &self.service_id)
            .field("token_code", &self.token_code)
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
