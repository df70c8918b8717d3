//! API credentials and configuration value helpers.
//!
//! # Environment Variable Resolution
//!
//! The [`LiteralOrEnv`] wrapper lets configuration values be written either
//! literally or as references to environment variables, keeping API tokens out
//! of configuration files:
//!
//! ```json
//! {
//!   "apiToken": "$PAYNL_API_TOKEN",
//!   "serviceId": "SL-1234-5678",
//!   "tokenCode": "${PAYNL_TOKEN_CODE}"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Environment variable holding the API token.
pub const ENV_API_TOKEN: &str = "PAYNL_API_TOKEN";
/// Environment variable holding the service id.
pub const ENV_SERVICE_ID: &str = "PAYNL_SERVICE_ID";
/// Environment variable holding the token code.
pub const ENV_TOKEN_CODE: &str = "PAYNL_TOKEN_CODE";

/// A value that is resolved from the environment during deserialization.
///
/// Accepts a literal (`"SL-1234-5678"`), a simple reference (`"$PAYNL_SERVICE_ID"`)
/// or a braced reference (`"${PAYNL_SERVICE_ID}"`). Serializes as the resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralOrEnv<T>(T);

impl<T> LiteralOrEnv<T> {
    pub fn from_literal(value: T) -> Self {
        Self(value)
    }

    pub fn inner(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Returns the variable name if `s` is `$VAR` or `${VAR}`.
fn env_var_name(s: &str) -> Option<&str> {
    if let Some(name) = s.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        return Some(name);
    }
    let name = s.strip_prefix('$')?;
    let valid = !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    valid.then_some(name)
}

impl<T> Deref for LiteralOrEnv<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de, T> Deserialize<'de> for LiteralOrEnv<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let value = match env_var_name(&s) {
            Some(name) => std::env::var(name).map_err(|_| {
                serde::de::Error::custom(format!(
                    "Environment variable '{name}' not found (referenced as '{s}')"
                ))
            })?,
            None => s,
        };
        value
            .parse::<T>()
            .map(LiteralOrEnv)
            .map_err(|e| serde::de::Error::custom(format!("Failed to parse value: {e}")))
    }
}

impl<T: Serialize> Serialize for LiteralOrEnv<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// Credentials used to fill the standard request parameters.
///
/// - `api_token` is sent as the `token` parameter and as the basic-auth password
/// - `service_id` (`SL-xxxx-xxxx`) is sent as the `serviceId` parameter
/// - `token_code` (`AT-xxxx-xxxx`), when set, is the basic-auth user
///
/// The API token is never printed by the `Debug` implementation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiAuthentication {
    api_token: Option<String>,
    service_id: Option<String>,
    token_code: Option<String>,
}

impl ApiAuthentication {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `PAYNL_API_TOKEN`, `PAYNL_SERVICE_ID` and `PAYNL_TOKEN_CODE`.
    ///
    /// Unset or empty variables leave the corresponding value unset.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            api_token: read(ENV_API_TOKEN),
            service_id: read(ENV_SERVICE_ID),
            token_code: read(ENV_TOKEN_CODE),
        }
    }

    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    pub fn with_token_code(mut self, token_code: impl Into<String>) -> Self {
        self.token_code = Some(token_code.into());
        self
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    pub fn service_id(&self) -> Option<&str> {
        self.service_id.as_deref()
    }

    pub fn token_code(&self) -> Option<&str> {
        self.token_code.as_deref()
    }

    /// `(user, password)` for HTTP basic auth, when both token code and token are set.
    ///
    /// Empty values count as unset.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        let filled = |v: Option<_>| v.filter(|v: &&str| !v.is_empty());
        Some((filled(self.token_code())?, filled(self.api_token())?))
    }
}

impl fmt::Debug for ApiAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiAuthentication")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("service_id", &self.service_id)
            .field("token_code", &self.token_code)
            .finish()
    }
}
