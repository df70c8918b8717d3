//! The request/response contract shared by every API operation.
//!
//! # Key Types
//!
//! - [`RequestBase`] - Implemented by each operation's request: identifiers, parameters, response parser
//! - [`ResponseBase`] - Implemented by each operation's response: status access and [`ResponseBase::is_error`]
//! - [`ApiRequest`] - Lifecycle holder: standard parameters, raw response, parsed response
//! - [`Parameters`] - Wire parameter map that never holds empty values
//!
//! # Lifecycle
//!
//! ```text
//! construct -> authenticate -> parameters() -> send -> set_raw_response() -> response()
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::config::ApiAuthentication;
use crate::objects::RequestStatus;
use crate::schema::SchemaError;

pub mod transaction;

/// Wire parameters of a request, in key order.
///
/// Empty values are never stored: inserting `""` or `None` is a no-op, so a
/// parameter that was left unset never reaches the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, String>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, unless the value is empty.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if !value.is_empty() {
            self.0.insert(key.into(), value);
        }
        self
    }

    /// Sets `key` when `value` is present and non-empty.
    pub fn insert_opt<V: AsRef<str>>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value.as_ref());
        }
        self
    }

    /// Merges `other` into `self`; keys in `other` take precedence.
    pub fn merge(&mut self, other: Parameters) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes the parameters as an `application/x-www-form-urlencoded` body.
    pub fn to_form_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// Standard parameters every request may carry.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StdParameters {
    pub api_token: Option<String>,
    pub service_id: Option<String>,
}

impl Debug for StdParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdParameters")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("service_id", &self.service_id)
            .finish()
    }
}

impl From<&ApiAuthentication> for StdParameters {
    fn from(auth: &ApiAuthentication) -> Self {
        Self {
            api_token: auth.api_token().map(str::to_string),
            service_id: auth.service_id().map(str::to_string),
        }
    }
}

/// Contract implemented by every operation's request type.
pub trait RequestBase {
    /// The typed response produced by [`RequestBase::parse_response`].
    type Response: ResponseBase + Debug;

    /// Whether the `token` standard parameter must be present.
    fn requires_api_token(&self) -> bool;

    /// Whether the `serviceId` standard parameter must be present.
    fn requires_service_id(&self) -> bool;

    /// API version the operation is served under.
    fn version(&self) -> u32;

    /// Controller name, e.g. `Transaction`.
    fn controller(&self) -> &str;

    /// Method name, e.g. `getService`.
    fn method(&self) -> &str;

    /// Query string appended to the endpoint, without the leading `?`.
    fn query_string(&self) -> String {
        String::new()
    }

    /// Operation-specific parameters. Unset inputs must not appear.
    fn parameters(&self) -> Parameters;

    /// Standard parameters merged with [`RequestBase::parameters`].
    ///
    /// A standard parameter is only included when the operation requires it,
    /// and never when its value is unset or empty.
    fn full_parameters(&self, std: &StdParameters) -> Parameters {
        let mut params = Parameters::new();
        if self.requires_api_token() {
            params.insert_opt("token", std.api_token.as_deref());
        }
        if self.requires_service_id() {
            params.insert_opt("serviceId", std.service_id.as_deref());
        }
        params.merge(self.parameters());
        params
    }

    /// Parses, validates and constructs the typed response from a raw body.
    fn parse_response(&self, raw: &str) -> Result<Self::Response, SchemaError>;
}

/// Contract implemented by every operation's response type.
pub trait ResponseBase {
    /// The generic API status (`request` on the wire), when the response carries one.
    fn request(&self) -> Option<&RequestStatus>;

    /// `true` iff a status is present and reports failure.
    fn is_error(&self) -> bool {
        self.request().is_some_and(|status| !status.result)
    }
}

/// A request rejected before it was sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("API token is required for {controller}::{method} but not set")]
    MissingApiToken { controller: String, method: String },
    #[error("Service id is required for {controller}::{method} but not set")]
    MissingServiceId { controller: String, method: String },
}

/// A request together with its standard parameters and, once sent, its response.
#[derive(Debug)]
pub struct ApiRequest<R: RequestBase> {
    request: R,
    std: StdParameters,
    raw_response: Option<String>,
    response: Option<R::Response>,
}

impl<R: RequestBase> ApiRequest<R> {
    pub fn new(request: R) -> Self {
        Self {
            request,
            std: StdParameters::default(),
            raw_response: None,
            response: None,
        }
    }

    /// Fills the standard parameters from `auth`.
    pub fn with_authentication(mut self, auth: &ApiAuthentication) -> Self {
        self.std = StdParameters::from(auth);
        self
    }

    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.std.api_token = Some(api_token.into());
        self
    }

    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.std.service_id = Some(service_id.into());
        self
    }

    pub fn request(&self) -> &R {
        &self.request
    }

    pub fn std_parameters(&self) -> &StdParameters {
        &self.std
    }

    /// Full wire parameters for this request.
    pub fn parameters(&self) -> Parameters {
        self.request.full_parameters(&self.std)
    }

    /// Endpoint path relative to the API base URL: `v{version}/{controller}/{method}/json[?query]`.
    pub fn endpoint_path(&self) -> String {
        let path = format!(
            "v{}/{}/{}/json",
            self.request.version(),
            self.request.controller(),
            self.request.method()
        );
        let query = self.request.query_string();
        if query.is_empty() {
            path
        } else {
            format!("{path}?{query}")
        }
    }

    /// Checks that the standard parameters this operation requires are set.
    pub fn validate(&self) -> Result<(), RequestError> {
        let blank = |value: &Option<String>| value.as_deref().is_none_or(str::is_empty);
        if self.request.requires_api_token() && blank(&self.std.api_token) {
            return Err(RequestError::MissingApiToken {
                controller: self.request.controller().to_string(),
                method: self.request.method().to_string(),
            });
        }
        if self.request.requires_service_id() && blank(&self.std.service_id) {
            return Err(RequestError::MissingServiceId {
                controller: self.request.controller().to_string(),
                method: self.request.method().to_string(),
            });
        }
        Ok(())
    }

    /// Stores the raw body and parses it into the typed response.
    ///
    /// On failure the raw body is kept for inspection and no response is stored.
    pub fn set_raw_response(&mut self, raw: impl Into<String>) -> Result<&R::Response, SchemaError> {
        let raw = raw.into();
        self.response = None;
        let parsed = self.request.parse_response(&raw);
        self.raw_response = Some(raw);
        Ok(self.response.insert(parsed?))
    }

    pub fn raw_response(&self) -> Option<&str> {
        self.raw_response.as_deref()
    }

    pub fn response(&self) -> Option<&R::Response> {
        self.response.as_ref()
    }

    pub fn into_response(self) -> Option<R::Response> {
        self.response
    }
}
