//! HTTP client for the Pay.nl REST API.
//!
//! [`PaynlClient`] turns an [`ApiRequest`] into a form-encoded `POST` against
//! `{base_url}/v{version}/{controller}/{method}/json` and feeds the body back
//! into the request's response schema.
//!
//! ## Example
//!
//! ```rust
//! use paynl_rs::PaynlClient;
//!
//! let client = PaynlClient::try_from("https://rest-api.pay.nl").unwrap();
//! assert_eq!(client.base_url().as_str(), "https://rest-api.pay.nl/");
//! ```
//!
//! ## Error Handling
//!
//! [`PaynlError`] keeps the failure contexts apart:
//! - missing credentials, detected before anything is sent
//! - URL construction
//! - HTTP transport failures and unexpected HTTP statuses
//! - schema validation of the response body

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use paynl_types::config::ApiAuthentication;
use paynl_types::{ApiRequest, Parameters, RequestBase, RequestError, SchemaError};
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::config::ClientConfig;

pub(crate) static DEFAULT_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse(PaynlClient::DEFAULT_BASE_URL).expect("default base URL is valid")
});

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_ACCEPT: &str = "application/json";

/// Errors that can occur while calling the Pay.nl API.
///
/// Transport failures carry the underlying [`reqwest::Error`] unchanged.
/// A response that was received but reports a business failure is *not* an
/// error; check [`ResponseBase::is_error`](paynl_types::ResponseBase::is_error).
#[derive(Debug, thiserror::Error)]
pub enum PaynlError {
    /// The request was rejected before it was sent.
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        context: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("HTTP error: {context}: {source}")]
    Http {
        context: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Unexpected HTTP status {status}: {context}: {body}")]
    HttpStatus {
        context: String,
        status: StatusCode,
        body: String,
    },
    #[error("Failed to read response body as text: {context}: {source}")]
    ResponseBodyRead {
        context: String,
        #[source]
        source: reqwest::Error,
    },
    /// The response body did not match the operation's response schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A client for the Pay.nl REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct PaynlClient {
    /// Base URL of the API (e.g. `https://rest-api.pay.nl/`)
    base_url: Url,
    /// Shared Reqwest HTTP client
    client: Client,
    /// Credentials used for the standard parameters and basic auth
    auth: ApiAuthentication,
    /// Optional custom headers sent with each request
    headers: HeaderMap,
    /// Optional request timeout
    timeout: Option<Duration>,
}

impl PaynlClient {
    pub const DEFAULT_BASE_URL: &str = "https://rest-api.pay.nl/";

    /// Creates a client against [`Self::DEFAULT_BASE_URL`].
    pub fn new(auth: ApiAuthentication) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.clone(), auth)
    }

    /// Creates a client against a custom base URL, e.g. a sandbox or a mock server.
    ///
    /// The URL path is given a trailing slash, so endpoints resolve below it.
    pub fn with_base_url(base_url: Url, auth: ApiAuthentication) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            client: Client::new(),
            auth,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// Creates a client from a loaded [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Self {
        let client = Self::with_base_url(config.base_url().clone(), config.authentication());
        match config.timeout() {
            Some(timeout) => client.with_timeout(timeout),
            None => client,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn authentication(&self) -> &ApiAuthentication {
        &self.auth
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Replaces the credentials used for future requests.
    pub fn with_authentication(&self, auth: ApiAuthentication) -> Self {
        let mut this = self.clone();
        this.auth = auth;
        this
    }

    /// Attaches custom headers to all future requests.
    pub fn with_headers(&self, headers: HeaderMap) -> Self {
        let mut this = self.clone();
        this.headers = headers;
        this
    }

    /// Sets a timeout for all future requests.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut this = self.clone();
        this.timeout = Some(timeout);
        this
    }

    /// Wraps `request` with this client's credentials.
    pub fn prepare<R: RequestBase>(&self, request: R) -> ApiRequest<R> {
        ApiRequest::new(request).with_authentication(&self.auth)
    }

    /// Full endpoint URL for `request`.
    pub fn endpoint_url<R: RequestBase>(&self, request: &ApiRequest<R>) -> Result<Url, PaynlError> {
        self.base_url
            .join(&request.endpoint_path())
            .map_err(|e| PaynlError::UrlParse {
                context: "Failed to construct endpoint URL",
                source: e,
            })
    }

    /// Sends `request` with this client's credentials and returns the parsed response.
    pub async fn send<R: RequestBase>(&self, request: R) -> Result<R::Response, PaynlError> {
        let request = self.prepare(request);
        let raw = self.fetch(&request).await?;
        Ok(request.request().parse_response(&raw)?)
    }

    /// Sends a prepared request, attaches the raw body to it and returns the parsed response.
    ///
    /// The raw body stays available through [`ApiRequest::raw_response`], also
    /// when schema validation fails.
    pub async fn perform<'a, R: RequestBase>(
        &self,
        request: &'a mut ApiRequest<R>,
    ) -> Result<&'a R::Response, PaynlError> {
        let raw = self.fetch(request).await?;
        Ok(request.set_raw_response(raw)?)
    }

    /// Validates and sends `request`, returning the raw response body.
    ///
    /// Fails with [`PaynlError::Request`] without touching the network when a
    /// required standard parameter is missing.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "paynl.client.fetch",
            skip_all,
            fields(
                controller = request.request().controller(),
                method = request.request().method(),
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            ),
            err
        )
    )]
    pub async fn fetch<R: RequestBase>(&self, request: &ApiRequest<R>) -> Result<String, PaynlError> {
        request.validate()?;
        let url = self.endpoint_url(request)?;
        let context = format!("POST {}", request.endpoint_path());
        let params = request.parameters();

        #[cfg(feature = "telemetry")]
        tracing::debug!(
            %url,
            parameters = ?params.keys().collect::<Vec<_>>(),
            "paynl.client.request"
        );

        let result = self.post_form(url, context, &params).await;
        record_result_on_span(&result);
        result
    }

    /// POST helper that handles form encoding, authentication, headers,
    /// timeout application and error mapping.
    async fn post_form(
        &self,
        url: Url,
        context: String,
        params: &Parameters,
    ) -> Result<String, PaynlError> {
        let mut req = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT, JSON_ACCEPT)
            .body(params.to_form_body());
        for (key, value) in self.headers.iter() {
            req = req.header(key, value);
        }
        if let Some((user, password)) = self.auth.basic_auth() {
            req = req.basic_auth(user, Some(password));
        }
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let http_response = match req.send().await {
            Ok(response) => response,
            Err(source) => return Err(PaynlError::Http { context, source }),
        };
        let status = http_response.status();
        let body = match http_response.text().await {
            Ok(body) => body,
            Err(source) => return Err(PaynlError::ResponseBodyRead { context, source }),
        };

        #[cfg(feature = "telemetry")]
        tracing::trace!(%status, bytes = body.len(), "paynl.client.response");

        if status.is_success() {
            Ok(body)
        } else {
            Err(PaynlError::HttpStatus {
                context,
                status,
                body,
            })
        }
    }
}

/// Strips trailing slashes from the URL path and adds a single one.
///
/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    let path = format!("{}/", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url
}

/// Converts a string URL into a [`PaynlClient`] without credentials.
///
/// Chain [`PaynlClient::with_authentication`] to add them.
impl TryFrom<&str> for PaynlClient {
    type Error = PaynlError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let url = Url::parse(value).map_err(|e| PaynlError::UrlParse {
            context: "Failed to parse base url",
            source: e,
        })?;
        Ok(PaynlClient::with_base_url(url, ApiAuthentication::default()))
    }
}

impl TryFrom<String> for PaynlClient {
    type Error = PaynlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PaynlClient::try_from(value.as_str())
    }
}

/// Records the outcome of a request on the current span.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R>(result: &Result<R, PaynlError>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Request to Pay.nl failed");
        }
    }
}

/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R>(_result: &Result<R, PaynlError>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use paynl_types::ResponseBase;
    use paynl_types::api::transaction::{getbanks, getservice};
    use serde_json::json;
    use wiremock::matchers::{body_string, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn auth() -> ApiAuthentication {
        ApiAuthentication::new()
            .with_api_token("secret-token")
            .with_service_id("SL-1234-5678")
    }

    fn service_body() -> serde_json::Value {
        json!({
            "request": { "result": "1", "errorId": "", "errorMessage": "" },
            "merchant": { "id": "M-1234-5678", "name": "Acme B.V.", "publicName": "Acme" },
            "service": { "id": "SL-1234-5678", "name": "Webshop" },
            "settings": [],
            "countryOptionList": {
                "NL": { "id": "NL", "name": "Nederland", "paymentOptionList": [] }
            }
        })
    }

    async fn client(server: &MockServer, auth: ApiAuthentication) -> PaynlClient {
        PaynlClient::with_base_url(format!("{}/", server.uri()).parse().unwrap(), auth)
    }

    #[test]
    fn test_default_base_url() {
        let client = PaynlClient::new(auth());
        assert_eq!(client.base_url().as_str(), PaynlClient::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_try_from_normalizes_trailing_slash() {
        let client = PaynlClient::try_from("https://sandbox.example///").unwrap();
        assert_eq!(client.base_url().as_str(), "https://sandbox.example/");
        assert!(PaynlClient::try_from("not a url").is_err());
    }

    #[test]
    fn test_try_from_has_no_credentials() {
        let client = PaynlClient::try_from("https://sandbox.example").unwrap();
        assert_eq!(client.authentication(), &ApiAuthentication::default());
        let client = client.with_authentication(auth());
        assert_eq!(client.authentication().service_id(), Some("SL-1234-5678"));
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let config = ClientConfig::from_json(
            r#"{"apiToken": "secret-token", "serviceId": "SL-1234-5678", "baseUrl": "https://gw.example/paynl"}"#,
        )
        .unwrap();
        let client = PaynlClient::from_config(&config);
        let request = client.prepare(getservice::Request::new());
        assert_eq!(
            client.endpoint_url(&request).unwrap().as_str(),
            "https://gw.example/paynl/v12/Transaction/getService/json"
        );

        let base = Url::parse("https://gw.example/paynl//").unwrap();
        let client = PaynlClient::with_base_url(base, auth());
        assert_eq!(client.base_url().as_str(), "https://gw.example/paynl/");
    }

    #[test]
    fn test_endpoint_url() {
        let client = PaynlClient::new(auth());
        let request = client.prepare(getservice::Request::new());
        assert_eq!(
            client.endpoint_url(&request).unwrap().as_str(),
            "https://rest-api.pay.nl/v12/Transaction/getService/json"
        );
    }

    #[tokio::test]
    async fn test_get_service_roundtrip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v12/Transaction/getService/json"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("serviceId=SL-1234-5678&token=secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(service_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, auth()).await;
        let response = client.send(getservice::Request::new()).await.unwrap();
        assert!(!response.is_error());
        assert_eq!(response.merchant.name, "Acme B.V.");
        assert_eq!(response.service.id, "SL-1234-5678");
        assert!(response.settings.is_empty());
        assert!(response.country_options.contains_key("NL"));
    }

    #[tokio::test]
    async fn test_payment_method_id_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("paymentMethodId=10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(service_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, auth()).await;
        let request = getservice::Request::new().with_payment_method_id("10");
        client.send(request).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_service_id_never_reaches_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(service_body()))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server, ApiAuthentication::new().with_api_token("secret-token")).await;
        let err = client.send(getservice::Request::new()).await.unwrap_err();
        assert!(matches!(
            err,
            PaynlError::Request(RequestError::MissingServiceId { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_api_token_never_reaches_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server, ApiAuthentication::new().with_service_id("SL-1234-5678")).await;
        let err = client.send(getservice::Request::new()).await.unwrap_err();
        assert!(matches!(
            err,
            PaynlError::Request(RequestError::MissingApiToken { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_banks_needs_no_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v13/Transaction/getBanks/json"))
            .and(body_string(""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "1", "name": "ABN Amro", "issuerId": "0031", "swift": "ABNANL2A", "available": "1" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, ApiAuthentication::new()).await;
        let response = client.send(getbanks::Request).await.unwrap();
        assert_eq!(response.banks.len(), 1);
    }

    #[tokio::test]
    async fn test_basic_auth_with_token_code() {
        let server = MockServer::start().await;
        // base64("AT-0000-0000:secret-token")
        Mock::given(header(
            "authorization",
            "Basic QVQtMDAwMC0wMDAwOnNlY3JldC10b2tlbg==",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(service_body()))
        .expect(1)
        .mount(&server)
        .await;

        let client = client(&server, auth().with_token_code("AT-0000-0000")).await;
        client.send(getservice::Request::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_custom_headers_are_sent() {
        let server = MockServer::start().await;
        Mock::given(header("x-request-source", "tests"))
            .respond_with(ResponseTemplate::new(200).set_body_json(service_body()))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("x-request-source", HeaderValue::from_static("tests"));
        let client = client(&server, auth()).await.with_headers(headers);
        client.send(getservice::Request::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = client(&server, auth()).await;
        let err = client.send(getservice::Request::new()).await.unwrap_err();
        match err {
            PaynlError::HttpStatus { status, body, context } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "maintenance");
                assert_eq!(context, "POST v12/Transaction/getService/json");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_schema_error_is_distinct() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "request": { "result": "1" },
                "service": { "id": "SL-1234-5678", "name": "Webshop" }
            })))
            .mount(&server)
            .await;

        let client = client(&server, auth()).await;
        let err = client.send(getservice::Request::new()).await.unwrap_err();
        match err {
            PaynlError::Schema(error) => assert!(error.messages("merchant").is_some()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_business_error_is_returned_as_response() {
        let server = MockServer::start().await;
        let mut body = service_body();
        body["request"] = json!({ "result": "0", "errorId": "PAY-405", "errorMessage": "Service not found" });
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = client(&server, auth()).await;
        let response = client.send(getservice::Request::new()).await.unwrap();
        assert!(response.is_error());
        assert_eq!(response.request.error_message.as_deref(), Some("Service not found"));
    }

    #[tokio::test]
    async fn test_perform_keeps_raw_response_on_schema_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"unexpected\": true}"))
            .mount(&server)
            .await;

        let client = client(&server, auth()).await;
        let mut request = client.prepare(getservice::Request::new());
        let err = client.perform(&mut request).await.unwrap_err();
        assert!(matches!(err, PaynlError::Schema(_)));
        assert_eq!(request.raw_response(), Some("{\"unexpected\": true}"));
        assert!(request.response().is_none());
    }

    #[tokio::test]
    async fn test_perform_stores_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(service_body()))
            .mount(&server)
            .await;

        let client = client(&server, auth()).await;
        let mut request = client.prepare(getservice::Request::new());
        let merchant_id = client.perform(&mut request).await.unwrap().merchant.id.clone();
        assert_eq!(merchant_id, "M-1234-5678");
        assert!(request.response().is_some());
    }
}
