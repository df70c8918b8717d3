//! `Transaction::getBanks`: the list of iDEAL issuers.
//!
//! Unlike most operations, a successful call returns a bare JSON list with no
//! `request` status:
//!
//! ```json
//! [
//!   { "id": "1", "name": "ABN Amro", "issuerId": "0031", "swift": "ABNANL2A", "icon": "...", "available": "1" }
//! ]
//! ```
//!
//! Failures come back as an object carrying the usual `request` status.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::transaction::CONTROLLER;
use crate::api::{Parameters, RequestBase, ResponseBase};
use crate::objects::{BankDetails, RequestStatus};
use crate::schema::{SchemaError, SchemaLoader};

const BANKS: &str = "banks";

/// Request for `Transaction::getBanks`. Takes no parameters and no credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Request;

impl RequestBase for Request {
    type Response = Response;

    fn requires_api_token(&self) -> bool {
        false
    }

    fn requires_service_id(&self) -> bool {
        false
    }

    fn version(&self) -> u32 {
        13
    }

    fn controller(&self) -> &str {
        CONTROLLER
    }

    fn method(&self) -> &str {
        "getBanks"
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
    }

    fn parse_response(&self, raw: &str) -> Result<Response, SchemaError> {
        parse_response(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// Present only when the API wrapped the result in a status object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestStatus>,
    pub banks: Vec<BankDetails>,
}

impl ResponseBase for Response {
    fn request(&self) -> Option<&RequestStatus> {
        self.request.as_ref()
    }
}

/// Parses a raw `getBanks` body, either a bare list or a status object.
pub fn parse_response(raw: &str) -> Result<Response, SchemaError> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Array(banks) => {
            let mut data = Map::new();
            data.insert(BANKS.to_string(), Value::Array(banks));
            let mut loader = SchemaLoader::new(data);
            let banks = loader.required::<Vec<BankDetails>>(BANKS);
            match banks {
                Some(banks) if loader.is_valid() => Ok(Response { request: None, banks }),
                _ => Err(loader.into_error()),
            }
        }
        value => {
            let mut loader = SchemaLoader::from_value(value)?;
            let request = loader.required::<RequestStatus>("request");
            let banks = loader.optional::<Vec<BankDetails>>(BANKS);
            match request {
                Some(request) if loader.is_valid() => Ok(Response {
                    request: Some(request),
                    banks: banks.unwrap_or_default(),
                }),
                _ => Err(loader.into_error()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiRequest;

    const BANK_LIST: &str = r#"[
        {"id": "1", "name": "ABN Amro", "issuerId": "0031", "swift": "ABNANL2A", "icon": "https://static.pay.nl/ideal/banks/1.png", "available": "1"},
        {"id": 2, "name": "Rabobank", "issuerId": "0021", "swift": "RABONL2U", "icon": "", "available": "0"}
    ]"#;

    #[test]
    fn test_request_identifiers() {
        let request = ApiRequest::new(Request);
        assert_eq!(request.endpoint_path(), "v13/Transaction/getBanks/json");
        assert!(request.parameters().is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_credentials_are_not_sent() {
        let request = ApiRequest::new(Request)
            .with_api_token("secret")
            .with_service_id("SL-1234-5678");
        assert!(request.parameters().is_empty());
    }

    #[test]
    fn test_parse_bank_list() {
        let response = parse_response(BANK_LIST).unwrap();
        assert!(!response.is_error());
        assert_eq!(response.request, None);
        assert_eq!(response.banks.len(), 2);
        assert_eq!(response.banks[0].swift.as_deref(), Some("ABNANL2A"));
        assert!(response.banks[0].available);
        assert_eq!(response.banks[1].id, "2");
        assert!(!response.banks[1].available);
    }

    #[test]
    fn test_parse_empty_list() {
        let response = parse_response("[]").unwrap();
        assert!(response.banks.is_empty());
    }

    #[test]
    fn test_parse_error_object() {
        let response = parse_response(
            r#"{"request": {"result": "0", "errorId": "PAY-10", "errorMessage": "Unavailable"}}"#,
        )
        .unwrap();
        assert!(response.is_error());
        assert!(response.banks.is_empty());
    }

    #[test]
    fn test_malformed_bank_is_a_schema_error() {
        let error = parse_response(r#"[{"name": "No id"}]"#).unwrap_err();
        assert!(error.messages(BANKS).unwrap()[0].contains("missing field `id`"));
    }

    #[test]
    fn test_object_without_status_is_a_schema_error() {
        let error = parse_response(r#"{"banks": []}"#).unwrap_err();
        assert!(error.messages("request").is_some());
    }

    #[test]
    fn test_scalar_body_is_a_schema_error() {
        assert!(parse_response("42").is_err());
    }
}
