//! `Transaction::getService`: details of the configured service.
//!
//! # Wire Format
//!
//! ```json
//! {
//!   "request": { "result": "1", "errorId": "", "errorMessage": "" },
//!   "merchant": { "id": "M-1234-5678", "name": "Acme", "publicName": "Acme", "state": "1" },
//!   "service": { "id": "SL-1234-5678", "name": "Webshop", "basePath": "https://acme.example" },
//!   "settings": [],
//!   "countryOptionList": {
//!     "NL": { "id": "NL", "name": "Nederland", "paymentOptionList": { "10": { "id": "10", "name": "iDEAL" } } }
//!   }
//! }
//! ```
//!
//! Empty `settings` and `countryOptionList` arrive as `[]`, populated ones as
//! keyed maps.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::api::transaction::CONTROLLER;
use crate::api::{Parameters, RequestBase, ResponseBase};
use crate::objects::{CountryOption, Merchant, RequestStatus, Service};
use crate::schema::{SchemaError, SchemaLoader, key_by_id, map_to_list, prune_empty};

const SETTINGS: &str = "settings";
const COUNTRY_OPTION_LIST: &str = "countryOptionList";

/// Request for `Transaction::getService`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Restricts the returned payment options to a single payment method.
    pub payment_method_id: Option<String>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payment_method_id(mut self, payment_method_id: impl Into<String>) -> Self {
        self.payment_method_id = Some(payment_method_id.into());
        self
    }
}

impl RequestBase for Request {
    type Response = Response;

    fn requires_api_token(&self) -> bool {
        true
    }

    fn requires_service_id(&self) -> bool {
        true
    }

    fn version(&self) -> u32 {
        12
    }

    fn controller(&self) -> &str {
        CONTROLLER
    }

    fn method(&self) -> &str {
        "getService"
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert_opt("paymentMethodId", self.payment_method_id.as_ref());
        params
    }

    fn parse_response(&self, raw: &str) -> Result<Response, SchemaError> {
        parse_response(raw)
    }
}

/// Response of `Transaction::getService`.
///
/// Serializes back to the wire shape, with `countryOptionList` as an id-keyed map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub request: RequestStatus,
    pub merchant: Merchant,
    pub service: Service,
    /// Free-form service settings; empty when the API sends none.
    pub settings: Map<String, Value>,
    /// Country options keyed by [`CountryOption::id`]; empty when the API sends none.
    #[serde(rename = "countryOptionList")]
    pub country_options: BTreeMap<String, CountryOption>,
}

impl ResponseBase for Response {
    fn request(&self) -> Option<&RequestStatus> {
        Some(&self.request)
    }
}

/// Parses a raw `getService` body: normalize, validate, construct.
pub fn parse_response(raw: &str) -> Result<Response, SchemaError> {
    let mut loader = SchemaLoader::from_str(raw)?;
    normalize(loader.data_mut());

    let request = loader.required::<RequestStatus>("request");
    let merchant = loader.required::<Merchant>("merchant");
    let service = loader.required::<Service>("service");
    let settings = loader.optional::<Map<String, Value>>(SETTINGS);
    let country_options = loader.optional::<Vec<CountryOption>>(COUNTRY_OPTION_LIST);

    match (request, merchant, service) {
        (Some(request), Some(merchant), Some(service)) if loader.is_valid() => Ok(Response {
            request,
            merchant,
            service,
            settings: settings.unwrap_or_default(),
            country_options: key_by_id(country_options.unwrap_or_default()),
        }),
        _ => Err(loader.into_error()),
    }
}

/// Pre-load normalization of the raw mapping.
///
/// Drops empty optional collections and turns the keyed `countryOptionList`
/// map into a sequence.
fn normalize(data: &mut Map<String, Value>) {
    prune_empty(data, SETTINGS);
    if !prune_empty(data, COUNTRY_OPTION_LIST) {
        map_to_list(data, COUNTRY_OPTION_LIST);
    }
}
