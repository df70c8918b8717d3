//! Flat value objects shared between API operations.
//!
//! These types carry no behaviour beyond (de)serialization. Field names follow
//! Rust conventions; the camelCase wire names are mapped through serde.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::{Keyed, id_keyed};
use crate::util::{flag, opt_text, text};

/// Generic API result attached to every response under the `request` key.
///
/// If the call itself failed, `result` is `false` and the error id/message
/// describe the failure.
///
/// ```json
/// { "result": "0", "errorId": "PAY-405", "errorMessage": "Service not found" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatus {
    #[serde(with = "flag")]
    pub result: bool,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub error_id: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RequestStatus {
    /// A successful status without error details.
    pub fn success() -> Self {
        Self {
            result: true,
            error_id: None,
            error_message: None,
        }
    }

    /// A failed status carrying the given error id and message.
    pub fn failure(error_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            result: false,
            error_id: Some(error_id.into()),
            error_message: Some(error_message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    #[serde(with = "text")]
    pub id: String,
    #[serde(with = "text")]
    pub name: String,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub public_name: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// A sales location ("service") of a merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(with = "text")]
    pub id: String,
    #[serde(with = "text")]
    pub name: String,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub publication: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub sub_module: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(with = "text")]
    pub id: String,
    #[serde(with = "text")]
    pub name: String,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub public_name: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A payment method available within a [`CountryOption`].
///
/// Costs arrive as decimal strings (`"0.29"`) and are kept exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    #[serde(with = "text")]
    pub id: String,
    #[serde(with = "text")]
    pub name: String,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub visible_name: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costs_fixed: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costs_percentage: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<Brand>,
}

impl Keyed for PaymentMethod {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Payment options grouped per country (or `ALL` for country-independent ones).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryOption {
    #[serde(with = "text")]
    pub id: String,
    #[serde(with = "text")]
    pub name: String,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub visible_name: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Payment methods keyed by their id.
    #[serde(
        rename = "paymentOptionList",
        default,
        deserialize_with = "id_keyed::deserialize",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub payment_methods: BTreeMap<String, PaymentMethod>,
}

impl Keyed for CountryOption {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(with = "text")]
    pub id: String,
    #[serde(with = "text")]
    pub name: String,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub swift: Option<String>,
    #[serde(default, with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, with = "flag")]
    pub available: bool,
}

impl Keyed for BankDetails {
    fn key(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_request_status_from_wire() {
        let status: RequestStatus =
            serde_json::from_value(json!({ "result": "1", "errorId": "", "errorMessage": "" }))
                .unwrap();
        assert_eq!(status, RequestStatus::success());

        let status: RequestStatus = serde_json::from_value(
            json!({ "result": "0", "errorId": "PAY-405", "errorMessage": "Service not found" }),
        )
        .unwrap();
        assert_eq!(status, RequestStatus::failure("PAY-405", "Service not found"));
    }

    #[test]
    fn test_request_status_requires_result() {
        let result: Result<RequestStatus, _> =
            serde_json::from_value(json!({ "errorId": "", "errorMessage": "" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_merchant_requires_id_and_name() {
        let result: Result<Merchant, _> = serde_json::from_value(json!({ "name": "Acme" }));
        assert!(result.unwrap_err().to_string().contains("missing field `id`"));
    }

    #[test]
    fn test_payment_method_costs_are_exact() {
        let method: PaymentMethod = serde_json::from_value(json!({
            "id": 10,
            "name": "iDEAL",
            "costsFixed": "0.29",
            "costsPercentage": "0",
            "brand": { "id": 1, "name": "iDEAL", "publicName": "iDEAL", "image": "" }
        }))
        .unwrap();
        assert_eq!(method.id, "10");
        assert_eq!(method.costs_fixed, Some(Decimal::from_str("0.29").unwrap()));
        assert_eq!(method.brand.unwrap().image, None);
    }

    #[test]
    fn test_country_option_payment_methods_from_map() {
        let option: CountryOption = serde_json::from_value(json!({
            "id": "NL",
            "name": "Nederland",
            "paymentOptionList": {
                "10": { "id": "10", "name": "iDEAL" },
                "706": { "id": "706", "name": "Visa/Mastercard" }
            }
        }))
        .unwrap();
        assert_eq!(option.payment_methods.len(), 2);
        assert_eq!(option.payment_methods["706"].name, "Visa/Mastercard");
    }

    #[test]
    fn test_country_option_without_payment_methods() {
        let option: CountryOption = serde_json::from_value(json!({
            "id": "ALL",
            "name": "All countries",
            "paymentOptionList": []
        }))
        .unwrap();
        assert!(option.payment_methods.is_empty());
    }

    #[test]
    fn test_bank_details_from_wire() {
        let bank: BankDetails = serde_json::from_value(json!({
            "id": 1,
            "name": "ABN Amro",
            "issuerId": "0031",
            "swift": "ABNANL2A",
            "icon": "",
            "available": "1"
        }))
        .unwrap();
        assert_eq!(bank.id, "1");
        assert_eq!(bank.issuer_id.as_deref(), Some("0031"));
        assert_eq!(bank.icon, None);
        assert!(bank.available);
    }
}
