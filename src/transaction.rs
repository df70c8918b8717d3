//! Calls on the `Transaction` controller.

use paynl_types::api::transaction::{getbanks, getservice};
use paynl_types::objects::BankDetails;

use crate::client::{PaynlClient, PaynlError};

/// Entry points for the `Transaction` controller.
///
/// Each call builds the request, sends it with the client's credentials and
/// returns the validated response.
#[derive(Debug, Clone, Copy)]
pub struct Transaction;

impl Transaction {
    /// Fetches the configured service, optionally limited to one payment method.
    ///
    /// Requires both an API token and a service id on the client.
    pub async fn get_service(
        client: &PaynlClient,
        payment_method_id: Option<&str>,
    ) -> Result<getservice::Response, PaynlError> {
        let mut request = getservice::Request::new();
        if let Some(payment_method_id) = payment_method_id {
            request = request.with_payment_method_id(payment_method_id);
        }
        client.send(request).await
    }

    /// Fetches the iDEAL bank list.
    ///
    /// An error status reported by the API yields an empty list; use
    /// [`Transaction::get_banks_response`] to inspect it.
    pub async fn get_banks(client: &PaynlClient) -> Result<Vec<BankDetails>, PaynlError> {
        Ok(Self::get_banks_response(client).await?.banks)
    }

    /// Fetches the iDEAL bank list together with the status, if any.
    pub async fn get_banks_response(
        client: &PaynlClient,
    ) -> Result<getbanks::Response, PaynlError> {
        client.send(getbanks::Request).await
    }
}
