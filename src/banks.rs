//! Shortcuts for the iDEAL bank list.

use paynl_types::api::transaction::getbanks;
use paynl_types::objects::BankDetails;

use crate::client::{PaynlClient, PaynlError};
use crate::transaction::Transaction;

/// Bank list lookups, delegating to [`Transaction`].
#[derive(Debug, Clone, Copy)]
pub struct Banks;

impl Banks {
    /// Returns the banks that can be selected for an iDEAL payment.
    pub async fn get_list(client: &PaynlClient) -> Result<Vec<BankDetails>, PaynlError> {
        Transaction::get_banks(client).await
    }

    pub async fn get_list_response(
        client: &PaynlClient,
    ) -> Result<getbanks::Response, PaynlError> {
        Transaction::get_banks_response(client).await
    }
}
