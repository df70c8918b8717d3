//! Operations of the `Transaction` controller.
//!
//! - [`getservice`] - `Transaction::getService` (v12): merchant, service and available payment options
//! - [`getbanks`] - `Transaction::getBanks` (v13): iDEAL issuers

pub mod getbanks;
pub mod getservice;

pub(crate) const CONTROLLER: &str = "Transaction";
