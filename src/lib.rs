#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Rust client for the [Pay.nl](https://www.pay.nl) REST API.
//!
//! This crate sends the typed requests defined in [`paynl_types`] over HTTP and
//! hands back validated, typed responses.
//!
//! # Quickstart
//!
//! ```rust,no_run
//! use paynl_rs::{Banks, PaynlClient, ResponseBase, Transaction};
//! use paynl_rs::types::config::ApiAuthentication;
//!
//! # async fn example() -> Result<(), paynl_rs::PaynlError> {
//! let auth = ApiAuthentication::new()
//!     .with_api_token("API_TOKEN")
//!     .with_service_id("SL-1234-5678");
//! let client = PaynlClient::new(auth);
//!
//! let service = Transaction::get_service(&client, None).await?;
//! if service.is_error() {
//!     println!("API error: {:?}", service.request.error_message);
//! }
//!
//! for bank in Banks::get_list(&client).await? {
//!     println!("{} ({})", bank.name, bank.id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Three outcomes are kept apart:
//!
//! - the request was rejected before sending, or the transport failed: [`PaynlError`]
//! - the body did not match the response schema: [`PaynlError::Schema`]
//! - the call succeeded but the API reported a failure: an `Ok` response whose
//!   [`is_error()`](paynl_types::ResponseBase::is_error) is `true`
//!
//! # Modules
//!
//! - [`client`] - [`PaynlClient`], the HTTP client performing API requests
//! - [`config`] - [`ClientConfig`](config::ClientConfig), file and environment based configuration
//! - [`transaction`] - [`Transaction`], convenience calls for the `Transaction` controller
//! - [`banks`] - [`Banks`], shortcuts for the iDEAL bank list
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing spans and events for API calls

pub mod banks;
pub mod client;
pub mod config;
pub mod transaction;

pub use banks::Banks;
pub use client::{PaynlClient, PaynlError};
pub use paynl_types as types;
pub use paynl_types::ResponseBase;
pub use transaction::Transaction;
