#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the Pay.nl REST API.
//!
//! This crate contains the marshalling layer of the SDK: everything needed to
//! turn a typed request into wire parameters, and a wire JSON body into a typed
//! response. It performs no I/O; the HTTP client lives in the `paynl-rs` crate.
//!
//! # Modules
//!
//! - [`api`] - The [`RequestBase`](api::RequestBase) / [`ResponseBase`](api::ResponseBase)
//!   contract, the request lifecycle holder and the per-operation request/response pairs
//! - [`config`] - API credentials and environment variable resolution
//! - [`objects`] - Flat value objects shared between operations (merchant, service, banks, ...)
//! - [`schema`] - Typed parse helpers: JSON normalization, field-level validation, id re-keying
//! - [`util`] - Lenient deserializers for the API's loosely typed scalars
//!
//! # Wire Format
//!
//! Requests are flat key/value maps sent form-encoded. Responses are JSON with
//! camelCase field names, where scalars frequently arrive as strings
//! (`"1"` for `true`, `"12"` for `12`) and empty collections arrive as `[]`
//! regardless of whether the populated form is a list or a keyed map.
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing events for schema validation failures

pub mod api;
pub mod config;
pub mod objects;
pub mod schema;
pub mod util;

pub use api::{ApiRequest, Parameters, RequestBase, RequestError, ResponseBase, StdParameters};
pub use schema::SchemaError;
