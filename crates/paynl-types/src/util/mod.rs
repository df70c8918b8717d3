//! Helpers for the loosely typed scalars of the Pay.nl wire format.
//!
//! - [`flag`] - Booleans sent as `"1"`/`"0"`, `1`/`0` or `true`/`false`
//! - [`text`] - Required strings that may arrive as numbers
//! - [`opt_text`] - Optional strings where `""` and `null` both mean "not set"

pub mod wire;

pub use wire::{flag, opt_text, text};
