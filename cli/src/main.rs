//! `paynl` command-line entrypoint.
//!
//! Calls the Pay.nl REST API and prints the validated response as pretty JSON:
//! - `paynl service [--payment-method-id ID]` – service details, country and payment options
//! - `paynl banks` – the iDEAL bank list
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `PAYNL_CONFIG` points at a JSON configuration file
//! - without a configuration file, `PAYNL_API_TOKEN`, `PAYNL_SERVICE_ID`,
//!   `PAYNL_TOKEN_CODE` and `PAYNL_BASE_URL` are used
//! - `RUST_LOG` controls log output (with the `telemetry` feature)

mod args;
mod run;

use clap::Parser;
use dotenvy::dotenv;
use std::process;

use crate::args::CliArgs;
use crate::run::run;

#[tokio::main]
async fn main() {
    // Load .env before parsing so it can provide PAYNL_CONFIG
    dotenv().ok();
    let args = CliArgs::parse();
    if let Err(e) = run(args).await {
        eprintln!("{e}");
        process::exit(1)
    }
}
