use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the `paynl` binary.
#[derive(Parser, Debug)]
#[command(name = "paynl")]
#[command(about = "Pay.nl REST API client", version)]
pub struct CliArgs {
    /// Path to the JSON configuration file; credentials come from the environment when omitted
    #[arg(long, short, env = "PAYNL_CONFIG", global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the configured service with its country and payment options
    Service {
        /// Only include this payment method
        #[arg(long)]
        payment_method_id: Option<String>,
    },
    /// List the iDEAL banks
    Banks,
}
