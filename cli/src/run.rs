use paynl_rs::config::{ClientConfig, ConfigError};
use paynl_rs::types::objects::RequestStatus;
use paynl_rs::{Banks, PaynlClient, PaynlError, ResponseBase, Transaction};
use serde_json::Value;

use crate::args::{CliArgs, Command};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Paynl(#[from] PaynlError),
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Pay.nl reported an error: {}", describe(.0))]
    Api(RequestStatus),
}

fn describe(status: &RequestStatus) -> String {
    match (&status.error_id, &status.error_message) {
        (Some(id), Some(message)) => format!("{id}: {message}"),
        (None, Some(message)) => message.clone(),
        (Some(id), None) => id.clone(),
        (None, None) => "unknown error".to_string(),
    }
}

/// Runs a single CLI command.
///
/// - Initializes log output from `RUST_LOG`.
/// - Loads the configuration file, or the environment when none is given.
/// - Performs the call and prints the response as pretty JSON.
///
/// A status reported by the API as failed is printed, then returned as an error.
pub async fn run(args: CliArgs) -> Result<(), CliError> {
    #[cfg(feature = "telemetry")]
    init_tracing();

    let config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::from_env(),
    };
    #[cfg(feature = "telemetry")]
    tracing::debug!(?config, "Loaded configuration");
    let client = PaynlClient::from_config(&config);

    let (output, status) = match args.command {
        Command::Service { payment_method_id } => {
            let response =
                Transaction::get_service(&client, payment_method_id.as_deref()).await?;
            let status = response.is_error().then(|| response.request.clone());
            (serde_json::to_value(&response)?, status)
        }
        Command::Banks => {
            let response = Banks::get_list_response(&client).await?;
            let status = response.is_error().then(|| response.request.clone()).flatten();
            let output = match &status {
                Some(_) => serde_json::to_value(&response)?,
                None => serde_json::to_value(&response.banks)?,
            };
            (output, status)
        }
    };

    println!("{}", render(&output)?);
    match status {
        Some(status) => Err(CliError::Api(status)),
        None => Ok(()),
    }
}

fn render(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(feature = "telemetry")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Logs go to stderr so stdout stays valid JSON
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
