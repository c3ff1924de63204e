//! # Mavryk Promo CLI
//!
//! Prices a cart from JSON: applies a promo code (or a given lump discount)
//! and prints the per-line discount breakdown.
//!
//! ## Module Organization
//! ```text
//! promo_cli/
//! ├── lib.rs          ◄─── You are here (args, logging, run)
//! ├── config.rs       ◄─── Defaults, TOML file, MAVRYK_* env
//! ├── request.rs      ◄─── QuoteRequest / QuoteResponse, validation
//! └── error.rs        ◄─── CliError and the JSON error envelope
//! ```
//!
//! ## Streams
//! stdout carries exactly one JSON document (the quote or the error
//! envelope); logs go to stderr.

pub mod config;
pub mod error;
pub mod request;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, PromoConfig};
use crate::error::{CliError, ErrorResponse};
use crate::request::{QuoteRequest, QuoteResponse};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "mavryk-promo", version, about = "Price a cart and split its promo discount across lines")]
pub struct Args {
    /// TOML configuration file
    #[arg(long, env = "MAVRYK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Quote request JSON file; reads stdin when omitted
    pub input: Option<PathBuf>,
}

/// Runs the quote command and returns the process exit status.
///
/// ## Sequence
/// 1. Load configuration
/// 2. Initialize tracing (format from config)
/// 3. Read and parse the request
/// 4. Validate, price, allocate
/// 5. Print the response or the error envelope
pub async fn run(args: Args) -> ExitCode {
    let config = match PromoConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            let err = CliError::from(e);
            error!(error = %err, "failed to load configuration");
            return report(&err, args.compact);
        }
    };

    init_tracing(config.log_format);
    info!(
        rounding = ?config.rounding,
        remainder = ?config.remainder,
        max_line_items = config.max_line_items,
        "configuration loaded"
    );

    match quote(args.input.as_deref(), &config).await {
        Ok(response) => {
            info!(
                lines = response.lines.len(),
                discount = response.discount.dong(),
                total = response.total.dong(),
                "quote ready"
            );
            match print_json(&response, args.compact) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!(error = %e, "failed to write response");
                    ExitCode::from(error::EXIT_FAILURE)
                }
            }
        }
        Err(err) => {
            warn!(error = %err, "quote failed");
            report(&err, args.compact)
        }
    }
}

/// Reads, parses and prices a request.
pub async fn quote(input: Option<&Path>, config: &PromoConfig) -> Result<QuoteResponse, CliError> {
    let raw = read_input(input).await?;
    let request: QuoteRequest = serde_json::from_str(&raw)?;
    let response = request.quote(config, Utc::now())?;
    Ok(response)
}

async fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
        None => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            Ok(raw)
        }
    }
}

fn report(err: &CliError, compact: bool) -> ExitCode {
    let response = ErrorResponse::from(err);
    if let Err(e) = print_json(&response, compact) {
        error!(error = %e, "failed to write error response");
    }
    ExitCode::from(err.exit_code())
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<(), serde_json::Error> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", json);
    Ok(())
}

/// Initializes the tracing subscriber, writing to stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mavryk_core=trace` - Trace every allocation
/// - Default: INFO, DEBUG for the mavryk crates
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mavryk_core=debug,promo_cli=debug"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mavryk_core::Money;
    use std::io::Write;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["mavryk-promo", "--compact", "cart.json"]).unwrap();
        assert!(args.compact);
        assert_eq!(args.input, Some(PathBuf::from("cart.json")));
    }

    #[tokio::test]
    async fn test_quote_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "items": [{{ "unitPrice": 100 }}, {{ "unitPrice": 200 }}, {{ "unitPrice": 300 }}], "totalDiscount": 100 }}"#
        )
        .unwrap();

        let response = quote(Some(file.path()), &PromoConfig::default()).await.unwrap();
        assert_eq!(response.total, Money::from_dong(500));
        assert_eq!(response.lines[2].discount, Money::from_dong(50));
    }

    #[tokio::test]
    async fn test_quote_reports_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = quote(Some(file.path()), &PromoConfig::default()).await.unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
    }

    #[tokio::test]
    async fn test_misspelled_field_is_malformed_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "items": [{{ "unitPrice": 100 }}], "totalDiscont": 10 }}"#).unwrap();

        let err = quote(Some(file.path()), &PromoConfig::default()).await.unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
        assert_eq!(err.exit_code(), error::EXIT_INVALID_INPUT);
        assert_eq!(ErrorResponse::from(&err).code, error::ErrorCode::MalformedInput);
    }

    #[tokio::test]
    async fn test_quote_reports_missing_file() {
        let err = quote(Some(Path::new("/nonexistent/cart.json")), &PromoConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
