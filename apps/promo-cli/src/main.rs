//! # mavryk-promo Entry Point
//!
//! ```text
//! mavryk-promo [--config mavryk.toml] [--compact] [cart.json]
//! cat cart.json | mavryk-promo
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    promo_cli::run(promo_cli::Args::parse()).await
}
