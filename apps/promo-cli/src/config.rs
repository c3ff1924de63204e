//! # Configuration
//!
//! Settings for the quote command, loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`MAVRYK_*`)
//! 2. Config file (`--config <path>` or `MAVRYK_CONFIG`), TOML
//! 3. Defaults (this file)
//!
//! ```toml
//! # mavryk.toml
//! rounding = "half_even"
//! remainder = "largest"
//! log_format = "compact"
//! max_line_items = 50
//! ```

use std::path::Path;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use mavryk_core::{RemainderPolicy, RoundingMode, CURRENCY_CODE, MAX_CART_ITEMS};
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables read by [`PromoConfig::load`].
pub const ENV_PREFIX: &str = "MAVRYK";

/// Quote command configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoConfig {
    /// Rounding of proportional shares when the request does not say.
    pub rounding: RoundingMode,

    /// Which line absorbs the rounding remainder when the request does not say.
    pub remainder: RemainderPolicy,

    /// Log formatter
    pub log_format: LogFormat,

    /// Maximum lines accepted in one request.
    pub max_line_items: usize,

    /// Currency echoed in responses (ISO 4217)
    pub currency_code: String,
}

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human friendly
    #[default]
    Pretty,
    /// One line per event
    Compact,
}

impl Default for PromoConfig {
    fn default() -> Self {
        PromoConfig {
            rounding: RoundingMode::default(),
            remainder: RemainderPolicy::default(),
            log_format: LogFormat::default(),
            max_line_items: MAX_CART_ITEMS,
            currency_code: CURRENCY_CODE.to_string(),
        }
    }
}

impl PromoConfig {
    /// Loads configuration from defaults, the optional TOML file and
    /// `MAVRYK_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        Self::from_builder(builder)
    }

    /// A builder seeded with the default values.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = PromoConfig::default();
        let builder = Config::builder()
            .set_default("rounding", "half_up")?
            .set_default("remainder", "last")?
            .set_default("log_format", "pretty")?
            .set_default("max_line_items", defaults.max_line_items as i64)?
            .set_default("currency_code", defaults.currency_code)?;
        Ok(builder)
    }

    /// Builds and validates a configuration from `builder`'s sources.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: PromoConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_line_items == 0 || self.max_line_items > MAX_CART_ITEMS {
            return Err(ConfigError::InvalidValue(format!(
                "max_line_items must be between 1 and {}",
                MAX_CART_ITEMS
            )));
        }

        if self.currency_code.len() != 3
            || !self.currency_code.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(ConfigError::InvalidValue(
                "currency_code must be a 3-letter ISO 4217 code".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Failed to load configuration: {0}")]
    Source(#[from] ::config::ConfigError),
}
