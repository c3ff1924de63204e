//! # CLI Error Type
//!
//! Everything that can stop a quote, and the JSON envelope it is reported
//! in.
//!
//! ## Serialization
//! Failures are printed to stdout like successes, so the caller always gets
//! JSON back:
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "Invalid request: items[0].quantity: quantity must be positive",
//!   "fields": [{ "field": "items[0].quantity", "message": "quantity must be positive" }]
//! }
//! ```

use mavryk_core::{CoreError, FieldError};
use serde::Serialize;

use crate::config::ConfigError;

/// Exit status for input the caller can fix.
pub const EXIT_INVALID_INPUT: u8 = 2;

/// Exit status for everything else.
pub const EXIT_FAILURE: u8 = 1;

/// Quote command errors.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Json(_) => EXIT_INVALID_INPUT,
            CliError::Core(CoreError::ArithmeticOverflow { .. }) => EXIT_FAILURE,
            CliError::Core(_) => EXIT_INVALID_INPUT,
            CliError::Config(_) | CliError::Io(_) => EXIT_FAILURE,
        }
    }
}

/// Error envelope written to stdout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Field-level failures, for validation errors
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

/// Error codes for the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request failed field validation
    ValidationError,

    /// Allocator precondition violated
    InvalidArgument,

    /// Promo code exists but cannot be applied
    PromoRejected,

    /// Cart limits exceeded
    CartError,

    /// Amounts too large to compute
    ArithmeticOverflow,

    /// Input is not valid JSON for a quote request
    MalformedInput,

    ConfigError,

    IoError,
}

impl From<&CliError> for ErrorResponse {
    fn from(error: &CliError) -> Self {
        let code = match error {
            CliError::Config(_) => ErrorCode::ConfigError,
            CliError::Io(_) => ErrorCode::IoError,
            CliError::Json(_) => ErrorCode::MalformedInput,
            CliError::Core(core) => match core {
                CoreError::InvalidRequest(_) | CoreError::Validation(_) => {
                    ErrorCode::ValidationError
                }
                CoreError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
                CoreError::PromoNotActive { .. } | CoreError::PromoMinimumNotMet { .. } => {
                    ErrorCode::PromoRejected
                }
                CoreError::CartTooLarge { .. }
                | CoreError::QuantityTooLarge { .. }
                | CoreError::ItemNotInCart(_) => ErrorCode::CartError,
                CoreError::ArithmeticOverflow { .. } => ErrorCode::ArithmeticOverflow,
            },
        };

        let fields = match error {
            CliError::Core(CoreError::InvalidRequest(errors)) => errors.0.clone(),
            CliError::Core(CoreError::Validation(e)) => vec![FieldError::from(e.clone())],
            _ => Vec::new(),
        };

        ErrorResponse {
            code,
            message: error.to_string(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mavryk_core::{FieldErrors, Money, ValidationError};

    #[test]
    fn test_validation_envelope_lists_fields() {
        let errors = FieldErrors(vec![FieldError {
            field: "items[0].quantity".to_string(),
            message: "quantity must be positive".to_string(),
        }]);
        let err = CliError::from(CoreError::from(errors));

        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, ErrorCode::ValidationError);
        assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["fields"][0]["field"], "items[0].quantity");
        assert_eq!(
            json["message"],
            "Invalid request: items[0].quantity: quantity must be positive"
        );
    }

    #[test]
    fn test_single_validation_error_becomes_field() {
        let err = CliError::from(CoreError::from(ValidationError::Required {
            field: "code".to_string(),
        }));
        let response = ErrorResponse::from(&err);
        assert_eq!(response.fields.len(), 1);
        assert_eq!(response.fields[0].field, "code");
    }

    #[test]
    fn test_promo_errors_map_to_promo_rejected() {
        let err = CliError::from(CoreError::PromoMinimumNotMet {
            code: "SALE10".to_string(),
            min_order: Money::from_dong(200_000),
            subtotal: Money::from_dong(1),
        });
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, ErrorCode::PromoRejected);
        assert!(response.fields.is_empty());

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("fields").is_none());
    }

    #[test]
    fn test_malformed_json_and_overflow_codes() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CliError::from(json_err);
        assert_eq!(ErrorResponse::from(&err).code, ErrorCode::MalformedInput);
        assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);

        let err = CliError::from(CoreError::ArithmeticOverflow {
            context: "subtotal".to_string(),
        });
        assert_eq!(ErrorResponse::from(&err).code, ErrorCode::ArithmeticOverflow);
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }
}
