//! # Error Types
//!
//! Domain-specific error types for mavryk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mavryk-core errors (this file)                                        │
//! │  ├── CoreError        - Domain and arithmetic failures                 │
//! │  ├── ValidationError  - One field failed one rule                      │
//! │  └── FieldErrors      - Every failing field of a request, collected    │
//! │                                                                         │
//! │  promo-cli errors (separate crate)                                     │
//! │  └── CliError         - Config / IO / JSON, wraps CoreError            │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → CoreError → CliError → stdout   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field path, promo code, amounts)
//! 3. Errors are enum variants, never String
//! 4. Money handling fails fast: no silent NaN, no negative discounts

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An argument violates a precondition (negative price, zero quantity...).
    #[error("Invalid argument {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    /// An amount does not fit in 64 bits.
    ///
    /// ## When This Occurs
    /// - `unit_price × quantity` overflows
    /// - The subtotal of many large lines overflows
    #[error("Arithmetic overflow while computing {context}")]
    ArithmeticOverflow { context: String },

    /// Promo code is outside its validity window.
    #[error("Promo code {code} is not active")]
    PromoNotActive { code: String },

    /// Cart subtotal has not reached the promo's minimum order.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart subtotal: 150.000 ₫
    ///      │
    ///      ▼
    /// Apply "SALE10" (min order 200.000 ₫)
    ///      │
    ///      ▼
    /// PromoMinimumNotMet { code: "SALE10", min_order: 200.000 ₫, subtotal: 150.000 ₫ }
    ///      │
    ///      ▼
    /// UI shows: "Add 50.000 ₫ more to use SALE10"
    /// ```
    #[error("Promo code {code} requires a minimum order of {min_order}, cart subtotal is {subtotal}")]
    PromoMinimumNotMet {
        code: String,
        min_order: Money,
        subtotal: Money,
    },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Product is not in the cart.
    #[error("Product {0} not in cart")]
    ItemNotInCart(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A request failed boundary validation on one or more fields.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] FieldErrors),
}

impl CoreError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// An `ArithmeticOverflow` naming what was being computed.
    pub fn overflow(context: impl Into<String>) -> Self {
        CoreError::ArithmeticOverflow {
            context: context.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, bad promo code characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that cannot be used together.
    #[error("{field} cannot be combined with {other}")]
    Conflict { field: String, other: String },
}

impl ValidationError {
    /// The field this error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Conflict { field, .. } => field,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// One failed field of a request, as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldError {
    /// Path of the field, e.g. `items[2].quantity`.
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Builds a field error from a single-field validation failure,
    /// reporting it under `path` rather than the validator's own field name.
    pub fn at(path: impl Into<String>, error: &ValidationError) -> Self {
        FieldError {
            field: path.into(),
            message: error.to_string(),
        }
    }
}

impl From<ValidationError> for FieldError {
    fn from(error: ValidationError) -> Self {
        FieldError {
            field: error.field().to_string(),
            message: error.to_string(),
        }
    }
}

/// Every failed field of a request.
///
/// Boundary validation collects all failures instead of stopping at the
/// first one, so a form can highlight every bad input at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors(Vec::new())
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Records `result`'s error, if any, under `path`.
    pub fn check(&mut self, path: impl Into<String>, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.push(FieldError::at(path, &e));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` if nothing was collected, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::PromoMinimumNotMet {
            code: "SALE10".to_string(),
            min_order: Money::from_dong(200_000),
            subtotal: Money::from_dong(150_000),
        };
        assert_eq!(
            err.to_string(),
            "Promo code SALE10 requires a minimum order of 200.000 ₫, cart subtotal is 150.000 ₫"
        );

        let err = CoreError::invalid("items[1].unitPrice", "must not be negative");
        assert_eq!(
            err.to_string(),
            "Invalid argument items[1].unitPrice: must not be negative"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "code".to_string(),
        };
        assert_eq!(err.to_string(), "code is required");
        assert_eq!(err.field(), "code");

        let err = ValidationError::MustNotBeNegative {
            field: "totalDiscount".to_string(),
        };
        assert_eq!(err.to_string(), "totalDiscount must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_field_errors_collect_and_display() {
        let mut errors = FieldErrors::new();
        errors.check("items[0].quantity", Ok(()));
        errors.check(
            "items[1].quantity",
            Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }),
        );
        errors.push(FieldError::from(ValidationError::Required {
            field: "items".to_string(),
        }));

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "items[1].quantity: quantity must be positive; items: items is required"
        );

        let core_err: CoreError = errors.into_result().unwrap_err().into();
        assert!(matches!(core_err, CoreError::InvalidRequest(ref e) if e.len() == 2));
    }

    #[test]
    fn test_field_errors_serialize_as_list() {
        let errors = FieldErrors(vec![FieldError {
            field: "code".to_string(),
            message: "code is required".to_string(),
        }]);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "code", "message": "code is required" }])
        );
    }
}
