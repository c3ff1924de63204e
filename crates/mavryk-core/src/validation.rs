//! # Validation Module
//!
//! Input validation for pricing requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront form (TypeScript)                                 │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Boundary (promo-cli / API)                                   │
//! │  ├── Type validation (serde deserialization)                           │
//! │  └── THIS MODULE: every field checked, all failures collected          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Allocator                                                    │
//! │  └── Fails fast on the first bad argument (InvalidArgument)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mavryk_core::validation::{validate_promo_code, validate_quantity};
//!
//! validate_promo_code("SALE10").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::{FieldErrors, ValidationError};
use crate::types::AllocationRequest;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Length bounds for promo codes.
const PROMO_CODE_MIN_LEN: usize = 3;
const PROMO_CODE_MAX_LEN: usize = 32;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a promo code.
///
/// ## Rules
/// - Must not be empty
/// - Between 3 and 32 characters
/// - ASCII letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use mavryk_core::validation::validate_promo_code;
///
/// assert!(validate_promo_code("GIAM-50K").is_ok());
/// assert!(validate_promo_code("").is_err());
/// assert!(validate_promo_code("giảm giá").is_err());
/// ```
pub fn validate_promo_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() < PROMO_CODE_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: "code".to_string(),
            min: PROMO_CODE_MIN_LEN,
        });
    }

    if code.len() > PROMO_CODE_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: PROMO_CODE_MAX_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product ID (UUID).
///
/// ## Example
/// ```rust
/// use mavryk_core::validation::validate_product_id;
///
/// assert!(validate_product_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_product_id("not-a-uuid").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "productId".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "productId".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in đồng.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free keys, bundled items)
pub fn validate_unit_price(dong: i64) -> ValidationResult<()> {
    if dong < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "unitPrice".to_string(),
        });
    }

    Ok(())
}

/// Validates a non-negative amount such as a discount, a cap or a minimum
/// order. `field` names it in the error.
pub fn validate_discount(dong: i64, field: &str) -> ValidationResult<()> {
    if dong < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_percentage_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "bps".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of lines).
///
/// ## Rules
/// - Must not exceed `max` lines
pub fn validate_cart_size(lines: usize, max: usize) -> ValidationResult<()> {
    if lines > max {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 0,
            max: max as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates a whole allocation request, collecting every failure.
///
/// Field paths are indexed (`items[2].quantity`) so a caller can point at
/// the exact input.
///
/// ## Example
/// ```rust
/// use mavryk_core::validation::validate_allocation_request;
/// use mavryk_core::{AllocationRequest, LineItem, Money};
///
/// let request = AllocationRequest::new(
///     vec![LineItem::new(Money::from_dong(-1), 0)],
///     Money::from_dong(-5),
/// );
/// let errors = validate_allocation_request(&request).unwrap_err();
/// assert_eq!(errors.len(), 3);
/// ```
pub fn validate_allocation_request(request: &AllocationRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    errors.check(
        "items",
        validate_cart_size(request.items.len(), MAX_CART_ITEMS),
    );
    for (i, item) in request.items.iter().enumerate() {
        errors.check(
            format!("items[{}].unitPrice", i),
            validate_unit_price(item.unit_price.dong()),
        );
        errors.check(
            format!("items[{}].quantity", i),
            validate_quantity(item.quantity),
        );
    }
    errors.check(
        "totalDiscount",
        validate_discount(request.total_discount.dong(), "totalDiscount"),
    );

    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================
