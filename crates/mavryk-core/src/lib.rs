//! # mavryk-core: Pricing Logic for the Mavryk Premium Store
//!
//! Pure pricing logic for the storefront: money, promo codes, cart totals
//! and the promo allocator that spreads a discount over cart lines. No I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mavryk Store Pricing                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront (React) / API layer                  │   │
//! │  │        Cart page ──► Apply promo ──► Checkout summary           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON (camelCase)                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 promo-cli (mavryk-promo binary)                 │   │
//! │  │        config, logging, request validation, JSON in/out         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ mavryk-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌───────┐ ┌───────────┐ │   │
//! │  │   │  money  │ │allocation│ │  promo  │ │ cart  │ │ validation│ │   │
//! │  │   │  Money  │ │ allocate │ │PromoCode│ │ Cart  │ │FieldErrors│ │   │
//! │  │   └─────────┘ └──────────┘ └─────────┘ └───────┘ └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Whole-đồng `Money` with checked, float-free arithmetic
//! - [`types`] - `LineItem`, allocation request/result, rounding options
//! - [`allocation`] - The promo allocator
//! - [`promo`] - Promo codes and the lump discount they grant
//! - [`cart`] - Cart and its per-line priced summary
//! - [`validation`] - Field validators and request validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use mavryk_core::{allocate, LineItem, Money};
//!
//! let items = vec![
//!     LineItem::single(Money::from_dong(100)),
//!     LineItem::single(Money::from_dong(200)),
//!     LineItem::single(Money::from_dong(300)),
//! ];
//!
//! let discounts = allocate(&items, Money::from_dong(100)).unwrap();
//! let total: Money = discounts.iter().sum();
//! assert_eq!(total, Money::from_dong(100)); // exact, no lost đồng
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod cart;
pub mod error;
pub mod money;
pub mod promo;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use allocation::{
    allocate, allocate_request, allocate_with, items_subtotal, summarize_lines,
};
pub use error::{CoreError, CoreResult, FieldError, FieldErrors, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// License keys are bought a handful at a time; this catches a mistyped
/// quantity before it reaches checkout.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// ISO 4217 code of the store currency.
pub const CURRENCY_CODE: &str = "VND";
