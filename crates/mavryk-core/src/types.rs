//! # Domain Types
//!
//! Types shared by the allocator, the cart and the boundary layer.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Allocation Types                                │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │    LineItem     │   │ AllocationRequest   │   │ AllocationResult│   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  unit_price     │──►│  items (ordered)    │──►│  discounts      │   │
//! │  │  quantity (≥1)  │   │  total_discount     │   │  (same order)   │   │
//! │  └─────────────────┘   └─────────────────────┘   └─────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐                         │
//! │  │  RoundingMode   │   │  RemainderPolicy    │                         │
//! │  │  HalfUp  ★      │   │  Last    ★          │   ★ = default           │
//! │  │  HalfEven       │   │  Largest            │                         │
//! │  └─────────────────┘   └─────────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Line Item
// =============================================================================

/// One priced entry of a cart: unit price × quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Price of a single unit, non-negative.
    pub unit_price: Money,

    /// Number of units, positive. Missing on the wire means 1.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

impl LineItem {
    /// Creates a line item.
    #[inline]
    pub const fn new(unit_price: Money, quantity: i64) -> Self {
        LineItem {
            unit_price,
            quantity,
        }
    }

    /// Creates a line item with quantity 1.
    #[inline]
    pub const fn single(unit_price: Money) -> Self {
        LineItem::new(unit_price, 1)
    }

    /// `unit_price × quantity`, or `None` on overflow.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul_quantity(self.quantity)
    }
}

// =============================================================================
// Allocation Request / Result
// =============================================================================

/// A lump discount to spread over an ordered list of line items.
///
/// `total_discount` is expected to be at most the subtotal; that is the
/// caller's concern and is not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    pub items: Vec<LineItem>,
    pub total_discount: Money,
}

impl AllocationRequest {
    pub fn new(items: Vec<LineItem>, total_discount: Money) -> Self {
        AllocationRequest {
            items,
            total_discount,
        }
    }
}

/// Per-item discounts, aligned index-for-index with the request's items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub discounts: Vec<Money>,
}

impl AllocationResult {
    /// Sum of all per-item discounts.
    pub fn total(&self) -> Money {
        self.discounts.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.discounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discounts.is_empty()
    }
}

/// One line after its discount share is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub line_total: Money,
    pub discount: Money,
    pub net_total: Money,
}

/// Lines priced together: totals plus one [`PricedLine`] per item.
///
/// `discount` is what was actually applied (the sum of the line shares),
/// which is zero when every line is free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedLines {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub lines: Vec<PricedLine>,
}

// =============================================================================
// Allocation Options
// =============================================================================

/// How a proportional share is rounded to a whole đồng.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round half away from zero. Same as the storefront's `Math.round`
    /// for non-negative amounts.
    #[default]
    HalfUp,
    /// Round half to even (banker's rounding).
    HalfEven,
}

/// Which item absorbs the rounding remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// The last item in the list.
    #[default]
    Last,
    /// The item with the largest line total; earliest wins on ties.
    Largest,
}

/// Knobs for [`crate::allocation::allocate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AllocationOptions {
    #[serde(default)]
    pub rounding: RoundingMode,
    #[serde(default)]
    pub remainder: RemainderPolicy,
}

// =============================================================================
// Unit Tests
// =============================================================================
