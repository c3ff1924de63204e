//! # Promo Allocation
//!
//! Splits a lump promo discount across cart lines in proportion to each
//! line's share of the subtotal, so that the per-line discounts add up to
//! exactly the promo amount.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items = [100, 200, 300]    total_discount = 100    subtotal = 600     │
//! │                                                                         │
//! │  item 0:  round(100 × 100 / 600) = round(16.67) = 17                   │
//! │  item 1:  round(100 × 200 / 600) = round(33.33) = 33                   │
//! │  item 2:  100 − (17 + 33)                       = 50   ◄── absorbs     │
//! │                                                  ────                   │
//! │                                                   100  ✓ exact          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every item but one gets its rounded proportional share. The absorbing
//! item (the last one by default, see [`RemainderPolicy`]) gets whatever is
//! left, which cancels all accumulated rounding drift. The price of exact
//! conservation is that the absorbing item's share is not strictly
//! proportional, so input order matters.
//!
//! ## Degenerate Inputs
//! - no items → no discounts
//! - zero discount → all zeros
//! - zero subtotal (every line is free) → all zeros, the discount is dropped
//!
//! ## Example
//! ```rust
//! use mavryk_core::allocation::allocate;
//! use mavryk_core::{LineItem, Money};
//!
//! let items = [
//!     LineItem::single(Money::from_dong(100)),
//!     LineItem::single(Money::from_dong(200)),
//!     LineItem::single(Money::from_dong(300)),
//! ];
//! let discounts = allocate(&items, Money::from_dong(100)).unwrap();
//! assert_eq!(
//!     discounts,
//!     vec![Money::from_dong(17), Money::from_dong(33), Money::from_dong(50)]
//! );
//! ```

use tracing::{debug, trace, warn};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    AllocationOptions, AllocationRequest, AllocationResult, LineItem, PricedLine, PricedLines,
    RemainderPolicy,
};

/// Allocates `total_discount` across `items` with the default options
/// (half-up rounding, last item absorbs the remainder).
pub fn allocate(items: &[LineItem], total_discount: Money) -> CoreResult<Vec<Money>> {
    allocate_with(items, total_discount, AllocationOptions::default())
}

/// Allocates a request, returning the discounts wrapped in an
/// [`AllocationResult`].
pub fn allocate_request(
    request: &AllocationRequest,
    options: AllocationOptions,
) -> CoreResult<AllocationResult> {
    let discounts = allocate_with(&request.items, request.total_discount, options)?;
    Ok(AllocationResult { discounts })
}

/// Allocates `total_discount` across `items`.
///
/// ## Errors
/// - `InvalidArgument` for a negative discount, a negative unit price or a
///   non-positive quantity. The field names the offending index.
/// - `ArithmeticOverflow` if a line total or the subtotal does not fit in
///   an `i64`.
pub fn allocate_with(
    items: &[LineItem],
    total_discount: Money,
    options: AllocationOptions,
) -> CoreResult<Vec<Money>> {
    if total_discount.is_negative() {
        return Err(CoreError::invalid("totalDiscount", "must not be negative"));
    }

    let line_totals = line_totals(items)?;
    if line_totals.is_empty() {
        return Ok(Vec::new());
    }

    if total_discount.is_zero() {
        return Ok(vec![Money::zero(); line_totals.len()]);
    }

    let subtotal = sum_line_totals(&line_totals)?;

    trace!(
        items = line_totals.len(),
        subtotal = subtotal.dong(),
        total_discount = total_discount.dong(),
        "allocating discount"
    );

    if subtotal.is_zero() {
        debug!(
            total_discount = total_discount.dong(),
            "subtotal is zero, discount not allocated"
        );
        return Ok(vec![Money::zero(); line_totals.len()]);
    }

    let absorber = absorbing_index(&line_totals, options.remainder);

    // Running sum in i128: the partial sums may leave i64 even when the
    // final remainder fits.
    let mut discounts = Vec::with_capacity(line_totals.len());
    let mut allocated: i128 = 0;
    for (i, line_total) in line_totals.iter().enumerate() {
        if i == absorber {
            discounts.push(Money::zero());
            continue;
        }

        let share = total_discount
            .proportion(line_total.dong(), subtotal.dong(), options.rounding)
            .ok_or_else(|| CoreError::overflow(format!("discount share of items[{}]", i)))?;
        allocated += i128::from(share.dong());
        discounts.push(share);
    }

    let remainder = i64::try_from(i128::from(total_discount.dong()) - allocated)
        .map(Money::from_dong)
        .map_err(|_| CoreError::overflow("discount remainder"))?;

    // Rounding drift can push the remainder outside [0, line_total] when the
    // absorbing line is tiny compared to the others.
    if remainder.is_negative() || remainder > line_totals[absorber] {
        warn!(
            index = absorber,
            remainder = remainder.dong(),
            line_total = line_totals[absorber].dong(),
            "absorbed remainder is outside the line total"
        );
    }

    discounts[absorber] = remainder;
    Ok(discounts)
}

/// Prices `items` with `total_discount` spread across them.
///
/// This is the one place a discounted cart is totalled: carts and quote
/// requests both go through it.
///
/// ## Example
/// ```rust
/// use mavryk_core::allocation::summarize_lines;
/// use mavryk_core::{AllocationOptions, LineItem, Money};
///
/// let items = [
///     LineItem::single(Money::from_dong(100)),
///     LineItem::new(Money::from_dong(100), 2),
/// ];
/// let priced = summarize_lines(&items, Money::from_dong(30), AllocationOptions::default()).unwrap();
/// assert_eq!(priced.subtotal, Money::from_dong(300));
/// assert_eq!(priced.total, Money::from_dong(270));
/// assert_eq!(priced.lines[1].net_total, Money::from_dong(180));
/// ```
pub fn summarize_lines(
    items: &[LineItem],
    total_discount: Money,
    options: AllocationOptions,
) -> CoreResult<PricedLines> {
    let discounts = allocate_with(items, total_discount, options)?;
    let line_totals = line_totals(items)?;

    let mut subtotal = Money::zero();
    let mut applied = Money::zero();
    let mut lines = Vec::with_capacity(line_totals.len());
    for (line_total, discount) in line_totals.into_iter().zip(discounts) {
        subtotal = subtotal
            .checked_add(line_total)
            .ok_or_else(|| CoreError::overflow("subtotal"))?;
        applied = applied
            .checked_add(discount)
            .ok_or_else(|| CoreError::overflow("applied discount"))?;
        let net_total = line_total
            .checked_sub(discount)
            .ok_or_else(|| CoreError::overflow("net line total"))?;
        lines.push(PricedLine {
            line_total,
            discount,
            net_total,
        });
    }

    let total = subtotal
        .checked_sub(applied)
        .ok_or_else(|| CoreError::overflow("total"))?;

    Ok(PricedLines {
        subtotal,
        discount: applied,
        total,
        lines,
    })
}

/// Sum of the line totals of `items`, checking each item as the allocator
/// does.
pub fn items_subtotal(items: &[LineItem]) -> CoreResult<Money> {
    sum_line_totals(&line_totals(items)?)
}

fn sum_line_totals(line_totals: &[Money]) -> CoreResult<Money> {
    line_totals
        .iter()
        .try_fold(Money::zero(), |acc, total| acc.checked_add(*total))
        .ok_or_else(|| CoreError::overflow("subtotal"))
}

/// Checks each item and returns its line total.
fn line_totals(items: &[LineItem]) -> CoreResult<Vec<Money>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if item.unit_price.is_negative() {
                return Err(CoreError::invalid(
                    format!("items[{}].unitPrice", i),
                    "must not be negative",
                ));
            }
            if item.quantity <= 0 {
                return Err(CoreError::invalid(
                    format!("items[{}].quantity", i),
                    "must be positive",
                ));
            }
            item.line_total()
                .ok_or_else(|| CoreError::overflow(format!("line total of items[{}]", i)))
        })
        .collect()
}

/// Index of the item that absorbs the rounding remainder.
///
/// `line_totals` must be non-empty.
fn absorbing_index(line_totals: &[Money], policy: RemainderPolicy) -> usize {
    match policy {
        RemainderPolicy::Last => line_totals.len() - 1,
        RemainderPolicy::Largest => {
            let mut best = 0;
            for (i, total) in line_totals.iter().enumerate().skip(1) {
                if *total > line_totals[best] {
                    best = i;
                }
            }
            best
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
