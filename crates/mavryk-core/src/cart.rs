//! # Cart
//!
//! The shopping cart and its priced summary.
//!
//! ## Summary Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart → CartSummary                                   │
//! │                                                                         │
//! │  Cart.items ──► line totals ──► subtotal                               │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │  PromoCode ─────────────► discount_for(subtotal) ──► lump discount     │
//! │                                                          │              │
//! │                                                          ▼              │
//! │  summarize_lines(items, lump) ──► PricedLine[] ──► LineSummary[]        │
//! │                                                                         │
//! │  Invariants:  Σ line.discount  == summary.discount                     │
//! │               Σ line.net_total == summary.total                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by `product_id` (adding the same product increases quantity)
//! - Quantity is always in `1..=MAX_ITEM_QUANTITY`
//! - At most `MAX_CART_ITEMS` lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::allocation::summarize_lines;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::promo::PromoCode;
use crate::types::{AllocationOptions, LineItem};
use crate::validation::{validate_product_id, validate_quantity, validate_unit_price};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// An item in the shopping cart.
///
/// Price is frozen at the time the item is added, so a later catalog price
/// change does not move a cart the customer is already looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product ID (UUID)
    pub product_id: String,

    /// Product name at time of adding
    pub name: String,

    /// Unit price at time of adding
    pub unit_price: Money,

    pub quantity: i64,
}

impl CartItem {
    /// The item as an allocator input.
    #[inline]
    pub fn line_item(&self) -> LineItem {
        LineItem::new(self.unit_price, self.quantity)
    }

    /// `unit_price × quantity`, or `None` on overflow.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.line_item().line_total()
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds a product or increases its quantity if already present.
    ///
    /// ## Example
    /// ```rust
    /// use mavryk_core::cart::Cart;
    /// use mavryk_core::Money;
    ///
    /// let mut cart = Cart::new();
    /// let id = "550e8400-e29b-41d4-a716-446655440000";
    /// cart.add_item(id, "Windows 11 Pro", Money::from_dong(249_000), 1).unwrap();
    /// cart.add_item(id, "Windows 11 Pro", Money::from_dong(249_000), 2).unwrap();
    /// assert_eq!(cart.item_count(), 1);
    /// assert_eq!(cart.total_quantity(), 3);
    /// ```
    pub fn add_item(
        &mut self,
        product_id: &str,
        name: &str,
        unit_price: Money,
        quantity: i64,
    ) -> CoreResult<()> {
        validate_product_id(product_id)?;
        validate_unit_price(unit_price.dong())?;
        validate_quantity(quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem {
            product_id: product_id.to_string(),
            name: name.to_string(),
            unit_price,
            quantity,
        });
        Ok(())
    }

    /// Sets the quantity of an item. Quantity 0 removes it.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::ItemNotInCart(product_id.to_string())),
        }
    }

    /// Removes an item by product ID.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::ItemNotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> CoreResult<Money> {
        self.items.iter().enumerate().try_fold(Money::zero(), |acc, (i, item)| {
            item.line_total()
                .and_then(|total| acc.checked_add(total))
                .ok_or_else(|| CoreError::overflow(format!("subtotal at items[{}]", i)))
        })
    }

    /// Prices the cart, applying `promo` if given.
    ///
    /// The promo's lump discount is spread over the lines with the allocator,
    /// so each line carries its own share.
    pub fn summarize(
        &self,
        promo: Option<&PromoCode>,
        now: DateTime<Utc>,
        options: AllocationOptions,
    ) -> CoreResult<CartSummary> {
        let subtotal = self.subtotal()?;
        let discount = match promo {
            Some(promo) => promo.discount_for(subtotal, now)?,
            None => Money::zero(),
        };

        let summary = self.summarize_with_discount(discount, options)?;
        Ok(CartSummary {
            promo_code: promo.map(|p| p.code.clone()),
            ..summary
        })
    }

    /// Prices the cart with an already-computed lump discount.
    pub fn summarize_with_discount(
        &self,
        discount: Money,
        options: AllocationOptions,
    ) -> CoreResult<CartSummary> {
        let items: Vec<LineItem> = self.items.iter().map(CartItem::line_item).collect();
        let priced = summarize_lines(&items, discount, options)?;

        debug!(
            lines = priced.lines.len(),
            subtotal = priced.subtotal.dong(),
            discount = priced.discount.dong(),
            total = priced.total.dong(),
            "cart summarized"
        );

        let lines = self
            .items
            .iter()
            .zip(priced.lines)
            .map(|(item, line)| LineSummary {
                product_id: item.product_id.clone(),
                line_total: line.line_total,
                discount: line.discount,
                net_total: line.net_total,
            })
            .collect();

        Ok(CartSummary {
            subtotal: priced.subtotal,
            discount: priced.discount,
            total: priced.total,
            promo_code: None,
            lines,
        })
    }
}

/// One priced line of a [`CartSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineSummary {
    pub product_id: String,
    pub line_total: Money,
    pub discount: Money,
    pub net_total: Money,
}

/// Cart totals with the discount broken down per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub promo_code: Option<String>,
    pub lines: Vec<LineSummary>,
}

// =============================================================================
// Unit Tests
// =============================================================================
