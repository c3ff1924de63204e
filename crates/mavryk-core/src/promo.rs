//! # Promo Codes
//!
//! A promo code turns a cart subtotal into a single lump discount. Spreading
//! that lump across the cart lines is the allocator's job.
//!
//! ## Evaluation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PromoCode::discount_for(subtotal, now)                                 │
//! │       │                                                                 │
//! │       ├── now < starts_at or now ≥ ends_at? → PromoNotActive           │
//! │       │                                                                 │
//! │       ├── subtotal < min_order?             → PromoMinimumNotMet       │
//! │       │                                                                 │
//! │       ├── Percentage: subtotal × bps / 10000 (half-up), cap max        │
//! │       ├── FixedAmount: amount                                          │
//! │       │                                                                 │
//! │       └── min(discount, subtotal)  ← a promo never goes below zero     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::RoundingMode;
use crate::validation::{self, ValidationResult};

/// What kind of discount a promo code grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromoKind {
    /// A share of the subtotal, in basis points (1000 = 10%).
    Percentage {
        bps: u32,
        /// Upper bound for the discount, if any.
        #[serde(default, rename = "maxDiscount")]
        max_discount: Option<Money>,
    },
    /// A flat amount off the order.
    FixedAmount { amount: Money },
}

/// A promo code as configured by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    /// Normalized (upper case) code, e.g. `SALE10`.
    pub code: String,

    #[serde(flatten)]
    pub kind: PromoKind,

    /// Minimum subtotal for the code to apply.
    #[serde(default)]
    pub min_order: Option<Money>,

    /// Start of the validity window (inclusive).
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,

    /// End of the validity window (exclusive).
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

impl PromoCode {
    /// Creates a promo code with no minimum order and no validity window.
    ///
    /// The code is trimmed and upper-cased, then validated.
    ///
    /// ## Example
    /// ```rust
    /// use mavryk_core::promo::{PromoCode, PromoKind};
    ///
    /// let promo = PromoCode::new(" sale10 ", PromoKind::Percentage { bps: 1000, max_discount: None }).unwrap();
    /// assert_eq!(promo.code, "SALE10");
    /// assert!(PromoCode::new("x", PromoKind::Percentage { bps: 1000, max_discount: None }).is_err());
    /// ```
    pub fn new(code: &str, kind: PromoKind) -> ValidationResult<Self> {
        let promo = PromoCode {
            code: code.trim().to_uppercase(),
            kind,
            min_order: None,
            starts_at: None,
            ends_at: None,
        };
        promo.validate()?;
        Ok(promo)
    }

    /// Sets the minimum order amount.
    pub fn with_min_order(mut self, min_order: Money) -> Self {
        self.min_order = Some(min_order);
        self
    }

    /// Sets the validity window.
    pub fn with_window(
        mut self,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }

    /// Checks the code's own settings (format, percentage range, amounts).
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_promo_code(&self.code)?;

        match self.kind {
            PromoKind::Percentage { bps, max_discount } => {
                validation::validate_percentage_bps(bps)?;
                if let Some(max) = max_discount {
                    validation::validate_discount(max.dong(), "maxDiscount")?;
                }
            }
            PromoKind::FixedAmount { amount } => {
                validation::validate_discount(amount.dong(), "amount")?;
            }
        }

        if let Some(min) = self.min_order {
            validation::validate_discount(min.dong(), "minOrder")?;
        }

        Ok(())
    }

    /// Whether `now` falls in the validity window.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.starts_at.map_or(true, |start| now >= start);
        let not_ended = self.ends_at.map_or(true, |end| now < end);
        started && not_ended
    }

    /// Computes the lump discount this code grants on `subtotal`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use mavryk_core::promo::{PromoCode, PromoKind};
    /// use mavryk_core::Money;
    ///
    /// let promo = PromoCode::new(
    ///     "SALE10",
    ///     PromoKind::Percentage { bps: 1000, max_discount: Some(Money::from_dong(50_000)) },
    /// )
    /// .unwrap();
    ///
    /// let small = promo.discount_for(Money::from_dong(245_000), Utc::now()).unwrap();
    /// assert_eq!(small, Money::from_dong(24_500));
    ///
    /// // Capped at 50.000 ₫
    /// let big = promo.discount_for(Money::from_dong(2_000_000), Utc::now()).unwrap();
    /// assert_eq!(big, Money::from_dong(50_000));
    /// ```
    pub fn discount_for(&self, subtotal: Money, now: DateTime<Utc>) -> CoreResult<Money> {
        if subtotal.is_negative() {
            return Err(CoreError::invalid("subtotal", "must not be negative"));
        }

        if !self.is_active_at(now) {
            return Err(CoreError::PromoNotActive {
                code: self.code.clone(),
            });
        }

        if let Some(min_order) = self.min_order {
            if subtotal < min_order {
                return Err(CoreError::PromoMinimumNotMet {
                    code: self.code.clone(),
                    min_order,
                    subtotal,
                });
            }
        }

        let raw = match self.kind {
            PromoKind::Percentage { bps, max_discount } => {
                let discount = subtotal
                    .percentage(bps, RoundingMode::HalfUp)
                    .ok_or_else(|| CoreError::overflow("percentage discount"))?;
                match max_discount {
                    Some(max) => discount.min(max),
                    None => discount,
                }
            }
            PromoKind::FixedAmount { amount } => amount,
        };

        let discount = raw.min(subtotal);
        debug!(
            code = %self.code,
            subtotal = subtotal.dong(),
            discount = discount.dong(),
            "promo evaluated"
        );
        Ok(discount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn percentage(bps: u32, max: Option<i64>) -> PromoKind {
        PromoKind::Percentage {
            bps,
            max_discount: max.map(Money::from_dong),
        }
    }

    fn fixed(amount: i64) -> PromoKind {
        PromoKind::FixedAmount {
            amount: Money::from_dong(amount),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_percentage_discount() {
        let promo = PromoCode::new("SALE15", percentage(1500, None)).unwrap();
        let discount = promo.discount_for(Money::from_dong(245_000), now()).unwrap();
        assert_eq!(discount, Money::from_dong(36_750));
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 10% of 5 = 0.5 → 1
        let promo = PromoCode::new("TENOFF", percentage(1000, None)).unwrap();
        let discount = promo.discount_for(Money::from_dong(5), now()).unwrap();
        assert_eq!(discount, Money::from_dong(1));
    }

    #[test]
    fn test_percentage_cap() {
        let promo = PromoCode::new("SALE50", percentage(5000, Some(100_000))).unwrap();
        let discount = promo.discount_for(Money::from_dong(1_000_000), now()).unwrap();
        assert_eq!(discount, Money::from_dong(100_000));
    }

    #[test]
    fn test_fixed_amount_capped_at_subtotal() {
        let promo = PromoCode::new("GIAM50K", fixed(50_000)).unwrap();
        assert_eq!(
            promo.discount_for(Money::from_dong(200_000), now()).unwrap(),
            Money::from_dong(50_000)
        );
        assert_eq!(
            promo.discount_for(Money::from_dong(30_000), now()).unwrap(),
            Money::from_dong(30_000)
        );
    }

    #[test]
    fn test_minimum_order() {
        let promo = PromoCode::new("SALE10", percentage(1000, None))
            .unwrap()
            .with_min_order(Money::from_dong(200_000));

        let err = promo.discount_for(Money::from_dong(150_000), now()).unwrap_err();
        assert!(matches!(err, CoreError::PromoMinimumNotMet { .. }));

        // Exactly the minimum is enough
        assert!(promo.discount_for(Money::from_dong(200_000), now()).is_ok());
    }

    #[test]
    fn test_validity_window() {
        let promo = PromoCode::new("FLASH", fixed(10_000))
            .unwrap()
            .with_window(Some(now()), Some(now() + Duration::hours(2)));

        assert!(promo.is_active_at(now()));
        assert!(promo.is_active_at(now() + Duration::minutes(119)));
        assert!(!promo.is_active_at(now() - Duration::seconds(1)));
        assert!(!promo.is_active_at(now() + Duration::hours(2)));

        let err = promo
            .discount_for(Money::from_dong(100_000), now() + Duration::days(1))
            .unwrap_err();
        assert!(matches!(err, CoreError::PromoNotActive { ref code } if code == "FLASH"));
    }

    #[test]
    fn test_new_rejects_bad_settings() {
        assert!(PromoCode::new("", fixed(1)).is_err());
        assert!(PromoCode::new("HAS SPACE", fixed(1)).is_err());
        assert!(PromoCode::new("OVER100", percentage(10_001, None)).is_err());
        assert!(PromoCode::new("NEGATIVE", fixed(-1)).is_err());
        assert!(PromoCode::new("NEGCAP", percentage(1000, Some(-5))).is_err());
    }

    #[test]
    fn test_deserialize_from_json() {
        let promo: PromoCode = serde_json::from_str(
            r#"{
                "code": "SALE10",
                "kind": "percentage",
                "bps": 1000,
                "maxDiscount": 50000,
                "minOrder": 100000,
                "endsAt": "2026-12-31T17:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(promo.kind, percentage(1000, Some(50_000)));
        assert_eq!(promo.min_order, Some(Money::from_dong(100_000)));
        assert!(promo.starts_at.is_none());
        assert!(promo.ends_at.is_some());

        let promo: PromoCode =
            serde_json::from_str(r#"{"code": "GIAM50K", "kind": "fixed_amount", "amount": 50000}"#)
                .unwrap();
        assert_eq!(promo.kind, fixed(50_000));
    }
}
