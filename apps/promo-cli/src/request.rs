//! # Quote Request / Response
//!
//! JSON shapes exchanged with the storefront, plus boundary validation.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin / file ──► serde_json ──► QuoteRequest                          │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                        validate() → FieldErrors (all of them)          │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │        promo.discount_for(subtotal) or totalDiscount                   │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                summarize_lines(items, discount) ──► QuoteResponse      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use mavryk_core::promo::PromoCode;
use mavryk_core::validation::{
    validate_cart_size, validate_discount, validate_product_id, validate_quantity,
    validate_unit_price,
};
use mavryk_core::{
    items_subtotal, summarize_lines, AllocationOptions, CoreResult, FieldError, FieldErrors,
    LineItem, Money, ValidationError,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PromoConfig;

/// A cart to price.
///
/// Exactly one of `promo` and `totalDiscount` may be set; with neither the
/// quote has no discount. Unknown keys are rejected so a misspelled
/// `totalDiscount` cannot silently price the cart at full price.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuoteRequest {
    pub items: Vec<QuoteItem>,

    #[serde(default)]
    pub promo: Option<PromoCode>,

    /// A lump discount computed elsewhere.
    #[serde(default)]
    pub total_discount: Option<Money>,

    /// Per-request override of the configured allocation options.
    #[serde(default)]
    pub options: Option<AllocationOptions>,
}

/// One requested line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuoteItem {
    #[serde(default)]
    pub product_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    pub unit_price: Money,

    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

impl QuoteItem {
    fn line_item(&self) -> LineItem {
        LineItem::new(self.unit_price, self.quantity)
    }
}

/// The priced cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub currency: String,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub promo_code: Option<String>,
    pub lines: Vec<QuoteLine>,
}

/// One priced line, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub line_total: Money,
    pub discount: Money,
    pub net_total: Money,
}

impl QuoteRequest {
    /// Checks every field, collecting all failures.
    pub fn validate(&self, max_line_items: usize) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        errors.check("items", validate_cart_size(self.items.len(), max_line_items));
        for (i, item) in self.items.iter().enumerate() {
            if let Some(id) = &item.product_id {
                errors.check(format!("items[{}].productId", i), validate_product_id(id));
            }
            errors.check(
                format!("items[{}].unitPrice", i),
                validate_unit_price(item.unit_price.dong()),
            );
            errors.check(
                format!("items[{}].quantity", i),
                validate_quantity(item.quantity),
            );
        }

        if let Some(discount) = self.total_discount {
            errors.check(
                "totalDiscount",
                validate_discount(discount.dong(), "totalDiscount"),
            );
        }

        if let Some(promo) = &self.promo {
            if let Err(e) = promo.validate() {
                errors.push(FieldError::at(format!("promo.{}", e.field()), &e));
            }
            if self.total_discount.is_some() {
                errors.push(FieldError::from(ValidationError::Conflict {
                    field: "promo".to_string(),
                    other: "totalDiscount".to_string(),
                }));
            }
        }

        errors.into_result()
    }

    /// Validates and prices the request.
    pub fn quote(&self, config: &PromoConfig, now: DateTime<Utc>) -> CoreResult<QuoteResponse> {
        self.validate(config.max_line_items)?;

        let options = self.options.unwrap_or(AllocationOptions {
            rounding: config.rounding,
            remainder: config.remainder,
        });

        let items: Vec<LineItem> = self.items.iter().map(QuoteItem::line_item).collect();
        let subtotal = items_subtotal(&items)?;

        let promo = self.promo.as_ref().map(normalized);
        let requested = match (&promo, self.total_discount) {
            (Some(promo), _) => promo.discount_for(subtotal, now)?,
            (None, Some(discount)) => discount,
            (None, None) => Money::zero(),
        };

        let priced = summarize_lines(&items, requested, options)?;

        debug!(
            lines = items.len(),
            subtotal = priced.subtotal.dong(),
            requested = requested.dong(),
            discount = priced.discount.dong(),
            "quote computed"
        );

        let lines = self
            .items
            .iter()
            .zip(priced.lines)
            .map(|(item, line)| QuoteLine {
                product_id: item.product_id.clone(),
                line_total: line.line_total,
                discount: line.discount,
                net_total: line.net_total,
            })
            .collect();

        Ok(QuoteResponse {
            currency: config.currency_code.clone(),
            subtotal: priced.subtotal,
            discount: priced.discount,
            total: priced.total,
            promo_code: promo.map(|p| p.code),
            lines,
        })
    }
}

/// Promo codes are matched case-insensitively; responses echo upper case.
fn normalized(promo: &PromoCode) -> PromoCode {
    PromoCode {
        code: promo.code.trim().to_uppercase(),
        ..promo.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mavryk_core::CoreError;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn parse(json: &str) -> QuoteRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_raw_discount_quote() {
        let request = parse(
            r#"{
                "items": [{ "unitPrice": 100 }, { "unitPrice": 200 }, { "unitPrice": 300, "quantity": 1 }],
                "totalDiscount": 100
            }"#,
        );
        let response = request.quote(&PromoConfig::default(), now()).unwrap();

        let discounts: Vec<i64> = response.lines.iter().map(|l| l.discount.dong()).collect();
        assert_eq!(discounts, vec![17, 33, 50]);
        assert_eq!(response.subtotal, Money::from_dong(600));
        assert_eq!(response.total, Money::from_dong(500));
        assert_eq!(response.currency, "VND");
        assert!(response.promo_code.is_none());
    }

    #[test]
    fn test_promo_quote() {
        let request = parse(
            r#"{
                "items": [
                    { "productId": "11111111-1111-4111-8111-111111111111", "name": "Windows 11 Pro", "unitPrice": 249000 },
                    { "productId": "22222222-2222-4222-8222-222222222222", "name": "Office 2021", "unitPrice": 199000, "quantity": 2 }
                ],
                "promo": { "code": "sale10", "kind": "percentage", "bps": 1000, "maxDiscount": 50000 }
            }"#,
        );
        let response = request.quote(&PromoConfig::default(), now()).unwrap();

        // 10% of 647.000 = 64.700, capped at 50.000
        assert_eq!(response.subtotal, Money::from_dong(647_000));
        assert_eq!(response.discount, Money::from_dong(50_000));
        assert_eq!(response.promo_code.as_deref(), Some("SALE10"));

        // 50.000 × 249.000 / 647.000 = 19.242,6 → 19.243
        assert_eq!(response.lines[0].discount, Money::from_dong(19_243));
        assert_eq!(response.lines[1].discount, Money::from_dong(30_757));
    }

    #[test]
    fn test_request_options_override_config() {
        let request = parse(
            r#"{
                "items": [{ "unitPrice": 300 }, { "unitPrice": 300 }, { "unitPrice": 300 }],
                "totalDiscount": 100,
                "options": { "remainder": "largest" }
            }"#,
        );
        let response = request.quote(&PromoConfig::default(), now()).unwrap();
        let discounts: Vec<i64> = response.lines.iter().map(|l| l.discount.dong()).collect();
        assert_eq!(discounts, vec![34, 33, 33]);
    }

    #[test]
    fn test_validation_collects_every_field() {
        let request = parse(
            r#"{
                "items": [
                    { "productId": "nope", "unitPrice": -1, "quantity": 0 }
                ],
                "promo": { "code": "x", "kind": "fixed_amount", "amount": 10 },
                "totalDiscount": 10
            }"#,
        );
        let errors = request.validate(100).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "items[0].productId",
                "items[0].unitPrice",
                "items[0].quantity",
                "promo.code",
                "promo",
            ]
        );

        let err = request.quote(&PromoConfig::default(), now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRequest(ref e) if e.len() == 5));
    }

    #[test]
    fn test_line_limit_comes_from_config() {
        let request = parse(r#"{ "items": [{ "unitPrice": 1 }, { "unitPrice": 2 }] }"#);
        let config = PromoConfig {
            max_line_items: 1,
            ..PromoConfig::default()
        };
        let err = request.quote(&config, now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRequest(_)));
    }

    #[test]
    fn test_expired_promo_is_rejected() {
        let request = parse(
            r#"{
                "items": [{ "unitPrice": 100000 }],
                "promo": { "code": "TET2026", "kind": "fixed_amount", "amount": 10000, "endsAt": "2026-02-20T00:00:00Z" }
            }"#,
        );
        let err = request.quote(&PromoConfig::default(), now()).unwrap_err();
        assert!(matches!(err, CoreError::PromoNotActive { ref code } if code == "TET2026"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let typo = r#"{ "items": [{ "unitPrice": 100 }], "totalDiscont": 10 }"#;
        assert!(serde_json::from_str::<QuoteRequest>(typo).is_err());

        let item_typo = r#"{ "items": [{ "unitPrice": 100, "quantiy": 2 }] }"#;
        assert!(serde_json::from_str::<QuoteRequest>(item_typo).is_err());
    }

    #[test]
    fn test_empty_cart() {
        let request = parse(r#"{ "items": [], "totalDiscount": 5000 }"#);
        let response = request.quote(&PromoConfig::default(), now()).unwrap();
        assert!(response.lines.is_empty());
        assert_eq!(response.discount, Money::zero());
        assert_eq!(response.total, Money::zero());
    }
}
