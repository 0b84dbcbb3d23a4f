//! # Order Payload
//!
//! What an order form submits once its totals are computed, and how an
//! edit form gets its settings back.
//!
//! ## Create / Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CREATE                                                                 │
//! │  items + OrderTotalsConfig ──► compute_totals ──► OrderPayload::build   │
//! │                                                      │                  │
//! │                                          { subtotal, tax, total, meta } │
//! │                                                      │ stored by API    │
//! │  EDIT                                                ▼                  │
//! │  OrderMeta::to_config() ◄──────────────────── meta from stored order    │
//! │        │                                                                │
//! │        └──► same OrderTotalsConfig, no default-guessing                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The payload `subtotal` is the tax base (gross in inclusive mode, net in
//! exclusive mode), which is what the order tables display. The meta block
//! also carries the raw and discounted subtotals so nothing is ambiguous
//! after the tax mode is switched on a saved order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::policy::TaxPolicy;
use crate::totals::{compute_totals, OrderTotalsResult};
use crate::types::{
    DiscountConfig, DiscountKind, LineItem, OrderTotalsConfig, TaxConfig, TaxMode, TaxRate,
};

// =============================================================================
// Order Meta
// =============================================================================

/// Tax and discount settings persisted alongside an order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderMeta {
    pub discount_amount: f64,
    pub discount_type: DiscountKind,
    /// Effective discount value: malformed or negative input is stored as 0.
    pub discount_value: f64,
    pub tax_rate: TaxRate,
    pub tax_type: TaxMode,
    #[serde(default)]
    pub raw_subtotal: f64,
    #[serde(default)]
    pub discounted_subtotal: f64,
}

impl OrderMeta {
    pub fn new(config: &OrderTotalsConfig, totals: &OrderTotalsResult) -> Self {
        OrderMeta {
            discount_amount: totals.discount_amount,
            discount_type: config.discount.kind,
            discount_value: config.discount.effective_value(),
            tax_rate: config.tax.rate,
            tax_type: config.tax.mode,
            raw_subtotal: totals.raw_subtotal,
            discounted_subtotal: totals.discounted_subtotal,
        }
    }

    /// Rebuilds the exact configuration the order was saved with.
    pub fn to_config(&self) -> OrderTotalsConfig {
        OrderTotalsConfig::new(
            DiscountConfig {
                kind: self.discount_type,
                value: self.discount_value,
            },
            TaxConfig::new(self.tax_rate, self.tax_type),
        )
    }
}

/// Settings for an order being opened in an edit form.
///
/// Orders saved with meta get their own settings back. Older orders
/// without meta fall back to the tax policy for the party type and no
/// discount.
pub fn config_for_edit(
    meta: Option<&OrderMeta>,
    policy: &TaxPolicy,
    party_type: &str,
) -> OrderTotalsConfig {
    match meta {
        Some(meta) => meta.to_config(),
        None => policy.config_for(party_type, DiscountConfig::none()),
    }
}

// =============================================================================
// Order Payload
// =============================================================================

/// Totals fields of a customer or purchase order as sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderPayload {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub meta: OrderMeta,
}

impl OrderPayload {
    /// Computes totals and packs them with their configuration.
    ///
    /// ```rust
    /// use tally_core::{DiscountConfig, LineItem, OrderPayload, OrderTotalsConfig, TaxConfig};
    ///
    /// let config = OrderTotalsConfig::new(DiscountConfig::percentage(10.0), TaxConfig::inclusive(12.0));
    /// let payload = OrderPayload::build(&[LineItem::new(4.0, 250.0)], &config);
    ///
    /// assert_eq!(payload.total, 900.0);
    /// assert_eq!(payload.meta.to_config(), config);
    /// ```
    pub fn build(items: &[LineItem], config: &OrderTotalsConfig) -> Self {
        let totals = compute_totals(items, config);
        OrderPayload::from_totals(config, &totals)
    }

    pub fn from_totals(config: &OrderTotalsConfig, totals: &OrderTotalsResult) -> Self {
        OrderPayload {
            subtotal: totals.tax_base,
            tax: totals.tax,
            total: totals.total,
            meta: OrderMeta::new(config, totals),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_items() -> Vec<LineItem> {
        vec![
            LineItem::new(2.0, 300.0).with_description("Battery"),
            LineItem::new(1.0, 400.0).with_description("Labor"),
        ]
    }

    #[test]
    fn test_meta_round_trip_restores_config() {
        let config = OrderTotalsConfig::new(DiscountConfig::fixed_amount(150.0), TaxConfig::exclusive(12.0));
        let payload = OrderPayload::build(&sample_items(), &config);

        let json = serde_json::to_string(&payload).unwrap();
        let stored: OrderPayload = serde_json::from_str(&json).unwrap();

        assert_eq!(stored.meta.to_config(), config);
        assert_eq!(compute_totals(&sample_items(), &stored.meta.to_config()).total, payload.total);
    }

    #[test]
    fn test_subtotal_is_tax_base() {
        let items = sample_items();
        let exclusive = OrderTotalsConfig::new(DiscountConfig::percentage(10.0), TaxConfig::exclusive(12.0));
        let inclusive = exclusive.with_tax(TaxConfig::inclusive(12.0));

        let payload = OrderPayload::build(&items, &exclusive);
        assert_eq!(payload.subtotal, 900.0);
        assert_eq!(payload.meta.discounted_subtotal, 900.0);
        assert_eq!(payload.meta.raw_subtotal, 1000.0);

        let payload = OrderPayload::build(&items, &inclusive);
        assert_eq!(payload.subtotal, payload.total);
        assert_eq!(payload.meta.discounted_subtotal, 900.0);
    }

    #[test]
    fn test_meta_wire_format() {
        let config = OrderTotalsConfig::new(DiscountConfig::percentage(5.0), TaxConfig::inclusive(12.0));
        let payload = OrderPayload::build(&sample_items(), &config);
        let value = serde_json::to_value(payload).unwrap();

        assert_eq!(value["meta"]["discountType"], "percentage");
        assert_eq!(value["meta"]["taxType"], "inclusive");
        assert_eq!(value["meta"]["taxRate"], 12.0);
        assert_eq!(value["meta"]["discountAmount"], 50.0);
    }

    #[test]
    fn test_garbage_discount_is_stored_as_zero() {
        let config = OrderTotalsConfig::new(
            DiscountConfig::parse(DiscountKind::FixedAmount, "n/a"),
            TaxConfig::exclusive(12.0),
        );
        let payload = OrderPayload::build(&sample_items(), &config);

        assert_eq!(payload.meta.discount_value, 0.0);
        assert_eq!(payload.meta.discount_amount, 0.0);
    }

    #[test]
    fn test_config_for_edit_prefers_meta() {
        let policy = TaxPolicy::default();
        let saved = OrderTotalsConfig::new(DiscountConfig::percentage(20.0), TaxConfig::exclusive(5.0));
        let payload = OrderPayload::build(&sample_items(), &saved);

        assert_eq!(config_for_edit(Some(&payload.meta), &policy, "business"), saved);

        let fallback = config_for_edit(None, &policy, "business");
        assert_eq!(fallback.tax, policy.tax_for("business"));
        assert_eq!(fallback.discount, DiscountConfig::none());
    }
}
