//! # Order Totals Engine
//!
//! Discount, tax and grand total for a customer order or purchase order.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  line items ──► raw_subtotal = Σ qty × unit_cost                        │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  discount ───► discount_amount (percent ≤ 100, fixed ≤ raw_subtotal)    │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │             discounted_subtotal = max(0, raw − discount)                │
//! │                      │                                                  │
//! │           ┌──────────┴───────────┐                                      │
//! │           ▼                      ▼                                      │
//! │      INCLUSIVE               EXCLUSIVE                                  │
//! │  total = discounted       total = discounted × (1 + r)                  │
//! │  tax = total − total/(1+r) tax = total − discounted                     │
//! │  tax_base = total         tax_base = discounted                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is a total function: it never fails and never panics.
//! Malformed discount values mean "no discount", but line item numbers are
//! used as given. A NaN quantity therefore produces a NaN total, which
//! [`OrderTotalsResult::is_finite`] and
//! [`crate::validation::validate_order_result`] surface to the caller
//! instead of a believable wrong number.
//!
//! ## Example
//! ```rust
//! use tally_core::{compute_totals, DiscountConfig, LineItem, OrderTotalsConfig, TaxConfig};
//!
//! let items = vec![LineItem::new(2.0, 250.0), LineItem::new(1.0, 500.0)];
//! let config = OrderTotalsConfig::new(DiscountConfig::percentage(10.0), TaxConfig::exclusive(12.0));
//!
//! let totals = compute_totals(&items, &config);
//! assert_eq!(totals.raw_subtotal, 1000.0);
//! assert_eq!(totals.discounted_subtotal, 900.0);
//! assert!((totals.total - 1008.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{DiscountConfig, DiscountKind, LineItem, OrderTotalsConfig, TaxConfig, TaxMode};

/// Percent discounts above this are clamped.
pub const MAX_DISCOUNT_PERCENT: f64 = 100.0;

// =============================================================================
// Result
// =============================================================================

/// Everything an order form displays below its line items.
///
/// Values are full precision. `tax_base` and `discounted_subtotal` are
/// kept apart on purpose: in inclusive mode `tax_base` is the gross amount,
/// in exclusive mode it equals `discounted_subtotal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotalsResult {
    /// Σ line totals before discount.
    pub raw_subtotal: f64,
    /// Amount actually subtracted, after clamping.
    pub discount_amount: f64,
    /// `max(0, raw_subtotal − discount_amount)`.
    pub discounted_subtotal: f64,
    /// The "subtotal" shown next to the tax line.
    pub tax_base: f64,
    pub tax: f64,
    /// Grand total payable.
    pub total: f64,
}

impl OrderTotalsResult {
    /// True when no field is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        [
            self.raw_subtotal,
            self.discount_amount,
            self.discounted_subtotal,
            self.tax_base,
            self.tax,
            self.total,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Rounds every field to cents for display.
    pub fn presented(&self) -> PresentedTotals {
        PresentedTotals {
            raw_subtotal: Money::from_amount(self.raw_subtotal),
            discount_amount: Money::from_amount(self.discount_amount),
            discounted_subtotal: Money::from_amount(self.discounted_subtotal),
            tax_base: Money::from_amount(self.tax_base),
            tax: Money::from_amount(self.tax),
            total: Money::from_amount(self.total),
        }
    }
}

/// [`OrderTotalsResult`] rounded to cents.
///
/// A field is `None` when the underlying amount is not finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PresentedTotals {
    pub raw_subtotal: Option<Money>,
    pub discount_amount: Option<Money>,
    pub discounted_subtotal: Option<Money>,
    pub tax_base: Option<Money>,
    pub tax: Option<Money>,
    pub total: Option<Money>,
}

// =============================================================================
// Engine
// =============================================================================

/// Computes subtotal, discount, tax and total for an order.
///
/// Pure and deterministic: calling it twice with the same inputs yields
/// bit-identical results.
pub fn compute_totals(items: &[LineItem], config: &OrderTotalsConfig) -> OrderTotalsResult {
    let raw_subtotal = raw_subtotal(items);
    let discount_amount = discount_amount(raw_subtotal, &config.discount);
    let discounted_subtotal = floor_at_zero(raw_subtotal - discount_amount);
    let (tax_base, tax, total) = apply_tax(discounted_subtotal, &config.tax);

    trace!(
        items = items.len(),
        raw_subtotal,
        discount_amount,
        tax,
        total,
        mode = config.tax.mode.as_str(),
        "Computed order totals"
    );

    OrderTotalsResult {
        raw_subtotal,
        discount_amount,
        discounted_subtotal,
        tax_base,
        tax,
        total,
    }
}

/// Σ quantity × unit cost, with the line item defaults applied.
pub fn raw_subtotal(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::line_total).sum()
}

/// The discount actually taken off `raw_subtotal`.
///
/// ```rust
/// use tally_core::totals::discount_amount;
/// use tally_core::DiscountConfig;
///
/// assert_eq!(discount_amount(1000.0, &DiscountConfig::percentage(150.0)), 1000.0);
/// assert_eq!(discount_amount(500.0, &DiscountConfig::fixed_amount(900.0)), 500.0);
/// assert_eq!(discount_amount(500.0, &DiscountConfig::fixed_amount(-50.0)), 0.0);
/// ```
pub fn discount_amount(raw_subtotal: f64, discount: &DiscountConfig) -> f64 {
    let value = discount.effective_value();
    if value == 0.0 {
        return 0.0;
    }

    match discount.kind {
        DiscountKind::Percentage => raw_subtotal * (value.min(MAX_DISCOUNT_PERCENT) / 100.0),
        // f64::min would hide a NaN subtotal behind the fixed value
        DiscountKind::FixedAmount => {
            if raw_subtotal.is_nan() {
                raw_subtotal
            } else {
                value.min(raw_subtotal)
            }
        }
    }
}

/// `max(0, amount)` that keeps NaN (`f64::max` would return 0).
#[inline]
fn floor_at_zero(amount: f64) -> f64 {
    if amount < 0.0 {
        0.0
    } else {
        amount
    }
}

/// Returns `(tax_base, tax, total)` for an already discounted subtotal.
fn apply_tax(discounted_subtotal: f64, tax: &TaxConfig) -> (f64, f64, f64) {
    let multiplier = tax.rate.multiplier();

    match tax.mode {
        TaxMode::Inclusive => {
            let total = discounted_subtotal;
            let net = total / multiplier;
            (total, total - net, total)
        }
        TaxMode::Exclusive => {
            let total = discounted_subtotal * multiplier;
            (discounted_subtotal, total - discounted_subtotal, total)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn items_totaling(amount: f64) -> Vec<LineItem> {
        vec![LineItem::new(1.0, amount)]
    }

    #[test]
    fn test_zero_items_is_all_zero() {
        let configs = [
            OrderTotalsConfig::default(),
            OrderTotalsConfig::new(DiscountConfig::percentage(50.0), TaxConfig::inclusive(12.0)),
            OrderTotalsConfig::new(DiscountConfig::fixed_amount(100.0), TaxConfig::exclusive(30.0)),
        ];

        for config in configs {
            let totals = compute_totals(&[], &config);
            assert_eq!(totals.raw_subtotal, 0.0);
            assert_eq!(totals.discount_amount, 0.0);
            assert_eq!(totals.discounted_subtotal, 0.0);
            assert_eq!(totals.tax, 0.0);
            assert_eq!(totals.total, 0.0);
        }
    }

    #[test]
    fn test_exclusive_tax_without_discount() {
        let config = OrderTotalsConfig::new(DiscountConfig::none(), TaxConfig::exclusive(30.0));
        let totals = compute_totals(&items_totaling(1000.0), &config);

        assert_close(totals.tax, 300.0);
        assert_close(totals.total, 1300.0);
        assert_eq!(totals.tax_base, 1000.0);
    }

    #[test]
    fn test_inclusive_tax_without_discount() {
        let config = OrderTotalsConfig::new(DiscountConfig::none(), TaxConfig::inclusive(12.0));
        let totals = compute_totals(&items_totaling(1000.0), &config);

        assert_eq!(totals.total, 1000.0);
        assert_eq!(totals.tax_base, 1000.0);
        assert_close(totals.tax, 1000.0 - 1000.0 / 1.12);
        assert_eq!(totals.presented().tax, Some(Money::from_cents(10714)));
    }

    #[test]
    fn test_percentage_discount_is_clamped_at_100() {
        let config = OrderTotalsConfig::new(DiscountConfig::percentage(150.0), TaxConfig::exclusive(12.0));
        let totals = compute_totals(&items_totaling(1000.0), &config);

        assert_eq!(totals.discount_amount, 1000.0);
        assert_eq!(totals.discounted_subtotal, 0.0);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn test_fixed_discount_is_clamped_to_subtotal() {
        let config = OrderTotalsConfig::new(DiscountConfig::fixed_amount(900.0), TaxConfig::inclusive(12.0));
        let totals = compute_totals(&items_totaling(500.0), &config);

        assert_eq!(totals.discount_amount, 500.0);
        assert_eq!(totals.discounted_subtotal, 0.0);
        assert_eq!(totals.tax, 0.0);
    }

    #[test]
    fn test_recomputation_is_bit_identical() {
        let items = vec![
            LineItem::new(3.0, 19.99),
            LineItem::new(0.5, 7.13),
            LineItem::new(12.0, 0.1),
        ];
        let config = OrderTotalsConfig::new(DiscountConfig::percentage(7.5), TaxConfig::inclusive(12.0));

        let first = compute_totals(&items, &config);
        let second = compute_totals(&items, &config);

        assert_eq!(first.total.to_bits(), second.total.to_bits());
        assert_eq!(first.tax.to_bits(), second.tax.to_bits());
        assert_eq!(first.discount_amount.to_bits(), second.discount_amount.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_switching_mode_keeps_inputs() {
        let items = items_totaling(1000.0);
        let exclusive = OrderTotalsConfig::new(DiscountConfig::percentage(10.0), TaxConfig::exclusive(12.0));
        let inclusive = exclusive.with_tax(TaxConfig::inclusive(12.0));

        let before = compute_totals(&items, &exclusive);
        let _ = compute_totals(&items, &inclusive);
        let after = compute_totals(&items, &exclusive);

        assert_eq!(before, after);
        assert_eq!(items, items_totaling(1000.0));
    }

    #[test]
    fn test_zero_rate_in_both_modes() {
        for tax in [TaxConfig::inclusive(0.0), TaxConfig::exclusive(0.0)] {
            let config = OrderTotalsConfig::new(DiscountConfig::fixed_amount(120.0), tax);
            let totals = compute_totals(&items_totaling(1000.0), &config);

            assert_eq!(totals.tax, 0.0);
            assert_eq!(totals.total, totals.discounted_subtotal);
            assert_eq!(totals.total, 880.0);
        }
    }

    #[test]
    fn test_garbage_discount_is_ignored() {
        let tax = TaxConfig::exclusive(12.0);
        let discounts = [
            DiscountConfig::percentage(-50.0),
            DiscountConfig::fixed_amount(-50.0),
            DiscountConfig::parse(DiscountKind::Percentage, "abc"),
            DiscountConfig::parse(DiscountKind::FixedAmount, ""),
            DiscountConfig::percentage(f64::NAN),
        ];

        for discount in discounts {
            let totals = compute_totals(&items_totaling(1000.0), &OrderTotalsConfig::new(discount, tax));
            assert_eq!(totals.discount_amount, 0.0);
            assert_eq!(totals.discounted_subtotal, 1000.0);
        }
    }

    #[test]
    fn test_discount_then_exclusive_tax() {
        let config = OrderTotalsConfig::new(DiscountConfig::percentage(10.0), TaxConfig::exclusive(12.0));
        let totals = compute_totals(&items_totaling(1000.0), &config);

        assert_close(totals.discount_amount, 100.0);
        assert_close(totals.discounted_subtotal, 900.0);
        assert_close(totals.tax, 108.0);
        assert_close(totals.total, 1008.0);
        assert_close(totals.tax_base, 900.0);
    }

    #[test]
    fn test_discount_then_inclusive_tax() {
        let config = OrderTotalsConfig::new(DiscountConfig::fixed_amount(104.0), TaxConfig::inclusive(12.0));
        let totals = compute_totals(&items_totaling(1000.0), &config);

        assert_eq!(totals.discounted_subtotal, 896.0);
        assert_eq!(totals.total, 896.0);
        assert_close(totals.tax, 96.0);
        assert_eq!(totals.tax_base, totals.total);
    }

    #[test]
    fn test_missing_quantity_counts_as_one() {
        let items = vec![
            LineItem {
                description: Some("Screen replacement".to_string()),
                quantity: None,
                unit_cost: Some(1500.0),
            },
            LineItem {
                description: None,
                quantity: Some(2.0),
                unit_cost: None,
            },
        ];
        let totals = compute_totals(&items, &OrderTotalsConfig::default());

        assert_eq!(totals.raw_subtotal, 1500.0);
        assert_eq!(totals.total, 1500.0);
    }

    #[test]
    fn test_nan_line_item_propagates() {
        let items = vec![LineItem::new(f64::NAN, 100.0), LineItem::new(1.0, 50.0)];
        let configs = [
            OrderTotalsConfig::new(DiscountConfig::none(), TaxConfig::exclusive(12.0)),
            OrderTotalsConfig::new(DiscountConfig::fixed_amount(10.0), TaxConfig::inclusive(12.0)),
            OrderTotalsConfig::new(DiscountConfig::percentage(10.0), TaxConfig::inclusive(12.0)),
        ];

        for config in configs {
            let totals = compute_totals(&items, &config);
            assert!(totals.raw_subtotal.is_nan());
            assert!(totals.total.is_nan());
            assert!(!totals.is_finite());
            assert_eq!(totals.presented().total, None);
        }
    }

    #[test]
    fn test_negative_line_item_is_not_sanitized() {
        let items = vec![LineItem::new(-2.0, 100.0)];
        let totals = compute_totals(&items, &OrderTotalsConfig::default());

        assert_eq!(totals.raw_subtotal, -200.0);
        assert_eq!(totals.discounted_subtotal, 0.0);
        assert!(totals.is_finite());
    }

    #[test]
    fn test_presented_rounds_once() {
        let items = vec![LineItem::new(3.0, 33.333)];
        let config = OrderTotalsConfig::new(DiscountConfig::none(), TaxConfig::exclusive(12.0));
        let presented = compute_totals(&items, &config).presented();

        assert_eq!(presented.raw_subtotal, Some(Money::from_cents(10000)));
        assert_eq!(presented.tax, Some(Money::from_cents(1200)));
        assert_eq!(presented.total, Some(Money::from_cents(11200)));
    }
}
