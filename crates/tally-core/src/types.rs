//! # Domain Types
//!
//! Inputs shared by the customer-order and purchase-order forms.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────────────────────────┐     │
//! │  │    LineItem     │   │           OrderTotalsConfig             │     │
//! │  │  ─────────────  │   │  ┌────────────────┐ ┌────────────────┐  │     │
//! │  │  quantity?      │   │  │ DiscountConfig │ │   TaxConfig    │  │     │
//! │  │  unit_cost?     │   │  │  kind, value   │ │  rate, mode    │  │     │
//! │  │  description?   │   │  └────────────────┘ └────────────────┘  │     │
//! │  └─────────────────┘   └─────────────────────────────────────────┘     │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiscountKind   │   │    TaxMode      │   │    TaxRate      │       │
//! │  │  Percentage     │   │    Exclusive    │   │  percent (f64)  │       │
//! │  │  FixedAmount    │   │    Inclusive    │   │  12.0 = 12%     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All amounts are `f64` at full precision. Rounding to cents happens only
//! when a result is presented (see [`crate::money`]).

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

// =============================================================================
// Line Item
// =============================================================================

/// One row of an order form.
///
/// Both numbers are optional because half-filled rows are normal while a
/// form is being edited. A missing quantity counts as 1, a missing unit
/// cost as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Free text shown on the form and the printed order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub quantity: Option<f64>,

    /// Purchase orders call this `unitCost`, customer orders `unitPrice`.
    #[serde(default, alias = "unitPrice")]
    pub unit_cost: Option<f64>,
}

impl LineItem {
    /// Creates a fully specified line item.
    pub fn new(quantity: f64, unit_cost: f64) -> Self {
        LineItem {
            description: None,
            quantity: Some(quantity),
            unit_cost: Some(unit_cost),
        }
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    pub fn effective_quantity(&self) -> f64 {
        self.quantity.unwrap_or(1.0)
    }

    #[inline]
    pub fn effective_unit_cost(&self) -> f64 {
        self.unit_cost.unwrap_or(0.0)
    }

    /// `quantity × unit_cost` with defaults applied.
    ///
    /// Negative or NaN inputs are passed through untouched.
    ///
    /// ```rust
    /// use tally_core::LineItem;
    ///
    /// assert_eq!(LineItem::new(3.0, 2.5).line_total(), 7.5);
    /// assert_eq!(LineItem::default().line_total(), 0.0);
    /// ```
    #[inline]
    pub fn line_total(&self) -> f64 {
        self.effective_quantity() * self.effective_unit_cost()
    }
}

// =============================================================================
// Discount
// =============================================================================

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum DiscountKind {
    /// `value` is a percent of the raw subtotal, capped at 100.
    #[default]
    Percentage,
    /// `value` is an absolute amount, capped at the raw subtotal.
    #[serde(alias = "fixed")]
    FixedAmount,
}

/// Discount as entered on the order form.
///
/// `value` is whatever the user typed. Empty or malformed text deserializes
/// to NaN, which the engine treats as "no discount".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DiscountConfig {
    #[serde(rename = "type", default)]
    pub kind: DiscountKind,

    #[serde(default, deserialize_with = "lenient_number")]
    #[ts(type = "number | string | null")]
    pub value: f64,
}

impl DiscountConfig {
    /// No discount.
    pub const fn none() -> Self {
        DiscountConfig {
            kind: DiscountKind::Percentage,
            value: 0.0,
        }
    }

    pub const fn percentage(value: f64) -> Self {
        DiscountConfig {
            kind: DiscountKind::Percentage,
            value,
        }
    }

    pub const fn fixed_amount(value: f64) -> Self {
        DiscountConfig {
            kind: DiscountKind::FixedAmount,
            value,
        }
    }

    /// Builds a discount from raw form text.
    ///
    /// ```rust
    /// use tally_core::{DiscountConfig, DiscountKind};
    ///
    /// let d = DiscountConfig::parse(DiscountKind::Percentage, " 10 ");
    /// assert_eq!(d.value, 10.0);
    ///
    /// let garbage = DiscountConfig::parse(DiscountKind::FixedAmount, "ten");
    /// assert_eq!(garbage.effective_value(), 0.0);
    /// ```
    pub fn parse(kind: DiscountKind, input: &str) -> Self {
        DiscountConfig {
            kind,
            value: parse_amount(input),
        }
    }

    /// The value the engine will actually use: non-finite and negative
    /// values collapse to 0.
    #[inline]
    pub fn effective_value(&self) -> f64 {
        if self.value.is_finite() && self.value >= 0.0 {
            self.value
        } else {
            0.0
        }
    }
}

fn parse_amount(input: &str) -> f64 {
    input.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Accepts a JSON number, a numeric string, or anything else (as NaN).
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => parse_amount(&s),
        _ => f64::NAN,
    })
}

// =============================================================================
// Tax
// =============================================================================

/// Tax rate as a percentage (12.0 = 12%).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct TaxRate(f64);

impl TaxRate {
    #[inline]
    pub const fn from_percentage(pct: f64) -> Self {
        TaxRate(pct)
    }

    #[inline]
    pub const fn percentage(&self) -> f64 {
        self.0
    }

    /// `1 + rate/100`, the factor between net and gross amounts.
    #[inline]
    pub fn multiplier(&self) -> f64 {
        1.0 + self.0 / 100.0
    }
}

/// Whether entered prices already contain tax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TaxMode {
    /// Tax is added on top of the discounted subtotal (markup style).
    #[default]
    Exclusive,
    /// The discounted subtotal already contains tax (VAT style).
    Inclusive,
}

impl TaxMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxMode::Exclusive => "exclusive",
            TaxMode::Inclusive => "inclusive",
        }
    }
}

/// Tax settings for one order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaxConfig {
    #[serde(default)]
    pub rate: TaxRate,
    #[serde(default)]
    pub mode: TaxMode,
}

impl TaxConfig {
    pub const fn new(rate: TaxRate, mode: TaxMode) -> Self {
        TaxConfig { rate, mode }
    }

    pub const fn inclusive(pct: f64) -> Self {
        TaxConfig::new(TaxRate::from_percentage(pct), TaxMode::Inclusive)
    }

    pub const fn exclusive(pct: f64) -> Self {
        TaxConfig::new(TaxRate::from_percentage(pct), TaxMode::Exclusive)
    }
}

// =============================================================================
// Order Totals Config
// =============================================================================

/// Everything besides the line items that the totals engine needs.
///
/// This is the same value that gets persisted as order metadata, so the
/// create and edit flows share one source of defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotalsConfig {
    #[serde(default)]
    pub discount: DiscountConfig,
    #[serde(default)]
    pub tax: TaxConfig,
}

impl OrderTotalsConfig {
    pub const fn new(discount: DiscountConfig, tax: TaxConfig) -> Self {
        OrderTotalsConfig { discount, tax }
    }

    /// Same discount, different tax settings.
    pub fn with_tax(self, tax: TaxConfig) -> Self {
        OrderTotalsConfig { tax, ..self }
    }

    /// Same tax settings, different discount.
    pub fn with_discount(self, discount: DiscountConfig) -> Self {
        OrderTotalsConfig { discount, ..self }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
