//! # Validation Module
//!
//! Input checks the calling layer runs before handing data to the
//! calculators.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form schema (UI)                                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Line items finite and non-negative                                │
//! │  ├── Tax rate finite, 0..=100                                          │
//! │  └── Computed totals finite before submission                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Calculators (totals, statement, payroll)                              │
//! │  └── Never fail, never sanitize line items                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`validate_discount`] is advisory: the engine already treats malformed
//! discounts as zero and clamps the rest, so forms may use it to warn
//! instead of block.
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::validate_line_items;
//! use tally_core::LineItem;
//!
//! assert!(validate_line_items(&[LineItem::new(2.0, 10.0)]).is_ok());
//! assert!(validate_line_items(&[LineItem::new(-2.0, 10.0)]).is_err());
//! ```

use crate::error::ValidationError;
use crate::payroll::{PayAdjustment, PayrollPeriod, PayrollRecord};
use crate::period::BillingPeriod;
use crate::statement::StatementSource;
use crate::totals::OrderTotalsResult;
use crate::types::{DiscountConfig, DiscountKind, LineItem, TaxConfig};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Highest accepted tax rate, in percent.
pub const MAX_TAX_RATE_PERCENT: f64 = 100.0;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Value must be a finite number ≥ 0.
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

fn validate_optional_amount(field: &str, value: Option<f64>) -> ValidationResult<()> {
    match value {
        Some(v) => validate_amount(field, v),
        None => Ok(()),
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Checks one line item. `index` is used in the field name.
pub fn validate_line_item(index: usize, item: &LineItem) -> ValidationResult<()> {
    validate_item_fields(&format!("items[{index}]"), item)
}

fn validate_item_fields(prefix: &str, item: &LineItem) -> ValidationResult<()> {
    validate_optional_amount(&format!("{prefix}.quantity"), item.quantity)?;
    validate_optional_amount(&format!("{prefix}.unitCost"), item.unit_cost)?;
    Ok(())
}

/// Checks every line item, reporting the first bad one.
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    items
        .iter()
        .enumerate()
        .try_for_each(|(index, item)| validate_line_item(index, item))
}

/// Discount value must be finite, non-negative and, for percentages, at
/// most 100.
pub fn validate_discount(discount: &DiscountConfig) -> ValidationResult<()> {
    validate_amount("discount.value", discount.value)?;

    if discount.kind == DiscountKind::Percentage && discount.value > 100.0 {
        return Err(ValidationError::OutOfRange {
            field: "discount.value".to_string(),
            min: 0.0,
            max: 100.0,
            value: discount.value,
        });
    }

    Ok(())
}

/// Tax rate must be finite and within `0..=100`.
///
/// ```rust
/// use tally_core::validation::validate_tax_config;
/// use tally_core::TaxConfig;
///
/// assert!(validate_tax_config(&TaxConfig::inclusive(12.0)).is_ok());
/// assert!(validate_tax_config(&TaxConfig::exclusive(120.0)).is_err());
/// ```
pub fn validate_tax_config(tax: &TaxConfig) -> ValidationResult<()> {
    let rate = tax.rate.percentage();
    validate_amount("tax.rate", rate)?;

    if rate > MAX_TAX_RATE_PERCENT {
        return Err(ValidationError::OutOfRange {
            field: "tax.rate".to_string(),
            min: 0.0,
            max: MAX_TAX_RATE_PERCENT,
            value: rate,
        });
    }

    Ok(())
}

/// Refuses totals containing NaN or infinity.
pub fn validate_order_result(totals: &OrderTotalsResult) -> ValidationResult<()> {
    let fields = [
        ("rawSubtotal", totals.raw_subtotal),
        ("discountAmount", totals.discount_amount),
        ("discountedSubtotal", totals.discounted_subtotal),
        ("taxBase", totals.tax_base),
        ("tax", totals.tax),
        ("total", totals.total),
    ];

    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((field, _)) => Err(ValidationError::NotFinite {
            field: field.to_string(),
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Statements
// =============================================================================

pub fn validate_customer_id(customer_id: &str) -> ValidationResult<()> {
    if customer_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customerId".to_string(),
        });
    }

    Ok(())
}

/// Repair costs and sale line items must be finite and non-negative.
pub fn validate_statement_source(source: &StatementSource) -> ValidationResult<()> {
    for (i, repair) in source.repairs.iter().enumerate() {
        validate_optional_amount(&format!("repairs[{i}].cost"), repair.cost)?;
    }

    for (i, sale) in source.sales.iter().enumerate() {
        for (j, item) in sale.items.iter().enumerate() {
            validate_item_fields(&format!("sales[{i}].items[{j}]"), item)?;
        }
    }

    Ok(())
}

/// Deserialized periods skip [`BillingPeriod::new`], so check them here.
pub fn validate_period(period: &BillingPeriod) -> ValidationResult<()> {
    if period.start > period.end {
        return Err(ValidationError::InvalidFormat {
            field: "period".to_string(),
            reason: format!("start {} is after end {}", period.start, period.end),
        });
    }

    Ok(())
}

// =============================================================================
// Payroll
// =============================================================================

pub fn validate_pay_adjustment(field: &str, adjustment: &PayAdjustment) -> ValidationResult<()> {
    if adjustment.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: format!("{field}.name"),
        });
    }

    validate_optional_amount(&format!("{field}.amount"), adjustment.amount)
}

pub fn validate_payroll_record(index: usize, record: &PayrollRecord) -> ValidationResult<()> {
    let prefix = format!("records[{index}]");

    if record.employee_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: format!("{prefix}.employeeId"),
        });
    }

    validate_optional_amount(&format!("{prefix}.baseSalary"), record.base_salary)?;
    validate_optional_amount(&format!("{prefix}.commission"), record.commission)?;

    for (i, benefit) in record.benefits.iter().enumerate() {
        validate_pay_adjustment(&format!("{prefix}.benefits[{i}]"), benefit)?;
    }
    for (i, deduction) in record.deductions.iter().enumerate() {
        validate_pay_adjustment(&format!("{prefix}.deductions[{i}]"), deduction)?;
    }

    Ok(())
}

pub fn validate_payroll_period(period: &PayrollPeriod) -> ValidationResult<()> {
    validate_period(&period.period)?;
    period
        .records
        .iter()
        .enumerate()
        .try_for_each(|(index, record)| validate_payroll_record(index, record))
}

// =============================================================================
// Unit Tests
// =============================================================================
