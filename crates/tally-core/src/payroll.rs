//! # Payroll
//!
//! Gross and net pay per employee, and the totals of a payroll period.
//!
//! ```text
//! gross_pay = base_salary + commission + Σ benefits
//! net_pay   = gross_pay − Σ deductions
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::period::BillingPeriod;

// =============================================================================
// Inputs
// =============================================================================

/// A named benefit or deduction. A missing amount counts as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PayAdjustment {
    pub name: String,
    #[serde(default)]
    pub amount: Option<f64>,
}

impl PayAdjustment {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        PayAdjustment {
            name: name.into(),
            amount: Some(amount),
        }
    }

    #[inline]
    pub fn effective_amount(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }
}

/// One employee's pay for a period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PayrollRecord {
    pub employee_id: String,
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub base_salary: Option<f64>,
    #[serde(default)]
    pub commission: Option<f64>,
    #[serde(default)]
    pub benefits: Vec<PayAdjustment>,
    #[serde(default)]
    pub deductions: Vec<PayAdjustment>,
}

impl PayrollRecord {
    pub fn total_benefits(&self) -> f64 {
        sum_adjustments(&self.benefits)
    }

    pub fn total_deductions(&self) -> f64 {
        sum_adjustments(&self.deductions)
    }

    /// `base_salary + commission + Σ benefits`.
    pub fn gross_pay(&self) -> f64 {
        self.base_salary.unwrap_or(0.0) + self.commission.unwrap_or(0.0) + self.total_benefits()
    }

    /// `gross_pay − Σ deductions`.
    ///
    /// ```rust
    /// use tally_core::payroll::{PayAdjustment, PayrollRecord};
    ///
    /// let record = PayrollRecord {
    ///     employee_id: "E-1".into(),
    ///     base_salary: Some(20000.0),
    ///     commission: Some(1500.0),
    ///     benefits: vec![PayAdjustment::new("Rice allowance", 2000.0)],
    ///     deductions: vec![PayAdjustment::new("SSS", 900.0)],
    ///     ..Default::default()
    /// };
    /// assert_eq!(record.net_pay(), 22600.0);
    /// ```
    pub fn net_pay(&self) -> f64 {
        self.gross_pay() - self.total_deductions()
    }
}

fn sum_adjustments(adjustments: &[PayAdjustment]) -> f64 {
    adjustments.iter().map(PayAdjustment::effective_amount).sum()
}

/// All payroll records of one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PayrollPeriod {
    pub period: BillingPeriod,
    #[serde(default)]
    pub records: Vec<PayrollRecord>,
}

// =============================================================================
// Summary
// =============================================================================

/// Computed pay for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PayrollLine {
    pub employee_id: String,
    pub employee_name: Option<String>,
    pub gross_pay: f64,
    pub total_deductions: f64,
    pub net_pay: f64,
}

impl From<&PayrollRecord> for PayrollLine {
    fn from(record: &PayrollRecord) -> Self {
        PayrollLine {
            employee_id: record.employee_id.clone(),
            employee_name: record.employee_name.clone(),
            gross_pay: record.gross_pay(),
            total_deductions: record.total_deductions(),
            net_pay: record.net_pay(),
        }
    }
}

/// Totals shown on the payroll period view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PayrollSummary {
    pub period: BillingPeriod,
    pub employee_count: usize,
    pub total_gross_pay: f64,
    pub total_deductions: f64,
    pub total_net_pay: f64,
    pub lines: Vec<PayrollLine>,
}

impl PayrollPeriod {
    pub fn new(period: BillingPeriod, records: Vec<PayrollRecord>) -> Self {
        PayrollPeriod { period, records }
    }

    /// `Σ net_pay` across all records.
    pub fn total_net_pay(&self) -> f64 {
        self.records.iter().map(PayrollRecord::net_pay).sum()
    }

    pub fn summarize(&self) -> PayrollSummary {
        let lines: Vec<PayrollLine> = self.records.iter().map(PayrollLine::from).collect();

        let summary = PayrollSummary {
            period: self.period,
            employee_count: lines.len(),
            total_gross_pay: lines.iter().map(|l| l.gross_pay).sum(),
            total_deductions: lines.iter().map(|l| l.total_deductions).sum(),
            total_net_pay: lines.iter().map(|l| l.net_pay).sum(),
            lines,
        };

        debug!(
            start = %self.period.start,
            end = %self.period.end,
            employee_count = summary.employee_count,
            total_net_pay = summary.total_net_pay,
            "Summarized payroll period"
        );

        summary
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
