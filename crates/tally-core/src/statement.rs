//! # Customer Statements
//!
//! Collects a customer's repairs and product purchases for one billing
//! period and sums them.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  repair tickets ──┐                                                     │
//! │                   ├──► filter: customer_id matches                      │
//! │  sales ───────────┘            AND date ∈ [period.start, period.end]    │
//! │                                     │                                   │
//! │                    ┌────────────────┴────────────────┐                  │
//! │                    ▼                                 ▼                  │
//! │           repair lines (1/ticket)        product lines (1/sold item)    │
//! │                    │                                 │                  │
//! │             repair_subtotal                  product_subtotal           │
//! │                    └────────────► grand_total ◄──────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No tax or discount is applied here; statement amounts are what the
//! repair tickets and sales already recorded.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::period::BillingPeriod;
use crate::types::LineItem;

// =============================================================================
// Source Records
// =============================================================================

/// A repair job billed to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RepairTicket {
    /// Ticket number shown on the statement.
    pub reference: String,
    pub customer_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    /// Missing cost counts as 0.
    #[serde(default)]
    pub cost: Option<f64>,
}

/// A product sale to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleTransaction {
    /// Receipt or invoice number.
    pub reference: String,
    pub customer_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// Everything a statement is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatementSource {
    #[serde(default)]
    pub repairs: Vec<RepairTicket>,
    #[serde(default)]
    pub sales: Vec<SaleTransaction>,
}

// =============================================================================
// Statement
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum StatementLineKind {
    Repair,
    Product,
}

/// One row of a printed statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatementLine {
    pub kind: StatementLineKind,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub reference: String,
    pub description: Option<String>,
    pub quantity: f64,
    pub amount: f64,
}

/// A customer's statement for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerStatement {
    pub customer_id: String,
    pub period: BillingPeriod,
    pub repairs: Vec<StatementLine>,
    pub products: Vec<StatementLine>,
    pub repair_subtotal: f64,
    pub product_subtotal: f64,
    pub grand_total: f64,
}

impl CustomerStatement {
    pub fn is_empty(&self) -> bool {
        self.repairs.is_empty() && self.products.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.repairs.len() + self.products.len()
    }
}

/// Builds a customer's statement for `period`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use tally_core::statement::{build_statement, RepairTicket};
/// use tally_core::BillingPeriod;
///
/// let repair = RepairTicket {
///     reference: "R-1001".into(),
///     customer_id: "C-7".into(),
///     date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
///     description: Some("Hinge".into()),
///     cost: Some(850.0),
/// };
///
/// let march = BillingPeriod::for_month(2024, 3).unwrap();
/// let statement = build_statement("C-7", &march, &[repair], &[]);
/// assert_eq!(statement.grand_total, 850.0);
/// ```
pub fn build_statement(
    customer_id: &str,
    period: &BillingPeriod,
    repairs: &[RepairTicket],
    sales: &[SaleTransaction],
) -> CustomerStatement {
    let customer_id = customer_id.trim();
    let belongs = |record_customer: &str| record_customer.trim() == customer_id;

    let mut repair_lines: Vec<StatementLine> = repairs
        .iter()
        .filter(|r| belongs(&r.customer_id) && period.contains(r.date))
        .map(|r| StatementLine {
            kind: StatementLineKind::Repair,
            date: r.date,
            reference: r.reference.clone(),
            description: r.description.clone(),
            quantity: 1.0,
            amount: r.cost.unwrap_or(0.0),
        })
        .collect();

    let mut product_lines: Vec<StatementLine> = sales
        .iter()
        .filter(|s| belongs(&s.customer_id) && period.contains(s.date))
        .flat_map(|s| {
            s.items.iter().map(move |item| StatementLine {
                kind: StatementLineKind::Product,
                date: s.date,
                reference: s.reference.clone(),
                description: item.description.clone(),
                quantity: item.effective_quantity(),
                amount: item.line_total(),
            })
        })
        .collect();

    sort_lines(&mut repair_lines);
    sort_lines(&mut product_lines);

    let repair_subtotal = sum_lines(&repair_lines);
    let product_subtotal = sum_lines(&product_lines);

    debug!(
        customer_id,
        start = %period.start,
        end = %period.end,
        repairs = repair_lines.len(),
        products = product_lines.len(),
        "Built customer statement"
    );

    CustomerStatement {
        customer_id: customer_id.to_string(),
        period: *period,
        repairs: repair_lines,
        products: product_lines,
        repair_subtotal,
        product_subtotal,
        grand_total: repair_subtotal + product_subtotal,
    }
}

/// Same as [`build_statement`], reading both record sets from one source.
pub fn build_statement_from(
    customer_id: &str,
    period: &BillingPeriod,
    source: &StatementSource,
) -> CustomerStatement {
    build_statement(customer_id, period, &source.repairs, &source.sales)
}

// Stable sort keeps item order within one sale
fn sort_lines(lines: &mut [StatementLine]) {
    lines.sort_by(|a, b| (a.date, &a.reference).cmp(&(b.date, &b.reference)));
}

fn sum_lines(lines: &[StatementLine]) -> f64 {
    lines.iter().map(|l| l.amount).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
