//! Build a customer statement.

use serde::Serialize;
use tally_core::statement::{build_statement_from, CustomerStatement, StatementSource};
use tally_core::validation::{validate_customer_id, validate_period, validate_statement_source};
use tally_core::BillingPeriod;
use tracing::info;

use super::{print_json, read_document, StatementArgs};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementDisplay {
    pub repair_subtotal: String,
    pub product_subtotal: String,
    pub grand_total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponse {
    pub statement: CustomerStatement,
    pub display: StatementDisplay,
}

/// Run the statement command.
pub fn run(args: StatementArgs, config: &AppConfig) -> CliResult<()> {
    let period = period_from_args(&args)?;
    let source: StatementSource = read_document(&args.input)?;
    let response = execute(&source, &args.customer, &period, config)?;
    print_json(&response)
}

/// `--month` or the `--from`/`--to` pair; clap guarantees one of them.
pub fn period_from_args(args: &StatementArgs) -> CliResult<BillingPeriod> {
    match (&args.month, args.from, args.to) {
        (Some(month), _, _) => parse_month(month),
        (None, Some(from), Some(to)) => Ok(BillingPeriod::new(from, to)?),
        _ => Err(CliError::InvalidArgument(
            "either --month or both --from and --to are required".to_string(),
        )),
    }
}

/// Parses `YYYY-MM` into the calendar month it names.
pub fn parse_month(value: &str) -> CliResult<BillingPeriod> {
    let invalid = || CliError::InvalidArgument(format!("--month expects YYYY-MM, got {value:?}"));

    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;

    Ok(BillingPeriod::for_month(year, month)?)
}

pub fn execute(
    source: &StatementSource,
    customer_id: &str,
    period: &BillingPeriod,
    config: &AppConfig,
) -> CliResult<StatementResponse> {
    validate_customer_id(customer_id)?;
    validate_period(period)?;
    validate_statement_source(source)?;

    let statement = build_statement_from(customer_id, period, source);

    info!(
        customer_id = %statement.customer_id,
        lines = statement.line_count(),
        grand_total = statement.grand_total,
        "Built statement"
    );

    let display = StatementDisplay {
        repair_subtotal: config.format_amount(statement.repair_subtotal),
        product_subtotal: config.format_amount(statement.product_subtotal),
        grand_total: config.format_amount(statement.grand_total),
    };

    Ok(StatementResponse { statement, display })
}
