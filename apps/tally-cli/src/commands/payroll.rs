//! Summarize a payroll period.

use serde::Serialize;
use tally_core::payroll::{PayrollPeriod, PayrollSummary};
use tally_core::validation::validate_payroll_period;
use tracing::info;

use super::{print_json, read_document, PayrollArgs};
use crate::config::AppConfig;
use crate::error::CliResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollDisplay {
    pub total_gross_pay: String,
    pub total_deductions: String,
    pub total_net_pay: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollResponse {
    pub summary: PayrollSummary,
    pub display: PayrollDisplay,
}

/// Run the payroll command.
pub fn run(args: PayrollArgs, config: &AppConfig) -> CliResult<()> {
    let period: PayrollPeriod = read_document(&args.input)?;
    let response = execute(&period, config)?;
    print_json(&response)
}

pub fn execute(period: &PayrollPeriod, config: &AppConfig) -> CliResult<PayrollResponse> {
    validate_payroll_period(period)?;

    let summary = period.summarize();

    info!(
        employees = summary.employee_count,
        total_net_pay = summary.total_net_pay,
        "Summarized payroll"
    );

    let display = PayrollDisplay {
        total_gross_pay: config.format_amount(summary.total_gross_pay),
        total_deductions: config.format_amount(summary.total_deductions),
        total_net_pay: config.format_amount(summary.total_net_pay),
    };

    Ok(PayrollResponse { summary, display })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use tally_core::ValidationError;

    fn period(json: &str) -> PayrollPeriod {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_summarize_period() {
        let period = period(
            r#"{
                "period": { "start": "2024-03-01", "end": "2024-03-15" },
                "records": [
                    {
                        "employeeId": "E-1",
                        "baseSalary": 20000,
                        "commission": 1500,
                        "benefits": [{ "name": "Rice allowance", "amount": 2000 }],
                        "deductions": [{ "name": "SSS", "amount": 900 }]
                    },
                    { "employeeId": "E-2", "baseSalary": 15000 }
                ]
            }"#,
        );

        let response = execute(&period, &AppConfig::default()).unwrap();
        assert_eq!(response.summary.employee_count, 2);
        assert_eq!(response.summary.total_gross_pay, 38500.0);
        assert_eq!(response.summary.total_net_pay, 37600.0);
        assert_eq!(response.display.total_deductions, "₱900.00");
        assert_eq!(response.display.total_net_pay, "₱37600.00");
    }

    #[test]
    fn test_missing_employee_id_is_rejected() {
        let period = period(
            r#"{
                "period": { "start": "2024-03-01", "end": "2024-03-31" },
                "records": [{ "employeeId": "", "baseSalary": 100 }]
            }"#,
        );

        let err = execute(&period, &AppConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CliError::Validation(ValidationError::Required { ref field }) if field == "records[0].employeeId"
        ));
    }

    #[test]
    fn test_reversed_period_is_rejected() {
        let period = period(r#"{ "period": { "start": "2024-04-01", "end": "2024-03-01" } }"#);
        assert!(execute(&period, &AppConfig::default()).is_err());
    }

    #[test]
    fn test_empty_period() {
        let period = period(r#"{ "period": { "start": "2024-03-01", "end": "2024-03-31" } }"#);
        let response = execute(&period, &AppConfig::default()).unwrap();
        assert_eq!(response.summary.employee_count, 0);
        assert_eq!(response.display.total_net_pay, "₱0.00");
    }
}
