//! # tally-cli: Back-Office Calculations from the Command Line
//!
//! Thin shell around `tally-core`: read a JSON document, compute, print
//! pretty JSON on stdout.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tally <command> <input.json> [flags]                                   │
//! │                                                                         │
//! │  ┌──────────┐   ┌────────────┐   ┌──────────────────┐   ┌───────────┐  │
//! │  │   clap   │──►│ AppConfig  │──►│ commands::*::run │──►│  stdout   │  │
//! │  │  (Cli)   │   │ TOML + env │   │  read, validate  │   │  (JSON)   │  │
//! │  └──────────┘   └────────────┘   └────────┬─────────┘   └───────────┘  │
//! │                                           │                             │
//! │                                  ┌────────▼─────────┐                   │
//! │                                  │    tally-core    │   logs ──► stderr │
//! │                                  └──────────────────┘                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Commands
//! - `tally totals <order.json> [--party-type T]`
//! - `tally statement <input.json> --customer ID (--month YYYY-MM | --from D --to D)`
//! - `tally payroll <input.json>`

pub mod commands;
pub mod config;
pub mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use commands::{PayrollArgs, StatementArgs, TotalsArgs};
use config::AppConfig;
use error::CliResult;

// =============================================================================
// Command Line
// =============================================================================

/// Order totals, customer statements and payroll summaries
#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, global = true, env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute subtotal, discount, tax and total for an order
    Totals(TotalsArgs),

    /// Build a customer statement for a billing period
    Statement(StatementArgs),

    /// Summarize gross and net pay for a payroll period
    Payroll(PayrollArgs),
}

// =============================================================================
// Entry Points
// =============================================================================

/// Loads configuration and dispatches to the selected command.
pub fn run(cli: Cli) -> CliResult<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    debug!(command = ?cli.command, "Dispatching command");

    match cli.command {
        Commands::Totals(args) => commands::totals::run(args, &config),
        Commands::Statement(args) => commands::statement::run(args, &config),
        Commands::Payroll(args) => commands::payroll::run(args, &config),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout carries only the JSON result.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally_core=trace` - Show engine traces
/// - Default: `info,tally=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));

    build_subscriber(filter).init();
}

/// stderr formatter gated only by `filter`.
fn build_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tracing::Level;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_totals() {
        let cli = Cli::try_parse_from(["tally", "totals", "order.json", "--party-type", "business"])
            .unwrap();
        match cli.command {
            Commands::Totals(args) => {
                assert_eq!(args.input, PathBuf::from("order.json"));
                assert_eq!(args.party_type.as_deref(), Some("business"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_statement_short_flags() {
        let cli = Cli::try_parse_from([
            "tally", "statement", "in.json", "-C", "C-1", "-m", "2024-03", "-c", "tally.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("tally.toml")));
        match cli.command {
            Commands::Statement(args) => {
                assert_eq!(args.customer, "C-1");
                assert_eq!(args.month.as_deref(), Some("2024-03"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_statement_long_flags() {
        let cli = Cli::try_parse_from([
            "tally", "statement", "in.json", "--customer", "C-1", "--from", "2024-03-01", "--to",
            "2024-03-15",
        ])
        .unwrap();

        match cli.command {
            Commands::Statement(args) => {
                assert_eq!(args.customer, "C-1");
                assert_eq!(args.to.map(|d| d.to_string()).as_deref(), Some("2024-03-15"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_filter_controls_levels() {
        tracing::subscriber::with_default(build_subscriber(EnvFilter::new("warn")), || {
            assert!(!tracing::enabled!(Level::TRACE));
            assert!(!tracing::enabled!(Level::DEBUG));
            assert!(tracing::enabled!(Level::WARN));
        });

        let default_filter = EnvFilter::new("info,tally=debug");
        tracing::subscriber::with_default(build_subscriber(default_filter), || {
            assert!(tracing::enabled!(target: "tally_core::totals", Level::DEBUG));
            assert!(!tracing::enabled!(target: "tally_core::totals", Level::TRACE));
            assert!(!tracing::enabled!(target: "serde_json", Level::DEBUG));
        });
    }

    #[test]
    fn test_statement_period_flags_conflict() {
        let result = Cli::try_parse_from([
            "tally",
            "statement",
            "in.json",
            "--customer",
            "C-1",
            "--month",
            "2024-03",
            "--from",
            "2024-03-01",
        ]);
        assert!(result.is_err());
    }
}
