//! CLI command implementations.
//!
//! Each command has a pure `execute` that maps a parsed document to a
//! serializable response, and a `run` that does the file and stdout I/O.

pub mod payroll;
pub mod statement;
pub mod totals;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{ArgGroup, Args};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{CliError, CliResult};

// =============================================================================
// Arguments
// =============================================================================

/// Arguments for the totals command.
#[derive(Debug, Args)]
pub struct TotalsArgs {
    /// Order document: `{ items, config?, partyType?, meta? }`
    pub input: PathBuf,

    /// Party type used to pick the tax settings when the order has none
    #[arg(short, long)]
    pub party_type: Option<String>,
}

/// Arguments for the statement command.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("period").required(true).args(["month", "from"])))]
pub struct StatementArgs {
    /// Records document: `{ repairs, sales }`
    pub input: PathBuf,

    /// Customer to build the statement for
    #[arg(short = 'C', long)]
    pub customer: String,

    /// Calendar month, `YYYY-MM`
    #[arg(short, long)]
    pub month: Option<String>,

    /// First day of the period, `YYYY-MM-DD`
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last day of the period (inclusive), `YYYY-MM-DD`
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
}

/// Arguments for the payroll command.
#[derive(Debug, Args)]
pub struct PayrollArgs {
    /// Payroll document: `{ period: { start, end }, records }`
    pub input: PathBuf,
}

// =============================================================================
// Shared I/O
// =============================================================================

/// Reads and deserializes a JSON document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document = serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = text.len(), "Read input document");
    Ok(document)
}

/// Writes a response to stdout as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(CliError::Output)?;
    println!("{json}");
    Ok(())
}
