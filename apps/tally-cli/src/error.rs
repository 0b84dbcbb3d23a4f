//! # CLI Error Type
//!
//! Unified error type for all commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  read file ──── io::Error ─────────────┐                               │
//! │  parse JSON ─── serde_json::Error ─────┤                               │
//! │  load config ── ConfigError ───────────┼──► CliError ──► main()        │
//! │  validate ───── ValidationError ───────┤        │         error!(...)  │
//! │  build period ─ CoreError ─────────────┘        │         exit(1)      │
//! │                                                 ▼                      │
//! │                                          exit_code()                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use tally_core::{CoreError, ValidationError};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[source] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Process exit code: 2 for bad input, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation(_) | CliError::InvalidArgument(_) | CliError::Json { .. } => 2,
            CliError::Core(CoreError::Validation(_)) => 2,
            _ => 1,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
