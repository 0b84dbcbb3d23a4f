//! # Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TALLY_*`)
//! 2. Config file (`--config path` or `TALLY_CONFIG`)
//! 3. Defaults (this file)
//!
//! ## Configuration File Format
//! ```toml
//! currency_code = "PHP"
//! currency_symbol = "₱"
//! default_party_type = "regular"
//!
//! [tax_policy.default]
//! rate = 12
//! mode = "inclusive"
//!
//! [tax_policy.entries.business]
//! rate = 12
//! mode = "exclusive"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tally_core::policy::{TaxPolicy, REGULAR};
use tally_core::{Money, TaxRate};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// ISO 4217 code, informational.
    pub currency_code: String,

    /// Prefix used when amounts are rendered for display.
    pub currency_symbol: String,

    /// Party type used when neither the document nor `--party-type` names one.
    pub default_party_type: String,

    pub tax_policy: TaxPolicy,
}

impl Default for AppConfig {
    /// PHP, 12% VAT-inclusive for regular customers.
    fn default() -> Self {
        AppConfig {
            currency_code: "PHP".to_string(),
            currency_symbol: "₱".to_string(),
            default_party_type: REGULAR.to_string(),
            tax_policy: TaxPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the file (if any), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = AppConfig::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Applies `TALLY_*` overrides read through `lookup`.
    ///
    /// ## Environment Variables
    /// - `TALLY_CURRENCY_CODE`
    /// - `TALLY_CURRENCY_SYMBOL`
    /// - `TALLY_DEFAULT_PARTY_TYPE`
    /// - `TALLY_DEFAULT_TAX_RATE`: replaces the fallback rate of the tax policy (e.g. "12")
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(code) = lookup("TALLY_CURRENCY_CODE") {
            self.currency_code = code;
        }

        if let Some(symbol) = lookup("TALLY_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(party_type) = lookup("TALLY_DEFAULT_PARTY_TYPE") {
            self.default_party_type = party_type;
        }

        if let Some(raw) = lookup("TALLY_DEFAULT_TAX_RATE") {
            let rate = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|r| r.is_finite() && *r >= 0.0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: "TALLY_DEFAULT_TAX_RATE".to_string(),
                    value: raw.clone(),
                })?;
            self.tax_policy.default.rate = TaxRate::from_percentage(rate);
        }

        if self.default_party_type.trim().is_empty() {
            warn!("Default party type is empty, falling back to {}", REGULAR);
            self.default_party_type = REGULAR.to_string();
        }

        debug!(
            currency = %self.currency_code,
            party_type = %self.default_party_type,
            "Configuration resolved"
        );
        Ok(())
    }

    /// Renders a presented amount as sign, symbol, then digits with two
    /// decimals and no grouping: `₱1008.00`, `-₱5.50`.
    ///
    /// `None` (an amount that was NaN or infinite) renders as `n/a`.
    pub fn format_money(&self, amount: Option<Money>) -> String {
        match amount {
            Some(money) if money.is_negative() => {
                format!("-{}{}", self.currency_symbol, Money::from_cents(-money.cents()))
            }
            Some(money) => format!("{}{}", self.currency_symbol, money),
            None => "n/a".to_string(),
        }
    }

    /// Rounds a full-precision amount, then renders it.
    pub fn format_amount(&self, amount: f64) -> String {
        self.format_money(Money::from_amount(amount))
    }
}
