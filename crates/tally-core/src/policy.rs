//! # Tax Policy
//!
//! Maps a customer type (customer orders) or supplier type (purchase
//! orders) to the tax settings an order form starts with.
//!
//! The policy is applied by the calling layer *before* the engine runs;
//! [`crate::totals`] never looks up a party type itself.
//!
//! ## Built-in Table
//! ```text
//! ┌──────────────┬────────┬────────────┐
//! │ party type   │ rate   │ mode       │
//! ├──────────────┼────────┼────────────┤
//! │ regular  (*) │ 12%    │ inclusive  │
//! │ business     │ 12%    │ exclusive  │
//! │ vat_exempt   │ 0%     │ exclusive  │
//! └──────────────┴────────┴────────────┘
//!   (*) fallback for unknown types
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::types::{DiscountConfig, OrderTotalsConfig, TaxConfig};

pub const REGULAR: &str = "regular";
pub const BUSINESS: &str = "business";
pub const VAT_EXEMPT: &str = "vat_exempt";

/// Party type → tax settings, with a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaxPolicy {
    /// Used when a party type has no entry.
    pub default: TaxConfig,
    /// Keys match case-insensitively.
    #[serde(default)]
    pub entries: BTreeMap<String, TaxConfig>,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        TaxPolicy::new(TaxConfig::inclusive(12.0))
            .with_entry(REGULAR, TaxConfig::inclusive(12.0))
            .with_entry(BUSINESS, TaxConfig::exclusive(12.0))
            .with_entry(VAT_EXEMPT, TaxConfig::exclusive(0.0))
    }
}

impl TaxPolicy {
    /// Empty table that always answers `default`.
    pub fn new(default: TaxConfig) -> Self {
        TaxPolicy {
            default,
            entries: BTreeMap::new(),
        }
    }

    pub fn with_entry(mut self, party_type: &str, tax: TaxConfig) -> Self {
        self.insert(party_type, tax);
        self
    }

    pub fn insert(&mut self, party_type: &str, tax: TaxConfig) {
        self.entries.insert(normalize(party_type), tax);
    }

    /// Case-insensitive lookup with fallback to `default`.
    ///
    /// ```rust
    /// use tally_core::policy::TaxPolicy;
    /// use tally_core::{TaxConfig, TaxMode};
    ///
    /// let policy = TaxPolicy::default();
    /// assert_eq!(policy.tax_for("Business").mode, TaxMode::Exclusive);
    /// assert_eq!(policy.tax_for("walk-in"), TaxConfig::inclusive(12.0));
    /// ```
    pub fn tax_for(&self, party_type: &str) -> TaxConfig {
        let key = normalize(party_type);
        let entry = self.entries.get(&key).or_else(|| {
            self.entries
                .iter()
                .find(|(k, _)| normalize(k) == key)
                .map(|(_, tax)| tax)
        });

        match entry {
            Some(tax) => *tax,
            None => {
                debug!(party_type, "No tax policy entry, using default");
                self.default
            }
        }
    }

    /// Full engine input for a party type and a discount.
    pub fn config_for(&self, party_type: &str, discount: DiscountConfig) -> OrderTotalsConfig {
        OrderTotalsConfig::new(discount, self.tax_for(party_type))
    }
}

fn normalize(party_type: &str) -> String {
    party_type.trim().to_lowercase()
}

// =============================================================================
// Unit Tests
// =============================================================================
