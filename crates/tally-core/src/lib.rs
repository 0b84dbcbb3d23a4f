//! # tally-core: Pure Business Logic for the Tally Back Office
//!
//! Order totals, customer statements and payroll as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Order / Statement / Payroll forms (UI)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON (camelCase), ts-rs bindings      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌──────────┐         │   │
//! │  │   │  totals  │ │  order   │ │ statement │ │ payroll  │         │   │
//! │  │   │ discount │ │ payload  │ │ repairs + │ │ gross /  │         │   │
//! │  │   │ tax      │ │ meta     │ │ products  │ │ net pay  │         │   │
//! │  │   └──────────┘ └──────────┘ └───────────┘ └──────────┘         │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌──────────┐         │   │
//! │  │   │  types   │ │  money   │ │  policy   │ │validation│         │   │
//! │  │   └──────────┘ └──────────┘ └───────────┘ └──────────┘         │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items, discount and tax configuration
//! - [`totals`] - The order totals engine
//! - [`order`] - Order payload and persisted metadata
//! - [`policy`] - Party type → tax settings table
//! - [`period`] - Inclusive billing periods
//! - [`statement`] - Customer statement aggregation
//! - [`payroll`] - Gross/net pay and period summaries
//! - [`money`] - Cent rounding for presentation
//! - [`validation`] - Caller-side input checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, bit-identical output
//! 2. **No I/O**: the crate logs through `tracing` but never installs a subscriber
//! 3. **Round at the Edge**: amounts stay `f64` until presented as [`Money`]
//! 4. **Never Fail on Arithmetic**: the totals engine is total; validation is separate
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{compute_totals, policy::TaxPolicy, DiscountConfig, LineItem};
//!
//! let policy = TaxPolicy::default();
//! let config = policy.config_for("business", DiscountConfig::percentage(10.0));
//!
//! let totals = compute_totals(&[LineItem::new(1.0, 1000.0)], &config);
//! let shown = totals.presented();
//!
//! assert_eq!(shown.tax.unwrap().to_string(), "108.00");
//! assert_eq!(shown.total.unwrap().to_string(), "1008.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod payroll;
pub mod period;
pub mod policy;
pub mod statement;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{OrderMeta, OrderPayload};
pub use period::BillingPeriod;
pub use totals::{compute_totals, OrderTotalsResult, PresentedTotals};
pub use types::*;
