//! # Billing Periods
//!
//! Inclusive date ranges used by customer statements and payroll.
//!
//! ```text
//!   2024-03-01                         2024-03-31
//!       │◄──────────── contains() ──────────►│
//!       start                               end      (both inclusive)
//! ```

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// An inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillingPeriod {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
}

impl BillingPeriod {
    /// Fails when `start` is after `end`. A single-day period is fine.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvalidPeriod { start, end });
        }
        Ok(BillingPeriod { start, end })
    }

    /// First through last day of a calendar month.
    ///
    /// ```rust
    /// use tally_core::BillingPeriod;
    ///
    /// let feb = BillingPeriod::for_month(2024, 2).unwrap();
    /// assert_eq!(feb.end.to_string(), "2024-02-29");
    /// assert_eq!(feb.days(), 29);
    /// ```
    pub fn for_month(year: i32, month: u32) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidMonth { year, month };

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;

        Ok(BillingPeriod { start, end })
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> CoreResult<Self> {
        BillingPeriod::for_month(date.year(), date.month())
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// True when the period is exactly one calendar month.
    pub fn is_calendar_month(&self) -> bool {
        BillingPeriod::month_of(self.start).is_ok_and(|month| month == *self)
    }

    /// The period right after this one.
    ///
    /// Calendar months roll to the next calendar month; any other range
    /// shifts forward by its own length. `None` past the end of the
    /// supported date range.
    pub fn next(&self) -> Option<Self> {
        if self.is_calendar_month() {
            let start = self.start.checked_add_months(Months::new(1))?;
            return BillingPeriod::month_of(start).ok();
        }

        let len = Duration::days(self.days());
        Some(BillingPeriod {
            start: self.start.checked_add_signed(len)?,
            end: self.end.checked_add_signed(len)?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
