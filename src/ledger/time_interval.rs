use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Period between two occurrences of a recurring transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the date `steps` periods after `from`, clamping month-ends.
    ///
    /// Steps are always measured from `from` rather than chained, so a
    /// Jan-31 monthly series lands on Feb-28 and then back on Mar-31.
    /// Returns `None` once the result falls outside the supported calendar.
    pub fn add_periods(&self, from: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self {
            Frequency::Weekly => from.checked_add_days(Days::new(7 * u64::from(steps))),
            Frequency::Monthly => add_months(from, i32::try_from(steps).ok()?),
            Frequency::Yearly => add_years(from, i32::try_from(steps).ok()?),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" | "annual" | "annually" => Ok(Frequency::Yearly),
            other => Err(EngineError::invalid(format!(
                "unrecognized frequency `{}`",
                other
            ))),
        }
    }
}

/// Adds (or subtracts) whole months, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = (date.year() * 12 + date.month0() as i32).checked_add(months)?;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Adds (or subtracts) whole years; Feb-29 falls back to Feb-28 in common years.
pub fn add_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
