//! Reporting periods
//!
//! Maps a granularity and a reference day ("today") to the calendar period that
//! contains it, and to the full period of the same granularity just before it.
//! Periods are calendar-aligned (ISO weeks, months, fixed quarters, years), so
//! the previous period always has the same calendar length as the current one
//! even when the number of days differs.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::DateRange;

/// Reporting granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Resolve a caller-supplied label, case-insensitively and ignoring
    /// surrounding whitespace. Anything unrecognized means monthly.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            tracing::debug!(label = %label, "Unrecognized period label, using monthly");
            Self::Monthly
        })
    }

    /// The period containing `reference`
    pub fn current_period(&self, reference: NaiveDate) -> DateRange {
        match self {
            Self::Weekly => {
                let start = week_start(reference);
                range(start, start + Duration::days(6))
            }
            Self::Monthly => month_range(reference.year(), reference.month()),
            Self::Quarterly => quarter_range(quarter_start(reference)),
            Self::Yearly => year_range(reference.year()),
        }
    }

    /// The full period immediately before the one containing `reference`
    pub fn previous_period(&self, reference: NaiveDate) -> DateRange {
        match self {
            Self::Weekly => {
                let start = week_start(reference - Duration::days(7));
                range(start, start + Duration::days(6))
            }
            Self::Monthly => {
                let anchor = first_of_month(reference.year(), reference.month()) - Months::new(1);
                month_range(anchor.year(), anchor.month())
            }
            Self::Quarterly => quarter_range(quarter_start(reference) - Months::new(3)),
            Self::Yearly => year_range(reference.year() - 1),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!(
                "Unknown period: {} (valid: weekly, monthly, quarterly, yearly)",
                s
            )),
        }
    }
}

/// Current period for a raw label (unknown labels fall back to monthly)
pub fn current_period(label: &str, reference: NaiveDate) -> DateRange {
    Granularity::from_label(label).current_period(reference)
}

/// Previous period for a raw label (unknown labels fall back to monthly)
pub fn previous_period(label: &str, reference: NaiveDate) -> DateRange {
    Granularity::from_label(label).previous_period(reference)
}

/// The whole calendar month `month` (1-12) of `year`, if that month exists
pub fn calendar_month(year: i32, month: u32) -> Option<DateRange> {
    NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(month_range(year, month))
}

fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange { start, end }
}

/// Monday of the ISO week containing `date`
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("Day 1 always valid")
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let next = first_of_month(year, month) + Months::new(1);
    next.pred_opt().expect("Month start always has a predecessor")
}

fn month_range(year: i32, month: u32) -> DateRange {
    range(first_of_month(year, month), last_of_month(year, month))
}

/// First day of the fixed quarter (Jan, Apr, Jul, Oct) containing `date`
fn quarter_start(date: NaiveDate) -> NaiveDate {
    let start_month = ((date.month() - 1) / 3) * 3 + 1;
    first_of_month(date.year(), start_month)
}

fn quarter_range(start: NaiveDate) -> DateRange {
    let last_month = start + Months::new(2);
    range(start, last_of_month(last_month.year(), last_month.month()))
}

fn year_range(year: i32) -> DateRange {
    range(
        NaiveDate::from_ymd_opt(year, 1, 1).expect("Jan 1 always valid"),
        NaiveDate::from_ymd_opt(year, 12, 31).expect("Dec 31 always valid"),
    )
}
