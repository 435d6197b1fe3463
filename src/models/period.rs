//! Report periods: calendar months and date ranges.
//!
//! This module contains the [`ReportMonth`] and [`DateRange`] types that define
//! the time window of a report. Both validate at construction so that the
//! aggregators can treat every period they receive as well-formed.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Earliest year accepted for a report month.
pub const MIN_REPORT_YEAR: i32 = 1900;
/// Latest year accepted for a report month.
pub const MAX_REPORT_YEAR: i32 = 9999;

/// A calendar month, e.g. March 2025.
///
/// # Example
///
/// ```
/// use school_reports::models::ReportMonth;
/// use chrono::NaiveDate;
///
/// let month = ReportMonth::new(2024, 2).unwrap();
/// assert_eq!(month.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(month.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert!(month.contains_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
///
/// assert!(ReportMonth::new(2024, 13).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ReportMonth {
    year: i32,
    month: u32,
}

impl ReportMonth {
    /// Creates a report month, rejecting months outside 1-12 and
    /// implausible years.
    pub fn new(year: i32, month: u32) -> ReportResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(ReportError::InvalidPeriod {
                message: format!("month {} is outside 1-12", month),
            });
        }
        if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&year) {
            return Err(ReportError::InvalidPeriod {
                message: format!(
                    "year {} is outside {}-{}",
                    year, MIN_REPORT_YEAR, MAX_REPORT_YEAR
                ),
            });
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing the given date.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month number, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let first = self.first_day();
        first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first)
    }

    /// Checks if a date falls within the month.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Returns the month as a closed date range.
    pub fn as_range(&self) -> DateRange {
        DateRange {
            start: Some(self.first_day()),
            end: Some(self.last_day()),
        }
    }
}

impl<'de> Deserialize<'de> for ReportMonth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            year: i32,
            month: u32,
        }

        let raw = Raw::deserialize(deserializer)?;
        ReportMonth::new(raw.year, raw.month).map_err(serde::de::Error::custom)
    }
}

/// An inclusive date range whose bounds are both optional.
///
/// A missing bound leaves that side of the range open.
///
/// # Example
///
/// ```
/// use school_reports::models::DateRange;
/// use chrono::NaiveDate;
///
/// let march = DateRange::new(
///     NaiveDate::from_ymd_opt(2025, 3, 1),
///     NaiveDate::from_ymd_opt(2025, 3, 31),
/// ).unwrap();
/// assert_eq!(march.day_count(), Some(31));
/// assert!(march.contains_date(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
///
/// assert_eq!(DateRange::unbounded().day_count(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range, rejecting one whose start is after its end.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ReportResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ReportError::InvalidDateRange { start: s, end: e });
            }
        }
        Ok(Self { start, end })
    }

    /// A range with neither bound set.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// The inclusive start, if any.
    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// The inclusive end, if any.
    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Returns true if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Checks if a date falls within the range, inclusive of both bounds.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    /// Checks an optional record date against the range.
    ///
    /// Undated records only match a fully unbounded range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        match date {
            Some(d) => self.contains_date(d),
            None => self.is_unbounded(),
        }
    }

    /// The number of days covered, counting both ends; `None` unless both
    /// bounds are set.
    pub fn day_count(&self) -> Option<u32> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => u32::try_from((e - s).num_days() + 1).ok(),
            _ => None,
        }
    }
}
