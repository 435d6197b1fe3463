//! Request types for the School Reports API.
//!
//! This module defines the JSON request bodies for the `/reports/*`
//! endpoints and their conversion into validated report periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregation::{FeeScope, StatusFilter};
use crate::error::ReportResult;
use crate::models::{DateRange, ReportMonth};
use crate::session::ReportFilters;

/// Request body for `POST /reports/fees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeReportRequest {
    /// The roster scope; every student when omitted.
    #[serde(default)]
    pub scope: FeeScope,
    /// The paid/unpaid filter; both when omitted.
    #[serde(default)]
    pub status: StatusFilter,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
}

impl FeeReportRequest {
    /// Validates the requested month.
    pub fn period(&self) -> ReportResult<ReportMonth> {
        ReportMonth::new(self.year, self.month)
    }
}

/// Request body for `POST /reports/expenses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseReportRequest {
    /// Inclusive start of the range.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive end of the range.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Expense sub-category to keep.
    #[serde(default)]
    pub expense_type: Option<String>,
}

impl ExpenseReportRequest {
    /// Validates the requested range.
    pub fn range(&self) -> ReportResult<DateRange> {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// Request body for `POST /reports/payroll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollReportRequest {
    /// Calendar month, 1-12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Role to keep, compared case-insensitively.
    #[serde(default)]
    pub role: Option<String>,
}

impl PayrollReportRequest {
    /// Validates the requested month.
    pub fn period(&self) -> ReportResult<ReportMonth> {
        ReportMonth::new(self.year, self.month)
    }
}

/// Request body for `POST /reports/overview`.
///
/// Runs all three reports for one month; the expense report covers the
/// whole month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewRequest {
    /// Calendar month, 1-12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Roster scope for the fee report.
    #[serde(default)]
    pub scope: FeeScope,
    /// Status filter for the fee report.
    #[serde(default)]
    pub status: StatusFilter,
    /// Role filter for the payroll report.
    #[serde(default)]
    pub role: Option<String>,
}

impl OverviewRequest {
    /// Converts the request into validated report filters.
    pub fn filters(&self) -> ReportResult<ReportFilters> {
        let mut filters = ReportFilters::for_month(ReportMonth::new(self.year, self.month)?);
        filters.scope = self.scope.clone();
        filters.status = self.status;
        filters.role = self.role.clone();
        Ok(filters)
    }
}
