//! Report orchestration.
//!
//! A [`ReportSession`] owns the current filters and the last computed
//! [`ReportBundle`]. Fetching inputs happens outside the session and can
//! finish out of order, so every fetch is started with a [`FetchTicket`]
//! stamped with the filter generation it was issued for. Applying a ticket
//! issued before the latest filter change is a no-op.

use serde::Serialize;
use tracing::debug;

use crate::aggregation::{
    DEFAULT_EXPENSE_WINDOW_DAYS, ExpenseFilter, ExpenseReport, FeeCollectionReport, FeeScope,
    PayrollReport, StatusFilter, aggregate_expenses, aggregate_fee_collection, aggregate_payroll,
};
use crate::models::{DateRange, ReportInputs, ReportMonth};
use crate::store::Resource;

/// Every filter the three reports take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFilters {
    /// Month for the fee and payroll reports.
    pub month: ReportMonth,
    /// Roster scope for the fee report.
    pub scope: FeeScope,
    /// Status filter for the fee report.
    pub status: StatusFilter,
    /// Role filter for the payroll report.
    pub role: Option<String>,
    /// Date range for the expense report.
    pub expense_range: DateRange,
    /// Sub-category filter for the expense report.
    pub expense_type: Option<String>,
}

impl ReportFilters {
    /// Filters covering one whole month with no narrowing.
    pub fn for_month(month: ReportMonth) -> Self {
        Self {
            month,
            scope: FeeScope::All,
            status: StatusFilter::All,
            role: None,
            expense_range: month.as_range(),
            expense_type: None,
        }
    }
}

/// The three reports computed from one snapshot of inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportBundle {
    /// Fee collection for the month.
    pub fees: FeeCollectionReport,
    /// Expenses over the expense range.
    pub expenses: ExpenseReport,
    /// Payroll for the month.
    pub payroll: PayrollReport,
}

impl ReportBundle {
    /// The collections a bundle reads.
    pub const RESOURCES: [Resource; 4] = Resource::ALL;

    /// Computes all three reports.
    pub fn build(inputs: &ReportInputs, filters: &ReportFilters, expense_window_days: u32) -> Self {
        let expense_filter =
            ExpenseFilter::new(filters.expense_range, filters.expense_type.as_deref())
                .with_fallback_window(expense_window_days);

        Self {
            fees: aggregate_fee_collection(inputs, &filters.scope, filters.status, filters.month),
            expenses: aggregate_expenses(inputs, &expense_filter),
            payroll: aggregate_payroll(inputs, filters.month, filters.role.as_deref()),
        }
    }
}

/// Proof that a fetch was started for a given filter generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    filters: ReportFilters,
}

impl FetchTicket {
    /// The filter generation this ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The filters in force when the ticket was issued.
    pub fn filters(&self) -> &ReportFilters {
        &self.filters
    }
}

/// Owns filter state and the latest reports.
///
/// # Example
///
/// ```
/// use school_reports::models::{ReportInputs, ReportMonth};
/// use school_reports::session::{ReportFilters, ReportSession};
///
/// let march = ReportMonth::new(2025, 3).unwrap();
/// let mut session = ReportSession::new(ReportFilters::for_month(march));
///
/// let slow = session.begin_fetch();
/// session.set_month(ReportMonth::new(2025, 4).unwrap());
/// let fast = session.begin_fetch();
///
/// assert!(session.apply(&fast, &ReportInputs::default()));
/// assert!(!session.apply(&slow, &ReportInputs::default()));
/// assert_eq!(session.latest().unwrap().fees.month.month(), 4);
/// ```
#[derive(Debug)]
pub struct ReportSession {
    filters: ReportFilters,
    generation: u64,
    expense_window_days: u32,
    latest: Option<ReportBundle>,
}

impl ReportSession {
    /// Creates a session with the default expense averaging window.
    pub fn new(filters: ReportFilters) -> Self {
        Self {
            filters,
            generation: 0,
            expense_window_days: DEFAULT_EXPENSE_WINDOW_DAYS,
            latest: None,
        }
    }

    /// Overrides the expense averaging window.
    pub fn with_expense_window(mut self, days: u32) -> Self {
        self.expense_window_days = days;
        self
    }

    /// The current filters.
    pub fn filters(&self) -> &ReportFilters {
        &self.filters
    }

    /// The current filter generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The most recently applied reports.
    pub fn latest(&self) -> Option<&ReportBundle> {
        self.latest.as_ref()
    }

    /// Replaces the filters, invalidating outstanding tickets.
    pub fn set_filters(&mut self, filters: ReportFilters) {
        if filters != self.filters {
            self.filters = filters;
            self.generation += 1;
            debug!(generation = self.generation, "Report filters changed");
        }
    }

    /// Changes the report month; the expense range follows the month.
    pub fn set_month(&mut self, month: ReportMonth) {
        let mut filters = self.filters.clone();
        filters.month = month;
        filters.expense_range = month.as_range();
        self.set_filters(filters);
    }

    /// Changes the fee scope.
    pub fn set_scope(&mut self, scope: FeeScope) {
        let mut filters = self.filters.clone();
        filters.scope = scope;
        self.set_filters(filters);
    }

    /// Changes the fee status filter.
    pub fn set_status(&mut self, status: StatusFilter) {
        let mut filters = self.filters.clone();
        filters.status = status;
        self.set_filters(filters);
    }

    /// Changes the payroll role filter.
    pub fn set_role(&mut self, role: Option<String>) {
        let mut filters = self.filters.clone();
        filters.role = role;
        self.set_filters(filters);
    }

    /// Issues a ticket for a fetch under the current filters.
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            filters: self.filters.clone(),
        }
    }

    /// Computes reports from fetched inputs if the ticket is still current.
    ///
    /// Returns false, leaving the latest reports untouched, when the filters
    /// changed after the ticket was issued.
    pub fn apply(&mut self, ticket: &FetchTicket, inputs: &ReportInputs) -> bool {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale report inputs"
            );
            return false;
        }

        self.latest = Some(ReportBundle::build(
            inputs,
            &ticket.filters,
            self.expense_window_days,
        ));
        true
    }
}
