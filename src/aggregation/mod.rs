//! Report aggregation.
//!
//! Three pure aggregators turn raw roster and finance collections into
//! report structures:
//!
//! - [`aggregate_fee_collection`]: who paid fees in a month, by class and level
//! - [`aggregate_expenses`]: spending over a date range, by sub-category
//! - [`aggregate_payroll`]: salaries paid in a month, by role
//!
//! None of them fail or perform I/O; identical inputs always give identical
//! reports.

mod expenses;
mod fee_collection;
mod grouping;
mod matching;
mod payroll;
mod rounding;

pub use expenses::{
    DEFAULT_EXPENSE_WINDOW_DAYS, ExpenseCategoryBreakdown, ExpenseFilter, ExpenseLine,
    ExpenseReport, ExpenseSummary, aggregate_expenses,
};
pub use fee_collection::{
    FeeCollectionReport, FeePayment, FeeScope, FeeSummary, StatusFilter, UNKNOWN_CLASS,
    UNKNOWN_LEVEL, UnpaidStudent, aggregate_fee_collection,
};
pub use grouping::FeeGroupSummary;
pub use matching::{Party, PartyIndex, Resolution, TitleMatching};
pub use payroll::{
    DEFAULT_STAFF_ROLE, PayrollEntry, PayrollReport, PayrollSummary, RolePayrollSummary,
    UNKNOWN_STAFF, aggregate_payroll,
};
pub use rounding::{MONEY_DP, PERCENT_DP, average, percentage, round_to, sum_amounts, whole_percent};
