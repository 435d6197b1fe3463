//! Core data models for the School Reports Engine.
//!
//! This module contains the roster and finance records the reports read,
//! the report periods, and the output types shared by every report.

mod inputs;
pub mod lenient;
mod period;
mod report;
mod staff;
mod student;
mod transaction;

pub use inputs::ReportInputs;
pub use period::{DateRange, MAX_REPORT_YEAR, MIN_REPORT_YEAR, ReportMonth};
pub use report::{AMBIGUOUS_TITLE_MATCH, MatchKind, ReportEnvelope, ReportWarning};
pub use staff::StaffMember;
pub use student::{ClassSection, Student};
pub use transaction::{FinanceTransaction, TransactionCategory, UNCATEGORIZED};
