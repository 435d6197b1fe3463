//! Fee collection reporting.
//!
//! This module determines which enrolled students paid fees in a calendar
//! month and summarizes the result by class and by level. A student counts
//! as paid when at least one income transaction dated in the month resolves
//! to them, either through its reference id or, as a labelled fallback,
//! through its title.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    ClassSection, FinanceTransaction, MatchKind, ReportInputs, ReportMonth, ReportWarning,
    Student, TransactionCategory,
};

use super::grouping::{FeeGroupAccumulator, FeeGroupSummary};
use super::matching::{Party, PartyIndex, Resolution, TitleMatching};
use super::rounding::{PERCENT_DP, percentage, sum_amounts};

/// Class name reported for a student whose class cannot be resolved.
pub const UNKNOWN_CLASS: &str = "Unknown Class";
/// Level reported for a student whose class or level cannot be resolved.
pub const UNKNOWN_LEVEL: &str = "Unknown Level";

/// The part of the roster a fee report covers.
///
/// # Example
///
/// ```
/// use school_reports::aggregation::FeeScope;
///
/// let scope: FeeScope = serde_json::from_str(r#"{"kind": "level", "level": "Primary"}"#).unwrap();
/// assert_eq!(scope, FeeScope::Level { level: "Primary".to_string() });
///
/// let all: FeeScope = serde_json::from_str(r#"{"kind": "all"}"#).unwrap();
/// assert_eq!(all, FeeScope::All);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeeScope {
    /// Every enrolled student.
    #[default]
    All,
    /// Students of one class section.
    Class {
        /// The class id.
        class_id: String,
    },
    /// Students of every class at one level.
    Level {
        /// The level name, compared case-insensitively.
        level: String,
    },
}

impl FeeScope {
    fn includes(&self, student: &EnrolledStudent<'_>) -> bool {
        match self {
            FeeScope::All => true,
            FeeScope::Class { class_id } => {
                student.student.class_id.as_deref().map(str::trim) == Some(class_id.trim())
            }
            FeeScope::Level { level } => student
                .class_level
                .trim()
                .eq_ignore_ascii_case(level.trim()),
        }
    }
}

/// Which students a fee report keeps after payments are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Paid and unpaid students.
    #[default]
    All,
    /// Only students with a payment in the month.
    PaidOnly,
    /// Only students without a payment in the month.
    UnpaidOnly,
}

impl StatusFilter {
    fn keeps(&self, paid: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::PaidOnly => paid,
            StatusFilter::UnpaidOnly => !paid,
        }
    }
}

/// Headline figures of a fee report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSummary {
    /// Students kept after scope and status filtering.
    pub total_students: usize,
    /// Kept students with a payment in the month.
    pub paid_count: usize,
    /// Kept students without a payment in the month.
    pub unpaid_count: usize,
    /// Sum of the kept payments.
    pub total_collected: Decimal,
    /// `paid_count / total_students` as a percentage with one decimal place.
    pub collection_rate: Decimal,
    /// Income transactions in the month that resolved to no in-scope student.
    pub unmatched_payments: usize,
}

/// A payment credited to a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePayment {
    /// The paying transaction.
    pub transaction_id: String,
    /// The student the payment was credited to.
    pub student_id: String,
    /// The student's name.
    pub student_name: String,
    /// The student's class name.
    pub class_name: String,
    /// The student's class level.
    pub class_level: String,
    /// The amount paid.
    pub amount: Decimal,
    /// The payment date.
    pub date: NaiveDate,
    /// How the payment was tied to the student.
    pub match_kind: MatchKind,
}

/// A student with no payment in the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpaidStudent {
    /// The student's id.
    pub student_id: String,
    /// The student's name.
    pub student_name: String,
    /// The student's class name.
    pub class_name: String,
    /// The student's class level.
    pub class_level: String,
}

/// The complete fee collection report for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCollectionReport {
    /// The month reported on.
    pub month: ReportMonth,
    /// The roster scope applied.
    pub scope: FeeScope,
    /// The status filter applied.
    pub status: StatusFilter,
    /// Headline figures.
    pub summary: FeeSummary,
    /// Kept payments, newest first.
    pub paid_list: Vec<FeePayment>,
    /// Kept unpaid students, by class then name.
    pub unpaid_list: Vec<UnpaidStudent>,
    /// Figures per class name.
    pub by_class: Vec<FeeGroupSummary>,
    /// Figures per level.
    pub by_level: Vec<FeeGroupSummary>,
    /// Transactions that could not be attributed with confidence.
    pub warnings: Vec<ReportWarning>,
}

/// An enrolled student with class details resolved.
#[derive(Debug)]
struct EnrolledStudent<'a> {
    student: &'a Student,
    class_name: &'a str,
    class_level: &'a str,
}

impl<'a> EnrolledStudent<'a> {
    fn resolve(student: &'a Student, classes: &HashMap<&str, &'a ClassSection>) -> Self {
        let class = student
            .class_id
            .as_deref()
            .and_then(|id| classes.get(id.trim()).copied());

        Self {
            student,
            class_name: class
                .map(|c| c.name.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or(UNKNOWN_CLASS),
            class_level: class
                .and_then(|c| c.level.as_deref())
                .unwrap_or(UNKNOWN_LEVEL),
        }
    }

    fn to_unpaid(&self) -> UnpaidStudent {
        UnpaidStudent {
            student_id: self.student.id.clone(),
            student_name: self.student.name.clone(),
            class_name: self.class_name.to_string(),
            class_level: self.class_level.to_string(),
        }
    }
}

impl Party for EnrolledStudent<'_> {
    fn party_id(&self) -> &str {
        &self.student.id
    }

    fn party_name(&self) -> &str {
        &self.student.name
    }
}

fn class_lookup(classes: &[ClassSection]) -> HashMap<&str, &ClassSection> {
    let mut lookup = HashMap::with_capacity(classes.len());
    for class in classes {
        lookup.entry(class.id.as_str()).or_insert(class);
    }
    lookup
}

fn is_fee_payment(tx: &FinanceTransaction, month: ReportMonth) -> bool {
    tx.category == TransactionCategory::Income && tx.date.is_some_and(|d| month.contains_date(d))
}

/// Builds the fee collection report for a month.
///
/// Only enrolled students (active and not deleted) inside `scope` are
/// considered. Income transactions dated in `month` are resolved to those
/// students; a transaction that resolves to nobody in scope counts towards
/// `unmatched_payments` and nothing else. `status` then decides which
/// students are kept for the summary, the lists and the group figures.
///
/// Every class and level with an in-scope student is reported, even when
/// the status filter removed all of its students.
///
/// # Example
///
/// ```
/// use school_reports::aggregation::{aggregate_fee_collection, FeeScope, StatusFilter};
/// use school_reports::models::{ReportInputs, ReportMonth};
/// use rust_decimal::Decimal;
///
/// let inputs: ReportInputs = serde_json::from_str(r#"{
///     "students": [{"id": 1, "name": "Amina", "class_id": 101}],
///     "classes": [{"id": 101, "name": "Grade 1-A", "level": "Primary"}],
///     "transactions": [
///         {"id": "t1", "category": "income", "reference_id": 1, "amount": 50, "date": "2025-03-04"}
///     ]
/// }"#).unwrap();
///
/// let month = ReportMonth::new(2025, 3).unwrap();
/// let report = aggregate_fee_collection(&inputs, &FeeScope::All, StatusFilter::All, month);
///
/// assert_eq!(report.summary.paid_count, 1);
/// assert_eq!(report.summary.total_collected, Decimal::from(50));
/// assert_eq!(report.summary.collection_rate, Decimal::from(100));
/// ```
pub fn aggregate_fee_collection(
    inputs: &ReportInputs,
    scope: &FeeScope,
    status: StatusFilter,
    month: ReportMonth,
) -> FeeCollectionReport {
    let classes = class_lookup(&inputs.classes);

    let roster: Vec<EnrolledStudent<'_>> = inputs
        .students
        .iter()
        .filter(|s| s.is_enrolled())
        .map(|s| EnrolledStudent::resolve(s, &classes))
        .filter(|s| scope.includes(s))
        .collect();

    let index = PartyIndex::new(&roster, TitleMatching::CaseInsensitive);
    let mut payments: Vec<(&EnrolledStudent<'_>, &FinanceTransaction, MatchKind)> = Vec::new();
    let mut warnings = Vec::new();
    let mut unmatched_payments = 0;

    for tx in inputs.transactions.iter().filter(|tx| is_fee_payment(tx, month)) {
        match index.resolve(tx.reference_id.as_deref(), tx.title.as_deref()) {
            Resolution::Matched { party, kind } => payments.push((party, tx, kind)),
            Resolution::Ambiguous { candidates } => {
                warnings.push(ReportWarning::ambiguous_title(
                    &tx.id,
                    tx.title.as_deref().unwrap_or_default(),
                    candidates,
                ));
                unmatched_payments += 1;
            }
            Resolution::Unmatched => unmatched_payments += 1,
        }
    }

    let payers: HashSet<&str> = payments
        .iter()
        .map(|(student, _, _)| student.party_id())
        .collect();

    let mut by_class = FeeGroupAccumulator::default();
    let mut by_level = FeeGroupAccumulator::default();
    let mut paid_count = 0;
    let mut unpaid_list = Vec::new();

    for student in &roster {
        by_class.seed(student.class_name);
        by_level.seed(student.class_level);

        let paid = payers.contains(student.party_id());
        if !status.keeps(paid) {
            continue;
        }

        by_class.record(student.class_name, paid);
        by_level.record(student.class_level, paid);
        if paid {
            paid_count += 1;
        } else {
            unpaid_list.push(student.to_unpaid());
        }
    }

    let mut paid_list: Vec<FeePayment> = if status.keeps(true) {
        payments
            .iter()
            .filter_map(|(student, tx, kind)| {
                Some(FeePayment {
                    transaction_id: tx.id.clone(),
                    student_id: student.student.id.clone(),
                    student_name: student.student.name.clone(),
                    class_name: student.class_name.to_string(),
                    class_level: student.class_level.to_string(),
                    amount: tx.amount,
                    date: tx.date?,
                    match_kind: *kind,
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    paid_list.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.student_name.cmp(&b.student_name))
            .then_with(|| a.transaction_id.cmp(&b.transaction_id))
    });
    unpaid_list.sort_by(|a, b| {
        a.class_name
            .cmp(&b.class_name)
            .then_with(|| a.student_name.cmp(&b.student_name))
            .then_with(|| a.student_id.cmp(&b.student_id))
    });

    let unpaid_count = unpaid_list.len();
    let total_students = paid_count + unpaid_count;
    let total_collected = sum_amounts(paid_list.iter().map(|p| p.amount));

    FeeCollectionReport {
        month,
        scope: scope.clone(),
        status,
        summary: FeeSummary {
            total_students,
            paid_count,
            unpaid_count,
            total_collected,
            collection_rate: percentage(
                Decimal::from(paid_count),
                Decimal::from(total_students),
                PERCENT_DP,
            ),
            unmatched_payments,
        },
        paid_list,
        unpaid_list,
        by_class: by_class.finish(),
        by_level: by_level.finish(),
        warnings,
    }
}
