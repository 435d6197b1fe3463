//! Payroll reporting.
//!
//! Salary transactions of one month are resolved to staff members to find
//! the role each payment was for. Resolution tries the reference id, then an
//! exact title match; anything unresolved falls back to the transaction's
//! own `type` and finally to [`DEFAULT_STAFF_ROLE`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    FinanceTransaction, MatchKind, ReportInputs, ReportMonth, ReportWarning, StaffMember,
    TransactionCategory,
};

use super::matching::{PartyIndex, Resolution, TitleMatching};
use super::rounding::{MONEY_DP, average, sum_amounts};

/// Role used when neither the staff record nor the transaction names one.
pub const DEFAULT_STAFF_ROLE: &str = "Staff";
/// Name used when the payee cannot be identified at all.
pub const UNKNOWN_STAFF: &str = "Unknown Staff";

/// One salary payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    /// The salary transaction.
    pub transaction_id: String,
    /// The staff member paid, when resolved.
    pub staff_id: Option<String>,
    /// The staff member's name.
    pub staff_name: String,
    /// The resolved role.
    pub role: String,
    /// The amount paid.
    pub amount: Decimal,
    /// The payment date.
    pub date: NaiveDate,
    /// How the payment was tied to the staff member.
    pub match_kind: MatchKind,
}

/// Payroll figures for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePayrollSummary {
    /// The role.
    pub role: String,
    /// Number of payments.
    pub count: usize,
    /// Total paid.
    pub amount: Decimal,
}

/// Headline figures of a payroll report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// Sum of the kept payments.
    pub total_paid: Decimal,
    /// Number of kept payments.
    pub staff_count: usize,
    /// `total_paid / staff_count`, rounded to cents.
    pub avg_salary: Decimal,
}

/// The complete payroll report for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollReport {
    /// The month reported on.
    pub month: ReportMonth,
    /// The role filter applied, if any.
    pub role_filter: Option<String>,
    /// Headline figures.
    pub summary: PayrollSummary,
    /// Kept payments, newest first.
    pub entries: Vec<PayrollEntry>,
    /// Figures per role, largest first.
    pub by_role: Vec<RolePayrollSummary>,
    /// Transactions that could not be attributed with confidence.
    pub warnings: Vec<ReportWarning>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn resolve_entry(
    tx: &FinanceTransaction,
    date: NaiveDate,
    index: &PartyIndex<'_, StaffMember>,
    warnings: &mut Vec<ReportWarning>,
) -> PayrollEntry {
    let staff = match index.resolve(tx.reference_id.as_deref(), tx.title.as_deref()) {
        Resolution::Matched { party, kind } => Some((party, kind)),
        Resolution::Ambiguous { candidates } => {
            warnings.push(ReportWarning::ambiguous_title(
                &tx.id,
                tx.title.as_deref().unwrap_or_default(),
                candidates,
            ));
            None
        }
        Resolution::Unmatched => None,
    };

    let fallback_role = non_blank(tx.kind.as_deref()).unwrap_or(DEFAULT_STAFF_ROLE);
    let title = non_blank(tx.title.as_deref());

    match staff {
        Some((member, kind)) => PayrollEntry {
            transaction_id: tx.id.clone(),
            staff_id: Some(member.id.clone()),
            staff_name: non_blank(Some(member.name.as_str()))
                .or(title)
                .unwrap_or(UNKNOWN_STAFF)
                .to_string(),
            role: non_blank(member.role.as_deref())
                .unwrap_or(fallback_role)
                .to_string(),
            amount: tx.amount,
            date,
            match_kind: kind,
        },
        None => PayrollEntry {
            transaction_id: tx.id.clone(),
            staff_id: None,
            staff_name: title.unwrap_or(UNKNOWN_STAFF).to_string(),
            role: fallback_role.to_string(),
            amount: tx.amount,
            date,
            match_kind: MatchKind::Unmatched,
        },
    }
}

/// Builds the payroll report for a month, optionally for one role.
///
/// The role filter compares case-insensitively against the resolved role
/// and applies before any totals are taken, so the average only covers the
/// kept payments.
///
/// # Example
///
/// ```
/// use school_reports::aggregation::aggregate_payroll;
/// use school_reports::models::{ReportInputs, ReportMonth};
/// use rust_decimal::Decimal;
///
/// let inputs: ReportInputs = serde_json::from_str(r#"{
///     "staff": [{"id": 3, "name": "Grace Okafor", "role": "Teacher"}],
///     "transactions": [
///         {"id": "s1", "category": "salary", "reference_id": 3, "amount": 1200, "date": "2025-03-28"}
///     ]
/// }"#).unwrap();
///
/// let report = aggregate_payroll(&inputs, ReportMonth::new(2025, 3).unwrap(), None);
/// assert_eq!(report.entries[0].role, "Teacher");
/// assert_eq!(report.summary.avg_salary, Decimal::from(1200));
/// ```
pub fn aggregate_payroll(
    inputs: &ReportInputs,
    month: ReportMonth,
    role: Option<&str>,
) -> PayrollReport {
    let role_filter = non_blank(role);
    let index = PartyIndex::new(&inputs.staff, TitleMatching::Exact);
    let mut warnings = Vec::new();

    let mut entries: Vec<PayrollEntry> = inputs
        .transactions
        .iter()
        .filter(|tx| tx.category == TransactionCategory::Salary)
        .filter_map(|tx| {
            let date = tx.date.filter(|d| month.contains_date(*d))?;
            Some(resolve_entry(tx, date, &index, &mut warnings))
        })
        .filter(|entry| role_filter.is_none_or(|wanted| entry.role.eq_ignore_ascii_case(wanted)))
        .collect();

    entries.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.staff_name.cmp(&b.staff_name))
            .then_with(|| a.transaction_id.cmp(&b.transaction_id))
    });

    let mut roles: BTreeMap<&str, RolePayrollSummary> = BTreeMap::new();
    for entry in &entries {
        let summary = roles
            .entry(entry.role.as_str())
            .or_insert_with(|| RolePayrollSummary {
                role: entry.role.clone(),
                count: 0,
                amount: Decimal::ZERO,
            });
        summary.count += 1;
        summary.amount = summary.amount.saturating_add(entry.amount);
    }
    let mut by_role: Vec<RolePayrollSummary> = roles.into_values().collect();
    by_role.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.role.cmp(&b.role)));

    let total_paid = sum_amounts(entries.iter().map(|e| e.amount));
    let staff_count = entries.len();

    PayrollReport {
        month,
        role_filter: role_filter.map(str::to_string),
        summary: PayrollSummary {
            total_paid,
            staff_count,
            avg_salary: average(total_paid, staff_count, MONEY_DP),
        },
        entries,
        by_role,
        warnings,
    }
}
