//! Expense reporting.
//!
//! Expense transactions inside a date range are totalled, averaged per day
//! and broken down by their sub-category (the transaction `type`).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DateRange, FinanceTransaction, ReportInputs, TransactionCategory};

use super::rounding::{MONEY_DP, PERCENT_DP, average, percentage, sum_amounts};

/// Days averaged over when the range is not bounded on both sides.
pub const DEFAULT_EXPENSE_WINDOW_DAYS: u32 = 30;

/// Which expenses a report covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseFilter {
    /// The inclusive date range.
    pub range: DateRange,
    /// Only expenses of this sub-category, when set.
    pub expense_type: Option<String>,
    /// Days used for the daily average when the range is open-ended.
    pub fallback_window_days: u32,
}

impl ExpenseFilter {
    /// Creates a filter with the default averaging window.
    ///
    /// A blank `expense_type` means no type filter.
    pub fn new(range: DateRange, expense_type: Option<&str>) -> Self {
        Self {
            range,
            expense_type: expense_type
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            fallback_window_days: DEFAULT_EXPENSE_WINDOW_DAYS,
        }
    }

    /// Overrides the averaging window used for open-ended ranges.
    pub fn with_fallback_window(mut self, days: u32) -> Self {
        self.fallback_window_days = days;
        self
    }

    fn keeps(&self, tx: &FinanceTransaction) -> bool {
        tx.category == TransactionCategory::Expense
            && self.range.contains(tx.date)
            && self
                .expense_type
                .as_deref()
                .is_none_or(|wanted| tx.sub_category() == wanted)
    }

    fn day_count(&self) -> u32 {
        self.range.day_count().unwrap_or(self.fallback_window_days)
    }
}

/// Spending on one expense sub-category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseCategoryBreakdown {
    /// The sub-category.
    pub name: String,
    /// Total spent on it.
    pub amount: Decimal,
    /// Share of the report total, one decimal place.
    pub percentage: Decimal,
    /// Number of transactions.
    pub count: usize,
}

/// Headline figures of an expense report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    /// Sum of the kept expenses.
    pub total: Decimal,
    /// `total / day_count`, rounded to cents.
    pub avg_daily: Decimal,
    /// Days the average is taken over.
    pub day_count: u32,
    /// Number of kept expenses.
    pub transaction_count: usize,
}

/// One kept expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLine {
    /// The transaction id.
    pub transaction_id: String,
    /// The sub-category.
    pub expense_type: String,
    /// The free-text title, if any.
    pub title: Option<String>,
    /// The amount spent.
    pub amount: Decimal,
    /// The transaction date, if recorded.
    pub date: Option<NaiveDate>,
}

impl From<&FinanceTransaction> for ExpenseLine {
    fn from(tx: &FinanceTransaction) -> Self {
        Self {
            transaction_id: tx.id.clone(),
            expense_type: tx.sub_category().to_string(),
            title: tx.title.clone(),
            amount: tx.amount,
            date: tx.date,
        }
    }
}

/// The complete expense report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseReport {
    /// The date range reported on.
    pub range: DateRange,
    /// The sub-category filter applied, if any.
    pub expense_type: Option<String>,
    /// Headline figures.
    pub summary: ExpenseSummary,
    /// Spending per sub-category, largest first.
    pub by_category: Vec<ExpenseCategoryBreakdown>,
    /// Kept expenses, newest first.
    pub transactions: Vec<ExpenseLine>,
}

#[derive(Debug, Default)]
struct CategoryTally {
    amount: Decimal,
    count: usize,
}

/// Newest first with undated lines last, then by id.
fn newest_first(a: &ExpenseLine, b: &ExpenseLine) -> Ordering {
    match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.transaction_id.cmp(&b.transaction_id))
}

/// Builds the expense report for a filter.
///
/// # Example
///
/// ```
/// use school_reports::aggregation::{aggregate_expenses, ExpenseFilter};
/// use school_reports::models::{DateRange, ReportInputs};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let inputs: ReportInputs = serde_json::from_str(r#"{
///     "transactions": [
///         {"id": 1, "category": "expense", "type": "Supplies", "amount": 300, "date": "2025-03-02"},
///         {"id": 2, "category": "expense", "type": "Utilities", "amount": 100, "date": "2025-03-09"}
///     ]
/// }"#).unwrap();
///
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2025, 3, 1),
///     NaiveDate::from_ymd_opt(2025, 3, 31),
/// ).unwrap();
/// let report = aggregate_expenses(&inputs, &ExpenseFilter::new(range, None));
///
/// assert_eq!(report.summary.total, Decimal::from(400));
/// assert_eq!(report.by_category[0].name, "Supplies");
/// assert_eq!(report.by_category[0].percentage.to_string(), "75.0");
/// ```
pub fn aggregate_expenses(inputs: &ReportInputs, filter: &ExpenseFilter) -> ExpenseReport {
    let mut transactions: Vec<ExpenseLine> = inputs
        .transactions
        .iter()
        .filter(|tx| filter.keeps(tx))
        .map(ExpenseLine::from)
        .collect();
    transactions.sort_by(newest_first);

    let total = sum_amounts(transactions.iter().map(|line| line.amount));
    let day_count = filter.day_count();

    let by_category = if total.is_zero() {
        Vec::new()
    } else {
        let mut tallies: BTreeMap<&str, CategoryTally> = BTreeMap::new();
        for line in &transactions {
            let tally = tallies.entry(line.expense_type.as_str()).or_default();
            tally.amount = tally.amount.saturating_add(line.amount);
            tally.count += 1;
        }

        let mut breakdown: Vec<ExpenseCategoryBreakdown> = tallies
            .into_iter()
            .map(|(name, tally)| ExpenseCategoryBreakdown {
                name: name.to_string(),
                amount: tally.amount,
                percentage: percentage(tally.amount, total, PERCENT_DP),
                count: tally.count,
            })
            .collect();
        breakdown.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name)));
        breakdown
    };

    ExpenseReport {
        range: filter.range,
        expense_type: filter.expense_type.clone(),
        summary: ExpenseSummary {
            total,
            avg_daily: average(total, day_count.max(1) as usize, MONEY_DP),
            day_count,
            transaction_count: transactions.len(),
        },
        by_category,
        transactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNCATEGORIZED;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn expense(id: &str, kind: Option<&str>, amount: &str, date: Option<&str>) -> FinanceTransaction {
        FinanceTransaction {
            id: id.to_string(),
            category: TransactionCategory::Expense,
            kind: kind.map(str::to_string),
            amount: dec(amount),
            date: date.map(day),
            reference_id: None,
            title: None,
        }
    }

    fn march() -> DateRange {
        DateRange::new(Some(day("2025-03-01")), Some(day("2025-03-31"))).unwrap()
    }

    fn inputs(transactions: Vec<FinanceTransaction>) -> ReportInputs {
        ReportInputs {
            transactions,
            ..Default::default()
        }
    }

    // ==========================================================================
    // Scenario C: breakdown shares and daily average
    // ==========================================================================
    #[test]
    fn test_two_category_breakdown() {
        let data = inputs(vec![
            expense("1", Some("Supplies"), "100", Some("2025-03-02")),
            expense("2", Some("Utilities"), "300", Some("2025-03-09")),
        ]);

        let report = aggregate_expenses(&data, &ExpenseFilter::new(march(), None));

        assert_eq!(report.summary.total, dec("400"));
        assert_eq!(report.summary.day_count, 31);
        assert_eq!(report.summary.avg_daily, dec("12.90"));
        assert_eq!(report.summary.transaction_count, 2);
        assert_eq!(report.by_category.len(), 2);
        assert_eq!(report.by_category[0].name, "Utilities");
        assert_eq!(report.by_category[0].amount, dec("300"));
        assert_eq!(report.by_category[0].percentage, dec("75.0"));
        assert_eq!(report.by_category[1].name, "Supplies");
        assert_eq!(report.by_category[1].percentage, dec("25.0"));
    }

    #[test]
    fn test_non_expense_categories_ignored() {
        let mut income = expense("1", Some("Tuition"), "500", Some("2025-03-02"));
        income.category = TransactionCategory::Income;
        let mut salary = expense("2", Some("Teacher"), "800", Some("2025-03-02"));
        salary.category = TransactionCategory::Salary;

        let report = aggregate_expenses(
            &inputs(vec![income, salary, expense("3", Some("Supplies"), "20", Some("2025-03-03"))]),
            &ExpenseFilter::new(march(), None),
        );

        assert_eq!(report.summary.total, dec("20"));
        assert_eq!(report.summary.transaction_count, 1);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let data = inputs(vec![
            expense("1", None, "10", Some("2025-02-28")),
            expense("2", None, "10", Some("2025-03-01")),
            expense("3", None, "10", Some("2025-03-31")),
            expense("4", None, "10", Some("2025-04-01")),
        ]);

        let report = aggregate_expenses(&data, &ExpenseFilter::new(march(), None));
        assert_eq!(report.summary.transaction_count, 2);
        assert_eq!(report.summary.total, dec("20"));
    }

    #[test]
    fn test_undated_expense_only_in_unbounded_range() {
        let data = inputs(vec![
            expense("1", None, "10", None),
            expense("2", None, "5", Some("2025-03-10")),
        ]);

        let bounded = aggregate_expenses(&data, &ExpenseFilter::new(march(), None));
        assert_eq!(bounded.summary.transaction_count, 1);

        let open = DateRange::new(Some(day("2025-03-01")), None).unwrap();
        let half_open = aggregate_expenses(&data, &ExpenseFilter::new(open, None));
        assert_eq!(half_open.summary.transaction_count, 1);

        let all = aggregate_expenses(&data, &ExpenseFilter::new(DateRange::unbounded(), None));
        assert_eq!(all.summary.transaction_count, 2);
    }

    #[test]
    fn test_open_range_uses_fallback_window() {
        let data = inputs(vec![expense("1", None, "90", Some("2025-03-10"))]);

        let report = aggregate_expenses(&data, &ExpenseFilter::new(DateRange::unbounded(), None));
        assert_eq!(report.summary.day_count, DEFAULT_EXPENSE_WINDOW_DAYS);
        assert_eq!(report.summary.avg_daily, dec("3.00"));

        let weekly = ExpenseFilter::new(DateRange::unbounded(), None).with_fallback_window(7);
        let report = aggregate_expenses(&data, &weekly);
        assert_eq!(report.summary.day_count, 7);
        assert_eq!(report.summary.avg_daily, dec("12.86"));
    }

    #[test]
    fn test_zero_fallback_window_does_not_divide_by_zero() {
        let data = inputs(vec![expense("1", None, "90", Some("2025-03-10"))]);
        let filter = ExpenseFilter::new(DateRange::unbounded(), None).with_fallback_window(0);

        let report = aggregate_expenses(&data, &filter);
        assert_eq!(report.summary.avg_daily, dec("90.00"));
    }

    #[test]
    fn test_type_filter_is_exact_after_trim() {
        let data = inputs(vec![
            expense("1", Some("Supplies"), "30", Some("2025-03-02")),
            expense("2", Some("Utilities"), "70", Some("2025-03-03")),
            expense("3", Some("supplies"), "5", Some("2025-03-04")),
        ]);

        let report = aggregate_expenses(&data, &ExpenseFilter::new(march(), Some("  Supplies ")));
        assert_eq!(report.expense_type.as_deref(), Some("Supplies"));
        assert_eq!(report.summary.transaction_count, 1);
        assert_eq!(report.by_category.len(), 1);
        assert_eq!(report.by_category[0].percentage, dec("100.0"));
    }

    #[test]
    fn test_blank_type_filter_means_all() {
        let filter = ExpenseFilter::new(march(), Some("   "));
        assert!(filter.expense_type.is_none());
    }

    #[test]
    fn test_uncategorized_filter_matches_untyped_expenses() {
        let data = inputs(vec![
            expense("1", None, "30", Some("2025-03-02")),
            expense("2", Some("Supplies"), "70", Some("2025-03-03")),
        ]);

        let report = aggregate_expenses(&data, &ExpenseFilter::new(march(), Some(UNCATEGORIZED)));
        assert_eq!(report.summary.total, dec("30"));
        assert_eq!(report.by_category[0].name, UNCATEGORIZED);
    }

    #[test]
    fn test_zero_total_has_empty_breakdown() {
        let data = inputs(vec![expense("1", Some("Supplies"), "0", Some("2025-03-02"))]);

        let report = aggregate_expenses(&data, &ExpenseFilter::new(march(), None));
        assert_eq!(report.summary.transaction_count, 1);
        assert!(report.by_category.is_empty());
        assert_eq!(report.summary.avg_daily, Decimal::ZERO);
    }

    #[test]
    fn test_breakdown_ties_sorted_by_name() {
        let data = inputs(vec![
            expense("1", Some("Transport"), "50", Some("2025-03-02")),
            expense("2", Some("Books"), "50", Some("2025-03-03")),
        ]);

        let report = aggregate_expenses(&data, &ExpenseFilter::new(march(), None));
        let names: Vec<&str> = report.by_category.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Books", "Transport"]);
    }

    #[test]
    fn test_breakdown_counts_and_amounts() {
        let data = inputs(vec![
            expense("1", Some("Supplies"), "10.25", Some("2025-03-02")),
            expense("2", Some("Supplies"), "4.75", Some("2025-03-05")),
            expense("3", Some("Repairs"), "5", Some("2025-03-06")),
        ]);

        let report = aggregate_expenses(&data, &ExpenseFilter::new(march(), None));
        assert_eq!(report.by_category[0].name, "Supplies");
        assert_eq!(report.by_category[0].amount, dec("15.00"));
        assert_eq!(report.by_category[0].count, 2);
        assert_eq!(report.by_category[0].percentage, dec("75.0"));
    }

    #[test]
    fn test_transactions_newest_first_undated_last() {
        let data = inputs(vec![
            expense("b", None, "1", None),
            expense("a", None, "1", Some("2025-03-01")),
            expense("c", None, "1", Some("2025-03-09")),
            expense("d", None, "1", Some("2025-03-09")),
        ]);

        let report = aggregate_expenses(&data, &ExpenseFilter::new(DateRange::unbounded(), None));
        let ids: Vec<&str> = report
            .transactions
            .iter()
            .map(|t| t.transaction_id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn test_empty_inputs() {
        let report = aggregate_expenses(&ReportInputs::default(), &ExpenseFilter::new(march(), None));

        assert_eq!(report.summary.total, Decimal::ZERO);
        assert_eq!(report.summary.avg_daily, Decimal::ZERO);
        assert_eq!(report.summary.transaction_count, 0);
        assert!(report.by_category.is_empty());
        assert!(report.transactions.is_empty());
    }

    #[test]
    fn test_report_serializes_range_and_amounts_as_strings() {
        let data = inputs(vec![expense("1", Some("Supplies"), "12.5", Some("2025-03-02"))]);
        let report = aggregate_expenses(&data, &ExpenseFilter::new(march(), None));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["range"]["start"], "2025-03-01");
        assert_eq!(json["range"]["end"], "2025-03-31");
        assert_eq!(json["summary"]["total"], "12.5");
        assert_eq!(json["by_category"][0]["percentage"], "100.0");
    }
}
