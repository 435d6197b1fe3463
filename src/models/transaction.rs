//! Finance transaction records.
//!
//! Every money movement in the dashboard (fee payments, purchases, salaries)
//! is a [`FinanceTransaction`] tagged with a top-level [`TransactionCategory`]
//! and a free-text sub-category.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::lenient;

/// Label used for a transaction whose sub-category is missing or blank.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Top-level kind of a finance transaction.
///
/// Decoding is case-insensitive; any value other than the three known kinds
/// becomes [`TransactionCategory::Other`] and is ignored by every report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    /// Money received, e.g. a fee payment.
    Income,
    /// Money spent on running the school.
    Expense,
    /// Money paid to staff.
    Salary,
    /// Anything else.
    #[default]
    Other,
}

impl TransactionCategory {
    /// Maps a category label to its kind.
    ///
    /// ```
    /// use school_reports::models::TransactionCategory;
    ///
    /// assert_eq!(TransactionCategory::from_label(" Income "), TransactionCategory::Income);
    /// assert_eq!(TransactionCategory::from_label("refund"), TransactionCategory::Other);
    /// ```
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "income" => TransactionCategory::Income,
            "expense" => TransactionCategory::Expense,
            "salary" => TransactionCategory::Salary,
            _ => TransactionCategory::Other,
        }
    }
}

impl<'de> Deserialize<'de> for TransactionCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = lenient::optional_text(deserializer)?;
        Ok(label
            .as_deref()
            .map(TransactionCategory::from_label)
            .unwrap_or_default())
    }
}

/// A single finance transaction.
///
/// # Example
///
/// ```
/// use school_reports::models::{FinanceTransaction, TransactionCategory};
/// use rust_decimal::Decimal;
///
/// let tx: FinanceTransaction = serde_json::from_str(r#"{
///     "id": 9,
///     "category": "expense",
///     "type": "Utilities",
///     "amount": "300",
///     "date": "2025-03-02"
/// }"#).unwrap();
///
/// assert_eq!(tx.category, TransactionCategory::Expense);
/// assert_eq!(tx.amount, Decimal::from(300));
/// assert_eq!(tx.sub_category(), "Utilities");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceTransaction {
    /// Unique identifier for the transaction.
    #[serde(deserialize_with = "lenient::record_id")]
    pub id: String,
    /// The top-level kind of the transaction.
    #[serde(default)]
    pub category: TransactionCategory,
    /// Free-text sub-category, e.g. "Maintenance" or "Teacher".
    #[serde(rename = "type", default, deserialize_with = "lenient::optional_text")]
    pub kind: Option<String>,
    /// The transaction amount; malformed values are coerced to zero.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Decimal,
    /// The date the transaction took place.
    #[serde(default, deserialize_with = "lenient::optional_date")]
    pub date: Option<NaiveDate>,
    /// Id of the student or staff member the transaction concerns.
    #[serde(
        default,
        alias = "referenceId",
        deserialize_with = "lenient::optional_id"
    )]
    pub reference_id: Option<String>,
    /// Free-text title, often the payer's or payee's name.
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub title: Option<String>,
}

impl FinanceTransaction {
    /// Returns the sub-category, or [`UNCATEGORIZED`] when it is missing.
    pub fn sub_category(&self) -> &str {
        self.kind.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Returns true if the transaction is dated within `[start, end]`.
    pub fn is_dated_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.date.is_some_and(|d| d >= start && d <= end)
    }
}
