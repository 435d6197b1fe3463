//! Shared report output models.
//!
//! This module contains the pieces every report uses: how a transaction was
//! tied to a person ([`MatchKind`]), warnings raised along the way
//! ([`ReportWarning`]), and the [`ReportEnvelope`] that stamps a finished
//! report with an id and timestamp for delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a transaction was tied to a student or staff member.
///
/// # Example
///
/// ```
/// use school_reports::models::MatchKind;
///
/// assert!(MatchKind::Reference.is_exact());
/// assert!(!MatchKind::Title.is_exact());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The transaction's reference id named the person.
    Reference,
    /// Best effort: the transaction's title equals the person's name.
    Title,
    /// No person matched; values came from the transaction itself.
    Unmatched,
}

impl MatchKind {
    /// Returns true if the match came from an explicit reference id.
    pub fn is_exact(&self) -> bool {
        matches!(self, MatchKind::Reference)
    }
}

/// Warning code for a title shared by more than one candidate.
pub const AMBIGUOUS_TITLE_MATCH: &str = "AMBIGUOUS_TITLE_MATCH";

/// A warning generated while building a report.
///
/// Warnings flag records the report could not use with confidence. They
/// never change the report's totals on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The transaction the warning concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl ReportWarning {
    /// Creates a warning for a transaction whose title matched several
    /// candidates.
    pub fn ambiguous_title(transaction_id: &str, title: &str, candidates: usize) -> Self {
        Self {
            code: AMBIGUOUS_TITLE_MATCH.to_string(),
            message: format!(
                "Title '{}' matches {} records; transaction not attributed",
                title, candidates
            ),
            transaction_id: Some(transaction_id.to_string()),
        }
    }
}

/// A finished report stamped for delivery.
///
/// The report body is deterministic; the envelope carries everything that
/// is not (id, timestamp, timing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope<T> {
    /// Unique identifier for this report run.
    pub report_id: Uuid,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Version of the engine that produced the report.
    pub engine_version: String,
    /// Name of the school the report belongs to.
    pub school: String,
    /// Currency code amounts are expressed in.
    pub currency: String,
    /// Time spent aggregating, in microseconds.
    pub duration_us: u64,
    /// The report itself.
    pub report: T,
}

impl<T> ReportEnvelope<T> {
    /// Wraps a report, stamping it with a fresh id and the current time.
    pub fn new(
        school: impl Into<String>,
        currency: impl Into<String>,
        duration_us: u64,
        report: T,
    ) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            school: school.into(),
            currency: currency.into(),
            duration_us,
            report,
        }
    }
}
