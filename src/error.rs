//! Error types for the School Reports Engine.
//!
//! Aggregation itself never fails; errors come from the edges of the engine:
//! loading configuration, fetching record collections, and validating report
//! periods before they reach an aggregator.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the School Reports Engine.
///
/// # Example
///
/// ```
/// use school_reports::error::ReportError;
///
/// let error = ReportError::ConfigNotFound {
///     path: "/missing/school.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/school.yaml");
/// ```
#[derive(Debug, Error)]
pub enum ReportError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A report month or year was out of range.
    #[error("Invalid report period: {message}")]
    InvalidPeriod {
        /// A description of what made the period invalid.
        message: String,
    },

    /// A date range whose start falls after its end.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// The start of the range.
        start: NaiveDate,
        /// The end of the range.
        end: NaiveDate,
    },

    /// The record store could not deliver a collection.
    #[error("Failed to fetch '{resource}': {message}")]
    FetchFailed {
        /// The resource that was requested.
        resource: String,
        /// A description of the failure.
        message: String,
    },

    /// The record store delivered something that is not a collection.
    #[error("Malformed '{resource}' collection: {message}")]
    MalformedCollection {
        /// The resource that was requested.
        resource: String,
        /// A description of what was wrong with the payload.
        message: String,
    },
}

impl ReportError {
    /// Returns true if the error originates from the record store rather
    /// than from the request or the local configuration.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ReportError::FetchFailed { .. } | ReportError::MalformedCollection { .. }
        )
    }
}

/// A type alias for Results that return ReportError.
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = ReportError::ConfigNotFound {
            path: "/missing/school.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/school.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = ReportError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_period_displays_message() {
        let error = ReportError::InvalidPeriod {
            message: "month 13 is outside 1-12".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid report period: month 13 is outside 1-12"
        );
    }

    #[test]
    fn test_invalid_date_range_displays_bounds() {
        let error = ReportError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date range: 2025-03-10 is after 2025-03-01"
        );
    }

    #[test]
    fn test_fetch_failed_displays_resource() {
        let error = ReportError::FetchFailed {
            resource: "students".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to fetch 'students': connection refused"
        );
    }

    #[test]
    fn test_upstream_classification() {
        let fetch = ReportError::FetchFailed {
            resource: "finance".to_string(),
            message: "timeout".to_string(),
        };
        let malformed = ReportError::MalformedCollection {
            resource: "finance".to_string(),
            message: "expected an array".to_string(),
        };
        let period = ReportError::InvalidPeriod {
            message: "month 0".to_string(),
        };

        assert!(fetch.is_upstream());
        assert!(malformed.is_upstream());
        assert!(!period.is_upstream());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ReportError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_fetch_failed() -> ReportResult<()> {
            Err(ReportError::FetchFailed {
                resource: "staff".to_string(),
                message: "unavailable".to_string(),
            })
        }

        fn propagates_error() -> ReportResult<()> {
            returns_fetch_failed()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
