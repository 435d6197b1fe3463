//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading school
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::aggregation::ExpenseFilter;
use crate::error::{ReportError, ReportResult};
use crate::models::DateRange;

use super::types::{ReportSettings, SchoolConfig, SchoolMetadata, ServerSettings};

/// Loads and provides access to school configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/school/
/// ├── school.yaml   # School name and currency
/// ├── reports.yaml  # Report tuning
/// └── server.yaml   # Bind address, API token, data directory
/// ```
///
/// # Example
///
/// ```no_run
/// use school_reports::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/school").unwrap();
/// println!("Reporting for {}", loader.school().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: SchoolConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let path = path.as_ref();

        let school = Self::load_yaml::<SchoolMetadata>(&path.join("school.yaml"))?;
        let reports = Self::load_yaml::<ReportSettings>(&path.join("reports.yaml"))?;
        let server = Self::load_yaml::<ServerSettings>(&path.join("server.yaml"))?;

        Ok(Self {
            config: SchoolConfig::new(school, reports, server),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: SchoolConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> ReportResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ReportError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ReportError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Replaces the API token, e.g. from an environment variable.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.config.server_mut().api_token = token.into();
        self
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &SchoolConfig {
        &self.config
    }

    /// Returns the school metadata.
    pub fn school(&self) -> &SchoolMetadata {
        self.config.school()
    }

    /// Returns the report settings.
    pub fn reports(&self) -> &ReportSettings {
        self.config.reports()
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerSettings {
        self.config.server()
    }

    /// Builds an expense filter using the configured averaging window.
    pub fn expense_filter(&self, range: DateRange, expense_type: Option<&str>) -> ExpenseFilter {
        ExpenseFilter::new(range, expense_type)
            .with_fallback_window(self.reports().expense_window_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/school"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.school().name, "Greenfield Community School");
        assert_eq!(loader.school().currency, "USD");
        assert_eq!(loader.reports().expense_window_days, 30);
        assert_eq!(loader.server().port, 8080);
    }

    #[test]
    fn test_load_missing_directory() {
        let result = ConfigLoader::load("./config/nonexistent");

        match result {
            Err(ReportError::ConfigNotFound { path }) => {
                assert!(path.ends_with("school.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_token_override() {
        let loader = ConfigLoader::load(config_path())
            .unwrap()
            .with_api_token("from-env");
        assert_eq!(loader.server().api_token, "from-env");
    }

    #[test]
    fn test_expense_filter_uses_configured_window() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let filter = loader.expense_filter(DateRange::unbounded(), Some("Supplies"));

        assert_eq!(filter.fallback_window_days, 30);
        assert_eq!(filter.expense_type.as_deref(), Some("Supplies"));
    }
}
