//! Configuration types for the School Reports Engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::path::PathBuf;

use serde::Deserialize;

use crate::aggregation::DEFAULT_EXPENSE_WINDOW_DAYS;

/// Metadata about the school the reports are for.
///
/// Stamped onto every report envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SchoolMetadata {
    /// The school's display name.
    pub name: String,
    /// ISO 4217 code of the currency amounts are recorded in.
    pub currency: String,
}

/// Report tuning from reports.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// Days the expense report averages over when its range is open-ended.
    #[serde(default = "default_expense_window_days")]
    pub expense_window_days: u32,
}

fn default_expense_window_days() -> u32 {
    DEFAULT_EXPENSE_WINDOW_DAYS
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            expense_window_days: DEFAULT_EXPENSE_WINDOW_DAYS,
        }
    }
}

/// HTTP server settings from server.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret expected in the `Authorization: Bearer` header.
    pub api_token: String,
    /// Directory holding `<resource>.json` record collections.
    pub data_dir: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ServerSettings {
    /// The `host:port` address to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The complete configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct SchoolConfig {
    /// School metadata.
    school: SchoolMetadata,
    /// Report tuning.
    reports: ReportSettings,
    /// Server settings.
    server: ServerSettings,
}

impl SchoolConfig {
    /// Creates a new SchoolConfig from its component parts.
    pub fn new(school: SchoolMetadata, reports: ReportSettings, server: ServerSettings) -> Self {
        Self {
            school,
            reports,
            server,
        }
    }

    /// Returns the school metadata.
    pub fn school(&self) -> &SchoolMetadata {
        &self.school
    }

    /// Returns the report settings.
    pub fn reports(&self) -> &ReportSettings {
        &self.reports
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerSettings {
        &self.server
    }

    pub(crate) fn server_mut(&mut self) -> &mut ServerSettings {
        &mut self.server
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_settings_default_window() {
        let settings: ReportSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings.expense_window_days, 30);
        assert_eq!(ReportSettings::default().expense_window_days, 30);
    }

    #[test]
    fn test_server_settings_defaults() {
        let yaml = "api_token: secret\ndata_dir: ./data/sample\n";
        let server: ServerSettings = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(server.bind_address(), "127.0.0.1:8080");
        assert_eq!(server.data_dir, PathBuf::from("./data/sample"));
    }

    #[test]
    fn test_server_settings_require_token() {
        let result: Result<ServerSettings, _> = serde_yaml::from_str("data_dir: ./data\n");
        assert!(result.is_err());
    }
}
