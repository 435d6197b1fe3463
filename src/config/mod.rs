//! Configuration loading and management for the School Reports Engine.
//!
//! This module loads the school's metadata, report tuning and server
//! settings from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use school_reports::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/school").unwrap();
//! println!("Loaded school: {}", config.school().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{ReportSettings, SchoolConfig, SchoolMetadata, ServerSettings};
