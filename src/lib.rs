//! School Reports Engine
//!
//! This crate aggregates a school's roster and finance records into fee
//! collection, expense and payroll reports, and serves them over HTTP.

#![warn(missing_docs)]

pub mod aggregation;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
