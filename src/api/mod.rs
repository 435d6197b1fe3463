//! HTTP API module for the School Reports Engine.
//!
//! This module provides the REST API endpoints that serve fee collection,
//! expense and payroll reports over the configured record store.

mod auth;
mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ExpenseReportRequest, FeeReportRequest, OverviewRequest, PayrollReportRequest};
pub use response::{ApiError, ApiErrorResponse, HealthResponse};
pub use state::AppState;
