//! HTTP request handlers for the School Reports API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregation::{aggregate_expenses, aggregate_fee_collection, aggregate_payroll};
use crate::models::{ReportEnvelope, ReportInputs};
use crate::session::ReportBundle;
use crate::store::Resource;

use super::auth::require_bearer_token;
use super::request::{ExpenseReportRequest, FeeReportRequest, OverviewRequest, PayrollReportRequest};
use super::response::{ApiError, ApiErrorResponse, HealthResponse};
use super::state::AppState;

const FEE_RESOURCES: &[Resource] = &[Resource::Students, Resource::Classes, Resource::Finance];
const EXPENSE_RESOURCES: &[Resource] = &[Resource::Finance];
const PAYROLL_RESOURCES: &[Resource] = &[Resource::Finance, Resource::Staff];

/// Creates the API router with all endpoints.
///
/// `/health` is open; every `/reports/*` route requires the bearer token.
pub fn create_router(state: AppState) -> Router {
    let reports = Router::new()
        .route("/reports/fees", post(fee_report_handler))
        .route("/reports/expenses", post(expense_report_handler))
        .route("/reports/payroll", post(payroll_report_handler))
        .route("/reports/overview", post(overview_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(reports)
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a body rejection onto the API's error codes.
fn rejection_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's message, including "missing field"
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error)
}

/// Logs a failed request and converts the error for the response.
fn request_failed(correlation_id: Uuid, error: impl Into<ApiErrorResponse>) -> ApiErrorResponse {
    let response = error.into();
    warn!(
        correlation_id = %correlation_id,
        status = response.status.as_u16(),
        code = %response.error.code,
        message = %response.error.message,
        "Report request failed"
    );
    response
}

/// Fetches the collections a report needs on the blocking thread pool.
async fn load_inputs(
    state: &AppState,
    resources: &'static [Resource],
) -> Result<ReportInputs, ApiErrorResponse> {
    let store = state.store();
    tokio::task::spawn_blocking(move || ReportInputs::fetch(store.as_ref(), resources))
        .await
        .map_err(|e| ApiErrorResponse::internal(format!("record fetch task failed: {}", e)))?
        .map_err(ApiErrorResponse::from)
}

fn elapsed_us(start_time: Instant) -> u64 {
    u64::try_from(start_time.elapsed().as_micros()).unwrap_or(u64::MAX)
}

fn envelope<T>(state: &AppState, duration_us: u64, report: T) -> ReportEnvelope<T> {
    let school = state.config().school();
    ReportEnvelope::new(&school.name, &school.currency, duration_us, report)
}

/// Handler for GET /health.
async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse::ok())
}

/// Handler for POST /reports/fees.
async fn fee_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<FeeReportRequest>, JsonRejection>,
) -> Result<Response, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing fee report request");

    let Json(request) = payload.map_err(|r| rejection_error(r, correlation_id))?;
    let month = request
        .period()
        .map_err(|e| request_failed(correlation_id, e))?;
    let inputs = load_inputs(&state, FEE_RESOURCES)
        .await
        .map_err(|e| request_failed(correlation_id, e))?;

    let start_time = Instant::now();
    let report = aggregate_fee_collection(&inputs, &request.scope, request.status, month);
    let duration_us = elapsed_us(start_time);

    info!(
        correlation_id = %correlation_id,
        students = report.summary.total_students,
        paid = report.summary.paid_count,
        total_collected = %report.summary.total_collected,
        warnings = report.warnings.len(),
        duration_us,
        "Fee report generated"
    );
    Ok(json_response(
        StatusCode::OK,
        envelope(&state, duration_us, report),
    ))
}

/// Handler for POST /reports/expenses.
async fn expense_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExpenseReportRequest>, JsonRejection>,
) -> Result<Response, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing expense report request");

    let Json(request) = payload.map_err(|r| rejection_error(r, correlation_id))?;
    let range = request
        .range()
        .map_err(|e| request_failed(correlation_id, e))?;
    let filter = state
        .config()
        .expense_filter(range, request.expense_type.as_deref());
    let inputs = load_inputs(&state, EXPENSE_RESOURCES)
        .await
        .map_err(|e| request_failed(correlation_id, e))?;

    let start_time = Instant::now();
    let report = aggregate_expenses(&inputs, &filter);
    let duration_us = elapsed_us(start_time);

    info!(
        correlation_id = %correlation_id,
        transactions = report.summary.transaction_count,
        total = %report.summary.total,
        duration_us,
        "Expense report generated"
    );
    Ok(json_response(
        StatusCode::OK,
        envelope(&state, duration_us, report),
    ))
}

/// Handler for POST /reports/payroll.
async fn payroll_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollReportRequest>, JsonRejection>,
) -> Result<Response, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll report request");

    let Json(request) = payload.map_err(|r| rejection_error(r, correlation_id))?;
    let month = request
        .period()
        .map_err(|e| request_failed(correlation_id, e))?;
    let inputs = load_inputs(&state, PAYROLL_RESOURCES)
        .await
        .map_err(|e| request_failed(correlation_id, e))?;

    let start_time = Instant::now();
    let report = aggregate_payroll(&inputs, month, request.role.as_deref());
    let duration_us = elapsed_us(start_time);

    info!(
        correlation_id = %correlation_id,
        entries = report.summary.staff_count,
        total_paid = %report.summary.total_paid,
        warnings = report.warnings.len(),
        duration_us,
        "Payroll report generated"
    );
    Ok(json_response(
        StatusCode::OK,
        envelope(&state, duration_us, report),
    ))
}

/// Handler for POST /reports/overview.
///
/// Fetches every collection once and builds all three reports for the month.
async fn overview_handler(
    State(state): State<AppState>,
    payload: Result<Json<OverviewRequest>, JsonRejection>,
) -> Result<Response, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing overview request");

    let Json(request) = payload.map_err(|r| rejection_error(r, correlation_id))?;
    let filters = request
        .filters()
        .map_err(|e| request_failed(correlation_id, e))?;
    let inputs = load_inputs(&state, &ReportBundle::RESOURCES)
        .await
        .map_err(|e| request_failed(correlation_id, e))?;

    let start_time = Instant::now();
    let bundle = ReportBundle::build(
        &inputs,
        &filters,
        state.config().reports().expense_window_days,
    );
    let duration_us = elapsed_us(start_time);

    info!(
        correlation_id = %correlation_id,
        collected = %bundle.fees.summary.total_collected,
        spent = %bundle.expenses.summary.total,
        paid_out = %bundle.payroll.summary.total_paid,
        duration_us,
        "Overview generated"
    );
    Ok(json_response(
        StatusCode::OK,
        envelope(&state, duration_us, bundle),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::store::InMemoryStore;
    use axum::{body::Body, http::Request};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn create_test_state(store: InMemoryStore) -> AppState {
        let config = ConfigLoader::load("./config/school")
            .expect("Failed to load config")
            .with_api_token("test-token");
        AppState::new(config, store)
    }

    fn fee_store() -> InMemoryStore {
        InMemoryStore::new()
            .with(
                Resource::Students,
                json!([{"id": 1, "name": "Amina Yusuf", "class_id": 101}]),
            )
            .with(
                Resource::Classes,
                json!([{"id": 101, "name": "Grade 1-A", "level": "Primary"}]),
            )
            .with(
                Resource::Finance,
                json!([{"id": "t1", "category": "income", "reference_id": 1, "amount": 50, "date": "2025-03-15"}]),
            )
    }

    async fn post_json(router: Router, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let response = router
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_fee_report_returns_envelope() {
        let router = create_router(create_test_state(fee_store()));

        let (status, body) = post_json(
            router,
            "/reports/fees",
            Some("test-token"),
            r#"{"month": 3, "year": 2025}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["school"], "Greenfield Community School");
        assert_eq!(body["currency"], "USD");
        assert_eq!(body["report"]["summary"]["paid_count"], 1);
        assert_eq!(body["report"]["summary"]["total_collected"], "50");
        assert!(body["report_id"].is_string());
    }

    #[tokio::test]
    async fn test_missing_token_returns_401() {
        let router = create_router(create_test_state(fee_store()));

        let (status, body) = post_json(router, "/reports/fees", None, r#"{"month": 3, "year": 2025}"#).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_invalid_month_returns_400() {
        let router = create_router(create_test_state(fee_store()));

        let (status, body) = post_json(
            router,
            "/reports/payroll",
            Some("test-token"),
            r#"{"month": 0, "year": 2025}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PERIOD");
    }

    #[tokio::test]
    async fn test_store_failure_returns_502() {
        let store = fee_store().with_unavailable(Resource::Finance);
        let router = create_router(create_test_state(store));

        let (status, body) = post_json(
            router,
            "/reports/expenses",
            Some("test-token"),
            "{}",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
    }
}
