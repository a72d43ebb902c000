//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;

use super::request::{
    DEFAULT_AUTHOR, EmployeeQuery, GeneratePeriodRequest, HistoryQuery, PaymentRequest,
    PayrollRequest, SeveranceRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/calculate", post(calculate_handler))
        .route("/payroll/preview", post(payslip_preview_handler))
        .route("/payroll/entries", post(save_handler))
        .route("/payroll/entries/:id/payments", post(payment_handler))
        .route(
            "/payroll/entries/:id/document",
            get(document_handler).post(regenerate_document_handler),
        )
        .route("/payroll/history", get(history_handler))
        .route("/payroll/periods/generate", post(generate_period_handler))
        .route("/severance/calculate", post(severance_handler))
        .route("/severance/preview", post(settlement_preview_handler))
        .route("/severance/records", get(severance_records_handler))
        .route("/configuration", get(configuration_handler))
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

fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    ApiErrorResponse::from(err).into_response()
}

/// Unwraps a JSON body or turns the rejection into a 400 response.
fn parse_json<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(req)) => return Ok(req),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
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
    Err(ApiErrorResponse::bad_request(error))
}

fn parse_entry_id(
    correlation_id: Uuid,
    id: Result<Path<i64>, PathRejection>,
) -> Result<i64, ApiErrorResponse> {
    id.map(|Path(id)| id).map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection, "Invalid entry id");
        ApiErrorResponse::bad_request(ApiError::validation_error(format!(
            "entry id must be an integer: {}",
            rejection.body_text()
        )))
    })
}

/// Rendered bytes of a document that was never stored.
fn preview_response(content_type: &'static str, file_name: String, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Handler for POST /payroll/calculate.
///
/// Computes a payroll without persisting anything.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll calculation");

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };
    let overrides = match request.overrides() {
        Ok(overrides) => overrides,
        Err(err) => return engine_error(correlation_id, err),
    };

    match state
        .service()
        .calculate(&request.employee_id, request.days_worked, &overrides)
        .await
    {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %result.employee_id,
                period = %result.period,
                net = %result.totals.net,
                duration_us = result.audit_trace.duration_us,
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /payroll/entries.
///
/// Responds 201 when a new version was written and 200 when the current
/// version already matched.
async fn save_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll save");

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };
    let overrides = match request.overrides() {
        Ok(overrides) => overrides,
        Err(err) => return engine_error(correlation_id, err),
    };

    match state
        .service()
        .save(
            &request.employee_id,
            request.days_worked,
            &overrides,
            request.author(),
        )
        .await
    {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                entry_id = outcome.entry.id,
                version = outcome.entry.version,
                created = outcome.created,
                "Payroll saved"
            );
            let status = if outcome.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            json_response(status, outcome)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /payroll/entries/{id}/payments.
async fn payment_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let entry_id = match parse_entry_id(correlation_id, id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };
    info!(correlation_id = %correlation_id, entry_id, "Processing payment");

    let (payment, author) = match parse_json(correlation_id, payload) {
        Ok(request) => request.into_parts(),
        Err(err) => return err.into_response(),
    };

    match state
        .service()
        .register_payment(entry_id, payment, &author)
        .await
    {
        Ok(outcome) => json_response(StatusCode::CREATED, outcome),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /payroll/history.
async fn history_handler(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Invalid history query");
            return ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
                .into_response();
        }
    };
    let period = match query.period() {
        Ok(period) => period,
        Err(err) => return engine_error(correlation_id, err),
    };

    match state.service().history(&query.employee_id, period).await {
        Ok(history) => json_response(StatusCode::OK, history),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /severance/calculate.
async fn severance_handler(
    State(state): State<AppState>,
    payload: Result<Json<SeveranceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing severance calculation");

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    match state
        .service()
        .calculate_severance(
            &request.employee_id,
            request.retirement_date,
            request.reason,
            &request.overrides,
            request.record_as(),
        )
        .await
    {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %result.employee_id,
                total = %result.total,
                "Severance calculated"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /payroll/preview.
///
/// Renders the payslip for a calculation without saving a version.
async fn payslip_preview_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Rendering payslip preview");

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };
    let overrides = match request.overrides() {
        Ok(overrides) => overrides,
        Err(err) => return engine_error(correlation_id, err),
    };

    let service = state.service();
    let result = match service
        .calculate(&request.employee_id, request.days_worked, &overrides)
        .await
    {
        Ok(result) => result,
        Err(err) => return engine_error(correlation_id, err),
    };

    match service.preview_payslip(&result).await {
        Ok(bytes) => preview_response(
            service.document_mime_type(),
            format!(
                "preview_{}_{}.{}",
                result.employee_id,
                result.period,
                service.document_extension()
            ),
            bytes,
        ),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /severance/preview.
///
/// Renders the settlement document; never records the settlement.
async fn settlement_preview_handler(
    State(state): State<AppState>,
    payload: Result<Json<SeveranceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Rendering settlement preview");

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    let service = state.service();
    let settlement = match service
        .calculate_severance(
            &request.employee_id,
            request.retirement_date,
            request.reason,
            &request.overrides,
            None,
        )
        .await
    {
        Ok(settlement) => settlement,
        Err(err) => return engine_error(correlation_id, err),
    };

    match service.preview_settlement(&settlement).await {
        Ok(bytes) => preview_response(
            service.document_mime_type(),
            format!(
                "liquidacion_{}_{}.{}",
                settlement.employee_id,
                settlement.retirement_date,
                service.document_extension()
            ),
            bytes,
        ),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /severance/records.
async fn severance_records_handler(
    State(state): State<AppState>,
    query: Result<Query<EmployeeQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Invalid records query");
            return ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
                .into_response();
        }
    };

    match state.service().severance_records(&query.employee_id).await {
        Ok(records) => json_response(StatusCode::OK, records),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /payroll/entries/{id}/document.
///
/// Streams the stored bytes with the document's own content type.
async fn document_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let entry_id = match parse_entry_id(correlation_id, id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match state.service().document(entry_id).await {
        Ok(document) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, document.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}\"", document.file_name),
                ),
            ],
            document.bytes,
        )
            .into_response(),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /payroll/entries/{id}/document.
async fn regenerate_document_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let entry_id = match parse_entry_id(correlation_id, id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };
    info!(correlation_id = %correlation_id, entry_id, "Regenerating document");

    match state.service().regenerate_document(entry_id).await {
        Ok(entry) => json_response(StatusCode::OK, entry),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /payroll/periods/generate.
async fn generate_period_handler(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePeriodRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };
    let period = match request.period() {
        Ok(period) => period,
        Err(err) => return engine_error(correlation_id, err),
    };
    info!(correlation_id = %correlation_id, %period, "Generating monthly payroll");

    let author = request.author.as_deref().unwrap_or(DEFAULT_AUTHOR);
    match state.service().generate_period(period, author).await {
        Ok(summary) => json_response(StatusCode::OK, summary),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /configuration.
async fn configuration_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().current_configuration().await {
        Ok(Some(configuration)) => json_response(StatusCode::OK, configuration),
        Ok(None) => engine_error(correlation_id, EngineError::ConfigurationMissing),
        Err(err) => engine_error(correlation_id, err),
    }
}
