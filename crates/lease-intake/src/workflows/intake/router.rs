use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ApplicantRecord, VehiclePreferenceRecord};
use super::service::{IntakeServiceError, IntakeWorkflowService, StepOutcome};
use super::session::{AuditLog, RepositoryError, SessionId, SessionRepository};

/// Router builder exposing the intake form steps over HTTP.
pub fn intake_router<R, A>(service: Arc<IntakeWorkflowService<R, A>>) -> Router
where
    R: SessionRepository + 'static,
    A: AuditLog + 'static,
{
    Router::new()
        .route("/api/v1/intake/sessions", post(start_handler::<R, A>))
        .route(
            "/api/v1/intake/sessions/:session_id",
            get(session_handler::<R, A>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/applicant",
            post(applicant_handler::<R, A>),
        )
        .route(
            "/api/v1/intake/sessions/:session_id/vehicle-preference",
            post(vehicle_handler::<R, A>),
        )
        .with_state(service)
}

pub(crate) async fn start_handler<R, A>(
    State(service): State<Arc<IntakeWorkflowService<R, A>>>,
) -> Response
where
    R: SessionRepository + 'static,
    A: AuditLog + 'static,
{
    match service.start_session() {
        Ok(session) => (StatusCode::CREATED, Json(session.summary_view())).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn session_handler<R, A>(
    State(service): State<Arc<IntakeWorkflowService<R, A>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    A: AuditLog + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, Json(session.summary_view())).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn applicant_handler<R, A>(
    State(service): State<Arc<IntakeWorkflowService<R, A>>>,
    Path(session_id): Path<String>,
    Json(record): Json<ApplicantRecord>,
) -> Response
where
    R: SessionRepository + 'static,
    A: AuditLog + 'static,
{
    outcome_response(service.submit_applicant(&SessionId(session_id), record))
}

pub(crate) async fn vehicle_handler<R, A>(
    State(service): State<Arc<IntakeWorkflowService<R, A>>>,
    Path(session_id): Path<String>,
    Json(record): Json<VehiclePreferenceRecord>,
) -> Response
where
    R: SessionRepository + 'static,
    A: AuditLog + 'static,
{
    outcome_response(service.submit_vehicle_preference(&SessionId(session_id), record))
}

fn outcome_response(result: Result<StepOutcome, IntakeServiceError>) -> Response {
    match result {
        Ok(outcome) if outcome.is_accepted() => (StatusCode::OK, Json(outcome)).into_response(),
        Ok(outcome) => (StatusCode::UNPROCESSABLE_ENTITY, Json(outcome)).into_response(),
        Err(other) => error_response(other),
    }
}

fn error_response(error: IntakeServiceError) -> Response {
    let status = match &error {
        IntakeServiceError::StepOutOfOrder { .. } => StatusCode::CONFLICT,
        IntakeServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        IntakeServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        IntakeServiceError::Repository(RepositoryError::Unavailable(_))
        | IntakeServiceError::Audit(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &error {
        IntakeServiceError::StepOutOfOrder { required, .. } => json!({
            "error": error.to_string(),
            "required_step": required,
            "redirect": required.route(),
        }),
        _ => json!({ "error": error.to_string() }),
    };
    (status, Json(payload)).into_response()
}
