use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::intake::AssessmentRequest;
use super::repository::AssessmentRepository;
use super::service::{AssessmentServiceError, RiskAssessmentService};

/// Router exposing assessment intake, history, and summary endpoints.
pub fn assessment_router<R>(service: Arc<RiskAssessmentService<R>>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments",
            get(history_handler::<R>)
                .post(submit_handler::<R>)
                .delete(clear_handler::<R>),
        )
        .route("/api/v1/assessments/summary", get(summary_handler::<R>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<RiskAssessmentService<R>>>,
    payload: Result<axum::Json<AssessmentRequest>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let axum::Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => return unprocessable(rejection.body_text()),
    };

    match service.submit(request) {
        Ok(assessment) => (StatusCode::CREATED, axum::Json(assessment)).into_response(),
        Err(AssessmentServiceError::Validation(error)) => unprocessable(error.to_string()),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<RiskAssessmentService<R>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.history() {
        Ok(history) => (StatusCode::OK, axum::Json(history)).into_response(),
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn clear_handler<R>(
    State(service): State<Arc<RiskAssessmentService<R>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.clear_history() {
        Ok(cleared) => (StatusCode::OK, axum::Json(json!({ "cleared": cleared }))).into_response(),
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<RiskAssessmentService<R>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.summary() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => internal_error(error),
    }
}

fn unprocessable(message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

fn internal_error(error: AssessmentServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
