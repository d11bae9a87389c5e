use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::assessment::intake::AssessmentRequest;
use crate::assessment::repository::AssessmentRepository;
use crate::assessment::RiskAssessmentService;

fn post_json(payload: &Value) -> Request<Body> {
    Request::post("/api/v1/assessments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn submit_route_creates_an_assessment() {
    let (service, log) = build_service();
    let router = assessment_router_with_service(service);

    let response = router
        .oneshot(post_json(&valid_payload()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["name"], json!("Ana Executiva"));
    assert_eq!(payload["riskScore"], json!(17.8));
    assert_eq!(payload["classification"]["level"], json!("VERY_LOW"));
    assert_eq!(payload["classification"]["colorCode"], json!("#28a745"));
    assert_eq!(payload["recommendation"]["decision"], json!("APPROVED"));
    assert_eq!(payload["recommendation"]["limit"], json!(50000.0));
    assert_eq!(payload["scoreSource"], json!("fuzzy_inference"));
    assert_eq!(payload["inputsSnapshot"]["historyScore"], json!(9.0));
    assert!(payload["timestamp"].as_str().is_some_and(|stamp| stamp.len() == 19));
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn submit_route_accepts_numeric_strings() {
    let (service, _) = build_service();
    let router = assessment_router_with_service(service);
    let mut payload = valid_payload();
    payload["income"] = json!("12000");
    payload["debtRatio"] = json!("20");

    let response = router.oneshot(post_json(&payload)).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["riskScore"], json!(17.8));
}

#[tokio::test]
async fn submit_handler_rejects_non_numeric_fields() {
    let (service, log) = build_service();
    let service = Arc::new(service);
    let mut payload = valid_payload();
    payload["age"] = json!("thirty");
    let request: AssessmentRequest = serde_json::from_value(payload).unwrap();

    let response =
        crate::assessment::router::submit_handler(State(service), Ok(axum::Json(request))).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().unwrap_or_default().contains("age"));
    assert!(log.is_empty());
}

#[tokio::test]
async fn submit_route_answers_mistyped_payloads_with_a_json_error() {
    let (service, log) = build_service();
    let router = assessment_router_with_service(service);
    let mut payload = valid_payload();
    payload["name"] = json!(5);

    let response = router
        .clone()
        .oneshot(post_json(&payload))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().is_some_and(|message| !message.is_empty()));

    let malformed = Request::post("/api/v1/assessments")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": \"Ana\","))
        .unwrap();
    let response = router.oneshot(malformed).await.expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().is_some());
    assert!(log.is_empty());
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(RiskAssessmentService::new(
        engine(),
        Arc::new(UnavailableRepository),
    ));
    let request: AssessmentRequest = serde_json::from_value(valid_payload()).unwrap();

    let response =
        crate::assessment::router::submit_handler(State(service), Ok(axum::Json(request))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn history_route_lists_most_recent_last() {
    let (service, _) = build_service();
    service.evaluate(&executive()).unwrap();
    service.evaluate(&unemployed()).unwrap();
    let router = assessment_router_with_service(service);

    let response = router
        .oneshot(Request::get("/api/v1/assessments").body(Body::empty()).unwrap())
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let names: Vec<_> = body
        .as_array()
        .expect("array payload")
        .iter()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Ana Executiva", "Roberto Desempregado"]);
}

#[tokio::test]
async fn clear_route_reports_removed_entries() {
    let (service, log) = build_service();
    service.evaluate(&executive()).unwrap();
    let router = assessment_router_with_service(service);

    let response = router
        .oneshot(
            Request::delete("/api/v1/assessments")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!({ "cleared": 1 }));
    assert!(log.history().unwrap().is_empty());
}

#[tokio::test]
async fn summary_route_reports_band_counts() {
    let (service, _) = build_service();
    service.evaluate(&executive()).unwrap();
    service.evaluate(&unemployed()).unwrap();
    let router = assessment_router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/assessments/summary")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["count"], json!(2));
    assert_eq!(body["bands"][0]["level"], json!("VERY_LOW"));
    assert_eq!(body["bands"][0]["count"], json!(1));
    assert_eq!(body["bands"][4]["count"], json!(1));
}

#[tokio::test]
async fn history_handler_returns_internal_error_when_log_unavailable() {
    let service = Arc::new(RiskAssessmentService::new(
        engine(),
        Arc::new(UnavailableRepository),
    ));

    let response = crate::assessment::router::history_handler(State(service)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
