use std::sync::{Arc, OnceLock};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::assessment::domain::{Assessment, ClientProfile};
use crate::assessment::model::{standard_engine, DEFAULT_RISK_RESOLUTION};
use crate::assessment::repository::{AssessmentLog, AssessmentRepository, RepositoryError};
use crate::assessment::{assessment_router, RiskAssessmentService};
use crate::fuzzy::InferenceEngine;

/// Compiled once per test binary; compilation samples the full output grid.
pub(super) fn engine() -> Arc<InferenceEngine> {
    static ENGINE: OnceLock<Arc<InferenceEngine>> = OnceLock::new();
    ENGINE
        .get_or_init(|| {
            Arc::new(standard_engine(DEFAULT_RISK_RESOLUTION).expect("standard model is valid"))
        })
        .clone()
}

pub(super) fn executive() -> ClientProfile {
    ClientProfile::new("Ana Executiva", 12_000.0, 9.0, 35.0, 8.0, 20.0)
}

pub(super) fn teacher() -> ClientProfile {
    ClientProfile::new("Maria Professora", 5_500.0, 7.0, 40.0, 12.0, 25.0)
}

pub(super) fn student() -> ClientProfile {
    ClientProfile::new("Julia Estudante", 1_500.0, 3.0, 22.0, 1.0, 70.0)
}

pub(super) fn unemployed() -> ClientProfile {
    ClientProfile::new("Roberto Desempregado", 1_200.0, 2.0, 35.0, 0.0, 90.0)
}

pub(super) fn fixed_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .and_then(|date| date.and_hms_opt(9, 30, 5))
        .expect("valid timestamp")
}

pub(super) fn build_service() -> (RiskAssessmentService<AssessmentLog>, Arc<AssessmentLog>) {
    let log = Arc::new(AssessmentLog::new());
    let service = RiskAssessmentService::new(engine(), log.clone());
    (service, log)
}

pub(super) fn assessment_router_with_service(
    service: RiskAssessmentService<AssessmentLog>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) fn valid_payload() -> Value {
    serde_json::json!({
        "name": "Ana Executiva",
        "income": 12000,
        "historyScore": 9,
        "age": 35,
        "tenureYears": 8,
        "debtRatio": 20
    })
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn append(&self, _assessment: Assessment) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("log offline".to_string()))
    }

    fn history(&self) -> Result<Vec<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("log offline".to_string()))
    }

    fn clear(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("log offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
