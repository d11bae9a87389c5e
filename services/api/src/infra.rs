use credit_risk::assessment::{AssessmentLog, RiskAssessmentService};
use credit_risk::config::ScoringConfig;
use credit_risk::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type AssessmentService = RiskAssessmentService<AssessmentLog>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Compiles the configured model once; every request shares the result.
pub(crate) fn build_assessment_service(
    config: &ScoringConfig,
) -> Result<Arc<AssessmentService>, AppError> {
    let log = Arc::new(AssessmentLog::new());
    let service = RiskAssessmentService::from_config(config, log)?;
    Ok(Arc::new(service))
}
