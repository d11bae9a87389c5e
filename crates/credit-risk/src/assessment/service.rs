use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use super::classification::classify;
use super::domain::{round_to_tenth, Assessment, ClientProfile, ScoreSource};
use super::fallback::fallback_score;
use super::intake::{AssessmentRequest, ValidationError};
use super::model::standard_engine;
use super::recommendation::recommend;
use super::repository::{AssessmentRepository, RepositoryError};
use super::summary::HistorySummary;
use crate::config::{ScoringConfig, ScoringMode};
use crate::fuzzy::{ConfigurationError, Inference, InferenceEngine};

/// Raw score for one profile before classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreOutcome {
    pub score: f64,
    pub source: ScoreSource,
    pub fired_rules: usize,
}

/// Scores profiles with the fuzzy engine, falling back to the arithmetic scorer, and records
/// every completed assessment.
///
/// Without an engine every profile goes through the fallback scorer.
pub struct RiskAssessmentService<R> {
    engine: Option<Arc<InferenceEngine>>,
    repository: Arc<R>,
}

impl<R> RiskAssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(engine: Arc<InferenceEngine>, repository: Arc<R>) -> Self {
        Self {
            engine: Some(engine),
            repository,
        }
    }

    pub fn without_engine(repository: Arc<R>) -> Self {
        Self {
            engine: None,
            repository,
        }
    }

    /// Builds the standard model at the configured resolution unless scoring is set to bypass it.
    pub fn from_config(
        config: &ScoringConfig,
        repository: Arc<R>,
    ) -> Result<Self, ConfigurationError> {
        match config.mode {
            ScoringMode::Fuzzy => {
                let engine = standard_engine(config.resolution)?;
                info!(resolution = config.resolution, "fuzzy scoring enabled");
                Ok(Self::new(Arc::new(engine), repository))
            }
            ScoringMode::Fallback => {
                info!("fuzzy engine bypassed, fallback scoring only");
                Ok(Self::without_engine(repository))
            }
        }
    }

    pub fn engine(&self) -> Option<&InferenceEngine> {
        self.engine.as_deref()
    }

    pub fn score(&self, profile: &ClientProfile) -> ScoreOutcome {
        let Some(engine) = &self.engine else {
            return self.fallback(profile, "engine unavailable");
        };

        match engine.infer(&profile.evaluation_input()) {
            Inference::Defined { score, fired_rules } => ScoreOutcome {
                score,
                source: ScoreSource::FuzzyInference,
                fired_rules,
            },
            Inference::Undefined => self.fallback(profile, "no rule fired"),
        }
    }

    fn fallback(&self, profile: &ClientProfile, reason: &str) -> ScoreOutcome {
        let score = fallback_score(profile);
        warn!(client = %profile.name, reason, score, "fallback scorer substituted");
        ScoreOutcome {
            score,
            source: ScoreSource::Fallback,
            fired_rules: 0,
        }
    }

    /// Builds an assessment stamped with `timestamp` without recording it.
    pub fn assess_at(&self, profile: &ClientProfile, timestamp: NaiveDateTime) -> Assessment {
        let outcome = self.score(profile);
        let classification = classify(outcome.score);
        let recommendation = recommend(outcome.score, profile);

        debug!(
            client = %profile.name,
            score = outcome.score,
            band = classification.label,
            source = outcome.source.label(),
            "profile scored"
        );

        Assessment {
            name: profile.name.clone(),
            risk_score: round_to_tenth(outcome.score),
            classification,
            recommendation,
            timestamp,
            inputs_snapshot: profile.clone(),
            score_source: outcome.source,
            fired_rules: outcome.fired_rules,
        }
    }

    pub fn assess(&self, profile: &ClientProfile) -> Assessment {
        self.assess_at(profile, Local::now().naive_local())
    }

    /// Scores the profile and appends the assessment to the log.
    pub fn evaluate(&self, profile: &ClientProfile) -> Result<Assessment, AssessmentServiceError> {
        let assessment = self.assess(profile);
        self.repository.append(assessment.clone())?;

        info!(
            client = %assessment.name,
            score = assessment.risk_score,
            band = assessment.classification.label,
            decision = assessment.recommendation.decision.label(),
            source = assessment.score_source.label(),
            "assessment recorded"
        );
        Ok(assessment)
    }

    /// Validates a raw request before evaluating it.
    pub fn submit(&self, request: AssessmentRequest) -> Result<Assessment, AssessmentServiceError> {
        let profile = request.into_profile()?;
        self.evaluate(&profile)
    }

    pub fn history(&self) -> Result<Vec<Assessment>, AssessmentServiceError> {
        Ok(self.repository.history()?)
    }

    pub fn clear_history(&self) -> Result<usize, AssessmentServiceError> {
        let cleared = self.repository.clear()?;
        info!(cleared, "assessment history cleared");
        Ok(cleared)
    }

    pub fn summary(&self) -> Result<HistorySummary, AssessmentServiceError> {
        let history = self.repository.history()?;
        Ok(HistorySummary::from_assessments(&history))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
