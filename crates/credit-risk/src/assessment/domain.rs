use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::classification::Classification;
use super::model::{AGE, DEBT_RATIO, HISTORY_SCORE, INCOME, TENURE_YEARS};
use super::recommendation::Recommendation;
use crate::fuzzy::EvaluationInput;

/// Accepted range of a profile field. Values outside are clamped, not rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDomain {
    pub min: f64,
    pub max: f64,
}

impl FieldDomain {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp into the domain; NaN maps to the lower bound.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

pub const INCOME_DOMAIN: FieldDomain = FieldDomain::new(0.0, 15_000.0);
pub const HISTORY_SCORE_DOMAIN: FieldDomain = FieldDomain::new(0.0, 10.0);
pub const AGE_DOMAIN: FieldDomain = FieldDomain::new(18.0, 80.0);
pub const TENURE_YEARS_DOMAIN: FieldDomain = FieldDomain::new(0.0, 30.0);
pub const DEBT_RATIO_DOMAIN: FieldDomain = FieldDomain::new(0.0, 100.0);

/// Client data submitted for assessment. `debt_ratio` is a percentage of income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub name: String,
    pub income: f64,
    pub history_score: f64,
    pub age: f64,
    pub tenure_years: f64,
    pub debt_ratio: f64,
}

impl ClientProfile {
    pub fn new(
        name: impl Into<String>,
        income: f64,
        history_score: f64,
        age: f64,
        tenure_years: f64,
        debt_ratio: f64,
    ) -> Self {
        Self {
            name: name.into(),
            income,
            history_score,
            age,
            tenure_years,
            debt_ratio,
        }
    }

    /// Copy with every numeric field forced into its domain.
    pub fn clamped(&self) -> Self {
        Self {
            name: self.name.clone(),
            income: INCOME_DOMAIN.clamp(self.income),
            history_score: HISTORY_SCORE_DOMAIN.clamp(self.history_score),
            age: AGE_DOMAIN.clamp(self.age),
            tenure_years: TENURE_YEARS_DOMAIN.clamp(self.tenure_years),
            debt_ratio: DEBT_RATIO_DOMAIN.clamp(self.debt_ratio),
        }
    }

    pub fn evaluation_input(&self) -> EvaluationInput {
        let clamped = self.clamped();
        EvaluationInput::from_iter([
            (INCOME, clamped.income),
            (HISTORY_SCORE, clamped.history_score),
            (AGE, clamped.age),
            (TENURE_YEARS, clamped.tenure_years),
            (DEBT_RATIO, clamped.debt_ratio),
        ])
    }
}

/// Which scorer produced an assessment's risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    FuzzyInference,
    Fallback,
}

impl ScoreSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FuzzyInference => "fuzzy inference",
            Self::Fallback => "fallback",
        }
    }
}

/// Completed evaluation as stored in the assessment log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub name: String,
    pub risk_score: f64,
    pub classification: Classification,
    pub recommendation: Recommendation,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub inputs_snapshot: ClientProfile,
    pub score_source: ScoreSource,
    pub fired_rules: usize,
}

pub(crate) mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub(crate) const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub(crate) fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
