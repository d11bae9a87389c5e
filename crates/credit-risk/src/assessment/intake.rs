use serde::Deserialize;
use serde_json::Value;

use super::domain::ClientProfile;

/// Raw assessment payload as received over HTTP.
///
/// Numeric fields accept JSON numbers or numeric strings; anything else is rejected
/// before the engine sees it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub name: Option<String>,
    pub income: Option<Value>,
    pub history_score: Option<Value>,
    pub age: Option<Value>,
    pub tenure_years: Option<Value>,
    pub debt_ratio: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must be numeric, got {value}")]
    NonNumeric { field: &'static str, value: String },
}

impl AssessmentRequest {
    pub fn into_profile(self) -> Result<ClientProfile, ValidationError> {
        let name = self
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::MissingField("name"))?;

        Ok(ClientProfile {
            name,
            income: numeric("income", self.income)?,
            history_score: numeric("historyScore", self.history_score)?,
            age: numeric("age", self.age)?,
            tenure_years: numeric("tenureYears", self.tenure_years)?,
            debt_ratio: numeric("debtRatio", self.debt_ratio)?,
        })
    }
}

impl From<ClientProfile> for AssessmentRequest {
    fn from(profile: ClientProfile) -> Self {
        Self {
            name: Some(profile.name),
            income: Some(profile.income.into()),
            history_score: Some(profile.history_score.into()),
            age: Some(profile.age.into()),
            tenure_years: Some(profile.tenure_years.into()),
            debt_ratio: Some(profile.debt_ratio.into()),
        }
    }
}

fn numeric(field: &'static str, value: Option<Value>) -> Result<f64, ValidationError> {
    let value = match value {
        None | Some(Value::Null) => return Err(ValidationError::MissingField(field)),
        Some(value) => value,
    };

    let parsed = match &value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|number| number.is_finite())
        .ok_or_else(|| ValidationError::NonNumeric {
            field,
            value: value.to_string(),
        })
}
