use serde::Serialize;

/// Discrete risk level derived from a crisp score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskBand {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskBand {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::VeryLow,
            Self::Low,
            Self::Medium,
            Self::High,
            Self::VeryHigh,
        ]
    }

    /// Upper bound of the band, inclusive; `None` for the open top band.
    pub const fn upper_bound(self) -> Option<f64> {
        match self {
            Self::VeryLow => Some(20.0),
            Self::Low => Some(40.0),
            Self::Medium => Some(60.0),
            Self::High => Some(80.0),
            Self::VeryHigh => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "Very low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very high",
        }
    }

    pub const fn color_code(self) -> &'static str {
        match self {
            Self::VeryLow => "#28a745",
            Self::Low => "#17a2b8",
            Self::Medium => "#ffc107",
            Self::High => "#fd7e14",
            Self::VeryHigh => "#dc3545",
        }
    }
}

/// Band plus its display attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub level: RiskBand,
    pub label: &'static str,
    pub color_code: &'static str,
}

impl From<RiskBand> for Classification {
    fn from(level: RiskBand) -> Self {
        Self {
            level,
            label: level.label(),
            color_code: level.color_code(),
        }
    }
}

pub fn classify(score: f64) -> Classification {
    let band = RiskBand::ordered()
        .into_iter()
        .find(|band| band.upper_bound().map_or(true, |bound| score <= bound))
        .unwrap_or(RiskBand::VeryHigh);
    band.into()
}
