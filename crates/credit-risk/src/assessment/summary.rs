use serde::Serialize;

use super::classification::RiskBand;
use super::domain::{round_to_tenth, Assessment, ScoreSource};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BandCount {
    pub level: RiskBand,
    pub label: &'static str,
    pub count: usize,
}

/// Aggregate view over the assessment log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub count: usize,
    pub mean_score: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub fallback_count: usize,
    /// One entry per band in ascending order, zero counts included.
    pub bands: Vec<BandCount>,
}

impl HistorySummary {
    pub fn from_assessments(assessments: &[Assessment]) -> Self {
        let scores: Vec<f64> = assessments.iter().map(|entry| entry.risk_score).collect();
        let count = scores.len();

        let (mean_score, min_score, max_score) = if count == 0 {
            (None, None, None)
        } else {
            let total: f64 = scores.iter().sum();
            let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
            let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (Some(round_to_tenth(total / count as f64)), Some(min), Some(max))
        };

        let bands = RiskBand::ordered()
            .into_iter()
            .map(|level| BandCount {
                level,
                label: level.label(),
                count: assessments
                    .iter()
                    .filter(|entry| entry.classification.level == level)
                    .count(),
            })
            .collect();

        Self {
            count,
            mean_score,
            min_score,
            max_score,
            fallback_count: assessments
                .iter()
                .filter(|entry| entry.score_source == ScoreSource::Fallback)
                .count(),
            bands,
        }
    }

    pub fn band(&self, level: RiskBand) -> usize {
        self.bands
            .iter()
            .find(|entry| entry.level == level)
            .map_or(0, |entry| entry.count)
    }
}
