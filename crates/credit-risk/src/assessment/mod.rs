//! Client credit-risk assessment on top of the fuzzy engine.
//!
//! A profile is scored by the standard knowledge base in [`model`], or by the arithmetic
//! [`fallback_score`] when inference is undefined, then classified, given a lending
//! recommendation, and appended to an [`AssessmentRepository`].

pub mod classification;
pub mod domain;
pub mod fallback;
pub mod intake;
pub mod model;
pub mod recommendation;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;
pub mod summary;

#[cfg(test)]
mod tests;

pub use classification::{classify, Classification, RiskBand};
pub use domain::{
    Assessment, ClientProfile, FieldDomain, ScoreSource, AGE_DOMAIN, DEBT_RATIO_DOMAIN,
    HISTORY_SCORE_DOMAIN, INCOME_DOMAIN, TENURE_YEARS_DOMAIN,
};
pub use fallback::fallback_score;
pub use intake::{AssessmentRequest, ValidationError};
pub use recommendation::{recommend, LendingDecision, Recommendation};
pub use repository::{AssessmentLog, AssessmentRepository, RepositoryError};
pub use roster::{ClientRosterImporter, RosterImportError};
pub use router::assessment_router;
pub use service::{AssessmentServiceError, RiskAssessmentService, ScoreOutcome};
pub use summary::{BandCount, HistorySummary};
