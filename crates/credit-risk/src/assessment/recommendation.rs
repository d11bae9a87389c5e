use serde::Serialize;

use super::domain::{ClientProfile, INCOME_DOMAIN};

/// Lending outcome for a scored client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LendingDecision {
    Approved,
    ApprovedWithRestrictions,
    ManualReview,
    Rejected,
}

impl LendingDecision {
    /// Risk score thresholds, independent of the classification bands.
    pub fn for_score(score: f64) -> Self {
        if score <= 30.0 {
            Self::Approved
        } else if score <= 50.0 {
            Self::ApprovedWithRestrictions
        } else if score <= 70.0 {
            Self::ManualReview
        } else {
            Self::Rejected
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::ApprovedWithRestrictions => "Approved with restrictions",
            Self::ManualReview => "Manual review",
            Self::Rejected => "Rejected",
        }
    }

    /// `(income multiple, absolute cap)` for the credit limit.
    const fn limit_policy(self) -> (f64, f64) {
        match self {
            Self::Approved => (8.0, 50_000.0),
            Self::ApprovedWithRestrictions => (4.0, 25_000.0),
            Self::ManualReview => (2.0, 10_000.0),
            Self::Rejected => (0.0, 0.0),
        }
    }

    const fn rate_policy_label(self) -> &'static str {
        match self {
            Self::Approved => "Preferential rate (1.2% per month)",
            Self::ApprovedWithRestrictions => "Intermediate rate (2.5% per month)",
            Self::ManualReview => "Elevated rate (4.0% per month)",
            Self::Rejected => "N/A",
        }
    }

    const fn notes(self) -> &'static str {
        match self {
            Self::Approved => "Excellent profile. Low default risk.",
            Self::ApprovedWithRestrictions => "Good profile, requires monitoring.",
            Self::ManualReview => "Requires detailed review and additional collateral.",
            Self::Rejected => "High default risk. Credit not recommended.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub decision: LendingDecision,
    pub limit: f64,
    pub rate_policy_label: &'static str,
    pub notes: &'static str,
}

pub fn recommend(score: f64, profile: &ClientProfile) -> Recommendation {
    let decision = LendingDecision::for_score(score);
    let (multiple, cap) = decision.limit_policy();
    let income = INCOME_DOMAIN.clamp(profile.income);

    Recommendation {
        decision,
        limit: (income * multiple).min(cap),
        rate_policy_label: decision.rate_policy_label(),
        notes: decision.notes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(income: f64) -> ClientProfile {
        ClientProfile::new("Client", income, 5.0, 35.0, 5.0, 30.0)
    }

    #[test]
    fn thresholds_split_the_score_range() {
        assert_eq!(LendingDecision::for_score(0.0), LendingDecision::Approved);
        assert_eq!(LendingDecision::for_score(30.0), LendingDecision::Approved);
        assert_eq!(
            LendingDecision::for_score(30.1),
            LendingDecision::ApprovedWithRestrictions
        );
        assert_eq!(
            LendingDecision::for_score(50.0),
            LendingDecision::ApprovedWithRestrictions
        );
        assert_eq!(LendingDecision::for_score(50.1), LendingDecision::ManualReview);
        assert_eq!(LendingDecision::for_score(70.0), LendingDecision::ManualReview);
        assert_eq!(LendingDecision::for_score(70.1), LendingDecision::Rejected);
        assert_eq!(LendingDecision::for_score(100.0), LendingDecision::Rejected);
    }

    #[test]
    fn limits_scale_with_income_up_to_cap() {
        assert_eq!(recommend(10.0, &profile(3_000.0)).limit, 24_000.0);
        assert_eq!(recommend(10.0, &profile(12_000.0)).limit, 50_000.0);
        assert_eq!(recommend(40.0, &profile(3_000.0)).limit, 12_000.0);
        assert_eq!(recommend(40.0, &profile(9_000.0)).limit, 25_000.0);
        assert_eq!(recommend(60.0, &profile(3_000.0)).limit, 6_000.0);
        assert_eq!(recommend(60.0, &profile(9_000.0)).limit, 10_000.0);
    }

    #[test]
    fn rejection_carries_no_limit_or_rate() {
        let recommendation = recommend(85.0, &profile(15_000.0));
        assert_eq!(recommendation.decision, LendingDecision::Rejected);
        assert_eq!(recommendation.limit, 0.0);
        assert_eq!(recommendation.rate_policy_label, "N/A");
    }

    #[test]
    fn negative_income_never_produces_negative_limit() {
        assert_eq!(recommend(10.0, &profile(-500.0)).limit, 0.0);
    }
}
