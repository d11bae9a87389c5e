//! Arithmetic scorer used when fuzzy inference is undefined or disabled.

use super::domain::ClientProfile;

const INCOME_REFERENCE: f64 = 10_000.0;
const TENURE_REFERENCE: f64 = 15.0;
const PRIME_AGE: (f64, f64) = (25.0, 55.0);
const PRIME_AGE_FACTOR: f64 = 1.0;
const OTHER_AGE_FACTOR: f64 = 0.7;

const INCOME_WEIGHT: f64 = 0.35;
const HISTORY_WEIGHT: f64 = 0.30;
const AGE_WEIGHT: f64 = 0.15;
const TENURE_WEIGHT: f64 = 0.20;
const DEBT_PENALTY_WEIGHT: f64 = 0.8;

/// Weighted blend of the profile, always within `[0, 100]`.
pub fn fallback_score(profile: &ClientProfile) -> f64 {
    let profile = profile.clamped();

    let income = (profile.income / INCOME_REFERENCE).min(1.0);
    let history = profile.history_score / 10.0;
    let age = if profile.age >= PRIME_AGE.0 && profile.age <= PRIME_AGE.1 {
        PRIME_AGE_FACTOR
    } else {
        OTHER_AGE_FACTOR
    };
    let tenure = (profile.tenure_years / TENURE_REFERENCE).min(1.0);
    let debt = profile.debt_ratio / 100.0;

    let positive = income * INCOME_WEIGHT
        + history * HISTORY_WEIGHT
        + age * AGE_WEIGHT
        + tenure * TENURE_WEIGHT;

    (100.0 * (1.0 - positive + DEBT_PENALTY_WEIGHT * debt)).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_profile_scores_low() {
        let score = fallback_score(&ClientProfile::new("Ana", 12_000.0, 9.0, 35.0, 8.0, 20.0));
        assert!((score - 28.333_333).abs() < 1e-3, "got {score}");
    }

    #[test]
    fn age_outside_prime_band_is_penalised() {
        let prime = fallback_score(&ClientProfile::new("A", 5_000.0, 6.0, 40.0, 5.0, 40.0));
        let senior = fallback_score(&ClientProfile::new("B", 5_000.0, 6.0, 65.0, 5.0, 40.0));
        assert!((senior - prime - 4.5).abs() < 1e-9);
    }

    #[test]
    fn saturates_at_both_ends() {
        let worst = fallback_score(&ClientProfile::new("W", 0.0, 0.0, 20.0, 0.0, 100.0));
        let best = fallback_score(&ClientProfile::new("B", 15_000.0, 10.0, 40.0, 30.0, 0.0));
        assert_eq!(worst, 100.0);
        assert!(best < 1e-9, "got {best}");
    }

    #[test]
    fn garbage_values_still_produce_a_bounded_score() {
        let score = fallback_score(&ClientProfile::new(
            "X",
            f64::INFINITY,
            f64::NAN,
            -4.0,
            f64::NEG_INFINITY,
            1e12,
        ));
        assert!((0.0..=100.0).contains(&score));
    }
}
