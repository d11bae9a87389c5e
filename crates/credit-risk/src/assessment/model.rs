//! Standard credit-risk knowledge base: five input variables, one output, 29 rules.
//!
//! The rule list ends with single-factor catch-all rules. Aggregation is a flat max, so a
//! catch-all firing strongly can outweigh a narrower rule that fires weakly; no rule has
//! priority over another.

use std::sync::Arc;

use crate::fuzzy::{
    Antecedent, ConfigurationError, InferenceEngine, Rule, RuleBase, Term, Universe,
    VariableRegistry, VariableRole,
};

pub const INCOME: &str = "income";
pub const HISTORY_SCORE: &str = "history_score";
pub const AGE: &str = "age";
pub const TENURE_YEARS: &str = "tenure_years";
pub const DEBT_RATIO: &str = "debt_ratio";
pub const RISK: &str = "risk";

/// Default step of the risk universe.
pub const DEFAULT_RISK_RESOLUTION: f64 = 0.1;

pub fn standard_registry(risk_resolution: f64) -> Result<VariableRegistry, ConfigurationError> {
    let mut registry = VariableRegistry::new();

    registry.define_variable(
        INCOME,
        VariableRole::Input,
        Universe::new(0.0, 15_000.0, 1.0),
        vec![
            Term::triangular("very_low", 0.0, 0.0, 2_000.0),
            Term::triangular("low", 1_000.0, 2_500.0, 4_000.0),
            Term::triangular("medium", 3_000.0, 5_500.0, 8_000.0),
            Term::triangular("high", 6_500.0, 10_000.0, 12_000.0),
            // Shoulder starts at 12k so incomes between "high" and the cap keep full degree.
            Term::trapezoidal("very_high", 10_000.0, 12_000.0, 15_000.0, 15_000.0),
        ],
    )?;

    registry.define_variable(
        HISTORY_SCORE,
        VariableRole::Input,
        Universe::new(0.0, 10.0, 1.0),
        vec![
            Term::triangular("very_poor", 0.0, 0.0, 2.0),
            Term::triangular("poor", 1.0, 3.0, 5.0),
            Term::triangular("fair", 4.0, 6.0, 8.0),
            Term::triangular("good", 7.0, 9.0, 10.0),
            Term::triangular("excellent", 9.0, 10.0, 10.0),
        ],
    )?;

    registry.define_variable(
        AGE,
        VariableRole::Input,
        Universe::new(18.0, 80.0, 1.0),
        vec![
            Term::triangular("young", 18.0, 18.0, 30.0),
            Term::triangular("young_adult", 25.0, 35.0, 45.0),
            Term::triangular("adult", 40.0, 50.0, 60.0),
            Term::triangular("mature", 55.0, 70.0, 80.0),
        ],
    )?;

    registry.define_variable(
        TENURE_YEARS,
        VariableRole::Input,
        Universe::new(0.0, 30.0, 1.0),
        vec![
            Term::triangular("new", 0.0, 0.0, 2.0),
            Term::triangular("short", 1.0, 3.0, 6.0),
            Term::triangular("medium", 4.0, 8.0, 15.0),
            Term::triangular("long", 12.0, 25.0, 30.0),
        ],
    )?;

    registry.define_variable(
        DEBT_RATIO,
        VariableRole::Input,
        Universe::new(0.0, 100.0, 1.0),
        vec![
            Term::triangular("low", 0.0, 0.0, 30.0),
            Term::triangular("medium", 20.0, 40.0, 60.0),
            Term::triangular("high", 50.0, 70.0, 90.0),
            Term::triangular("critical", 80.0, 100.0, 100.0),
        ],
    )?;

    registry.define_variable(
        RISK,
        VariableRole::Output,
        Universe::new(0.0, 100.0, risk_resolution),
        vec![
            Term::triangular("very_low", 0.0, 0.0, 20.0),
            Term::triangular("low", 10.0, 25.0, 40.0),
            Term::triangular("medium", 30.0, 50.0, 70.0),
            Term::triangular("high", 60.0, 75.0, 90.0),
            Term::triangular("very_high", 80.0, 100.0, 100.0),
        ],
    )?;

    Ok(registry)
}

fn rule(label: &str, tests: &[(&str, &str)], risk: &str) -> Rule {
    Rule::new(Antecedent::all(tests.iter().copied()), RISK, risk).labelled(label)
}

pub fn standard_rules() -> Vec<Rule> {
    vec![
        rule(
            "top income, excellent history, low debt",
            &[(INCOME, "very_high"), (HISTORY_SCORE, "excellent"), (DEBT_RATIO, "low")],
            "very_low",
        ),
        rule(
            "high income, excellent history, low debt, long tenure",
            &[
                (INCOME, "high"),
                (HISTORY_SCORE, "excellent"),
                (DEBT_RATIO, "low"),
                (TENURE_YEARS, "long"),
            ],
            "very_low",
        ),
        rule(
            "high income, good history, low debt",
            &[(INCOME, "high"), (HISTORY_SCORE, "good"), (DEBT_RATIO, "low")],
            "low",
        ),
        rule(
            "high income, excellent history",
            &[(INCOME, "high"), (HISTORY_SCORE, "excellent")],
            "low",
        ),
        rule(
            "top income, good history",
            &[(INCOME, "very_high"), (HISTORY_SCORE, "good")],
            "low",
        ),
        rule(
            "medium income, good history, adult, low debt",
            &[
                (INCOME, "medium"),
                (HISTORY_SCORE, "good"),
                (AGE, "adult"),
                (DEBT_RATIO, "low"),
            ],
            "low",
        ),
        rule(
            "mature, long tenure, good history",
            &[(AGE, "mature"), (TENURE_YEARS, "long"), (HISTORY_SCORE, "good")],
            "low",
        ),
        rule(
            "medium income, excellent history, low debt",
            &[(INCOME, "medium"), (HISTORY_SCORE, "excellent"), (DEBT_RATIO, "low")],
            "low",
        ),
        rule(
            "medium income, fair history",
            &[(INCOME, "medium"), (HISTORY_SCORE, "fair")],
            "medium",
        ),
        rule(
            "low income, good history, medium tenure",
            &[(INCOME, "low"), (HISTORY_SCORE, "good"), (TENURE_YEARS, "medium")],
            "medium",
        ),
        rule(
            "high income, fair history, high debt",
            &[(INCOME, "high"), (HISTORY_SCORE, "fair"), (DEBT_RATIO, "high")],
            "medium",
        ),
        rule(
            "medium income, medium debt",
            &[(INCOME, "medium"), (DEBT_RATIO, "medium")],
            "medium",
        ),
        rule(
            "fair history, medium debt",
            &[(HISTORY_SCORE, "fair"), (DEBT_RATIO, "medium")],
            "medium",
        ),
        rule(
            "low income, poor history",
            &[(INCOME, "low"), (HISTORY_SCORE, "poor")],
            "high",
        ),
        rule(
            "poor history, high debt",
            &[(HISTORY_SCORE, "poor"), (DEBT_RATIO, "high")],
            "high",
        ),
        rule(
            "young, new job, low income",
            &[(AGE, "young"), (TENURE_YEARS, "new"), (INCOME, "low")],
            "high",
        ),
        rule(
            "high debt, fair history",
            &[(DEBT_RATIO, "high"), (HISTORY_SCORE, "fair")],
            "high",
        ),
        rule(
            "very low income, very poor history",
            &[(INCOME, "very_low"), (HISTORY_SCORE, "very_poor")],
            "very_high",
        ),
        rule("critical debt", &[(DEBT_RATIO, "critical")], "very_high"),
        rule(
            "very poor history, high debt",
            &[(HISTORY_SCORE, "very_poor"), (DEBT_RATIO, "high")],
            "very_high",
        ),
        rule(
            "very low income, poor history",
            &[(INCOME, "very_low"), (HISTORY_SCORE, "poor")],
            "very_high",
        ),
        rule("catch-all: high income", &[(INCOME, "high")], "low"),
        rule("catch-all: top income", &[(INCOME, "very_high")], "very_low"),
        rule(
            "catch-all: excellent history",
            &[(HISTORY_SCORE, "excellent")],
            "low",
        ),
        rule("catch-all: good history", &[(HISTORY_SCORE, "good")], "low"),
        rule(
            "catch-all: very poor history",
            &[(HISTORY_SCORE, "very_poor")],
            "very_high",
        ),
        rule("catch-all: poor history", &[(HISTORY_SCORE, "poor")], "high"),
        rule("catch-all: critical debt", &[(DEBT_RATIO, "critical")], "very_high"),
        rule("catch-all: low debt", &[(DEBT_RATIO, "low")], "low"),
    ]
}

/// Registry plus rule base for the standard model.
pub fn standard_rule_base(risk_resolution: f64) -> Result<RuleBase, ConfigurationError> {
    let registry = Arc::new(standard_registry(risk_resolution)?);
    RuleBase::from_rules(registry, standard_rules())
}

pub fn standard_engine(risk_resolution: f64) -> Result<InferenceEngine, ConfigurationError> {
    InferenceEngine::new(standard_rule_base(risk_resolution)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::EvaluationInput;

    #[test]
    fn standard_model_compiles() {
        let engine = standard_engine(DEFAULT_RISK_RESOLUTION).expect("standard model is valid");
        assert_eq!(engine.rule_base().len(), 29);
        assert_eq!(engine.rule_base().registry().inputs().count(), 5);
        assert_eq!(engine.rule_base().registry().outputs().count(), 1);
    }

    #[test]
    fn coarse_resolution_is_accepted_and_uneven_rejected() {
        assert!(standard_engine(1.0).is_ok());
        assert!(matches!(
            standard_engine(0.3),
            Err(ConfigurationError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn every_point_of_every_input_universe_is_covered() {
        let registry = standard_registry(DEFAULT_RISK_RESOLUTION).expect("valid");
        for variable in registry.inputs() {
            for point in variable.universe.grid() {
                let covered = variable.terms.iter().any(|term| term.degree(point) > 0.0);
                // The upper ends of age and tenure fall outside every term.
                let gap = (variable.id == AGE && point == 80.0)
                    || (variable.id == TENURE_YEARS && point == 30.0);
                if gap {
                    assert!(!covered);
                } else {
                    assert!(covered, "{} uncovered at {point}", variable.id);
                }
            }
        }
    }

    #[test]
    fn trace_names_the_rules_that_fired() {
        let engine = standard_engine(DEFAULT_RISK_RESOLUTION).expect("valid");
        let inputs = EvaluationInput::new()
            .with(INCOME, 1_200.0)
            .with(HISTORY_SCORE, 2.0)
            .with(AGE, 35.0)
            .with(TENURE_YEARS, 0.0)
            .with(DEBT_RATIO, 90.0);

        let trace = engine.explain(&inputs);
        let labels: Vec<_> = trace
            .fired
            .iter()
            .filter_map(|fired| fired.label.as_deref())
            .collect();
        assert!(labels.contains(&"critical debt"));
        assert!(labels.contains(&"very low income, poor history"));
        assert!(!labels.contains(&"catch-all: top income"));
    }
}
