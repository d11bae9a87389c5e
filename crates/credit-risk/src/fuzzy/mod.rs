//! Mamdani fuzzy inference: linguistic variables, rule bases and centroid defuzzification.
//!
//! Configuration (`VariableRegistry`, `RuleBase`) is validated when it is built; an
//! `InferenceEngine` compiled from it never fails at evaluation time and instead reports
//! `Inference::Undefined` when no rule contributes any area to the output.

mod error;
mod inference;
mod membership;
mod rules;
mod variable;

pub use error::ConfigurationError;
pub use inference::{
    AggregatedOutputSet, EvaluationInput, FiredRule, FuzzifiedInput, Inference, InferenceEngine,
    InferenceTrace,
};
pub use membership::{MembershipFunction, Term};
pub use rules::{Antecedent, Consequent, Rule, RuleBase};
pub use variable::{LinguisticVariable, Universe, VariableRegistry, VariableRole};
