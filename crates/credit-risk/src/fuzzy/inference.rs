use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::error::ConfigurationError;
use super::rules::{CompiledAntecedent, RuleBase};
use super::variable::{LinguisticVariable, VariableRole};

/// Crisp input values keyed by input variable id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationInput {
    values: HashMap<String, f64>,
}

impl EvaluationInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, variable: impl Into<String>, value: f64) -> Self {
        self.set(variable, value);
        self
    }

    pub fn set(&mut self, variable: impl Into<String>, value: f64) {
        self.values.insert(variable.into(), value);
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.values.get(variable).copied()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for EvaluationInput {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(variable, value)| (variable.into(), value))
                .collect(),
        }
    }
}

/// Outcome of one inference pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Inference {
    /// Centroid of the aggregated output set.
    Defined { score: f64, fired_rules: usize },
    /// The aggregated output set had zero area; the caller must fall back.
    Undefined,
}

impl Inference {
    pub fn score(&self) -> Option<f64> {
        match self {
            Inference::Defined { score, .. } => Some(*score),
            Inference::Undefined => None,
        }
    }

    pub fn fired(&self) -> bool {
        matches!(self, Inference::Defined { .. })
    }
}

/// Pointwise max of every rule's clipped consequent over the output grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedOutputSet {
    pub points: Vec<f64>,
    pub degrees: Vec<f64>,
}

impl AggregatedOutputSet {
    pub fn degree_at(&self, point: f64) -> Option<f64> {
        self.points
            .iter()
            .position(|candidate| (candidate - point).abs() < 1e-9)
            .map(|index| self.degrees[index])
    }

    /// Center of area, or `None` when every degree is zero.
    pub fn centroid(&self) -> Option<f64> {
        centroid(&self.points, &self.degrees)
    }
}

fn centroid(points: &[f64], degrees: &[f64]) -> Option<f64> {
    let (weighted, total) = points
        .iter()
        .zip(degrees)
        .fold((0.0, 0.0), |(weighted, total), (point, degree)| {
            (weighted + point * degree, total + degree)
        });

    if total > 0.0 {
        Some(weighted / total)
    } else {
        None
    }
}

/// A rule together with the strength it fired with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiredRule {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub description: String,
    pub consequent: String,
    pub strength: f64,
}

/// Degrees of every term of one input after clamping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzifiedInput {
    pub variable: String,
    pub value: Option<f64>,
    pub degrees: Vec<(String, f64)>,
}

/// Diagnostic view of an inference pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceTrace {
    pub inputs: Vec<FuzzifiedInput>,
    pub fired: Vec<FiredRule>,
    pub inference: Inference,
}

#[derive(Debug, Clone)]
struct OutputModel {
    position: usize,
    points: Vec<f64>,
    curves: Vec<Vec<f64>>,
    bounds: (f64, f64),
}

impl OutputModel {
    fn sample(position: usize, variable: &LinguisticVariable) -> Self {
        let points: Vec<f64> = variable.universe.grid().collect();
        let curves = variable
            .terms
            .iter()
            .map(|term| points.iter().map(|point| term.degree(*point)).collect())
            .collect();
        Self {
            position,
            points,
            curves,
            bounds: (variable.universe.min, variable.universe.max),
        }
    }
}

/// Per-evaluation membership cache, indexed by registry position then term.
struct Fuzzified {
    values: Vec<Option<f64>>,
    degrees: Vec<Option<Vec<f64>>>,
}

impl Fuzzified {
    fn degree(&self, variable: usize, term: usize) -> f64 {
        self.degrees[variable]
            .as_ref()
            .map(|degrees| degrees[term])
            .unwrap_or(0.0)
    }
}

/// Mamdani inference (min implication, max aggregation, centroid) over a rule base.
///
/// Holds no per-call state, so one engine can serve concurrent evaluations.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    rule_base: RuleBase,
    inputs: Vec<usize>,
    output: OutputModel,
}

impl InferenceEngine {
    /// Builds an engine for a rule base whose registry declares exactly one output.
    pub fn new(rule_base: RuleBase) -> Result<Self, ConfigurationError> {
        let registry = rule_base.registry().clone();
        let outputs: Vec<&LinguisticVariable> = registry.outputs().collect();
        let output = match outputs.as_slice() {
            [single] => {
                let position = registry.position(&single.id).ok_or_else(|| {
                    ConfigurationError::UnknownVariable(single.id.clone())
                })?;
                OutputModel::sample(position, single)
            }
            other => {
                return Err(ConfigurationError::InvalidRule(format!(
                    "inference needs exactly one output variable, found {}",
                    other.len()
                )))
            }
        };
        let inputs = rule_base.referenced_inputs();

        debug!(
            rules = rule_base.len(),
            inputs = inputs.len(),
            grid_points = output.points.len(),
            "inference engine compiled"
        );

        Ok(Self {
            rule_base,
            inputs,
            output,
        })
    }

    pub fn rule_base(&self) -> &RuleBase {
        &self.rule_base
    }

    pub fn infer(&self, inputs: &EvaluationInput) -> Inference {
        let fuzzified = self.fuzzify(inputs);
        let strengths = self.strengths(&fuzzified);
        self.conclude(&strengths)
    }

    /// Firing strength of every rule, in rule order.
    pub fn firing_strengths(&self, inputs: &EvaluationInput) -> Vec<f64> {
        self.strengths(&self.fuzzify(inputs))
    }

    pub fn aggregate(&self, inputs: &EvaluationInput) -> AggregatedOutputSet {
        let strengths = self.firing_strengths(inputs);
        self.aggregate_strengths(&strengths)
    }

    pub fn explain(&self, inputs: &EvaluationInput) -> InferenceTrace {
        let fuzzified = self.fuzzify(inputs);
        let strengths = self.strengths(&fuzzified);
        let registry = self.rule_base.registry();

        let inputs = self
            .inputs
            .iter()
            .map(|&position| {
                let variable = registry.by_position(position);
                let degrees = variable
                    .terms
                    .iter()
                    .enumerate()
                    .map(|(term, definition)| {
                        (definition.name.clone(), fuzzified.degree(position, term))
                    })
                    .collect();
                FuzzifiedInput {
                    variable: variable.id.clone(),
                    value: fuzzified.values[position],
                    degrees,
                }
            })
            .collect();

        let fired = self
            .rule_base
            .rules()
            .iter()
            .zip(&strengths)
            .enumerate()
            .filter(|(_, (_, strength))| **strength > 0.0)
            .map(|(index, (rule, strength))| FiredRule {
                index,
                label: rule.label.clone(),
                description: rule.describe(),
                consequent: rule.consequent.term.clone(),
                strength: *strength,
            })
            .collect();

        InferenceTrace {
            inputs,
            fired,
            inference: self.conclude(&strengths),
        }
    }

    fn fuzzify(&self, inputs: &EvaluationInput) -> Fuzzified {
        let registry = self.rule_base.registry();
        let mut values = vec![None; registry.len()];
        let mut degrees = vec![None; registry.len()];

        for &position in &self.inputs {
            let variable = registry.by_position(position);
            debug_assert_eq!(variable.role, VariableRole::Input);
            let Some(raw) = inputs.get(&variable.id) else {
                debug!(variable = %variable.id, "input missing, terms contribute zero");
                continue;
            };
            let value = variable.universe.clamp(raw);
            values[position] = Some(value);
            degrees[position] = Some(variable.terms.iter().map(|term| term.degree(value)).collect());
        }

        Fuzzified { values, degrees }
    }

    fn strengths(&self, fuzzified: &Fuzzified) -> Vec<f64> {
        self.rule_base
            .compiled()
            .iter()
            .map(|rule| (evaluate(&rule.antecedent, fuzzified) * rule.weight).clamp(0.0, 1.0))
            .collect()
    }

    fn aggregate_strengths(&self, strengths: &[f64]) -> AggregatedOutputSet {
        AggregatedOutputSet {
            points: self.output.points.clone(),
            degrees: self.aggregated_degrees(strengths),
        }
    }

    fn aggregated_degrees(&self, strengths: &[f64]) -> Vec<f64> {
        let mut degrees = vec![0.0_f64; self.output.points.len()];
        for (rule, &strength) in self.rule_base.compiled().iter().zip(strengths) {
            if strength <= 0.0 {
                continue;
            }
            debug_assert_eq!(rule.output, self.output.position);
            let curve = &self.output.curves[rule.term];
            for (aggregated, membership) in degrees.iter_mut().zip(curve) {
                *aggregated = aggregated.max(strength.min(*membership));
            }
        }
        degrees
    }

    fn conclude(&self, strengths: &[f64]) -> Inference {
        let fired_rules = strengths.iter().filter(|strength| **strength > 0.0).count();
        let degrees = self.aggregated_degrees(strengths);
        match centroid(&self.output.points, &degrees) {
            Some(score) => Inference::Defined {
                score: score.clamp(self.output.bounds.0, self.output.bounds.1),
                fired_rules,
            },
            None => Inference::Undefined,
        }
    }
}

fn evaluate(antecedent: &CompiledAntecedent, fuzzified: &Fuzzified) -> f64 {
    match antecedent {
        CompiledAntecedent::Test { variable, term } => fuzzified.degree(*variable, *term),
        CompiledAntecedent::And(children) => children
            .iter()
            .map(|child| evaluate(child, fuzzified))
            .fold(1.0, f64::min),
        CompiledAntecedent::Or(children) => children
            .iter()
            .map(|child| evaluate(child, fuzzified))
            .fold(0.0, f64::max),
    }
}
