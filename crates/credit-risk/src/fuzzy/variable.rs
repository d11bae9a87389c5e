use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;
use super::membership::Term;

const GRID_TOLERANCE: f64 = 1e-9;
/// Upper bound on grid intervals so sampled universes stay small enough to hold in memory.
const MAX_GRID_INTERVALS: f64 = 1_000_000.0;

/// Whether a variable is read from the inputs or produced by inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableRole {
    Input,
    Output,
}

/// Universe of discourse: a closed interval sampled on a fixed grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Universe {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Number of intervals between grid points.
    pub fn intervals(&self) -> usize {
        ((self.max - self.min) / self.step).round() as usize
    }

    /// Grid points from `min` to `max` inclusive.
    pub fn grid(&self) -> impl Iterator<Item = f64> + '_ {
        let intervals = self.intervals();
        (0..=intervals).map(move |index| {
            if index == intervals {
                self.max
            } else {
                self.min + index as f64 * self.step
            }
        })
    }

    fn validate(&self, variable: &str) -> Result<(), ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidDomain {
            variable: variable.to_string(),
            reason,
        };

        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(invalid(format!(
                "bounds must be finite and increasing (got [{}, {}])",
                self.min, self.max
            )));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(invalid(format!("step must be positive (got {})", self.step)));
        }

        let ratio = (self.max - self.min) / self.step;
        if ratio > MAX_GRID_INTERVALS {
            return Err(invalid(format!(
                "step {} splits [{}, {}] into more than {} intervals",
                self.step, self.min, self.max, MAX_GRID_INTERVALS
            )));
        }
        if (ratio - ratio.round()).abs() > GRID_TOLERANCE * ratio.max(1.0) {
            return Err(invalid(format!(
                "step {} does not divide [{}, {}] evenly",
                self.step, self.min, self.max
            )));
        }

        Ok(())
    }
}

/// Named variable with its universe and ordered terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinguisticVariable {
    pub id: String,
    pub role: VariableRole,
    pub universe: Universe,
    pub terms: Vec<Term>,
}

impl LinguisticVariable {
    pub fn term(&self, name: &str) -> Option<&Term> {
        self.terms.iter().find(|term| term.name == name)
    }

    pub(crate) fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|term| term.name == name)
    }
}

/// Catalogue of linguistic variables, built once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: Vec<LinguisticVariable>,
    index: HashMap<String, usize>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_variable(
        &mut self,
        id: impl Into<String>,
        role: VariableRole,
        universe: Universe,
        terms: Vec<Term>,
    ) -> Result<(), ConfigurationError> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(ConfigurationError::DuplicateVariable(id));
        }

        universe.validate(&id)?;
        validate_terms(&id, &universe, &terms)?;

        self.index.insert(id.clone(), self.variables.len());
        self.variables.push(LinguisticVariable {
            id,
            role,
            universe,
            terms,
        });
        Ok(())
    }

    pub fn variable(&self, id: &str) -> Result<&LinguisticVariable, ConfigurationError> {
        self.index
            .get(id)
            .map(|&position| &self.variables[position])
            .ok_or_else(|| ConfigurationError::UnknownVariable(id.to_string()))
    }

    pub fn term(&self, variable_id: &str, term_name: &str) -> Result<&Term, ConfigurationError> {
        let variable = self.variable(variable_id)?;
        variable
            .term(term_name)
            .ok_or_else(|| ConfigurationError::UnknownTerm {
                variable: variable_id.to_string(),
                term: term_name.to_string(),
            })
    }

    /// Degree of `value` in the named term. The value is not clamped.
    pub fn membership(
        &self,
        variable_id: &str,
        term_name: &str,
        value: f64,
    ) -> Result<f64, ConfigurationError> {
        Ok(self.term(variable_id, term_name)?.degree(value))
    }

    pub fn variables(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.variables.iter()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.variables
            .iter()
            .filter(|variable| variable.role == VariableRole::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.variables
            .iter()
            .filter(|variable| variable.role == VariableRole::Output)
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn by_position(&self, position: usize) -> &LinguisticVariable {
        &self.variables[position]
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

fn validate_terms(id: &str, universe: &Universe, terms: &[Term]) -> Result<(), ConfigurationError> {
    for (position, term) in terms.iter().enumerate() {
        if terms[..position].iter().any(|other| other.name == term.name) {
            return Err(ConfigurationError::InvalidDomain {
                variable: id.to_string(),
                reason: format!("term '{}' is defined twice", term.name),
            });
        }
        if !term.function.is_ordered() {
            return Err(ConfigurationError::InvalidDomain {
                variable: id.to_string(),
                reason: format!("term '{}' has unordered points", term.name),
            });
        }
        if term
            .function
            .points()
            .iter()
            .any(|point| !universe.contains(*point))
        {
            return Err(ConfigurationError::InvalidDomain {
                variable: id.to_string(),
                reason: format!(
                    "term '{}' extends outside [{}, {}]",
                    term.name, universe.min, universe.max
                ),
            });
        }
    }
    Ok(())
}
