use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;
use super::variable::{VariableRegistry, VariableRole};

/// Condition tree of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Antecedent {
    Test { variable: String, term: String },
    And(Vec<Antecedent>),
    Or(Vec<Antecedent>),
}

impl Antecedent {
    pub fn test(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Antecedent::Test {
            variable: variable.into(),
            term: term.into(),
        }
    }

    /// Conjunction of `(variable, term)` tests.
    pub fn all<V, T>(tests: impl IntoIterator<Item = (V, T)>) -> Self
    where
        V: Into<String>,
        T: Into<String>,
    {
        let mut children: Vec<Antecedent> = tests
            .into_iter()
            .map(|(variable, term)| Antecedent::test(variable, term))
            .collect();
        if children.len() == 1 {
            children.remove(0)
        } else {
            Antecedent::And(children)
        }
    }

    /// Disjunction of `(variable, term)` tests.
    pub fn any<V, T>(tests: impl IntoIterator<Item = (V, T)>) -> Self
    where
        V: Into<String>,
        T: Into<String>,
    {
        Antecedent::Or(
            tests
                .into_iter()
                .map(|(variable, term)| Antecedent::test(variable, term))
                .collect(),
        )
    }
}

impl fmt::Display for Antecedent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Antecedent::Test { variable, term } => write!(f, "{variable} is {term}"),
            Antecedent::And(children) => write_joined(f, children, " and "),
            Antecedent::Or(children) => write_joined(f, children, " or "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Antecedent], op: &str) -> fmt::Result {
    write!(f, "(")?;
    for (position, child) in children.iter().enumerate() {
        if position > 0 {
            write!(f, "{op}")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}

/// `(output variable, term)` pair a rule concludes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consequent {
    pub variable: String,
    pub term: String,
}

/// IF antecedent THEN consequent, scaled by `weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub antecedent: Antecedent,
    pub consequent: Consequent,
    pub weight: f64,
}

impl Rule {
    pub fn new(
        antecedent: Antecedent,
        output: impl Into<String>,
        term: impl Into<String>,
    ) -> Self {
        Self {
            label: None,
            antecedent,
            consequent: Consequent {
                variable: output.into(),
                term: term.into(),
            },
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn describe(&self) -> String {
        format!(
            "if {} then {} is {}",
            self.antecedent, self.consequent.variable, self.consequent.term
        )
    }
}

/// Antecedent with ids resolved to registry positions.
#[derive(Debug, Clone)]
pub(crate) enum CompiledAntecedent {
    Test { variable: usize, term: usize },
    And(Vec<CompiledAntecedent>),
    Or(Vec<CompiledAntecedent>),
}

impl CompiledAntecedent {
    fn visit_tests(&self, visit: &mut impl FnMut(usize, usize)) {
        match self {
            CompiledAntecedent::Test { variable, term } => visit(*variable, *term),
            CompiledAntecedent::And(children) | CompiledAntecedent::Or(children) => {
                for child in children {
                    child.visit_tests(visit);
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) antecedent: CompiledAntecedent,
    pub(crate) output: usize,
    pub(crate) term: usize,
    pub(crate) weight: f64,
}

/// Ordered rules validated against a registry.
#[derive(Debug, Clone)]
pub struct RuleBase {
    registry: Arc<VariableRegistry>,
    rules: Vec<Rule>,
    compiled: Vec<CompiledRule>,
}

impl RuleBase {
    pub fn new(registry: Arc<VariableRegistry>) -> Self {
        Self {
            registry,
            rules: Vec::new(),
            compiled: Vec::new(),
        }
    }

    pub fn from_rules(
        registry: Arc<VariableRegistry>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Result<Self, ConfigurationError> {
        let mut base = Self::new(registry);
        for rule in rules {
            base.add_rule(rule)?;
        }
        Ok(base)
    }

    pub fn add_rule(&mut self, rule: Rule) -> Result<(), ConfigurationError> {
        if !rule.weight.is_finite() || rule.weight < 0.0 {
            return Err(ConfigurationError::InvalidRule(format!(
                "weight {} must be a finite, non-negative number",
                rule.weight
            )));
        }

        let antecedent = self.compile(&rule.antecedent)?;
        let (output, term) = self.resolve_consequent(&rule)?;

        self.compiled.push(CompiledRule {
            antecedent,
            output,
            term,
            weight: rule.weight,
        });
        self.rules.push(rule);
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn registry(&self) -> &Arc<VariableRegistry> {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn compiled(&self) -> &[CompiledRule] {
        &self.compiled
    }

    /// Registry positions of every input variable some rule tests, ascending.
    pub(crate) fn referenced_inputs(&self) -> Vec<usize> {
        let mut positions = Vec::new();
        for rule in &self.compiled {
            rule.antecedent.visit_tests(&mut |variable, _| positions.push(variable));
        }
        positions.sort_unstable();
        positions.dedup();
        positions
    }

    fn compile(&self, antecedent: &Antecedent) -> Result<CompiledAntecedent, ConfigurationError> {
        match antecedent {
            Antecedent::Test { variable, term } => {
                let position = self.registry.position(variable).ok_or_else(|| {
                    invalid_reference(ConfigurationError::UnknownVariable(variable.clone()))
                })?;
                let definition = self.registry.by_position(position);
                if definition.role != VariableRole::Input {
                    return Err(ConfigurationError::InvalidRule(format!(
                        "antecedent tests output variable '{variable}'"
                    )));
                }
                let term_index = definition.term_index(term).ok_or_else(|| {
                    invalid_reference(ConfigurationError::UnknownTerm {
                        variable: variable.clone(),
                        term: term.clone(),
                    })
                })?;
                Ok(CompiledAntecedent::Test {
                    variable: position,
                    term: term_index,
                })
            }
            Antecedent::And(children) => Ok(CompiledAntecedent::And(self.compile_all(children)?)),
            Antecedent::Or(children) => Ok(CompiledAntecedent::Or(self.compile_all(children)?)),
        }
    }

    fn compile_all(
        &self,
        children: &[Antecedent],
    ) -> Result<Vec<CompiledAntecedent>, ConfigurationError> {
        if children.is_empty() {
            return Err(ConfigurationError::InvalidRule(
                "and/or node without operands".to_string(),
            ));
        }
        children.iter().map(|child| self.compile(child)).collect()
    }

    fn resolve_consequent(&self, rule: &Rule) -> Result<(usize, usize), ConfigurationError> {
        let Consequent { variable, term } = &rule.consequent;
        let position = self.registry.position(variable).ok_or_else(|| {
            invalid_reference(ConfigurationError::UnknownVariable(variable.clone()))
        })?;
        let definition = self.registry.by_position(position);
        if definition.role != VariableRole::Output {
            return Err(ConfigurationError::InvalidRule(format!(
                "consequent variable '{variable}' is not an output"
            )));
        }
        let term_index = definition.term_index(term).ok_or_else(|| {
            invalid_reference(ConfigurationError::UnknownTerm {
                variable: variable.clone(),
                term: term.clone(),
            })
        })?;
        Ok((position, term_index))
    }
}

fn invalid_reference(cause: ConfigurationError) -> ConfigurationError {
    ConfigurationError::InvalidRule(cause.to_string())
}
