/// Errors raised while assembling a variable registry or rule base.
///
/// These only surface during startup; a fully built engine never produces them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("variable '{0}' is already defined")]
    DuplicateVariable(String),
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("variable '{variable}' has no term named '{term}'")]
    UnknownTerm { variable: String, term: String },
    #[error("invalid domain for '{variable}': {reason}")]
    InvalidDomain { variable: String, reason: String },
    #[error("invalid rule: {0}")]
    InvalidRule(String),
}
