//! Fuzzy-logic credit-risk scoring: a Mamdani inference engine, the standard client risk
//! model built on it, and the assessment service that records each evaluation.

pub mod assessment;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod telemetry;
