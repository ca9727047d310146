use thiserror::Error;

use crate::problem::ConstraintOp;

/// A malformed problem, rejected before any tableau is built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid problem: objective has no variables")]
    NoVariables,
    #[error("invalid problem: {what} has {found} entries, expected {expected}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("invalid problem: variable name {name} is used more than once")]
    DuplicateVariable { name: String },
    #[error("invalid problem: variable name {name} clashes with a generated tableau label")]
    ReservedVariableName { name: String },
    #[error("invalid problem: {location} is not a finite number ({value})")]
    NonFinite { location: String, value: f64 },
    #[error("invalid problem: constraint {constraint} uses unsupported operator {op} (enable two-phase to solve it)")]
    UnsupportedOperator { constraint: String, op: ConstraintOp },
    #[error(
        "invalid problem: negative resource limit requires infeasibility handling not supported (constraint {constraint} has rhs {rhs})"
    )]
    NegativeRhs { constraint: String, rhs: f64 },
}

/// A relational operator string that could not be recognized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown constraint operator: {0:?} (expected <=, >= or =)")]
pub struct ParseOpError(pub String);
