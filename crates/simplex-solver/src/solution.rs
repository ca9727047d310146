use std::fmt;

use crate::step::Step;

/// The result of solving an LP problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Value of each decision variable at the final basis
    pub values: Vec<f64>,
    /// Objective value at the final basis, `±inf` when unbounded or infeasible.
    /// Serialized as the strings `"inf"`/`"-inf"` in that case.
    #[cfg_attr(feature = "serde", serde(with = "objective_value"))]
    pub objective_value: f64,
    /// Number of simplex pivots performed
    pub iterations: usize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The objective can be improved without limit
    Unbounded,
    /// No point satisfies all constraints
    Infeasible,
    /// The pivot budget ran out before optimality was proven
    IterationLimitReached,
}

impl SolutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "optimal",
            SolutionStatus::Unbounded => "unbounded",
            SolutionStatus::Infeasible => "infeasible",
            SolutionStatus::IterationLimitReached => "iteration-limit-reached",
        }
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keeps infinite objectives intact in formats without an infinity literal
#[cfg(feature = "serde")]
mod objective_value {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("nan")
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "inf" } else { "-inf" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(D::Error::custom(format!("invalid objective value {:?}", other))),
            },
        }
    }
}

impl Solution {
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

/// Final solution together with every recorded step
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub solution: Solution,
    pub steps: Vec<Step>,
}

impl SolveReport {
    /// The terminal step, which carries the solution
    pub fn final_step(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Steps that record a pivot
    pub fn pivots(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|s| s.pivot.is_some())
    }
}
