//! Lenient problem-file reader.
//!
//! Missing numbers are treated as 0 and a missing operator as `<=`, each
//! with a warning, so hand-written files behave like the form inputs they
//! replace. Shape errors are left to [`LpProblem::validate`].

use serde::Deserialize;
use simplex_solver::{default_variable_name, ConstraintOp, LpProblem, ObjectiveSense, ParseOpError};
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct ProblemInput {
    #[serde(default)]
    pub sense: Option<ObjectiveSense>,
    #[serde(default)]
    pub variables: Option<Vec<String>>,
    pub objective: Vec<Option<f64>>,
    #[serde(default)]
    pub constraints: Vec<ConstraintInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConstraintInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub coefficients: Vec<Option<f64>>,
    #[serde(default)]
    pub op: Option<String>,
    #[serde(default)]
    pub rhs: Option<f64>,
}

fn value_or_zero(value: Option<f64>, location: impl FnOnce() -> String) -> f64 {
    value.unwrap_or_else(|| {
        warn!(location = %location(), "missing value defaulted to 0");
        0.0
    })
}

impl ProblemInput {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn into_problem(self) -> Result<LpProblem, ParseOpError> {
        let sense = self.sense.unwrap_or_else(|| {
            warn!("objective sense missing, defaulting to maximize");
            ObjectiveSense::Maximize
        });

        let coefficients: Vec<f64> = self
            .objective
            .into_iter()
            .enumerate()
            .map(|(j, v)| value_or_zero(v, || format!("objective coefficient {}", j + 1)))
            .collect();
        let n = coefficients.len();

        let mut problem = LpProblem::new(self.variables.unwrap_or_else(|| (0..n).map(default_variable_name).collect()));
        problem.set_objective(coefficients, sense);

        for (i, c) in self.constraints.into_iter().enumerate() {
            let name = c.name.unwrap_or_else(|| format!("c{}", i + 1));
            let op = match c.op {
                Some(op) => op.parse::<ConstraintOp>()?,
                None => {
                    warn!(constraint = %name, "operator missing, defaulting to <=");
                    ConstraintOp::Le
                }
            };
            let coefficients = c
                .coefficients
                .into_iter()
                .enumerate()
                .map(|(j, v)| value_or_zero(v, || format!("coefficient {} of constraint {}", j + 1, name)))
                .collect();
            let rhs = value_or_zero(c.rhs, || format!("right-hand side of constraint {}", name));
            problem.add_constraint(name, coefficients, op, rhs);
        }

        Ok(problem)
    }
}
