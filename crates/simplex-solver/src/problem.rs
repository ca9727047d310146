use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{ParseOpError, ValidationError};
use crate::tableau::{OBJECTIVE_LABEL, RHS_LABEL};

/// A linear program over non-negative decision variables
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Variable names, `x1..xn` unless given explicitly
    pub variables: Vec<String>,
    /// Objective function
    pub objective: Objective,
    /// Constraints
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to maximize or minimize
    pub sense: ObjectiveSense,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectiveSense {
    #[default]
    Maximize,
    Minimize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Eq,
}

impl ConstraintOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Ge => ">=",
            ConstraintOp::Eq => "=",
        }
    }

    /// The operator obtained by multiplying both sides by -1
    pub fn flipped(self) -> Self {
        match self {
            ConstraintOp::Le => ConstraintOp::Ge,
            ConstraintOp::Ge => ConstraintOp::Le,
            ConstraintOp::Eq => ConstraintOp::Eq,
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ConstraintOp {
    type Err = ParseOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<=" | "≤" | "le" => Ok(ConstraintOp::Le),
            ">=" | "≥" | "ge" => Ok(ConstraintOp::Ge),
            "=" | "==" | "eq" => Ok(ConstraintOp::Eq),
            other => Err(ParseOpError(other.to_string())),
        }
    }
}

/// Conventional name of the decision variable at `index`
pub fn default_variable_name(index: usize) -> String {
    format!("x{}", index + 1)
}

/// Whether `name` has the shape of a label the tableau generates itself:
/// `s{k}`, `a{k}`, `Z` or `RHS`
fn is_generated_label(name: &str) -> bool {
    if name == OBJECTIVE_LABEL || name == RHS_LABEL {
        return true;
    }
    match name.strip_prefix('s').or_else(|| name.strip_prefix('a')) {
        Some(index) => !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

impl LpProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                sense: ObjectiveSense::Maximize,
            },
            constraints: Vec::new(),
        }
    }

    pub fn maximize(coefficients: Vec<f64>) -> Self {
        Self::with_objective(coefficients, ObjectiveSense::Maximize)
    }

    pub fn minimize(coefficients: Vec<f64>) -> Self {
        Self::with_objective(coefficients, ObjectiveSense::Minimize)
    }

    fn with_objective(coefficients: Vec<f64>, sense: ObjectiveSense) -> Self {
        let variables = (0..coefficients.len()).map(default_variable_name).collect();
        Self {
            variables,
            objective: Objective { coefficients, sense },
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, sense: ObjectiveSense) {
        self.objective = Objective { coefficients, sense };
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    /// Chained form of [`add_constraint`](Self::add_constraint), named `c1`, `c2`, ...
    pub fn subject_to(mut self, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) -> Self {
        let name = format!("c{}", self.constraints.len() + 1);
        self.add_constraint(name, coefficients, op, rhs);
        self
    }

    pub fn num_variables(&self) -> usize {
        self.objective.coefficients.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Check the problem's shape and values.
    ///
    /// Without `two_phase`, only `<=` rows with non-negative right-hand sides
    /// are accepted, since the all-slack starting basis is otherwise infeasible.
    pub fn validate(&self, two_phase: bool) -> Result<(), ValidationError> {
        let n = self.num_variables();
        if n == 0 {
            return Err(ValidationError::NoVariables);
        }
        if self.variables.len() != n {
            return Err(ValidationError::DimensionMismatch {
                what: "variable names".to_string(),
                expected: n,
                found: self.variables.len(),
            });
        }

        // Basis rows refer to columns by name
        let mut seen = HashSet::with_capacity(n);
        for name in &self.variables {
            if is_generated_label(name) {
                return Err(ValidationError::ReservedVariableName { name: name.clone() });
            }
            if !seen.insert(name.as_str()) {
                return Err(ValidationError::DuplicateVariable { name: name.clone() });
            }
        }

        for (j, &coef) in self.objective.coefficients.iter().enumerate() {
            if !coef.is_finite() {
                return Err(ValidationError::NonFinite {
                    location: format!("objective coefficient of {}", self.variables[j]),
                    value: coef,
                });
            }
        }

        for c in &self.constraints {
            if c.coefficients.len() != n {
                return Err(ValidationError::DimensionMismatch {
                    what: format!("constraint {}", c.name),
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
            for (j, &coef) in c.coefficients.iter().enumerate() {
                if !coef.is_finite() {
                    return Err(ValidationError::NonFinite {
                        location: format!("coefficient of {} in constraint {}", self.variables[j], c.name),
                        value: coef,
                    });
                }
            }
            if !c.rhs.is_finite() {
                return Err(ValidationError::NonFinite {
                    location: format!("right-hand side of constraint {}", c.name),
                    value: c.rhs,
                });
            }
            if two_phase {
                continue;
            }
            if c.op != ConstraintOp::Le {
                return Err(ValidationError::UnsupportedOperator {
                    constraint: c.name.clone(),
                    op: c.op,
                });
            }
            if c.rhs < 0.0 {
                return Err(ValidationError::NegativeRhs {
                    constraint: c.name.clone(),
                    rhs: c.rhs,
                });
            }
        }

        Ok(())
    }
}
