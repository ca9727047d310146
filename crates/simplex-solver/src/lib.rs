mod error;
pub mod format;
mod problem;
mod simplex;
mod solution;
mod step;
mod tableau;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{ParseOpError, ValidationError};
pub use problem::{default_variable_name, Constraint, ConstraintOp, LpProblem, Objective, ObjectiveSense};
pub use simplex::{solve, Solver, DEFAULT_MAX_ITERATIONS};
pub use solution::{Solution, SolutionStatus, SolveReport};
pub use step::{PivotInfo, Step};
pub use tableau::{Basis, Tableau, OBJECTIVE_LABEL, RHS_LABEL};
