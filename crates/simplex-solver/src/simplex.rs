use tracing::{debug, info, warn};

use crate::error::ValidationError;
use crate::problem::{LpProblem, ObjectiveSense};
use crate::solution::{Solution, SolutionStatus, SolveReport};
use crate::step::{PivotInfo, Trace};
use crate::tableau::{Basis, Tableau};

/// Pivot budget used when none is configured
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Tableau simplex solver for linear programming problems
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots before giving up
    max_iterations: usize,
    /// Magnitude below which reported values are zero
    tolerance: f64,
    /// Accept `>=`, `=` and negative right-hand sides through phase 1
    two_phase: bool,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: 1e-9,
            two_phase: false,
        }
    }
}

/// How a run of the pivot loop ended
enum Outcome {
    Optimal,
    Unbounded { column: usize },
    Infeasible { residual: f64 },
    LimitReached,
}

impl Outcome {
    fn status(&self) -> SolutionStatus {
        match self {
            Outcome::Optimal => SolutionStatus::Optimal,
            Outcome::Unbounded { .. } => SolutionStatus::Unbounded,
            Outcome::Infeasible { .. } => SolutionStatus::Infeasible,
            Outcome::LimitReached => SolutionStatus::IterationLimitReached,
        }
    }
}

/// Solve `problem` with the default solver and the given pivot budget
pub fn solve(problem: &LpProblem, max_iterations: usize) -> Result<SolveReport, ValidationError> {
    Solver::new().with_max_iterations(max_iterations).solve(problem)
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_two_phase(mut self, enabled: bool) -> Self {
        self.two_phase = enabled;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn two_phase(&self) -> bool {
        self.two_phase
    }

    /// Solve the LP problem, recording a step for the initial tableau, for
    /// every pivot and for the terminal state.
    ///
    /// Only validation failures are errors; unbounded, infeasible and
    /// iteration-limit outcomes are reported through the solution status.
    pub fn solve(&self, problem: &LpProblem) -> Result<SolveReport, ValidationError> {
        let (mut tableau, mut basis) = Tableau::build(problem, self.two_phase)?;
        let mut trace = Trace::new();
        let mut iterations = 0;

        let has_artificial = tableau.num_artificial() > 0;
        let description = if has_artificial {
            "initial tableau: standard-form construction via slack, surplus and artificial variables"
        } else {
            "initial tableau: standard-form construction via slack variables"
        };
        trace.record(description, &tableau, &basis, None);
        debug!(
            rows = tableau.num_rows(),
            columns = tableau.num_columns(),
            "built initial tableau"
        );

        if has_artificial {
            if let Some(outcome) = self.phase1(&mut tableau, &mut basis, &mut trace, &mut iterations) {
                return Ok(self.finish(problem, &tableau, &basis, trace, outcome, iterations, true));
            }
        }

        let stage = if has_artificial { "phase 2 " } else { "" };
        let outcome = self.run(&mut tableau, &mut basis, &mut trace, &mut iterations, stage, false);
        Ok(self.finish(problem, &tableau, &basis, trace, outcome, iterations, false))
    }

    /// Pivot until no column can enter, no row can leave, or the budget is spent
    fn run(
        &self,
        tableau: &mut Tableau,
        basis: &mut Basis,
        trace: &mut Trace,
        iterations: &mut usize,
        stage: &str,
        include_artificial: bool,
    ) -> Outcome {
        while *iterations < self.max_iterations {
            let Some(col) = tableau.entering_column(include_artificial) else {
                return Outcome::Optimal;
            };
            let Some(row) = tableau.leaving_row(col) else {
                return Outcome::Unbounded { column: col };
            };

            *iterations += 1;
            let element = tableau.get(row, col);
            let entering = tableau.label(col).to_string();
            let leaving = basis.get(row).unwrap_or_default().to_string();
            debug!(
                iteration = *iterations,
                row,
                column = col,
                element,
                entering = %entering,
                leaving = %leaving,
                "pivot"
            );

            let description = format!(
                "{}iteration {}: pivot element = {:.2} at row {}, column {} ({} enters, {} leaves)",
                stage,
                *iterations,
                element,
                row + 1,
                col + 1,
                entering,
                leaving
            );
            let pivot = PivotInfo {
                iteration: *iterations,
                row,
                column: col,
                element,
                entering,
                leaving,
            };
            trace.record(description, tableau, basis, Some(pivot));
            tableau.pivot(basis, row, col);
        }

        // The last permitted pivot may itself have reached the optimum
        if tableau.entering_column(include_artificial).is_none() {
            Outcome::Optimal
        } else {
            warn!(max_iterations = self.max_iterations, "iteration limit reached before optimality");
            Outcome::LimitReached
        }
    }

    /// Find a feasible basis by maximizing minus the sum of the artificials.
    /// Returns `None` once the real objective is loaded and phase 2 can start.
    fn phase1(
        &self,
        tableau: &mut Tableau,
        basis: &mut Basis,
        trace: &mut Trace,
        iterations: &mut usize,
    ) -> Option<Outcome> {
        let z_col = tableau.z_column();
        let obj_row = tableau.objective_row();
        let real_costs = tableau.rows()[obj_row][..z_col].to_vec();
        let scale = (0..tableau.num_constraints())
            .map(|i| tableau.rhs(i).abs())
            .fold(1.0, f64::max);

        let phase1_costs: Vec<f64> = (0..z_col)
            .map(|j| if tableau.is_artificial(j) { 1.0 } else { 0.0 })
            .collect();
        tableau.load_objective(&phase1_costs, basis);
        trace.record("phase 1: minimize the sum of artificial variables", tableau, basis, None);

        match self.run(tableau, basis, trace, iterations, "phase 1 ", true) {
            Outcome::LimitReached => return Some(Outcome::LimitReached),
            // Bounded above by zero, so the loop can only stop at an optimum
            Outcome::Optimal | Outcome::Unbounded { .. } | Outcome::Infeasible { .. } => {}
        }

        let residual = -tableau.objective_rhs();
        if residual > self.tolerance * scale {
            warn!(residual, "phase 1 ended with positive artificial sum");
            return Some(Outcome::Infeasible { residual });
        }

        self.drive_out_artificials(tableau, basis, trace, *iterations);

        tableau.load_objective(&real_costs, basis);
        trace.record("phase 2: restore the original objective", tableau, basis, None);
        None
    }

    /// Swap zero-level artificials out of the basis where a non-artificial
    /// column has a non-zero entry in their row, positive entries first.
    /// Rows without one are redundant and keep their artificial at zero.
    fn drive_out_artificials(&self, tableau: &mut Tableau, basis: &mut Basis, trace: &mut Trace, iterations: usize) {
        let n_real = tableau.num_decision() + tableau.num_slack();
        for row in 0..tableau.num_constraints() {
            let Some(name) = basis.get(row) else { continue };
            let is_artificial = tableau.column_of(name).is_some_and(|c| tableau.is_artificial(c));
            if !is_artificial {
                continue;
            }

            let col = (0..n_real)
                .find(|&j| tableau.get(row, j) > self.tolerance)
                .or_else(|| (0..n_real).find(|&j| tableau.get(row, j).abs() > self.tolerance));
            let Some(col) = col else {
                debug!(row, artificial = name, "redundant constraint row keeps its artificial");
                continue;
            };

            let leaving = name.to_string();
            let entering = tableau.label(col).to_string();
            let element = tableau.get(row, col);
            let description = format!(
                "phase 1: drive {} out of row {} ({} enters at zero level)",
                leaving,
                row + 1,
                entering
            );
            let pivot = PivotInfo {
                iteration: iterations,
                row,
                column: col,
                element,
                entering,
                leaving,
            };
            trace.record(description, tableau, basis, Some(pivot));
            // Phase 1 left this artificial within tolerance of zero
            tableau.clear_rhs(row);
            tableau.pivot(basis, row, col);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        problem: &LpProblem,
        tableau: &Tableau,
        basis: &Basis,
        trace: Trace,
        outcome: Outcome,
        iterations: usize,
        in_phase1: bool,
    ) -> SolveReport {
        let status = outcome.status();
        let solution = self.extract_solution(problem, tableau, basis, status, iterations, in_phase1);

        let description = match outcome {
            Outcome::Optimal => "optimal solution reached".to_string(),
            Outcome::Unbounded { column } => format!(
                "unbounded: {} can increase without limit, no row has a positive entry in column {}",
                tableau.label(column),
                column + 1
            ),
            Outcome::Infeasible { residual } => format!(
                "infeasible: artificial variables still sum to {:.6} at the end of phase 1",
                residual
            ),
            Outcome::LimitReached => format!(
                "iteration limit reached: stopped after {} pivots without optimality",
                iterations
            ),
        };
        info!(
            status = %status,
            iterations,
            objective = solution.objective_value,
            "solve finished"
        );

        let steps = trace.finish(description, tableau, basis, &solution);
        SolveReport { solution, steps }
    }

    fn extract_solution(
        &self,
        problem: &LpProblem,
        tableau: &Tableau,
        basis: &Basis,
        status: SolutionStatus,
        iterations: usize,
        in_phase1: bool,
    ) -> Solution {
        // Non-basic variables sit at zero
        let values: Vec<f64> = (0..problem.num_variables())
            .map(|j| {
                basis
                    .row_of(tableau.label(j))
                    .map(|row| self.clean(tableau.rhs(row)))
                    .unwrap_or(0.0)
            })
            .collect();

        let maximize = problem.objective.sense == ObjectiveSense::Maximize;
        let objective_value = match status {
            SolutionStatus::Unbounded if maximize => f64::INFINITY,
            SolutionStatus::Unbounded => f64::NEG_INFINITY,
            SolutionStatus::Infeasible if maximize => f64::NEG_INFINITY,
            SolutionStatus::Infeasible => f64::INFINITY,
            // The objective row still holds the phase 1 objective
            _ if in_phase1 => self.clean(
                problem
                    .objective
                    .coefficients
                    .iter()
                    .zip(&values)
                    .map(|(c, v)| c * v)
                    .sum(),
            ),
            _ if maximize => self.clean(tableau.objective_rhs()),
            _ => self.clean(-tableau.objective_rhs()),
        };

        Solution {
            status,
            values,
            objective_value,
            iterations,
        }
    }

    fn clean(&self, value: f64) -> f64 {
        if value.abs() < self.tolerance { 0.0 } else { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ConstraintOp;

    fn sandal_factory() -> LpProblem {
        LpProblem::maximize(vec![12000.0, 10000.0])
            .subject_to(vec![908.0, 910.0], ConstraintOp::Le, 2_000_000.0)
            .subject_to(vec![67.0, 80.0], ConstraintOp::Le, 150_000.0)
    }

    fn two_pivot_problem() -> LpProblem {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=11
        LpProblem::maximize(vec![3.0, 2.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Le, 4.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 3.0)
            .subject_to(vec![0.0, 1.0], ConstraintOp::Le, 3.0)
    }

    #[test]
    fn test_sandal_factory() {
        let report = Solver::new().solve(&sandal_factory()).unwrap();
        let solution = &report.solution;

        println!("Status: {:?}", solution.status);
        println!("Values: {:?}", solution.values);
        println!("Objective: {}", solution.objective_value);

        let exact_x1 = 2_000_000.0 / 908.0;
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!(solution.iterations <= 2);
        assert!((solution.values[0] - exact_x1).abs() < 1e-6, "x1 = {}", solution.values[0]);
        assert_eq!(solution.values[0].round(), 2203.0);
        assert_eq!(solution.values[1], 0.0);
        assert!(((solution.objective_value - 12000.0 * exact_x1) / (12000.0 * exact_x1)).abs() < 1e-6);
        assert!(((solution.objective_value - 26_436_000.0) / 26_436_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_trace_shape() {
        let report = Solver::new().solve(&sandal_factory()).unwrap();

        assert_eq!(report.steps.len(), 3);
        assert_eq!(
            report.steps[0].description,
            "initial tableau: standard-form construction via slack variables"
        );
        assert_eq!(report.steps[0].basis.names(), &["s1", "s2", "Z"]);

        let pivot = report.steps[1].pivot.as_ref().unwrap();
        assert_eq!((pivot.row, pivot.column), (0, 0));
        assert_eq!(pivot.element, 908.0);
        assert_eq!(pivot.entering, "x1");
        assert_eq!(pivot.leaving, "s1");
        // recorded before the pivot is applied
        assert_eq!(report.steps[1].tableau, report.steps[0].tableau);

        let last = report.final_step().unwrap();
        assert_eq!(last.description, "optimal solution reached");
        assert_eq!(last.basis.names(), &["x1", "s2", "Z"]);
        assert_eq!(last.solution.as_ref(), Some(&report.solution));
        assert!(report.steps.iter().enumerate().all(|(i, s)| s.number == i + 1));
    }

    #[test]
    fn test_single_variable() {
        let problem = LpProblem::maximize(vec![1.0]).subject_to(vec![1.0], ConstraintOp::Le, 10.0);
        let report = Solver::new().solve(&problem).unwrap();

        assert_eq!(report.solution.status, SolutionStatus::Optimal);
        assert_eq!(report.solution.values, vec![10.0]);
        assert_eq!(report.solution.objective_value, 10.0);
        assert_eq!(report.solution.iterations, 1);
        assert_eq!(report.pivots().count(), 1);
    }

    #[test]
    fn test_simple_maximization() {
        let report = Solver::new().solve(&two_pivot_problem()).unwrap();
        let solution = report.solution;

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 11.0).abs() < 1e-6, "obj = {} (expected 11)", solution.objective_value);
        assert_eq!(solution.iterations, 2);
    }

    #[test]
    fn test_objective_improves_monotonically() {
        let report = Solver::new().solve(&two_pivot_problem()).unwrap();
        let objective: Vec<f64> = report.steps.iter().map(|s| s.tableau.objective_rhs()).collect();

        assert_eq!(objective.first(), Some(&0.0));
        assert!(objective.windows(2).all(|w| w[1] >= w[0]), "{:?}", objective);
        assert!((objective.last().unwrap() - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_iteration_limit() {
        let report = Solver::new()
            .with_max_iterations(1)
            .solve(&two_pivot_problem())
            .unwrap();
        let solution = &report.solution;

        assert_eq!(solution.status, SolutionStatus::IterationLimitReached);
        assert!(!solution.is_optimal());
        assert_eq!(solution.iterations, 1);
        // current vertex after one pivot: x=3, y=0
        assert_eq!(solution.values, vec![3.0, 0.0]);
        assert!((solution.objective_value - 9.0).abs() < 1e-9);
        assert!(report.final_step().unwrap().description.starts_with("iteration limit reached"));
    }

    #[test]
    fn test_limit_allows_final_optimal_pivot() {
        let report = Solver::new()
            .with_max_iterations(2)
            .solve(&two_pivot_problem())
            .unwrap();
        assert_eq!(report.solution.status, SolutionStatus::Optimal);

        let problem = LpProblem::maximize(vec![-1.0]).subject_to(vec![1.0], ConstraintOp::Le, 1.0);
        let report = Solver::new().with_max_iterations(0).solve(&problem).unwrap();
        assert_eq!(report.solution.status, SolutionStatus::Optimal);
        assert_eq!(report.solution.iterations, 0);
    }

    #[test]
    fn test_unbounded() {
        // Maximize x1 with only x2 bounded
        let problem = LpProblem::maximize(vec![1.0, 0.0]).subject_to(vec![0.0, 1.0], ConstraintOp::Le, 5.0);
        let report = Solver::new().solve(&problem).unwrap();

        assert_eq!(report.solution.status, SolutionStatus::Unbounded);
        assert_eq!(report.solution.objective_value, f64::INFINITY);
        assert_eq!(report.pivots().count(), 0);
        // initial tableau plus the detecting step
        assert_eq!(report.steps.len(), 2);
        let last = report.final_step().unwrap();
        assert!(last.description.starts_with("unbounded: x1"));
        assert_eq!(last.solution.as_ref().map(|s| s.status), Some(SolutionStatus::Unbounded));
    }

    #[test]
    fn test_unbounded_after_pivot() {
        // Maximize: x + 2y, with -x + y <= 1
        let problem = LpProblem::maximize(vec![1.0, 2.0]).subject_to(vec![-1.0, 1.0], ConstraintOp::Le, 1.0);
        let report = Solver::new().solve(&problem).unwrap();

        assert_eq!(report.solution.status, SolutionStatus::Unbounded);
        assert_eq!(report.solution.iterations, 1);
        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.solution.values, vec![0.0, 1.0]);
    }

    #[test]
    fn test_minimization() {
        // Minimize: -x - 2y
        // Subject to: x + y <= 4, y <= 3
        // Optimal: x=1, y=3, obj=-7
        let problem = LpProblem::minimize(vec![-1.0, -2.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Le, 4.0)
            .subject_to(vec![0.0, 1.0], ConstraintOp::Le, 3.0);
        let report = Solver::new().solve(&problem).unwrap();

        assert_eq!(report.solution.status, SolutionStatus::Optimal);
        assert!((report.solution.values[0] - 1.0).abs() < 1e-9);
        assert!((report.solution.values[1] - 3.0).abs() < 1e-9);
        assert!((report.solution.objective_value + 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_minimization_at_origin() {
        let problem = LpProblem::minimize(vec![2.0, 3.0]).subject_to(vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        let report = Solver::new().solve(&problem).unwrap();

        assert_eq!(report.solution.status, SolutionStatus::Optimal);
        assert_eq!(report.solution.values, vec![0.0, 0.0]);
        assert_eq!(report.solution.objective_value, 0.0);
        assert_eq!(report.steps.len(), 2);
    }

    #[test]
    fn test_deterministic() {
        let problem = two_pivot_problem();
        let first = Solver::new().solve(&problem).unwrap();
        let second = Solver::new().solve(&problem).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_steps_are_snapshots() {
        let problem = two_pivot_problem();
        let before = problem.clone();
        let report = Solver::new().solve(&problem).unwrap();

        let (initial, basis) = Tableau::build(&problem, false).unwrap();
        assert_eq!(report.steps[0].tableau, initial);
        assert_eq!(report.steps[0].basis, basis);
        assert_ne!(report.final_step().unwrap().tableau, initial);
        assert_eq!(problem, before);
    }

    #[test]
    fn test_non_basic_values_are_zero() {
        let problem = LpProblem::maximize(vec![1.0, 1.0, 1.0])
            .subject_to(vec![1.0, 2.0, 1.0], ConstraintOp::Le, 8.0)
            .subject_to(vec![3.0, 1.0, 0.0], ConstraintOp::Le, 9.0);
        let report = Solver::new().solve(&problem).unwrap();
        let last = report.final_step().unwrap();

        for (j, name) in problem.variables.iter().enumerate() {
            if !last.basis.contains(name) {
                assert_eq!(report.solution.values[j], 0.0, "{} is non-basic", name);
            }
        }
    }

    #[test]
    fn test_larger_problem() {
        // Maximize: 5x1 + 4x2 + 3x3
        // Subject to:
        //   2x1 + 3x2 + x3 <= 5
        //   4x1 + x2 + 2x3 <= 11
        //   3x1 + 4x2 + 2x3 <= 8
        // Optimal: x1=2, x2=0, x3=1, obj=13
        let problem = LpProblem::maximize(vec![5.0, 4.0, 3.0])
            .subject_to(vec![2.0, 3.0, 1.0], ConstraintOp::Le, 5.0)
            .subject_to(vec![4.0, 1.0, 2.0], ConstraintOp::Le, 11.0)
            .subject_to(vec![3.0, 4.0, 2.0], ConstraintOp::Le, 8.0);
        let report = Solver::new().solve(&problem).unwrap();
        let solution = report.solution;

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 2.0).abs() < 1e-6);
        assert!(solution.values[1].abs() < 1e-6);
        assert!((solution.values[2] - 1.0).abs() < 1e-6);
        assert!((solution.objective_value - 13.0).abs() < 1e-6);
    }

    #[test]
    fn test_validation_fails_fast() {
        let problem = sandal_factory().subject_to(vec![1.0, 1.0], ConstraintOp::Ge, 1.0);
        let err = Solver::new().solve(&problem).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedOperator { .. }));
    }

    #[test]
    fn test_minimization_with_ge() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y >= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=9
        let problem = LpProblem::minimize(vec![2.0, 3.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Ge, 4.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 3.0)
            .subject_to(vec![0.0, 1.0], ConstraintOp::Le, 3.0);
        let report = Solver::new().with_two_phase(true).solve(&problem).unwrap();
        let solution = &report.solution;

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 9.0).abs() < 1e-6, "obj = {} (expected 9)", solution.objective_value);
        assert!(report.steps.iter().any(|s| s.description.starts_with("phase 2: restore")));
    }

    #[test]
    fn test_equality_constraint() {
        // Maximize: x + y, with x + y = 2 and x <= 1
        let problem = LpProblem::maximize(vec![1.0, 1.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Eq, 2.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 1.0);
        let report = Solver::new().with_two_phase(true).solve(&problem).unwrap();

        assert_eq!(report.solution.status, SolutionStatus::Optimal);
        assert!((report.solution.values[0] - 1.0).abs() < 1e-9);
        assert!((report.solution.values[1] - 1.0).abs() < 1e-9);
        assert!((report.solution.objective_value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_redundant_equality_keeps_artificial() {
        let problem = LpProblem::maximize(vec![1.0, 0.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Eq, 2.0)
            .subject_to(vec![2.0, 2.0], ConstraintOp::Eq, 4.0);
        let report = Solver::new().with_two_phase(true).solve(&problem).unwrap();

        assert_eq!(report.solution.status, SolutionStatus::Optimal);
        assert_eq!(report.solution.values, vec![2.0, 0.0]);
        assert!((report.solution.objective_value - 2.0).abs() < 1e-9);
        assert_eq!(report.final_step().unwrap().basis.names(), &["x1", "a2", "Z"]);
    }

    #[test]
    fn test_drive_out_keeps_basic_values_non_negative() {
        // -x - y = 1e-12 is feasible within tolerance, leaving a1 basic at
        // near-zero level with only negative real entries in its row
        let problem = LpProblem::minimize(vec![1.0, 1.0]).subject_to(vec![-1.0, -1.0], ConstraintOp::Eq, 1e-12);
        let report = Solver::new().with_two_phase(true).solve(&problem).unwrap();

        assert_eq!(report.solution.status, SolutionStatus::Optimal);
        let drive_out = report
            .pivots()
            .find(|s| s.description.starts_with("phase 1: drive a1"))
            .unwrap();
        assert_eq!(drive_out.pivot.as_ref().unwrap().entering, "x1");

        let last = report.final_step().unwrap();
        assert_eq!(last.basis.names(), &["x1", "Z"]);
        assert!(last.tableau.rhs(0) >= 0.0, "x1 = {}", last.tableau.rhs(0));
        assert_eq!(report.solution.values, vec![0.0, 0.0]);
    }

    #[test]
    fn test_duplicate_variable_names_rejected() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "x".to_string()]);
        problem.set_objective(vec![1.0, 2.0], ObjectiveSense::Maximize);
        problem.add_constraint("first", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("second", vec![0.0, 1.0], ConstraintOp::Le, 5.0);
        let err = Solver::new().solve(&problem).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateVariable { name: "x".to_string() });
    }

    #[test]
    fn test_slack_named_variable_rejected() {
        let mut problem = LpProblem::new(vec!["s1".to_string()]);
        problem.add_constraint("cap", vec![1.0], ConstraintOp::Le, 10.0);
        let err = Solver::new().solve(&problem).unwrap_err();
        assert!(matches!(err, ValidationError::ReservedVariableName { .. }));
    }

    #[test]
    fn test_negative_rhs_with_two_phase() {
        // Maximize: -x, with -x <= -2 (x >= 2)
        let problem = LpProblem::maximize(vec![-1.0]).subject_to(vec![-1.0], ConstraintOp::Le, -2.0);
        let report = Solver::new().with_two_phase(true).solve(&problem).unwrap();

        assert_eq!(report.solution.status, SolutionStatus::Optimal);
        assert!((report.solution.values[0] - 2.0).abs() < 1e-9);
        assert!((report.solution.objective_value + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_infeasible() {
        // x >= 5
        // x <= 3
        let problem = LpProblem::minimize(vec![1.0])
            .subject_to(vec![1.0], ConstraintOp::Ge, 5.0)
            .subject_to(vec![1.0], ConstraintOp::Le, 3.0);
        let report = Solver::new().with_two_phase(true).solve(&problem).unwrap();

        assert_eq!(report.solution.status, SolutionStatus::Infeasible);
        assert_eq!(report.solution.objective_value, f64::INFINITY);
        assert!(report.final_step().unwrap().description.starts_with("infeasible"));
    }

    #[test]
    fn test_limit_covers_both_phases() {
        let problem = LpProblem::minimize(vec![2.0, 3.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Ge, 4.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 3.0)
            .subject_to(vec![0.0, 1.0], ConstraintOp::Le, 3.0);
        let report = Solver::new()
            .with_two_phase(true)
            .with_max_iterations(1)
            .solve(&problem)
            .unwrap();

        assert_eq!(report.solution.status, SolutionStatus::IterationLimitReached);
        assert_eq!(report.solution.iterations, 1);
        // x=3 after the first phase 1 pivot, priced with the real costs
        assert_eq!(report.solution.values, vec![3.0, 0.0]);
        assert!((report.solution.objective_value - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_solve_function() {
        let report = solve(&two_pivot_problem(), 10).unwrap();
        assert!(report.solution.is_optimal());
    }
}
