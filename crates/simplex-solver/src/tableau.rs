use crate::error::ValidationError;
use crate::problem::{ConstraintOp, LpProblem, ObjectiveSense};

/// Label of the objective row and of the objective-marker column
pub const OBJECTIVE_LABEL: &str = "Z";
/// Label of the right-hand-side column
pub const RHS_LABEL: &str = "RHS";

/// Dense simplex tableau.
///
/// Rows `0..m` are constraints and the last row is the objective row.
/// Columns are laid out as decision variables, slack/surplus variables,
/// artificial variables, the `Z` marker and finally the right-hand side.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    data: Vec<Vec<f64>>,
    labels: Vec<String>,
    n_vars: usize,
    n_slack: usize,
    n_artificial: usize,
}

/// Name of the basic variable of every tableau row, objective row last
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basis(Vec<String>);

impl Basis {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        self.0.get(row).map(String::as_str)
    }

    /// Constraint row in which `name` is basic
    pub fn row_of(&self, name: &str) -> Option<usize> {
        let constraint_rows = self.0.len().saturating_sub(1);
        self.0[..constraint_rows].iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.row_of(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, row: usize, name: String) {
        self.0[row] = name;
    }
}

impl Tableau {
    /// Build the starting tableau and basis for `problem`.
    ///
    /// Every `<=` row gets a slack column whose variable starts basic. With
    /// `two_phase`, rows with a negative right-hand side are negated first,
    /// `>=` rows get a surplus column plus an artificial and `=` rows an
    /// artificial; the artificials then start basic instead.
    pub fn build(problem: &LpProblem, two_phase: bool) -> Result<(Tableau, Basis), ValidationError> {
        problem.validate(two_phase)?;

        let n_vars = problem.num_variables();
        let n_constraints = problem.num_constraints();

        // (coefficients, op, rhs) with rhs >= 0
        let rows: Vec<(Vec<f64>, ConstraintOp, f64)> = problem
            .constraints
            .iter()
            .map(|c| {
                if c.rhs < 0.0 {
                    let coefficients = c.coefficients.iter().map(|&v| -v).collect();
                    (coefficients, c.op.flipped(), -c.rhs)
                } else {
                    (c.coefficients.clone(), c.op, c.rhs)
                }
            })
            .collect();

        let n_slack = rows.iter().filter(|(_, op, _)| *op != ConstraintOp::Eq).count();
        let n_artificial = rows.iter().filter(|(_, op, _)| *op != ConstraintOp::Le).count();

        let mut labels: Vec<String> = problem.variables.clone();
        labels.extend((1..=n_slack).map(|k| format!("s{}", k)));
        labels.extend((1..=n_artificial).map(|k| format!("a{}", k)));
        labels.push(OBJECTIVE_LABEL.to_string());
        labels.push(RHS_LABEL.to_string());

        let total_cols = labels.len();
        let mut tableau = Tableau {
            data: vec![vec![0.0; total_cols]; n_constraints + 1],
            labels,
            n_vars,
            n_slack,
            n_artificial,
        };
        let mut basis = Vec::with_capacity(n_constraints + 1);

        let mut slack_idx = n_vars;
        let mut artificial_idx = n_vars + n_slack;
        for (i, (coefficients, op, rhs)) in rows.into_iter().enumerate() {
            tableau.data[i][..n_vars].copy_from_slice(&coefficients);
            tableau.data[i][total_cols - 1] = rhs;

            match op {
                ConstraintOp::Le => {
                    tableau.data[i][slack_idx] = 1.0;
                    basis.push(tableau.labels[slack_idx].clone());
                    slack_idx += 1;
                }
                ConstraintOp::Ge => {
                    tableau.data[i][slack_idx] = -1.0; // surplus
                    slack_idx += 1;
                    tableau.data[i][artificial_idx] = 1.0;
                    basis.push(tableau.labels[artificial_idx].clone());
                    artificial_idx += 1;
                }
                ConstraintOp::Eq => {
                    tableau.data[i][artificial_idx] = 1.0;
                    basis.push(tableau.labels[artificial_idx].clone());
                    artificial_idx += 1;
                }
            }
        }
        basis.push(OBJECTIVE_LABEL.to_string());

        // Objective row holds the negated costs: Z - c.x = 0
        let obj_row = n_constraints;
        let z_col = tableau.z_column();
        for (j, &coef) in problem.objective.coefficients.iter().enumerate() {
            tableau.data[obj_row][j] = match problem.objective.sense {
                ObjectiveSense::Maximize => -coef,
                ObjectiveSense::Minimize => coef,
            };
        }
        tableau.data[obj_row][z_col] = 1.0;

        Ok((tableau, Basis(basis)))
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, col: usize) -> &str {
        &self.labels[col]
    }

    pub fn column_of(&self, name: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == name)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn num_rows(&self) -> usize {
        self.data.len()
    }

    pub fn num_columns(&self) -> usize {
        self.labels.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.data.len() - 1
    }

    pub fn num_decision(&self) -> usize {
        self.n_vars
    }

    pub fn num_slack(&self) -> usize {
        self.n_slack
    }

    pub fn num_artificial(&self) -> usize {
        self.n_artificial
    }

    pub fn objective_row(&self) -> usize {
        self.data.len() - 1
    }

    pub fn z_column(&self) -> usize {
        self.n_vars + self.n_slack + self.n_artificial
    }

    pub fn rhs_column(&self) -> usize {
        self.labels.len() - 1
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.data[row][self.rhs_column()]
    }

    /// Right-hand side of the objective row
    pub fn objective_rhs(&self) -> f64 {
        self.rhs(self.objective_row())
    }

    pub fn is_artificial(&self, col: usize) -> bool {
        let start = self.n_vars + self.n_slack;
        col >= start && col < start + self.n_artificial
    }

    /// Column with the most negative objective-row entry, leftmost on ties.
    ///
    /// Compares against exactly 0; `None` means the basis is optimal.
    pub(crate) fn entering_column(&self, include_artificial: bool) -> Option<usize> {
        let obj_row = self.objective_row();
        let end = if include_artificial {
            self.z_column()
        } else {
            self.n_vars + self.n_slack
        };

        let mut min_val = 0.0;
        let mut min_col = None;
        for j in 0..end {
            let val = self.data[obj_row][j];
            if val < min_val {
                min_val = val;
                min_col = Some(j);
            }
        }
        min_col
    }

    /// Minimum-ratio test over rows with a strictly positive entry in `col`,
    /// lowest row on ties. `None` means the column is unbounded.
    pub(crate) fn leaving_row(&self, col: usize) -> Option<usize> {
        let rhs_col = self.rhs_column();

        let mut min_ratio = f64::INFINITY;
        let mut min_row = None;
        for i in 0..self.num_constraints() {
            let val = self.data[i][col];
            if val > 0.0 {
                let ratio = self.data[i][rhs_col] / val;
                if ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }
        min_row
    }

    /// Gauss-Jordan pivot on `(row, col)`. Returns the name of the variable
    /// that left the basis.
    pub(crate) fn pivot(&mut self, basis: &mut Basis, row: usize, col: usize) -> String {
        let n_rows = self.data.len();
        let n_cols = self.labels.len();

        let pivot_val = self.data[row][col];
        for j in 0..n_cols {
            self.data[row][j] /= pivot_val;
        }

        for i in 0..n_rows {
            if i != row {
                let factor = self.data[i][col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..n_cols {
                    self.data[i][j] -= factor * self.data[row][j];
                }
            }
        }

        let leaving = basis.0[row].clone();
        basis.set(row, self.labels[col].clone());
        leaving
    }

    pub(crate) fn clear_rhs(&mut self, row: usize) {
        let rhs_col = self.rhs_column();
        self.data[row][rhs_col] = 0.0;
    }

    /// Replace the objective row with `costs` (one per variable column, in
    /// negated form) and eliminate the contribution of every basic column.
    pub(crate) fn load_objective(&mut self, costs: &[f64], basis: &Basis) {
        let obj_row = self.objective_row();
        let z_col = self.z_column();
        let n_cols = self.labels.len();

        let row = &mut self.data[obj_row];
        row.iter_mut().for_each(|v| *v = 0.0);
        row[..costs.len()].copy_from_slice(costs);
        row[z_col] = 1.0;

        for i in 0..self.num_constraints() {
            let Some(col) = basis.get(i).and_then(|name| self.column_of(name)) else {
                continue;
            };
            let factor = self.data[obj_row][col];
            if factor != 0.0 {
                for j in 0..n_cols {
                    self.data[obj_row][j] -= factor * self.data[i][j];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> LpProblem {
        LpProblem::maximize(vec![12000.0, 10000.0])
            .subject_to(vec![908.0, 910.0], ConstraintOp::Le, 2_000_000.0)
            .subject_to(vec![67.0, 80.0], ConstraintOp::Le, 150_000.0)
    }

    #[test]
    fn test_initial_tableau_layout() {
        let (tableau, basis) = Tableau::build(&two_by_two(), false).unwrap();

        assert_eq!(tableau.num_rows(), 3);
        assert_eq!(tableau.num_columns(), 2 + 2 + 2);
        assert_eq!(tableau.labels(), &["x1", "x2", "s1", "s2", "Z", "RHS"]);
        assert_eq!(tableau.rows()[0], vec![908.0, 910.0, 1.0, 0.0, 0.0, 2_000_000.0]);
        assert_eq!(tableau.rows()[1], vec![67.0, 80.0, 0.0, 1.0, 0.0, 150_000.0]);
        assert_eq!(tableau.rows()[2], vec![-12000.0, -10000.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(basis.names(), &["s1", "s2", "Z"]);
    }

    #[test]
    fn test_slack_block_is_identity() {
        let problem = LpProblem::maximize(vec![1.0, 2.0, 3.0])
            .subject_to(vec![1.0, 1.0, 1.0], ConstraintOp::Le, 10.0)
            .subject_to(vec![2.0, 0.0, 1.0], ConstraintOp::Le, 8.0)
            .subject_to(vec![0.0, 1.0, -1.0], ConstraintOp::Le, 3.0);
        let (tableau, basis) = Tableau::build(&problem, false).unwrap();

        for i in 0..3 {
            for k in 0..3 {
                let expected = if i == k { 1.0 } else { 0.0 };
                assert_eq!(tableau.get(i, 3 + k), expected);
            }
        }
        assert_eq!(basis.names(), &["s1", "s2", "s3", "Z"]);
    }

    #[test]
    fn test_minimize_keeps_costs_positive() {
        let problem = LpProblem::minimize(vec![2.0, -3.0]).subject_to(vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        let (tableau, _) = Tableau::build(&problem, false).unwrap();
        assert_eq!(tableau.get(1, 0), 2.0);
        assert_eq!(tableau.get(1, 1), -3.0);
    }

    #[test]
    fn test_build_rejects_invalid() {
        let problem = LpProblem::maximize(vec![1.0]).subject_to(vec![1.0], ConstraintOp::Eq, 5.0);
        assert!(Tableau::build(&problem, false).is_err());
    }

    #[test]
    fn test_entering_prefers_leftmost_tie() {
        let problem = LpProblem::maximize(vec![5.0, 5.0]).subject_to(vec![1.0, 1.0], ConstraintOp::Le, 1.0);
        let (tableau, _) = Tableau::build(&problem, false).unwrap();
        assert_eq!(tableau.entering_column(false), Some(0));
    }

    #[test]
    fn test_leaving_row_ratio_test() {
        let (tableau, _) = Tableau::build(&two_by_two(), false).unwrap();
        // 2000000 / 908 ~ 2202.6 beats 150000 / 67 ~ 2238.8
        assert_eq!(tableau.leaving_row(0), Some(0));

        let problem = LpProblem::maximize(vec![1.0, 1.0])
            .subject_to(vec![-1.0, 1.0], ConstraintOp::Le, 2.0)
            .subject_to(vec![0.0, 1.0], ConstraintOp::Le, 5.0);
        let (tableau, _) = Tableau::build(&problem, false).unwrap();
        assert_eq!(tableau.leaving_row(0), None);

        // equal ratios: lowest row wins
        let problem = LpProblem::maximize(vec![1.0])
            .subject_to(vec![2.0], ConstraintOp::Le, 4.0)
            .subject_to(vec![1.0], ConstraintOp::Le, 2.0);
        let (tableau, _) = Tableau::build(&problem, false).unwrap();
        assert_eq!(tableau.leaving_row(0), Some(0));
    }

    #[test]
    fn test_pivot_eliminates_column() {
        let (mut tableau, mut basis) = Tableau::build(&two_by_two(), false).unwrap();
        let leaving = tableau.pivot(&mut basis, 0, 0);

        assert_eq!(leaving, "s1");
        assert_eq!(basis.names(), &["x1", "s2", "Z"]);
        assert_eq!(tableau.get(0, 0), 1.0);
        assert_eq!(tableau.get(1, 0), 0.0);
        assert_eq!(tableau.get(2, 0), 0.0);
        assert!((tableau.rhs(0) - 2_000_000.0 / 908.0).abs() < 1e-9);
        assert!((tableau.objective_rhs() - 12000.0 * 2_000_000.0 / 908.0).abs() < 1e-3);
        assert_eq!(basis.row_of("x1"), Some(0));
        assert_eq!(basis.row_of("Z"), None);
    }

    #[test]
    fn test_two_phase_layout() {
        let problem = LpProblem::minimize(vec![2.0, 3.0])
            .subject_to(vec![1.0, 1.0], ConstraintOp::Ge, 4.0)
            .subject_to(vec![1.0, 0.0], ConstraintOp::Le, 3.0)
            .subject_to(vec![0.0, 1.0], ConstraintOp::Eq, 1.0)
            .subject_to(vec![-1.0, 0.0], ConstraintOp::Le, -1.0);
        let (tableau, basis) = Tableau::build(&problem, true).unwrap();

        assert_eq!(tableau.labels(), &["x1", "x2", "s1", "s2", "s3", "a1", "a2", "a3", "Z", "RHS"]);
        assert_eq!(basis.names(), &["a1", "s2", "a2", "a3", "Z"]);
        // negated row: x1 >= 1
        assert_eq!(tableau.rows()[3], vec![1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
        assert!(tableau.is_artificial(5));
        assert!(!tableau.is_artificial(8));
        assert_eq!(tableau.entering_column(false), None);
    }

    #[test]
    fn test_load_objective_prices_out_basis() {
        let problem = LpProblem::maximize(vec![1.0]).subject_to(vec![1.0], ConstraintOp::Ge, 2.0);
        let (mut tableau, basis) = Tableau::build(&problem, true).unwrap();
        // columns: x1, s1, a1, Z, RHS
        tableau.load_objective(&[0.0, 0.0, 1.0], &basis);
        assert_eq!(tableau.rows()[1], vec![-1.0, 1.0, 0.0, 1.0, -2.0]);
    }
}
