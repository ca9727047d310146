use crate::solution::Solution;
use crate::tableau::{Basis, Tableau};

/// Snapshot of the solver state at one point of the solve
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// 1-based position in the trace
    pub number: usize,
    pub description: String,
    /// Tableau at this point (before the pivot, for pivot steps)
    pub tableau: Tableau,
    pub basis: Basis,
    /// The pivot about to be applied, if this step records one
    pub pivot: Option<PivotInfo>,
    /// Set on the terminal step only
    pub solution: Option<Solution>,
}

/// Location and effect of a pivot
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PivotInfo {
    pub iteration: usize,
    pub row: usize,
    pub column: usize,
    pub element: f64,
    pub entering: String,
    pub leaving: String,
}

/// Append-only list of steps. Every entry owns a copy of the tableau.
#[derive(Debug, Default)]
pub(crate) struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        description: impl Into<String>,
        tableau: &Tableau,
        basis: &Basis,
        pivot: Option<PivotInfo>,
    ) {
        self.push(description.into(), tableau, basis, pivot, None);
    }

    pub(crate) fn finish(
        mut self,
        description: impl Into<String>,
        tableau: &Tableau,
        basis: &Basis,
        solution: &Solution,
    ) -> Vec<Step> {
        self.push(description.into(), tableau, basis, None, Some(solution.clone()));
        self.steps
    }

    fn push(
        &mut self,
        description: String,
        tableau: &Tableau,
        basis: &Basis,
        pivot: Option<PivotInfo>,
        solution: Option<Solution>,
    ) {
        self.steps.push(Step {
            number: self.steps.len() + 1,
            description,
            tableau: tableau.clone(),
            basis: basis.clone(),
            pivot,
            solution,
        });
    }
}
