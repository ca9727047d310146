//! WASM bindings for the simplex solver
//!
//! Problems are passed in as plain JavaScript objects shaped like
//! [`LpProblem`]; reports come back as the serialized [`SolveReport`].

use wasm_bindgen::prelude::*;

use crate::problem::LpProblem;
use crate::simplex::{DEFAULT_MAX_ITERATIONS, Solver};

/// Solve a problem and return the report with every step
#[wasm_bindgen]
pub fn solve(problem: JsValue, max_iterations: Option<u32>, two_phase: Option<bool>) -> Result<JsValue, JsValue> {
    let problem: LpProblem =
        serde_wasm_bindgen::from_value(problem).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let solver = Solver::new()
        .with_max_iterations(max_iterations.map_or(DEFAULT_MAX_ITERATIONS, |n| n as usize))
        .with_two_phase(two_phase.unwrap_or(false));
    let report = solver
        .solve(&problem)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validation diagnostic for JavaScript
#[derive(serde::Serialize)]
struct Diagnostic {
    message: String,
    severity: String,
}

/// Validate a problem and return diagnostics as JSON
#[wasm_bindgen]
pub fn validate(problem: JsValue, two_phase: Option<bool>) -> JsValue {
    let diagnostics: Vec<Diagnostic> = match serde_wasm_bindgen::from_value::<LpProblem>(problem) {
        Ok(problem) => match problem.validate(two_phase.unwrap_or(false)) {
            Ok(()) => Vec::new(),
            Err(e) => vec![Diagnostic {
                message: e.to_string(),
                severity: "error".to_string(),
            }],
        },
        Err(e) => vec![Diagnostic {
            message: format!("malformed problem: {}", e),
            severity: "error".to_string(),
        }],
    };
    serde_wasm_bindgen::to_value(&diagnostics).unwrap_or(JsValue::NULL)
}

/// Format a tableau value for display
#[wasm_bindgen]
pub fn format_value(value: f64) -> String {
    crate::format::format_value(value)
}
