//! Display helpers for front-ends. The solver itself never rounds.

use crate::step::Step;

/// Magnitude below which a displayed value prints as `0`
pub const DISPLAY_EPSILON: f64 = 0.001;

/// Format a tableau value the way the explanatory tables show it
pub fn format_value(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    if value.abs() < DISPLAY_EPSILON {
        "0".to_string()
    } else {
        format!("{:.2}", value)
    }
}

/// Rows of display cells for a step: a header row (`Basis`, then one label
/// per tableau column) followed by one row per tableau row.
pub fn step_table(step: &Step) -> Vec<Vec<String>> {
    let labels = step.tableau.labels();
    let mut table = Vec::with_capacity(step.tableau.num_rows() + 1);

    let mut header = Vec::with_capacity(labels.len() + 1);
    header.push("Basis".to_string());
    header.extend(labels.iter().cloned());
    table.push(header);

    for (i, row) in step.tableau.rows().iter().enumerate() {
        let mut cells = Vec::with_capacity(row.len() + 1);
        cells.push(step.basis.get(i).unwrap_or_default().to_string());
        cells.extend(row.iter().map(|&v| format_value(v)));
        table.push(cells);
    }

    table
}

/// Render a table with right-aligned, space-padded columns
pub fn render_table(table: &[Vec<String>]) -> String {
    let n_cols = table.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..n_cols)
        .map(|j| {
            table
                .iter()
                .filter_map(|row| row.get(j))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in table {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(j, cell)| format!("{:>width$}", cell, width = widths[j]))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}
