use serde::Serialize;

use crate::lp::model::LinearProgram;

/// Instance-level statistics reported ahead of the graph blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LpStatistics {
    pub name: String,
    pub num_variables: usize,
    pub num_integer_variables: usize,
    pub proportion_integer: f64,
    pub num_constraints: usize,
    pub num_nonzeros: usize,
    pub matrix_density: f64,
}

impl LpStatistics {
    pub const FIELDS: [&'static str; 7] = [
        "name",
        "numVars",
        "numIntVars",
        "propIntVars",
        "numCons",
        "numNonzeros",
        "matrixDensity",
    ];

    pub fn compute(lp: &LinearProgram, include_objective: bool) -> Self {
        let num_variables = lp.columns.len();
        let num_integer_variables = lp.num_integer_variables();
        let (num_constraints, num_nonzeros) = lp
            .rows(include_objective)
            .fold((0, 0), |(rows, nnz), (_, row)| (rows + 1, nnz + row.support_size()));
        let cells = num_variables * num_constraints;
        Self {
            name: lp.name.clone(),
            num_variables,
            num_integer_variables,
            proportion_integer: ratio(num_integer_variables, num_variables),
            num_constraints,
            num_nonzeros,
            matrix_density: ratio(num_nonzeros, cells),
        }
    }

    pub fn csv_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.num_variables.to_string(),
            self.num_integer_variables.to_string(),
            format!("{:.4}", self.proportion_integer),
            self.num_constraints.to_string(),
            self.num_nonzeros.to_string(),
            format!("{:.6}", self.matrix_density),
        ]
    }
}

pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
