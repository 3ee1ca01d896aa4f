use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type VariableName = String;
pub type RowName = String;

/// One row of the constraint matrix. Only nonzero coefficients are stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub coefficients: IndexMap<VariableName, f64>,
    pub is_objective: bool,
}

impl Row {
    pub fn support(&self) -> impl Iterator<Item = &VariableName> {
        self.coefficients.keys()
    }

    pub fn support_size(&self) -> usize {
        self.coefficients.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub is_integer: bool,
}

/// Sparse description of a (mixed) integer linear program, rows and columns in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearProgram {
    pub name: String,
    pub rows: IndexMap<RowName, Row>,
    pub columns: IndexMap<VariableName, Column>,
}

impl LinearProgram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_column(&mut self, name: impl Into<VariableName>, is_integer: bool) {
        self.columns
            .entry(name.into())
            .or_insert(Column { is_integer })
            .is_integer |= is_integer;
    }

    /// Adds a row; zero coefficients are dropped.
    pub fn add_row<I, S>(&mut self, name: impl Into<RowName>, is_objective: bool, entries: I)
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<VariableName>,
    {
        let coefficients = entries
            .into_iter()
            .filter(|(_, value)| *value != 0.0)
            .map(|(var, value)| (var.into(), value))
            .collect();
        self.rows.insert(
            name.into(),
            Row {
                coefficients,
                is_objective,
            },
        );
    }

    /// Rows that count as structure. The objective row is skipped unless `include_objective`.
    pub fn rows(&self, include_objective: bool) -> impl Iterator<Item = (&RowName, &Row)> {
        self.rows
            .iter()
            .filter(move |(_, row)| include_objective || !row.is_objective)
    }

    pub fn constraints(&self) -> impl Iterator<Item = (&RowName, &Row)> {
        self.rows(false)
    }

    pub fn is_integer(&self, variable: &str) -> bool {
        self.columns
            .get(variable)
            .map(|column| column.is_integer)
            .unwrap_or(false)
    }

    pub fn num_integer_variables(&self) -> usize {
        self.columns.values().filter(|c| c.is_integer).count()
    }

    /// First coefficient key that does not name a declared column.
    pub fn undeclared_variable(&self) -> Option<(&RowName, &VariableName)> {
        self.rows.iter().find_map(|(row_name, row)| {
            row.support()
                .find(|var| !self.columns.contains_key(*var))
                .map(|var| (row_name, var))
        })
    }
}
