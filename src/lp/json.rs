use std::io::Read;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StructError};
use crate::lp::model::LinearProgram;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProgram {
    #[serde(default)]
    pub name: String,
    pub variables: Vec<RawVariable>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVariable {
    pub name: String,
    #[serde(default)]
    pub integer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    pub name: String,
    #[serde(default)]
    pub objective: bool,
    #[serde(default)]
    pub coefficients: IndexMap<String, f64>,
}

/// Reader for the JSON instance format.
#[derive(Debug, Default)]
pub struct JsonProgramReader;

impl JsonProgramReader {
    pub fn from_json_str(source: &str, json: &str) -> Result<LinearProgram> {
        let raw: RawProgram = serde_json::from_str(json).map_err(|err| {
            StructError::parse(source, err.line(), err.to_string())
        })?;
        Self::from_raw(source, raw)
    }

    pub fn from_reader<R: Read>(source: &str, mut reader: R) -> Result<LinearProgram> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::from_json_str(source, &buf)
    }

    fn from_raw(source: &str, raw: RawProgram) -> Result<LinearProgram> {
        let mut lp = LinearProgram::new(raw.name);
        for variable in raw.variables {
            lp.add_column(variable.name, variable.integer);
        }
        for row in raw.rows {
            if lp.rows.contains_key(&row.name) {
                return Err(StructError::parse(
                    source,
                    0,
                    format!("duplicate row '{}'", row.name),
                ));
            }
            lp.add_row(row.name, row.objective, row.coefficients);
        }
        if let Some((row, var)) = lp.undeclared_variable() {
            return Err(StructError::parse(
                source,
                0,
                format!("row '{row}' references undeclared variable '{var}'"),
            ));
        }
        Ok(lp)
    }
}
