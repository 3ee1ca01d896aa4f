use std::io::{BufRead, BufReader, Read};

use indexmap::IndexMap;

use crate::error::{Result, StructError};
use crate::lp::model::{LinearProgram, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Name,
    ObjSense,
    Rows,
    Columns,
    Rhs,
    Ranges,
    Bounds,
    End,
}

/// Reader for free-format MPS files.
#[derive(Debug, Default)]
pub struct MpsParser;

impl MpsParser {
    pub fn from_str(source: &str, input: &str) -> Result<LinearProgram> {
        Self::from_reader(source, input.as_bytes())
    }

    /// `source` names the input in error messages.
    pub fn from_reader<R: Read>(source: &str, reader: R) -> Result<LinearProgram> {
        let mut state = ParseState::new(source);
        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            state.line = idx + 1;
            state.consume(&line)?;
            if state.section == Section::End {
                break;
            }
        }
        state.finish()
    }
}

struct ParseState<'a> {
    source: &'a str,
    line: usize,
    section: Section,
    lp: LinearProgram,
    objective: Option<String>,
    free_rows: Vec<String>,
    in_integer_block: bool,
    saw_rows: bool,
}

impl<'a> ParseState<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            line: 0,
            section: Section::Header,
            lp: LinearProgram::default(),
            objective: None,
            free_rows: Vec::new(),
            in_integer_block: false,
            saw_rows: false,
        }
    }

    fn error(&self, message: impl Into<String>) -> StructError {
        StructError::parse(self.source, self.line, message)
    }

    fn consume(&mut self, line: &str) -> Result<()> {
        if line.trim().is_empty() || line.starts_with('*') {
            return Ok(());
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if !line.starts_with(char::is_whitespace) {
            return self.enter_section(&tokens);
        }
        match self.section {
            Section::Rows => self.row_entry(&tokens),
            Section::Columns => self.column_entry(&tokens),
            Section::Bounds => self.bound_entry(&tokens),
            Section::Rhs | Section::Ranges | Section::ObjSense | Section::Name => Ok(()),
            Section::Header | Section::End => Err(self.error("data line outside of a section")),
        }
    }

    fn enter_section(&mut self, tokens: &[&str]) -> Result<()> {
        let keyword = tokens[0].to_ascii_uppercase();
        self.section = match keyword.as_str() {
            "NAME" => {
                self.lp.name = tokens.get(1).map(|s| s.to_string()).unwrap_or_default();
                Section::Name
            }
            "OBJSENSE" => Section::ObjSense,
            "ROWS" => {
                self.saw_rows = true;
                Section::Rows
            }
            "COLUMNS" => Section::Columns,
            "RHS" => Section::Rhs,
            "RANGES" => Section::Ranges,
            "BOUNDS" => Section::Bounds,
            "ENDATA" => Section::End,
            // free MPS allows OBJSENSE values on their own unindented line
            "MIN" | "MAX" | "MINIMIZE" | "MAXIMIZE" if self.section == Section::ObjSense => {
                Section::ObjSense
            }
            other => return Err(self.error(format!("unknown section '{other}'"))),
        };
        Ok(())
    }

    fn row_entry(&mut self, tokens: &[&str]) -> Result<()> {
        let [kind, name] = tokens else {
            return Err(self.error("expected '<type> <row name>'"));
        };
        if self.lp.rows.contains_key(*name) || self.free_rows.iter().any(|r| r == name) {
            return Err(self.error(format!("duplicate row '{name}'")));
        }
        match kind.to_ascii_uppercase().as_str() {
            "N" if self.objective.is_none() => {
                self.objective = Some(name.to_string());
                self.insert_row(name, true);
            }
            "N" => self.free_rows.push(name.to_string()),
            "E" | "L" | "G" => self.insert_row(name, false),
            other => return Err(self.error(format!("unknown row type '{other}'"))),
        }
        Ok(())
    }

    fn insert_row(&mut self, name: &str, is_objective: bool) {
        self.lp.rows.insert(
            name.to_string(),
            Row {
                coefficients: IndexMap::new(),
                is_objective,
            },
        );
    }

    fn column_entry(&mut self, tokens: &[&str]) -> Result<()> {
        if tokens.len() >= 3 && tokens[1].trim_matches('\'').eq_ignore_ascii_case("MARKER") {
            match tokens[2].trim_matches('\'').to_ascii_uppercase().as_str() {
                "INTORG" => self.in_integer_block = true,
                "INTEND" => self.in_integer_block = false,
                other => return Err(self.error(format!("unknown marker '{other}'"))),
            }
            return Ok(());
        }
        if tokens.len() != 3 && tokens.len() != 5 {
            return Err(self.error("expected '<column> <row> <value> [<row> <value>]'"));
        }

        let column = tokens[0];
        self.lp.add_column(column, self.in_integer_block);
        for pair in tokens[1..].chunks(2) {
            let value = self.number(pair[1])?;
            if self.free_rows.iter().any(|r| r == pair[0]) {
                continue;
            }
            let Some(row) = self.lp.rows.get_mut(pair[0]) else {
                return Err(self.error(format!("unknown row '{}'", pair[0])));
            };
            if value != 0.0 {
                row.coefficients.insert(column.to_string(), value);
            }
        }
        Ok(())
    }

    fn bound_entry(&mut self, tokens: &[&str]) -> Result<()> {
        if tokens.len() < 3 {
            return Err(self.error("expected '<type> <bound name> <column> [<value>]'"));
        }
        let kind = tokens[0].to_ascii_uppercase();
        let column = tokens[2];
        let Some(entry) = self.lp.columns.get_mut(column) else {
            return Err(self.error(format!("bound on unknown column '{column}'")));
        };
        match kind.as_str() {
            "BV" | "LI" | "UI" => entry.is_integer = true,
            "UP" | "LO" | "FX" | "FR" | "MI" | "PL" | "SC" => {}
            other => return Err(self.error(format!("unknown bound type '{other}'"))),
        }
        if let Some(value) = tokens.get(3) {
            self.number(value)?;
        }
        Ok(())
    }

    fn number(&self, token: &str) -> Result<f64> {
        token
            .parse::<f64>()
            .map_err(|_| self.error(format!("invalid number '{token}'")))
    }

    fn finish(self) -> Result<LinearProgram> {
        if !self.saw_rows {
            return Err(StructError::parse(self.source, self.line, "missing ROWS section"));
        }
        Ok(self.lp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
NAME          SMALL
* comment line
ROWS
 N  COST
 L  R1
 G  R2
 N  FREE
COLUMNS
    MARKER                 'MARKER'                 'INTORG'
    X1        COST         1.0   R1           1.0
    MARKER                 'MARKER'                 'INTEND'
    X2        R1           2.0   R2           1.0
    X2        FREE         3.0
    X3        R2           -1.0  COST         0.0
    X4        COST         1.0
RHS
    RHS       R1           4.0
BOUNDS
 UP BND       X2           5.0
 BV BND       X3
ENDATA
";

    #[test]
    fn parses_rows_columns_and_integrality() {
        let lp = MpsParser::from_str("small.mps", SMALL).expect("parse");
        assert_eq!(lp.name, "SMALL");
        assert_eq!(lp.rows.len(), 3, "free rows beyond the objective are dropped");
        assert!(lp.rows["COST"].is_objective);
        assert_eq!(lp.columns.len(), 4);
        assert!(lp.is_integer("X1"));
        assert!(!lp.is_integer("X2"));
        assert!(lp.is_integer("X3"), "BV bound marks binary");
        let r2: Vec<_> = lp.rows["R2"].support().cloned().collect();
        assert_eq!(r2, vec!["X2".to_string(), "X3".to_string()]);
        assert_eq!(lp.rows["COST"].support_size(), 2, "zero objective entry dropped");
    }

    #[test]
    fn unknown_row_reports_line() {
        let input = "NAME T\nROWS\n N obj\nCOLUMNS\n    X R9 1.0\nENDATA\n";
        let err = MpsParser::from_str("t.mps", input).unwrap_err();
        match err {
            StructError::Parse { line, message, .. } => {
                assert_eq!(line, 5);
                assert!(message.contains("R9"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_number_is_a_parse_error() {
        let input = "NAME T\nROWS\n L c\nCOLUMNS\n    X c abc\nENDATA\n";
        assert!(MpsParser::from_str("t.mps", input).unwrap_err().is_parse());
    }

    #[test]
    fn missing_rows_is_a_parse_error() {
        assert!(MpsParser::from_str("t.mps", "NAME T\nENDATA\n")
            .unwrap_err()
            .is_parse());
    }
}
